// src/lib.rs

//! Passive subdomain discovery, liveness probing and page fingerprinting
//! for a single domain.

pub mod config;
pub mod core;
pub mod logging;

pub use crate::config::ReconConfig;
pub use crate::core::error::ReconError;
pub use crate::core::models::ReconReport;
pub use crate::core::scanner::ReconEngine;
