// src/core/error.rs

//! Error types for the recon engine.
//!
//! None of these escape `ReconEngine::run` except `ReconError`; every other
//! failure is recovered where it happens and only logged.

use thiserror::Error;

/// Failure of a single HTTP fetch through a `ContentFetcher`.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid url '{0}'")]
    InvalidUrl(String),
}

/// Failure of a single passive subdomain source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("{source_name} returned status {status}")]
    Status { source_name: &'static str, status: u16 },

    #[error("{source_name} response could not be parsed: {message}")]
    Parse { source_name: &'static str, message: String },

    #[error("{source_name} reported an error: {message}")]
    Upstream { source_name: &'static str, message: String },

    #[error("{0} requires an API key")]
    MissingCredentials(&'static str),
}

/// Failure to resolve an address for a hostname.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("DNS-over-HTTPS request failed: {0}")]
    Doh(#[from] FetchError),

    #[error("DNS-over-HTTPS answer could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("lookup failed: {0}")]
    Lookup(String),
}

/// Invalid configuration value read from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {var}")]
    Invalid { var: String, value: String },
}

/// The only errors `ReconEngine` reports to its caller.
#[derive(Debug, Error)]
pub enum ReconError {
    #[error("'{0}' is not a valid domain name")]
    InvalidDomain(String),

    #[error("could not build the HTTP client: {0}")]
    Setup(#[from] FetchError),
}
