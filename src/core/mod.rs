// src/core/mod.rs

// Root of the `core` module: the data model, the network capabilities and
// the scanner that ties them together.

/// Data structures shared by every stage, from `SubdomainCandidate` to the
/// final `ReconReport`.
pub mod models;

/// Error enums for fetching, sources, resolution and the engine itself.
pub mod error;

/// The HTTP content-fetch capability and its reqwest implementation.
pub mod fetch;

/// IPv4 resolution, over DNS-over-HTTPS or the system resolver.
pub mod resolver;

/// Target parsing and candidate hostname normalisation.
pub mod target;

/// Static technology signatures and social platform patterns.
pub mod knowledge_base;

/// Discovery, probing, fingerprinting and the `ReconEngine`.
pub mod scanner;

#[cfg(test)]
pub(crate) mod testing;
