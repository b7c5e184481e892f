// src/core/scanner/sources/mod.rs

//! Passive subdomain sources and their aggregation.
//!
//! Each `SourceProvider` queries one data source. `SourceAggregator` queries
//! all of them at once, keeps whatever succeeded and merges the hostnames into
//! a single candidate list that remembers who reported what.

pub mod cert_spotter;
pub mod hackertarget;
pub mod securitytrails;

pub use cert_spotter::CertSpotterProvider;
pub use hackertarget::HackerTargetProvider;
pub use securitytrails::SecurityTrailsProvider;

use crate::core::error::SourceError;
use crate::core::models::SubdomainCandidate;
use crate::core::target::candidate_hostname;
use async_trait::async_trait;
use futures::future::join_all;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// One passive source of subdomain names.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Human-readable name used as the provenance label.
    fn label(&self) -> &'static str;

    /// Raw hostnames the source knows for `domain`. Need not be normalised
    /// or filtered; the aggregator does both.
    async fn subdomains(&self, domain: &str) -> Result<Vec<String>, SourceError>;
}

/// Fans out to every provider and merges their answers.
///
/// Providers are kept in declaration order, which is also the priority order
/// used when attributing a candidate to a single source.
pub struct SourceAggregator {
    providers: Vec<Box<dyn SourceProvider>>,
}

impl SourceAggregator {
    pub fn new(providers: Vec<Box<dyn SourceProvider>>) -> Self {
        Self { providers }
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.label()).collect()
    }

    /// Queries all providers concurrently. A failing provider contributes
    /// nothing; discovery itself never fails.
    pub async fn discover(&self, domain: &str) -> Vec<SubdomainCandidate> {
        info!(domain, providers = self.providers.len(), "Starting subdomain discovery.");

        let outcomes = join_all(self.providers.iter().map(|provider| async move {
            (provider.label(), provider.subdomains(domain).await)
        }))
        .await;

        let candidates = merge_candidates(domain, outcomes);
        info!(domain, candidates = candidates.len(), "Subdomain discovery finished.");
        candidates
    }
}

/// Folds per-provider outcomes into one deduplicated candidate list.
///
/// `outcomes` must be in provider priority order. The result is sorted by
/// hostname and each candidate's `sources` follow the priority order, so the
/// output does not depend on which provider answered first.
pub fn merge_candidates(
    domain: &str,
    outcomes: Vec<(&'static str, Result<Vec<String>, SourceError>)>,
) -> Vec<SubdomainCandidate> {
    let mut merged: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (label, outcome) in outcomes {
        let names = match outcome {
            Ok(names) => names,
            Err(e) => {
                warn!(source = label, error = %e, "Source failed, continuing without it.");
                continue;
            }
        };
        debug!(source = label, raw = names.len(), "Source returned names.");

        for raw in names {
            let Some(hostname) = candidate_hostname(&raw, domain) else {
                continue;
            };
            let sources = merged.entry(hostname).or_default();
            if !sources.iter().any(|s| s == label) {
                sources.push(label.to_string());
            }
        }
    }

    merged
        .into_iter()
        .map(|(hostname, sources)| SubdomainCandidate { hostname, sources })
        .collect()
}
