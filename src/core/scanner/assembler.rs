// src/core/scanner/assembler.rs

use crate::core::models::{ProbeResult, SubdomainCandidate, ValidatedSubdomain};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use tracing::debug;

/// Turns raw pipeline output into the records handed to the caller.
#[derive(Debug, Clone)]
pub struct ResultAssembler {
    admitted_statuses: Vec<u16>,
}

impl ResultAssembler {
    pub fn new(admitted_statuses: Vec<u16>) -> Self {
        Self { admitted_statuses }
    }

    /// Joins candidates with their probe results and keeps those whose HTTP
    /// status is admitted. Output is ordered by hostname.
    pub fn validated_subdomains(
        &self,
        candidates: &[SubdomainCandidate],
        probes: Vec<ProbeResult>,
    ) -> Vec<ValidatedSubdomain> {
        let by_host: HashMap<&str, &SubdomainCandidate> =
            candidates.iter().map(|c| (c.hostname.as_str(), c)).collect();

        let mut validated: Vec<ValidatedSubdomain> = probes
            .into_iter()
            .filter_map(|probe| {
                let candidate = by_host.get(probe.hostname.as_str())?;
                let status = probe.http_status?;
                if !self.admitted_statuses.contains(&status) {
                    debug!(hostname = %probe.hostname, status, "Not admitted.");
                    return None;
                }
                Some(ValidatedSubdomain {
                    source: candidate.provenance().unwrap_or_default().to_string(),
                    hostname: probe.hostname,
                    resolved_ip: probe.resolved_ip,
                    http_status: probe.http_status,
                    page_title: probe.page_title,
                    is_alive: probe.is_alive,
                    protocol: probe.protocol,
                })
            })
            .collect();

        validated.sort_by(|a, b| a.hostname.cmp(&b.hostname));
        validated.dedup_by(|a, b| a.hostname == b.hostname);
        validated
    }
}

/// Drops later duplicates by value, keeping the first occurrence's position.
pub fn dedup_preserving_order<T: Clone + Eq + Hash>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}

/// Drops later items whose key was already seen.
pub fn dedup_by_key<T, K: Eq + Hash>(items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(key(item))).collect()
}
