// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

// --- Discovery Models ---

/// A hostname reported by one or more passive sources, not yet probed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubdomainCandidate {
    pub hostname: String,
    /// Labels of the providers that reported this host, in provider priority order.
    pub sources: Vec<String>,
}

impl SubdomainCandidate {
    /// The label of the highest-priority provider that reported this host.
    pub fn provenance(&self) -> Option<&str> {
        self.sources.first().map(String::as_str)
    }
}

// --- Probe Models ---

/// The protocol over which a probe last received a response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Protocol {
    Https,
    Http,
    None,
}

/// The outcome of probing one candidate. Produced exactly once per candidate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbeResult {
    pub hostname: String,
    pub protocol: Protocol,
    pub http_status: Option<u16>,
    pub resolved_ip: Option<String>,
    pub page_title: Option<String>,
    pub is_alive: bool,
}

impl ProbeResult {
    /// A result for a host that answered on no protocol.
    pub fn unreachable(hostname: &str) -> Self {
        Self {
            hostname: hostname.to_string(),
            protocol: Protocol::None,
            http_status: None,
            resolved_ip: None,
            page_title: None,
            is_alive: false,
        }
    }
}

/// A subdomain that passed the admission filter, ready for the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidatedSubdomain {
    pub hostname: String,
    pub resolved_ip: Option<String>,
    pub http_status: Option<u16>,
    pub page_title: Option<String>,
    pub is_alive: bool,
    pub protocol: Protocol,
    pub source: String,
}

// --- Fingerprint Models ---

/// A technology identified on the target. Identity is the name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DetectedTechnology {
    pub name: String,
    pub category: String,
    pub version: Option<String>,
}

/// A social media profile linked from the target's pages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SocialProfile {
    pub platform: String,
    pub url: String,
    pub username: String,
}

// --- Main Report ---

/// Everything a single recon run produced for one domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconReport {
    pub domain: String,
    pub scanned_at: DateTime<Utc>,
    pub subdomains: Vec<ValidatedSubdomain>,
    pub technologies: Vec<DetectedTechnology>,
    pub social_profiles: Vec<SocialProfile>,
}
