// src/core/target.rs

//! Normalisation of the scan target and of candidate hostnames.

use crate::core::error::ReconError;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static RE_HOSTNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z][a-z0-9-]{0,61}[a-z0-9]$").unwrap()
});

/// Turns user input (`example.com`, `https://Example.com/path`) into a bare,
/// lower-cased domain.
pub fn parse_target(input: &str) -> Result<String, ReconError> {
    let raw = input.trim();
    let with_scheme = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };

    let host = Url::parse(&with_scheme)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .ok_or_else(|| ReconError::InvalidDomain(input.to_string()))?;

    let host = host.trim_end_matches('.').to_ascii_lowercase();
    if is_hostname(&host) {
        Ok(host)
    } else {
        Err(ReconError::InvalidDomain(input.to_string()))
    }
}

pub fn is_hostname(value: &str) -> bool {
    value.len() <= 253 && RE_HOSTNAME.is_match(value)
}

/// Cleans a raw name reported by a source and keeps it only if it is a
/// proper subdomain of `domain`.
///
/// Wildcard prefixes (`*.`) are stripped, so `*.api.example.com` becomes
/// `api.example.com` and `*.example.com` is discarded.
pub fn candidate_hostname(raw: &str, domain: &str) -> Option<String> {
    let mut name = raw.trim().trim_end_matches('.').to_ascii_lowercase();
    while let Some(stripped) = name.strip_prefix("*.") {
        name = stripped.to_string();
    }

    let suffix = format!(".{domain}");
    if name.len() > suffix.len() && name.ends_with(&suffix) && is_hostname(&name) {
        Some(name)
    } else {
        None
    }
}
