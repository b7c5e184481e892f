// src/config.rs

//! Runtime configuration for the recon engine.
//!
//! Every knob has a default; `from_env` overrides them from
//! `VANGUARD_RECON_*` environment variables.

use crate::core::error::ConfigError;
use std::str::FromStr;
use std::time::Duration;

/// Prefix shared by every configuration variable.
pub const ENV_PREFIX: &str = "VANGUARD_RECON_";

pub const DEFAULT_PROBE_CONCURRENCY: usize = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DOH_URL: &str = "https://dns.google/resolve";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Which capability resolves probe hostnames to IPv4 addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverKind {
    /// JSON DNS-over-HTTPS `A` lookups.
    DnsOverHttps,
    /// The operating system's resolver configuration, via hickory.
    System,
}

impl FromStr for ResolverKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "doh" | "dns-over-https" => Ok(ResolverKind::DnsOverHttps),
            "system" => Ok(ResolverKind::System),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReconConfig {
    /// Probes run in sequential batches of this size.
    pub probe_concurrency: usize,
    /// Upper bound for every outbound request.
    pub request_timeout: Duration,
    /// Optional unblocking proxy; requests go to `{proxy}?url={target}`.
    pub fetch_proxy: Option<String>,
    pub user_agent: String,
    /// HTTP statuses a probed subdomain must have to be reported.
    pub admitted_statuses: Vec<u16>,
    /// Skip the `www.` variant once the bare domain yielded a technology.
    pub stop_after_first_detection: bool,
    pub resolver: ResolverKind,
    pub doh_url: String,
    pub securitytrails_api_key: Option<String>,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            probe_concurrency: DEFAULT_PROBE_CONCURRENCY,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            fetch_proxy: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            admitted_statuses: vec![200],
            stop_after_first_detection: true,
            resolver: ResolverKind::DnsOverHttps,
            doh_url: DEFAULT_DOH_URL.to_string(),
            securitytrails_api_key: None,
        }
    }
}

impl ReconConfig {
    /// Loads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration from any key lookup. Keys are passed with
    /// `ENV_PREFIX` already applied; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| -> Option<(String, String)> {
            let var = format!("{ENV_PREFIX}{name}");
            lookup(&var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(|v| (var, v))
        };

        let mut config = Self::default();

        if let Some((var, value)) = get("PROBE_CONCURRENCY") {
            config.probe_concurrency = match value.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::Invalid { var, value }),
            };
        }
        if let Some((var, value)) = get("REQUEST_TIMEOUT_SECS") {
            let secs = match value.parse::<u64>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::Invalid { var, value }),
            };
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some((_, value)) = get("FETCH_PROXY") {
            config.fetch_proxy = Some(value);
        }
        if let Some((_, value)) = get("USER_AGENT") {
            config.user_agent = value;
        }
        if let Some((var, value)) = get("ADMITTED_STATUSES") {
            let statuses: Result<Vec<u16>, _> =
                value.split(',').map(|s| s.trim().parse::<u16>()).collect();
            config.admitted_statuses = match statuses {
                Ok(list) if !list.is_empty() => list,
                _ => return Err(ConfigError::Invalid { var, value }),
            };
        }
        if let Some((var, value)) = get("STOP_AFTER_FIRST_DETECTION") {
            config.stop_after_first_detection = parse_bool(&value)
                .ok_or_else(|| ConfigError::Invalid { var, value: value.clone() })?;
        }
        if let Some((var, value)) = get("RESOLVER") {
            config.resolver = value
                .parse()
                .map_err(|_| ConfigError::Invalid { var, value: value.clone() })?;
        }
        if let Some((_, value)) = get("DOH_URL") {
            config.doh_url = value;
        }
        if let Some((_, value)) = get("SECURITYTRAILS_API_KEY") {
            config.securitytrails_api_key = Some(value);
        }

        Ok(config)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
