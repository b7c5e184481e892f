// src/core/resolver.rs

//! IPv4 resolution for probed hosts.

use crate::config::{ReconConfig, ResolverKind};
use crate::core::error::{FetchError, ResolveError};
use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// DNS record type number for `A`.
const RECORD_TYPE_A: u16 = 1;

#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Returns the first IPv4 address of `host`, or `None` if it has none.
    async fn resolve_ipv4(&self, host: &str) -> Result<Option<String>, ResolveError>;
}

/// Builds the resolver selected by the configuration.
pub fn from_config(config: &ReconConfig) -> Result<Arc<dyn HostResolver>, FetchError> {
    Ok(match config.resolver {
        ResolverKind::DnsOverHttps => Arc::new(DohResolver::new(&config.doh_url, config.request_timeout)?),
        ResolverKind::System => Arc::new(SystemResolver::new()),
    })
}

// --- DNS-over-HTTPS (JSON API) ---

#[derive(Debug, Deserialize)]
struct DohResponse {
    #[serde(rename = "Answer", default)]
    answer: Vec<DohAnswer>,
}

#[derive(Debug, Deserialize)]
struct DohAnswer {
    #[serde(rename = "type")]
    record_type: u16,
    data: String,
}

/// Resolves through a JSON DNS-over-HTTPS endpoint such as `https://dns.google/resolve`.
#[derive(Debug, Clone)]
pub struct DohResolver {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl DohResolver {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint: endpoint.to_string(), timeout })
    }

    async fn query(&self, url: Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/dns-json")
            .send()
            .await?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl HostResolver for DohResolver {
    async fn resolve_ipv4(&self, host: &str) -> Result<Option<String>, ResolveError> {
        let url = Url::parse_with_params(&self.endpoint, &[("name", host), ("type", "A")])
            .map_err(|_| FetchError::InvalidUrl(self.endpoint.clone()))?;

        let body = tokio::time::timeout(self.timeout, self.query(url))
            .await
            .map_err(|_| FetchError::Timeout { url: self.endpoint.clone(), secs: self.timeout.as_secs() })??;

        let parsed: DohResponse = serde_json::from_str(&body)?;
        // CNAME answers come first for aliased hosts; skip to the address.
        let ip = parsed
            .answer
            .into_iter()
            .find(|a| a.record_type == RECORD_TYPE_A)
            .map(|a| a.data);
        debug!(host, ip = ?ip, "DoH lookup finished.");
        Ok(ip)
    }
}

// --- System resolver ---

/// Resolves with hickory using the default upstream configuration.
pub struct SystemResolver {
    resolver: TokioAsyncResolver,
}

impl SystemResolver {
    pub fn new() -> Self {
        Self {
            resolver: TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default()),
        }
    }
}

impl Default for SystemResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostResolver for SystemResolver {
    async fn resolve_ipv4(&self, host: &str) -> Result<Option<String>, ResolveError> {
        match self.resolver.ipv4_lookup(host).await {
            Ok(lookup) => Ok(lookup.iter().next().map(|a| a.to_string())),
            Err(e) => Err(ResolveError::Lookup(e.to_string())),
        }
    }
}
