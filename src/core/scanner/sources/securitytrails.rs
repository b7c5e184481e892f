// src/core/scanner/sources/securitytrails.rs

use super::SourceProvider;
use crate::core::error::SourceError;
use crate::core::fetch::ContentFetcher;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

pub const LABEL: &str = "SecurityTrails";
pub const DEFAULT_BASE_URL: &str = "https://api.securitytrails.com";

#[derive(Debug, Deserialize)]
struct SubdomainsResponse {
    #[serde(default)]
    subdomains: Vec<String>,
}

/// SecurityTrails subdomain listing. Needs an API key.
pub struct SecurityTrailsProvider {
    fetcher: Arc<dyn ContentFetcher>,
    base_url: String,
    api_key: HeaderValue,
}

impl SecurityTrailsProvider {
    /// Fails with `MissingCredentials` when no usable key is given.
    pub fn new(fetcher: Arc<dyn ContentFetcher>, api_key: Option<&str>) -> Result<Self, SourceError> {
        Self::with_base_url(fetcher, api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        fetcher: Arc<dyn ContentFetcher>,
        api_key: Option<&str>,
        base_url: &str,
    ) -> Result<Self, SourceError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .and_then(|k| HeaderValue::from_str(k).ok())
            .ok_or(SourceError::MissingCredentials(LABEL))?;

        Ok(Self { fetcher, base_url: base_url.trim_end_matches('/').to_string(), api_key })
    }
}

#[async_trait]
impl SourceProvider for SecurityTrailsProvider {
    fn label(&self) -> &'static str {
        LABEL
    }

    async fn subdomains(&self, domain: &str) -> Result<Vec<String>, SourceError> {
        let url = format!("{}/v1/domain/{domain}/subdomains", self.base_url);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("apikey", self.api_key.clone());
        // The key must not reach a third-party proxy.
        let page = self.fetcher.fetch_direct(&url, headers).await?;
        if !page.is_success() {
            return Err(SourceError::Status { source_name: LABEL, status: page.status });
        }

        let parsed: SubdomainsResponse = serde_json::from_str(&page.body)
            .map_err(|e| SourceError::Parse { source_name: LABEL, message: e.to_string() })?;

        // The API returns bare labels ("www", "api.v2").
        let names: Vec<String> = parsed
            .subdomains
            .into_iter()
            .map(|label| format!("{}.{domain}", label.trim_end_matches('.')))
            .collect();

        info!(domain, names = names.len(), "SecurityTrails lookup finished.");
        Ok(names)
    }
}
