// src/core/scanner/sources/cert_spotter.rs

use super::SourceProvider;
use crate::core::error::SourceError;
use crate::core::fetch::ContentFetcher;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

pub const LABEL: &str = "Certificate Transparency";
pub const DEFAULT_BASE_URL: &str = "https://api.certspotter.com";

#[derive(Debug, Deserialize)]
struct Issuance {
    #[serde(default)]
    dns_names: Vec<String>,
}

/// Certificate transparency issuances from the Cert Spotter API.
pub struct CertSpotterProvider {
    fetcher: Arc<dyn ContentFetcher>,
    base_url: String,
}

impl CertSpotterProvider {
    pub fn new(fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self::with_base_url(fetcher, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(fetcher: Arc<dyn ContentFetcher>, base_url: &str) -> Self {
        Self { fetcher, base_url: base_url.trim_end_matches('/').to_string() }
    }
}

#[async_trait]
impl SourceProvider for CertSpotterProvider {
    fn label(&self) -> &'static str {
        LABEL
    }

    async fn subdomains(&self, domain: &str) -> Result<Vec<String>, SourceError> {
        let url = format!(
            "{}/v1/issuances?domain={domain}&include_subdomains=true&expand=dns_names",
            self.base_url
        );
        debug!(url = %url, "Querying certificate transparency issuances.");

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let page = self.fetcher.fetch_with_headers(&url, headers).await?;
        if !page.is_success() {
            return Err(SourceError::Status { source_name: LABEL, status: page.status });
        }

        let issuances: Vec<Issuance> = serde_json::from_str(&page.body)
            .map_err(|e| SourceError::Parse { source_name: LABEL, message: e.to_string() })?;

        let names: BTreeSet<String> = issuances
            .into_iter()
            .flat_map(|issuance| issuance.dns_names)
            .collect();

        info!(domain, names = names.len(), "Certificate transparency lookup finished.");
        Ok(names.into_iter().collect())
    }
}
