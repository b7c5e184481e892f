// src/core/scanner/sources/hackertarget.rs

use super::SourceProvider;
use crate::core::error::SourceError;
use crate::core::fetch::ContentFetcher;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::sync::Arc;
use tracing::info;

pub const LABEL: &str = "HackerTarget";
pub const DEFAULT_BASE_URL: &str = "https://api.hackertarget.com";

/// Passive DNS host search from HackerTarget. Answers are `host,ip` lines.
pub struct HackerTargetProvider {
    fetcher: Arc<dyn ContentFetcher>,
    base_url: String,
}

impl HackerTargetProvider {
    pub fn new(fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self::with_base_url(fetcher, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(fetcher: Arc<dyn ContentFetcher>, base_url: &str) -> Self {
        Self { fetcher, base_url: base_url.trim_end_matches('/').to_string() }
    }
}

#[async_trait]
impl SourceProvider for HackerTargetProvider {
    fn label(&self) -> &'static str {
        LABEL
    }

    async fn subdomains(&self, domain: &str) -> Result<Vec<String>, SourceError> {
        let url = format!("{}/hostsearch/?q={domain}", self.base_url);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/plain"));
        let page = self.fetcher.fetch_with_headers(&url, headers).await?;
        if !page.is_success() {
            return Err(SourceError::Status { source_name: LABEL, status: page.status });
        }

        let body = page.body.trim();
        // Quota and input errors come back as 200 with a plain message.
        if body.starts_with("error") || body.starts_with("API count exceeded") {
            return Err(SourceError::Upstream { source_name: LABEL, message: body.to_string() });
        }

        let names: Vec<String> = body
            .lines()
            .filter_map(|line| line.split(',').next())
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .map(str::to_string)
            .collect();

        info!(domain, names = names.len(), "HackerTarget host search finished.");
        Ok(names)
    }
}
