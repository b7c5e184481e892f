// src/core/fetch.rs

//! The HTTP fetch capability used by every network-facing component.
//!
//! Sources, the prober and both signature scanners talk to the network only
//! through `ContentFetcher`, so the transport (direct or through an unblocking
//! proxy) can be swapped without touching them.

use crate::config::ReconConfig;
use crate::core::error::FetchError;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use std::time::Duration;
use tracing::debug;
use url::Url;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_EN: &str = "en-US,en;q=0.5";

/// Bodies are cut off after this many bytes.
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// An HTTP response. Non-2xx responses are still pages. The body is empty
/// when the content type is not textual and truncated at `MAX_BODY_BYTES`.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    pub fn is_html(&self) -> bool {
        self.content_type()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("text/html"))
    }
}

/// Whether a body with this content type is worth reading. Responses
/// without a content type are read.
fn is_textual(content_type: Option<&HeaderValue>) -> bool {
    let Some(ct) = content_type.and_then(|v| v.to_str().ok()) else {
        return true;
    };
    let ct = ct.to_ascii_lowercase();
    ["text/", "html", "json", "xml", "javascript"].iter().any(|kind| ct.contains(kind))
}

#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Issues a GET for `url`. Transport failures and timeouts are errors;
    /// any HTTP status is returned as a page.
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;

    /// Same as `fetch`, with extra request headers.
    async fn fetch_with_headers(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<FetchedPage, FetchError>;

    /// Same as `fetch_with_headers`, but never routed through a proxy.
    /// Requests carrying credentials must use this.
    async fn fetch_direct(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<FetchedPage, FetchError>;
}

/// `ContentFetcher` backed by reqwest, with an explicit per-request timeout
/// and optional routing through a proxy endpoint.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
    proxy: Option<String>,
}

impl HttpFetcher {
    /// A fetcher that follows redirects, like a browser.
    pub fn new(config: &ReconConfig) -> Result<Self, FetchError> {
        Self::build(config, Policy::default())
    }

    /// A fetcher that reports 3xx responses as they are. Probes use this so a
    /// redirecting host is judged by its own status.
    pub fn without_redirects(config: &ReconConfig) -> Result<Self, FetchError> {
        Self::build(config, Policy::none())
    }

    fn build(config: &ReconConfig, redirects: Policy) -> Result<Self, FetchError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        default_headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_EN));

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(default_headers)
            .redirect(redirects)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            timeout: config.request_timeout,
            proxy: config.fetch_proxy.clone(),
        })
    }

    /// The URL actually requested for `target`, after proxy routing.
    pub fn request_url(&self, target: &str) -> Result<Url, FetchError> {
        match &self.proxy {
            Some(proxy) => Url::parse_with_params(proxy, &[("url", target)])
                .map_err(|_| FetchError::InvalidUrl(proxy.clone())),
            None => direct_url(target),
        }
    }

    async fn send(&self, url: Url, headers: HeaderMap) -> Result<(u16, HeaderMap, String), FetchError> {
        let mut response = self.client.get(url).headers(headers).send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();

        let body = if is_textual(headers.get(CONTENT_TYPE)) {
            read_capped(&mut response).await?
        } else {
            debug!(status, content_type = ?headers.get(CONTENT_TYPE), "Skipping non-text body.");
            String::new()
        };
        Ok((status, headers, body))
    }

    async fn execute(&self, url: &str, request_url: Url, headers: HeaderMap) -> Result<FetchedPage, FetchError> {
        debug!(url, via = %request_url, "Fetching.");

        // Dropping the future on timeout aborts the in-flight request.
        let (status, headers, body) = tokio::time::timeout(self.timeout, self.send(request_url, headers))
            .await
            .map_err(|_| FetchError::Timeout {
                url: url.to_string(),
                secs: self.timeout.as_secs(),
            })??;

        debug!(url, status, bytes = body.len(), "Fetched.");
        Ok(FetchedPage {
            url: url.to_string(),
            status,
            headers,
            body,
        })
    }
}

fn direct_url(target: &str) -> Result<Url, FetchError> {
    Url::parse(target).map_err(|_| FetchError::InvalidUrl(target.to_string()))
}

/// Reads the body chunk by chunk, stopping at `MAX_BODY_BYTES`.
async fn read_capped(response: &mut reqwest::Response) -> Result<String, FetchError> {
    let mut bytes: Vec<u8> = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let room = MAX_BODY_BYTES - bytes.len();
        if chunk.len() >= room {
            bytes.extend_from_slice(&chunk[..room]);
            debug!(limit = MAX_BODY_BYTES, "Body truncated.");
            break;
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.fetch_with_headers(url, HeaderMap::new()).await
    }

    async fn fetch_with_headers(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<FetchedPage, FetchError> {
        let request_url = self.request_url(url)?;
        self.execute(url, request_url, headers).await
    }

    async fn fetch_direct(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<FetchedPage, FetchError> {
        let request_url = direct_url(url)?;
        self.execute(url, request_url, headers).await
    }
}
