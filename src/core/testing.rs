// src/core/testing.rs

//! In-process fakes for the network capabilities, shared by unit tests.

use crate::core::error::{FetchError, ResolveError};
use crate::core::fetch::{ContentFetcher, FetchedPage};
use crate::core::resolver::HostResolver;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Clone)]
pub enum FakeResponse {
    Page { status: u16, headers: Vec<(&'static str, String)>, body: String },
    Unreachable,
}

impl FakeResponse {
    pub fn html(status: u16, body: &str) -> Self {
        FakeResponse::Page {
            status,
            headers: vec![("content-type", "text/html; charset=utf-8".to_string())],
            body: body.to_string(),
        }
    }

    pub fn with_header(self, name: &'static str, value: &str) -> Self {
        match self {
            FakeResponse::Page { status, mut headers, body } => {
                headers.push((name, value.to_string()));
                FakeResponse::Page { status, headers, body }
            }
            other => other,
        }
    }
}

/// Serves canned responses by exact URL. Unknown URLs are unreachable.
/// Records every request and the peak number of concurrent requests.
#[derive(Default)]
pub struct FakeFetcher {
    responses: HashMap<String, FakeResponse>,
    delay: Duration,
    requests: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, response: FakeResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.fetch_with_headers(url, HeaderMap::new()).await
    }

    async fn fetch_direct(&self, url: &str, headers: HeaderMap) -> Result<FetchedPage, FetchError> {
        self.fetch_with_headers(url, headers).await
    }

    async fn fetch_with_headers(&self, url: &str, _headers: HeaderMap) -> Result<FetchedPage, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.responses.get(url) {
            Some(FakeResponse::Page { status, headers, body }) => {
                let mut map = HeaderMap::new();
                for (name, value) in headers {
                    let name = HeaderName::from_static(*name);
                    let value = HeaderValue::from_str(value).unwrap();
                    if name == CONTENT_TYPE {
                        map.insert(name, value);
                    } else {
                        map.append(name, value);
                    }
                }
                Ok(FetchedPage { url: url.to_string(), status: *status, headers: map, body: body.clone() })
            }
            _ => Err(FetchError::Timeout { url: url.to_string(), secs: 10 }),
        }
    }
}

/// Resolves hosts from a fixed table; everything else fails.
#[derive(Default)]
pub struct FakeResolver {
    addresses: HashMap<String, String>,
}

impl FakeResolver {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            addresses: pairs.iter().map(|(h, ip)| (h.to_string(), ip.to_string())).collect(),
        }
    }
}

#[async_trait]
impl HostResolver for FakeResolver {
    async fn resolve_ipv4(&self, host: &str) -> Result<Option<String>, ResolveError> {
        self.addresses
            .get(host)
            .cloned()
            .map(Some)
            .ok_or_else(|| ResolveError::Lookup(format!("no record for {host}")))
    }
}
