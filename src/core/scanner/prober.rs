// src/core/scanner/prober.rs

use crate::core::fetch::{ContentFetcher, FetchedPage};
use crate::core::models::{ProbeResult, Protocol, SubdomainCandidate};
use crate::core::resolver::HostResolver;
use futures::future::join_all;
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Protocols in the order they are attempted.
const PROTOCOL_ORDER: [Protocol; 2] = [Protocol::Https, Protocol::Http];

/// Checks which candidates answer over HTTP(S).
///
/// Candidates are probed in sequential batches of `concurrency` hosts. Every
/// host of a batch is probed in parallel and the next batch only starts once
/// all of them have settled, so no more than `concurrency` probes are ever
/// in flight.
pub struct ConcurrentProber {
    fetcher: Arc<dyn ContentFetcher>,
    resolver: Arc<dyn HostResolver>,
    concurrency: usize,
}

impl ConcurrentProber {
    pub fn new(fetcher: Arc<dyn ContentFetcher>, resolver: Arc<dyn HostResolver>, concurrency: usize) -> Self {
        Self { fetcher, resolver, concurrency: concurrency.max(1) }
    }

    /// Returns exactly one result per candidate.
    pub async fn probe(&self, candidates: &[SubdomainCandidate]) -> Vec<ProbeResult> {
        info!(candidates = candidates.len(), concurrency = self.concurrency, "Starting probes.");
        let mut results = Vec::with_capacity(candidates.len());

        for (index, batch) in candidates.chunks(self.concurrency).enumerate() {
            debug!(batch = index, size = batch.len(), "Probing batch.");
            let settled = join_all(batch.iter().map(|c| self.probe_host(&c.hostname))).await;
            results.extend(settled);
        }

        let alive = results.iter().filter(|r| r.is_alive).count();
        info!(probed = results.len(), alive, "Probes finished.");
        results
    }

    /// Probes a single host. Never fails: unreachable hosts come back with
    /// `is_alive == false`.
    pub async fn probe_host(&self, hostname: &str) -> ProbeResult {
        let (mut result, resolved_ip) =
            tokio::join!(self.probe_protocols(hostname), self.resolve(hostname));
        result.resolved_ip = resolved_ip;
        result
    }

    async fn probe_protocols(&self, hostname: &str) -> ProbeResult {
        let mut result = ProbeResult::unreachable(hostname);

        for protocol in PROTOCOL_ORDER {
            let url = format!("{protocol}://{hostname}");
            let page = match self.fetcher.fetch(&url).await {
                Ok(page) => page,
                Err(e) => {
                    debug!(url = %url, error = %e, "Probe attempt failed.");
                    continue;
                }
            };

            debug!(url = %url, status = page.status, "Probe attempt answered.");
            result.protocol = protocol;
            result.http_status = Some(page.status);
            result.is_alive = page.is_success();
            result.page_title = page_title(&page);

            if result.is_alive {
                break;
            }
        }

        result
    }

    async fn resolve(&self, hostname: &str) -> Option<String> {
        match self.resolver.resolve_ipv4(hostname).await {
            Ok(ip) => ip,
            Err(e) => {
                warn!(hostname, error = %e, "IPv4 resolution failed.");
                None
            }
        }
    }
}

/// Text of the first `<title>` of an HTML page, trimmed; `None` if empty.
fn page_title(page: &FetchedPage) -> Option<String> {
    if !page.is_html() {
        return None;
    }
    let selector = Selector::parse("title").ok()?;
    let document = Html::parse_document(&page.body);
    let title = document.select(&selector).next()?.text().collect::<String>();
    let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
    (!title.is_empty()).then_some(title)
}
