// src/core/scanner/fingerprint_scanner.rs

use crate::core::fetch::ContentFetcher;
use crate::core::models::DetectedTechnology;
use crate::core::scanner::matcher::{Document, TECHNOLOGY_SIGNATURES, detect_technologies};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Runs technology fingerprinting against `domain`.
///
/// The bare domain is fetched first, then the `www.` variant. Any response is
/// analysed, error pages included, since servers often reveal themselves
/// there. With `stop_after_first_detection`, the `www.` variant is skipped
/// once the bare domain yielded at least one technology.
///
/// # Arguments
/// * `fetcher` - The content-fetch capability, already timeout-bounded.
/// * `domain` - The root domain (e.g. "example.com").
/// * `stop_after_first_detection` - Whether one successful URL is enough.
///
/// # Returns
/// The detected technologies, at most one per name. Empty if every fetch failed.
pub async fn run_fingerprint_scan(
    fetcher: &dyn ContentFetcher,
    domain: &str,
    stop_after_first_detection: bool,
) -> Vec<DetectedTechnology> {
    info!(domain, "Starting fingerprint scan.");

    let urls = [format!("https://{domain}"), format!("https://www.{domain}")];
    let mut seen: HashSet<String> = HashSet::new();
    let mut technologies = Vec::new();

    for url in &urls {
        let page = match fetcher.fetch(url).await {
            Ok(page) => {
                info!(url = %url, status = page.status, "Received HTTP response.");
                page
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Fingerprint fetch failed, trying next URL.");
                continue;
            }
        };

        let document = Document::from_page(&page);
        debug!(total_rules = TECHNOLOGY_SIGNATURES.len(), "Applying fingerprinting rules.");
        for tech in detect_technologies(&TECHNOLOGY_SIGNATURES, &document) {
            if seen.insert(tech.name.clone()) {
                technologies.push(tech);
            }
        }

        if stop_after_first_detection && !technologies.is_empty() {
            debug!(url = %url, "Technologies found, skipping remaining URLs.");
            break;
        }
    }

    info!(domain, count = technologies.len(), "Fingerprint scan finished.");
    technologies
}
