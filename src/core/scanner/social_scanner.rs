// src/core/scanner/social_scanner.rs

use crate::core::fetch::ContentFetcher;
use crate::core::knowledge_base::known_profiles;
use crate::core::models::SocialProfile;
use crate::core::scanner::matcher::{Document, social_profiles};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Collects social media profiles linked from `domain` and `www.domain`.
///
/// Both pages are fetched concurrently and each may fail on its own. Only
/// successful, non-empty pages are scanned. Domains in the known-profile
/// table are answered without touching the network.
pub async fn run_social_scan(fetcher: &dyn ContentFetcher, domain: &str) -> Vec<SocialProfile> {
    if let Some(profiles) = known_profiles(domain) {
        info!(domain, count = profiles.len(), "Using known social profiles.");
        return profiles;
    }

    info!(domain, "Starting social profile scan.");
    let bare = format!("https://{domain}");
    let www = format!("https://www.{domain}");
    let (bare_page, www_page) = tokio::join!(fetcher.fetch(&bare), fetcher.fetch(&www));

    let mut seen = HashSet::new();
    let mut profiles = Vec::new();

    for (url, outcome) in [(bare, bare_page), (www, www_page)] {
        let page = match outcome {
            Ok(page) if page.is_success() && !page.body.is_empty() => page,
            Ok(page) => {
                debug!(url = %url, status = page.status, "Skipping unusable page.");
                continue;
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Social page fetch failed.");
                continue;
            }
        };

        for profile in social_profiles(&Document::from_page(&page)) {
            if seen.insert(profile.clone()) {
                profiles.push(profile);
            }
        }
    }

    info!(domain, count = profiles.len(), "Social profile scan finished.");
    profiles
}
