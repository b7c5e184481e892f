// src/core/scanner/mod.rs

// Public interface of the `scanner` module: the passive sources, the prober,
// the two page analysers and the engine that runs them together.
pub mod assembler;
pub mod fingerprint_scanner;
pub mod matcher;
pub mod prober;
pub mod social_scanner;
pub mod sources;

use crate::config::ReconConfig;
use crate::core::error::ReconError;
use crate::core::fetch::{ContentFetcher, HttpFetcher};
use crate::core::models::{ReconReport, ValidatedSubdomain};
use crate::core::resolver::{self, HostResolver};
use crate::core::target::parse_target;
use self::assembler::{ResultAssembler, dedup_by_key, dedup_preserving_order};
use self::fingerprint_scanner::run_fingerprint_scan;
use self::prober::ConcurrentProber;
use self::social_scanner::run_social_scan;
use self::sources::{
    CertSpotterProvider, HackerTargetProvider, SecurityTrailsProvider, SourceAggregator, SourceProvider,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Runs a full reconnaissance pass over one domain.
pub struct ReconEngine {
    config: ReconConfig,
    fetcher: Arc<dyn ContentFetcher>,
    resolver: Arc<dyn HostResolver>,
    aggregator: SourceAggregator,
    prober: ConcurrentProber,
    assembler: ResultAssembler,
}

impl ReconEngine {
    /// Wires the engine from explicit capabilities.
    pub fn new(
        config: ReconConfig,
        fetcher: Arc<dyn ContentFetcher>,
        resolver: Arc<dyn HostResolver>,
        aggregator: SourceAggregator,
    ) -> Self {
        let prober = ConcurrentProber::new(fetcher.clone(), resolver.clone(), config.probe_concurrency);
        let assembler = ResultAssembler::new(config.admitted_statuses.clone());
        Self { config, fetcher, resolver, aggregator, prober, assembler }
    }

    /// Probes through `fetcher` instead of the shared one.
    pub fn with_probe_fetcher(mut self, fetcher: Arc<dyn ContentFetcher>) -> Self {
        self.prober = ConcurrentProber::new(fetcher, self.resolver.clone(), self.config.probe_concurrency);
        self
    }

    /// Builds the production engine: real HTTP fetchers, the configured
    /// resolver and every source that can run with the given configuration.
    /// Probes do not follow redirects, so a 3xx host keeps its own status.
    pub fn from_config(config: ReconConfig) -> Result<Self, ReconError> {
        let fetcher: Arc<dyn ContentFetcher> = Arc::new(HttpFetcher::new(&config)?);
        let probe_fetcher: Arc<dyn ContentFetcher> = Arc::new(HttpFetcher::without_redirects(&config)?);
        let resolver = resolver::from_config(&config)?;

        let mut providers: Vec<Box<dyn SourceProvider>> = vec![
            Box::new(CertSpotterProvider::new(fetcher.clone())),
            Box::new(HackerTargetProvider::new(fetcher.clone())),
        ];
        match SecurityTrailsProvider::new(fetcher.clone(), config.securitytrails_api_key.as_deref()) {
            Ok(provider) => providers.push(Box::new(provider)),
            Err(e) => warn!(error = %e, "Skipping source."),
        }

        let aggregator = SourceAggregator::new(providers);
        info!(sources = ?aggregator.labels(), "Recon engine ready.");
        Ok(Self::new(config, fetcher, resolver, aggregator).with_probe_fetcher(probe_fetcher))
    }

    /// Scans `input`, which may be a bare domain or a URL.
    ///
    /// Subdomain discovery and probing, technology fingerprinting and social
    /// profile extraction run concurrently. Failures inside any of them only
    /// shrink the report; the only error is an unusable target.
    ///
    /// # Arguments
    ///
    /// * `input` - The domain or URL to scan (e.g., "example.com").
    ///
    /// # Returns
    ///
    /// A `ReconReport` with the validated subdomains, technologies and profiles.
    pub async fn run(&self, input: &str) -> Result<ReconReport, ReconError> {
        let domain = parse_target(input)?;
        info!(domain = %domain, "Starting recon.");

        let (subdomains, technologies, social_profiles) = tokio::join!(
            self.subdomains(&domain),
            run_fingerprint_scan(self.fetcher.as_ref(), &domain, self.config.stop_after_first_detection),
            run_social_scan(self.fetcher.as_ref(), &domain)
        );

        let report = ReconReport {
            domain,
            scanned_at: chrono::Utc::now(),
            subdomains,
            technologies: dedup_by_key(technologies, |t| t.name.clone()),
            social_profiles: dedup_preserving_order(social_profiles),
        };
        info!(
            domain = %report.domain,
            subdomains = report.subdomains.len(),
            technologies = report.technologies.len(),
            social_profiles = report.social_profiles.len(),
            "Recon finished."
        );
        Ok(report)
    }

    async fn subdomains(&self, domain: &str) -> Vec<ValidatedSubdomain> {
        let candidates = self.aggregator.discover(domain).await;
        let probes = self.prober.probe(&candidates).await;
        self.assembler.validated_subdomains(&candidates, probes)
    }
}
