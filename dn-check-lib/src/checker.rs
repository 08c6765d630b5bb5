//! Main checker implementation.
//!
//! This module provides the `NameChecker` struct that runs a full check:
//! seed the aggregator, fan probes out over names x TLDs, wait for all of
//! them and return the finalized [`ResultSet`].

use crate::aggregate::ResultAggregator;
use crate::concurrent::{cross_product, fan_out, FanOutLimits};
use crate::error::DnCheckError;
use crate::probe::{probe, ProbeReport};
use crate::protocols::DnsResolver;
use crate::resolver::Resolve;
use crate::types::{CheckConfig, ProbeRequest, ResultSet};
use std::sync::Arc;
use std::time::Instant;

/// Runs availability checks for many names across many TLDs.
///
/// # Example
///
/// ```rust,no_run
/// use dn_check_lib::{CheckConfig, NameChecker};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = CheckConfig::default().with_tlds(vec!["com".into(), "net".into()]);
///     let checker = NameChecker::with_config(config);
///     let results = checker.check(&["yahoo".to_string()]).await?;
///
///     for name in &results {
///         for verdict in &name.verdicts {
///             println!("{}.{} : {}", name.name, verdict.tld, verdict.available);
///         }
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct NameChecker {
    /// Configuration settings for this checker instance
    config: CheckConfig,
    /// Shared by every probe of a run
    resolver: Arc<dyn Resolve>,
}

impl NameChecker {
    /// Create a checker with default configuration and the system resolver.
    ///
    /// Default settings:
    /// - Concurrency: 20
    /// - Timeout: 5 seconds per lookup
    /// - TLDs: ["com"]
    pub fn new() -> Self {
        Self::with_config(CheckConfig::default())
    }

    /// Create a checker backed by a DNS resolver built from `config`.
    pub fn with_config(config: CheckConfig) -> Self {
        let resolver = DnsResolver::new(config.resolver, config.timeout);
        Self {
            config,
            resolver: Arc::new(resolver),
        }
    }

    /// Create a checker that uses the given resolver instead of DNS.
    pub fn with_resolver(config: CheckConfig, resolver: Arc<dyn Resolve>) -> Self {
        Self { config, resolver }
    }

    /// Check `names` against the configured TLDs.
    pub async fn check(&self, names: &[String]) -> Result<ResultSet, DnCheckError> {
        self.run(names, &self.config.tlds).await
    }

    /// Check every name against every TLD.
    ///
    /// Blank names are ignored. Returns after every probe has completed; a
    /// lookup that fails transiently only leaves its pair out of the result.
    pub async fn run(&self, names: &[String], tlds: &[String]) -> Result<ResultSet, DnCheckError> {
        self.run_with_progress(names, tlds, |_| {}).await
    }

    /// Like [`run`](Self::run), calling `on_probe` for every finished probe in
    /// completion order.
    pub async fn run_with_progress<F>(
        &self,
        names: &[String],
        tlds: &[String],
        on_probe: F,
    ) -> Result<ResultSet, DnCheckError>
    where
        F: FnMut(&ProbeReport),
    {
        if tlds.is_empty() {
            return Err(DnCheckError::config("TLD list cannot be empty"));
        }

        let mut aggregator = ResultAggregator::seeded(names);
        let requests = cross_product(names, tlds);
        let pairs = requests.len();

        tracing::info!(
            names = aggregator.name_count(),
            tlds = tlds.len(),
            pairs,
            concurrency = self.config.concurrency,
            "starting checks"
        );
        let start = Instant::now();

        fan_out(
            Arc::clone(&self.resolver),
            requests,
            FanOutLimits {
                concurrency: self.config.concurrency,
                deadline: self.config.timeout,
            },
            &mut aggregator,
            on_probe,
        )
        .await?;

        let results = aggregator.finalize();
        tracing::info!(
            pairs,
            verdicts = results.verdict_count(),
            failed = pairs - results.verdict_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "checks finished"
        );

        Ok(results)
    }

    /// Probe a single `name.tld` pair.
    pub async fn check_pair(&self, name: &str, tld: &str) -> ProbeReport {
        probe(
            self.resolver.as_ref(),
            ProbeRequest::new(name, tld, 0),
            self.config.timeout,
        )
        .await
    }

    /// Get the current configuration for this checker.
    pub fn config(&self) -> &CheckConfig {
        &self.config
    }
}

impl Default for NameChecker {
    fn default() -> Self {
        Self::new()
    }
}
