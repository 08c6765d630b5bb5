//! Core data types for name availability checking.
//!
//! This module defines the verdict and result structures handed to callers,
//! the per-pair probe request, and the run configuration.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Availability verdict for one TLD of one name.
///
/// Only produced when the lookup gave a definitive answer; a transient
/// failure never yields a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TldVerdict {
    /// The TLD that was probed (e.g., "com")
    pub tld: String,

    /// Whether `name.tld` looks free for registration.
    /// - `true`: the resolver answered NXDOMAIN
    /// - `false`: the name exists in DNS
    #[serde(rename = "is_available")]
    pub available: bool,
}

impl TldVerdict {
    pub fn new<T: Into<String>>(tld: T, available: bool) -> Self {
        Self {
            tld: tld.into(),
            available,
        }
    }
}

/// All verdicts collected for one input name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameResult {
    /// The name as given by the caller (without TLD)
    pub name: String,

    /// One verdict per successfully probed TLD, in input TLD order
    #[serde(rename = "tlds")]
    pub verdicts: Vec<TldVerdict>,
}

impl NameResult {
    /// Look up the verdict for a TLD (first one if the TLD was given twice).
    pub fn verdict_for(&self, tld: &str) -> Option<&TldVerdict> {
        self.verdicts.iter().find(|v| v.tld == tld)
    }

    /// Number of TLDs reported available for this name.
    pub fn available_count(&self) -> usize {
        self.verdicts.iter().filter(|v| v.available).count()
    }
}

/// Finalized results of one run, one entry per distinct non-blank input name
/// in first-seen order.
///
/// A `ResultSet` is only produced after every probe of the run has completed,
/// and offers read-only access to its entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    names: Vec<NameResult>,
}

impl ResultSet {
    pub(crate) fn from_results(names: Vec<NameResult>) -> Self {
        Self { names }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NameResult> {
        self.names.iter()
    }

    pub fn as_slice(&self) -> &[NameResult] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Find the result for a given input name.
    pub fn get(&self, name: &str) -> Option<&NameResult> {
        self.names.iter().find(|r| r.name == name)
    }

    /// Total number of verdicts across all names.
    pub fn verdict_count(&self) -> usize {
        self.names.iter().map(|r| r.verdicts.len()).sum()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a NameResult;
    type IntoIter = std::slice::Iter<'a, NameResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

/// One (name, TLD) pair submitted to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub name: String,
    pub tld: String,
    /// Position of `tld` in the caller's TLD list, used to order verdicts
    pub tld_index: usize,
}

impl ProbeRequest {
    pub fn new<N: Into<String>, T: Into<String>>(name: N, tld: T, tld_index: usize) -> Self {
        Self {
            name: name.into(),
            tld: tld.into(),
            tld_index,
        }
    }

    /// The fully qualified domain probed for this pair (`name.tld`).
    pub fn fqdn(&self) -> String {
        format!("{}.{}", self.name, self.tld)
    }
}

/// Which upstream name servers the DNS resolver talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    /// Name servers from the operating system configuration
    #[default]
    System,
    Google,
    Cloudflare,
    Quad9,
}

impl ResolverKind {
    pub const ALL: [ResolverKind; 4] = [
        ResolverKind::System,
        ResolverKind::Google,
        ResolverKind::Cloudflare,
        ResolverKind::Quad9,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolverKind::System => "system",
            ResolverKind::Google => "google",
            ResolverKind::Cloudflare => "cloudflare",
            ResolverKind::Quad9 => "quad9",
        }
    }
}

impl FromStr for ResolverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "system" => Ok(ResolverKind::System),
            "google" => Ok(ResolverKind::Google),
            "cloudflare" => Ok(ResolverKind::Cloudflare),
            "quad9" => Ok(ResolverKind::Quad9),
            other => Err(format!(
                "unknown resolver '{}', expected one of: system, google, cloudflare, quad9",
                other
            )),
        }
    }
}

impl std::fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration options for a checking run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Maximum number of lookups in flight at once
    /// Default: 20, Range: 1-100
    pub concurrency: usize,

    /// Deadline for each individual lookup
    /// Default: 5 seconds
    #[serde(skip)] // Don't serialize Duration directly
    pub timeout: Duration,

    /// Upstream name servers
    /// Default: system configuration
    pub resolver: ResolverKind,

    /// TLDs each name is checked against
    /// Default: ["com"]
    pub tlds: Vec<String>,
}

pub const DEFAULT_CONCURRENCY: usize = 20;
pub const MAX_CONCURRENCY: usize = 100;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_TLD: &str = "com";

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            resolver: ResolverKind::System,
            tlds: vec![DEFAULT_TLD.to_string()],
        }
    }
}

impl CheckConfig {
    /// Set the concurrency limit, clamped to 1..=100.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, MAX_CONCURRENCY);
        self
    }

    /// Set the per-lookup deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_resolver(mut self, resolver: ResolverKind) -> Self {
        self.resolver = resolver;
        self
    }

    /// Set the TLDs to check.
    pub fn with_tlds(mut self, tlds: Vec<String>) -> Self {
        self.tlds = tlds;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_serializes_with_json_field_names() {
        let result = NameResult {
            name: "yahoo".to_string(),
            verdicts: vec![TldVerdict::new("com", false)],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "yahoo", "tlds": [{"tld": "com", "is_available": false}]})
        );
    }

    #[test]
    fn test_result_set_serializes_as_array() {
        let set = ResultSet::from_results(vec![NameResult {
            name: "a".to_string(),
            verdicts: vec![],
        }]);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"[{"name":"a","tlds":[]}]"#);
    }

    #[test]
    fn test_probe_request_fqdn() {
        assert_eq!(ProbeRequest::new("sun4everyone", "tj", 3).fqdn(), "sun4everyone.tj");
    }

    #[test]
    fn test_concurrency_is_clamped() {
        assert_eq!(CheckConfig::default().with_concurrency(0).concurrency, 1);
        assert_eq!(CheckConfig::default().with_concurrency(500).concurrency, 100);
        assert_eq!(CheckConfig::default().with_concurrency(7).concurrency, 7);
    }

    #[test]
    fn test_default_tlds() {
        assert_eq!(CheckConfig::default().tlds, vec!["com".to_string()]);
    }

    #[test]
    fn test_resolver_kind_parsing() {
        assert_eq!("Cloudflare".parse::<ResolverKind>(), Ok(ResolverKind::Cloudflare));
        assert_eq!(" quad9 ".parse::<ResolverKind>(), Ok(ResolverKind::Quad9));
        assert!("opendns".parse::<ResolverKind>().is_err());
        for kind in ResolverKind::ALL {
            assert_eq!(kind.as_str().parse::<ResolverKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_name_result_helpers() {
        let result = NameResult {
            name: "x".to_string(),
            verdicts: vec![TldVerdict::new("com", true), TldVerdict::new("net", false)],
        };
        assert_eq!(result.available_count(), 1);
        assert_eq!(result.verdict_for("net"), Some(&TldVerdict::new("net", false)));
        assert!(result.verdict_for("org").is_none());
    }
}
