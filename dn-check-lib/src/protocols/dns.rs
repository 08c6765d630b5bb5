//! DNS resolver backed by hickory-resolver.
//!
//! Looks up A/AAAA records for a name and classifies the answer. Only an
//! NXDOMAIN response code counts as "not found"; every failure that is not
//! an answer from a name server is transient.

use crate::resolver::{FailureKind, Outcome, Resolve};
use crate::types::ResolverKind;
use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::TokioAsyncResolver;
use std::time::Duration;

/// Production resolver used by the CLI.
#[derive(Clone)]
pub struct DnsResolver {
    inner: TokioAsyncResolver,
    kind: ResolverKind,
}

impl DnsResolver {
    /// Build a resolver for the given upstream.
    ///
    /// `timeout` bounds a single query to a single name server. When the
    /// system configuration cannot be read the resolver falls back to Google
    /// public DNS and logs a warning.
    pub fn new(kind: ResolverKind, timeout: Duration) -> Self {
        let (config, mut opts) = match kind {
            ResolverKind::System => match hickory_resolver::system_conf::read_system_conf() {
                Ok(system) => system,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "could not read system resolver configuration, using Google public DNS"
                    );
                    (ResolverConfig::google(), ResolverOpts::default())
                }
            },
            ResolverKind::Google => (ResolverConfig::google(), ResolverOpts::default()),
            ResolverKind::Cloudflare => (ResolverConfig::cloudflare(), ResolverOpts::default()),
            ResolverKind::Quad9 => (ResolverConfig::quad9(), ResolverOpts::default()),
        };

        opts.timeout = timeout;
        // one query per name server; a failed lookup is reported, not retried
        opts.attempts = 1;
        opts.cache_size = 0;

        tracing::debug!(resolver = %kind, ?timeout, "building DNS resolver");

        Self {
            inner: TokioAsyncResolver::tokio(config, opts),
            kind,
        }
    }

    pub fn kind(&self) -> ResolverKind {
        self.kind
    }
}

#[async_trait]
impl Resolve for DnsResolver {
    async fn resolve(&self, fqdn: &str) -> Outcome {
        match self.inner.lookup_ip(absolute_name(fqdn)).await {
            Ok(_) => Outcome::Registered,
            Err(e) => classify_error(&e),
        }
    }
}

/// Append the root label so search domains are never tried.
fn absolute_name(fqdn: &str) -> String {
    if fqdn.ends_with('.') {
        fqdn.to_string()
    } else {
        format!("{}.", fqdn)
    }
}

/// Map a hickory lookup error onto an [`Outcome`].
pub fn classify_error(err: &ResolveError) -> Outcome {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => {
            classify_response_code(*response_code)
        }
        ResolveErrorKind::Timeout => Outcome::transient(FailureKind::Timeout, err.to_string()),
        ResolveErrorKind::NoConnections | ResolveErrorKind::Io(_) => {
            Outcome::transient(FailureKind::Network, err.to_string())
        }
        ResolveErrorKind::Proto(_) => Outcome::transient(FailureKind::Protocol, err.to_string()),
        _ => Outcome::transient(FailureKind::Other, err.to_string()),
    }
}

/// Map the response code of an answer without address records.
///
/// NOERROR means the name exists but has no A/AAAA records, which still
/// makes it registered.
pub fn classify_response_code(code: ResponseCode) -> Outcome {
    match code {
        ResponseCode::NXDomain => Outcome::NotFound,
        ResponseCode::NoError => Outcome::Registered,
        ResponseCode::FormErr => {
            Outcome::transient(FailureKind::Protocol, format!("server answered {}", code))
        }
        other => Outcome::transient(
            FailureKind::ServerFailure,
            format!("server answered {}", other),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_resolver::proto::op::Query;

    #[test]
    fn test_nxdomain_is_not_found() {
        assert_eq!(classify_response_code(ResponseCode::NXDomain), Outcome::NotFound);
    }

    #[test]
    fn test_nodata_is_registered() {
        assert_eq!(classify_response_code(ResponseCode::NoError), Outcome::Registered);
    }

    #[test]
    fn test_server_failures_are_transient() {
        for code in [ResponseCode::ServFail, ResponseCode::Refused, ResponseCode::NotImp] {
            match classify_response_code(code) {
                Outcome::TransientError(e) => assert_eq!(e.kind, FailureKind::ServerFailure),
                other => panic!("{:?} classified as {:?}", code, other),
            }
        }
        assert!(matches!(
            classify_response_code(ResponseCode::FormErr),
            Outcome::TransientError(ref e) if e.kind == FailureKind::Protocol
        ));
    }

    fn no_records(response_code: ResponseCode) -> ResolveError {
        ResolveError::from(ResolveErrorKind::NoRecordsFound {
            query: Box::new(Query::default()),
            soa: None,
            negative_ttl: None,
            response_code,
            trusted: true,
        })
    }

    #[test]
    fn test_nxdomain_lookup_error_is_not_found() {
        assert_eq!(classify_error(&no_records(ResponseCode::NXDomain)), Outcome::NotFound);
        assert_eq!(classify_error(&no_records(ResponseCode::NoError)), Outcome::Registered);
    }

    #[test]
    fn test_servfail_lookup_error_is_transient() {
        assert!(matches!(
            classify_error(&no_records(ResponseCode::ServFail)),
            Outcome::TransientError(ref e) if e.kind == FailureKind::ServerFailure
        ));
    }

    #[test]
    fn test_timeout_is_never_available() {
        let err = ResolveError::from(ResolveErrorKind::Timeout);
        assert!(matches!(
            classify_error(&err),
            Outcome::TransientError(ref e) if e.kind == FailureKind::Timeout
        ));
    }

    #[test]
    fn test_unreachable_resolver_is_never_available() {
        let err = ResolveError::from(ResolveErrorKind::NoConnections);
        assert!(matches!(
            classify_error(&err),
            Outcome::TransientError(ref e) if e.kind == FailureKind::Network
        ));

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ResolveError::from(io);
        assert!(matches!(
            classify_error(&err),
            Outcome::TransientError(ref e) if e.kind == FailureKind::Network
        ));
    }

    #[test]
    fn test_absolute_name() {
        assert_eq!(absolute_name("yahoo.com"), "yahoo.com.");
        assert_eq!(absolute_name("yahoo.com."), "yahoo.com.");
    }

    /// Hits the network, run with `cargo test -- --ignored`.
    #[tokio::test]
    #[ignore]
    async fn test_real_lookup_google_com_is_registered() {
        let resolver = DnsResolver::new(ResolverKind::Google, Duration::from_secs(5));
        assert_eq!(resolver.resolve("google.com").await, Outcome::Registered);
    }
}
