//! Resolver seam used by probe tasks.
//!
//! A resolver turns a fully qualified name into one of three outcomes. The
//! distinction between [`Outcome::NotFound`] and [`Outcome::TransientError`]
//! is what keeps an unreachable name server from being reported as a free
//! domain, so implementations must decide it from the resolver's own error
//! classification.

use async_trait::async_trait;
use std::fmt;

/// Result of resolving one FQDN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The name exists in DNS (addresses returned, or NOERROR without records)
    Registered,

    /// The resolver answered NXDOMAIN
    NotFound,

    /// Any other failure; says nothing about availability
    TransientError(TransientError),
}

impl Outcome {
    /// Shorthand for building a transient error outcome.
    pub fn transient<D: Into<String>>(kind: FailureKind, detail: D) -> Self {
        Outcome::TransientError(TransientError::new(kind, detail))
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Outcome::TransientError(_))
    }
}

/// Category of a lookup failure that produced no verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FailureKind {
    /// No answer before the deadline
    Timeout,
    /// No name server reachable, socket errors
    Network,
    /// SERVFAIL, REFUSED and other non-answers from the server
    ServerFailure,
    /// Query could not be built or the response could not be decoded
    Protocol,
    Other,
}

impl FailureKind {
    pub const ALL: [FailureKind; 5] = [
        FailureKind::Timeout,
        FailureKind::Network,
        FailureKind::ServerFailure,
        FailureKind::Protocol,
        FailureKind::Other,
    ];

    /// Short singular label used in summaries ("timeout", "network error", ...).
    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Network => "network error",
            FailureKind::ServerFailure => "server failure",
            FailureKind::Protocol => "protocol error",
            FailureKind::Other => "other error",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Detail of a failed lookup, kept for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientError {
    pub kind: FailureKind,
    pub detail: String,
}

impl TransientError {
    pub fn new<D: Into<String>>(kind: FailureKind, detail: D) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for TransientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)
    }
}

/// Host resolution capability.
///
/// Implementations are shared by every probe of a run and must not hold
/// per-lookup mutable state.
#[async_trait]
pub trait Resolve: Send + Sync {
    async fn resolve(&self, fqdn: &str) -> Outcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_shorthand() {
        let outcome = Outcome::transient(FailureKind::Network, "no connections available");
        assert!(outcome.is_transient());
        assert!(!Outcome::NotFound.is_transient());
        assert!(!Outcome::Registered.is_transient());
    }

    #[test]
    fn test_transient_error_display() {
        let err = TransientError::new(FailureKind::Timeout, "no answer within 5s");
        assert_eq!(err.to_string(), "timeout: no answer within 5s");
    }
}
