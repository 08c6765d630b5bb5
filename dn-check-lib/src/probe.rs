//! Probe task: resolve one `name.tld` pair and turn the outcome into a verdict.

use crate::resolver::{FailureKind, Outcome, Resolve};
use crate::types::{ProbeRequest, TldVerdict};
use std::time::{Duration, Instant};

/// What a single probe produced.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub request: ProbeRequest,
    pub outcome: Outcome,
    /// Wall time spent waiting on the resolver
    pub elapsed: Duration,
}

impl ProbeReport {
    /// The verdict for this pair, or `None` when the lookup failed transiently.
    pub fn verdict(&self) -> Option<TldVerdict> {
        match self.outcome {
            Outcome::Registered => Some(TldVerdict::new(self.request.tld.clone(), false)),
            Outcome::NotFound => Some(TldVerdict::new(self.request.tld.clone(), true)),
            Outcome::TransientError(_) => None,
        }
    }

    pub fn fqdn(&self) -> String {
        self.request.fqdn()
    }
}

/// Resolve one pair, bounded by `deadline`.
///
/// A lookup still pending at the deadline yields a timeout
/// [`Outcome::TransientError`]. Transient failures are logged here and never
/// surface as an error of the run.
pub async fn probe<R>(resolver: &R, request: ProbeRequest, deadline: Duration) -> ProbeReport
where
    R: Resolve + ?Sized,
{
    let fqdn = request.fqdn();
    let start = Instant::now();

    let outcome = match tokio::time::timeout(deadline, resolver.resolve(&fqdn)).await {
        Ok(outcome) => outcome,
        Err(_) => Outcome::transient(
            FailureKind::Timeout,
            format!("no answer within {:?}", deadline),
        ),
    };
    let elapsed = start.elapsed();

    match &outcome {
        Outcome::TransientError(e) => {
            tracing::warn!(%fqdn, kind = %e.kind, detail = %e.detail, "lookup failed, no verdict recorded");
        }
        other => {
            tracing::debug!(%fqdn, outcome = ?other, elapsed_ms = elapsed.as_millis() as u64, "lookup done");
        }
    }

    ProbeReport {
        request,
        outcome,
        elapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Fixed(Outcome);

    #[async_trait]
    impl Resolve for Fixed {
        async fn resolve(&self, _fqdn: &str) -> Outcome {
            self.0.clone()
        }
    }

    struct Hangs;

    #[async_trait]
    impl Resolve for Hangs {
        async fn resolve(&self, _fqdn: &str) -> Outcome {
            std::future::pending::<()>().await;
            Outcome::Registered
        }
    }

    fn request() -> ProbeRequest {
        ProbeRequest::new("yahoo", "com", 0)
    }

    #[tokio::test]
    async fn test_registered_is_not_available() {
        let report = probe(&Fixed(Outcome::Registered), request(), Duration::from_secs(1)).await;
        assert_eq!(report.verdict(), Some(TldVerdict::new("com", false)));
        assert_eq!(report.fqdn(), "yahoo.com");
    }

    #[tokio::test]
    async fn test_not_found_is_available() {
        let report = probe(&Fixed(Outcome::NotFound), request(), Duration::from_secs(1)).await;
        assert_eq!(report.verdict(), Some(TldVerdict::new("com", true)));
    }

    #[tokio::test]
    async fn test_transient_error_yields_no_verdict() {
        let resolver = Fixed(Outcome::transient(FailureKind::Network, "unreachable"));
        let report = probe(&resolver, request(), Duration::from_secs(1)).await;
        assert_eq!(report.verdict(), None);
        assert!(report.outcome.is_transient());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_turns_hang_into_timeout() {
        let report = probe(&Hangs, request(), Duration::from_secs(3)).await;
        assert_eq!(report.verdict(), None);
        match report.outcome {
            Outcome::TransientError(e) => assert_eq!(e.kind, FailureKind::Timeout),
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
