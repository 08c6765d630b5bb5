//! Fan-out of probe tasks and fan-in of their reports.
//!
//! Every (name, TLD) pair becomes its own task on the runtime. A semaphore
//! caps how many lookups are in flight; each probe carries its own deadline,
//! so one stalled lookup only ever occupies one permit. Reports are collected
//! in completion order and handed to the aggregator from this single loop.

use crate::aggregate::ResultAggregator;
use crate::error::DnCheckError;
use crate::probe::{probe, ProbeReport};
use crate::resolver::Resolve;
use crate::types::{ProbeRequest, MAX_CONCURRENCY};
use crate::utils::is_blank;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Build the full name-major cross product of non-blank names and TLDs.
///
/// Duplicates in either list are kept.
pub(crate) fn cross_product(names: &[String], tlds: &[String]) -> Vec<ProbeRequest> {
    names
        .iter()
        .filter(|name| !is_blank(name))
        .flat_map(|name| {
            tlds.iter()
                .enumerate()
                .map(move |(tld_index, tld)| ProbeRequest::new(name.as_str(), tld.as_str(), tld_index))
        })
        .collect()
}

/// Limits for one fan-out.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FanOutLimits {
    pub concurrency: usize,
    pub deadline: Duration,
}

/// Dispatch every request and deliver each report to `aggregator`.
///
/// Returns once all tasks have finished. A task that panics, is cancelled or
/// cannot obtain a permit aborts the remaining tasks and fails the run.
pub(crate) async fn fan_out<F>(
    resolver: Arc<dyn Resolve>,
    requests: Vec<ProbeRequest>,
    limits: FanOutLimits,
    aggregator: &mut ResultAggregator,
    mut on_probe: F,
) -> Result<(), DnCheckError>
where
    F: FnMut(&ProbeReport),
{
    let semaphore = Arc::new(Semaphore::new(limits.concurrency.clamp(1, MAX_CONCURRENCY)));
    let mut tasks = JoinSet::new();

    for request in requests {
        let resolver = Arc::clone(&resolver);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await.map_err(|e| {
                DnCheckError::task_failed(format!("concurrency limiter closed: {}", e))
            })?;
            Ok::<_, DnCheckError>(probe(resolver.as_ref(), request, limits.deadline).await)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let report = match joined.map_err(DnCheckError::from).and_then(|r| r) {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(error = %e, remaining = tasks.len(), "aborting run");
                tasks.abort_all();
                return Err(e);
            }
        };

        on_probe(&report);
        aggregator.accumulate(&report.request, report.verdict())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Outcome;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cross_product_is_name_major_and_skips_blanks() {
        let requests = cross_product(&strings(&["a", "", "b"]), &strings(&["com", "net"]));
        let fqdns: Vec<_> = requests.iter().map(|r| r.fqdn()).collect();
        assert_eq!(fqdns, vec!["a.com", "a.net", "b.com", "b.net"]);
        assert_eq!(requests[3].tld_index, 1);
    }

    #[test]
    fn test_cross_product_keeps_duplicates() {
        let requests = cross_product(&strings(&["a", "a"]), &strings(&["com", "com"]));
        assert_eq!(requests.len(), 4);
    }

    /// Tracks how many lookups run at the same time.
    struct Gauge {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl Resolve for Gauge {
        async fn resolve(&self, _fqdn: &str) -> Outcome {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.current.fetch_sub(1, Ordering::SeqCst);
            Outcome::NotFound
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_limit_is_respected() {
        let gauge = Arc::new(Gauge {
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let names: Vec<String> = (0..10).map(|i| format!("n{}", i)).collect();
        let tlds = strings(&["com", "net", "org"]);
        let mut aggregator = ResultAggregator::seeded(&names);

        let mut seen = 0;
        fan_out(
            gauge.clone(),
            cross_product(&names, &tlds),
            FanOutLimits {
                concurrency: 4,
                deadline: Duration::from_secs(5),
            },
            &mut aggregator,
            |_| seen += 1,
        )
        .await
        .unwrap();

        assert_eq!(seen, 30);
        assert_eq!(aggregator.delivered(), 30);
        assert!(gauge.peak.load(Ordering::SeqCst) <= 4);
    }

    struct Panics;

    #[async_trait]
    impl Resolve for Panics {
        async fn resolve(&self, fqdn: &str) -> Outcome {
            if fqdn.starts_with("boom") {
                panic!("resolver blew up");
            }
            Outcome::Registered
        }
    }

    #[tokio::test]
    async fn test_task_panic_fails_the_run() {
        let names = strings(&["fine", "boom"]);
        let mut aggregator = ResultAggregator::seeded(&names);
        let err = fan_out(
            Arc::new(Panics),
            cross_product(&names, &strings(&["com"])),
            FanOutLimits {
                concurrency: 2,
                deadline: Duration::from_secs(5),
            },
            &mut aggregator,
            |_| {},
        )
        .await
        .unwrap_err();

        assert!(err.is_incomplete_run());
    }

    #[tokio::test]
    async fn test_out_of_range_concurrency_is_clamped() {
        let names = strings(&["a", "b"]);
        for concurrency in [0, usize::MAX] {
            let mut aggregator = ResultAggregator::seeded(&names);
            fan_out(
                Arc::new(Panics),
                cross_product(&names, &strings(&["com", "net"])),
                FanOutLimits {
                    concurrency,
                    deadline: Duration::from_secs(5),
                },
                &mut aggregator,
                |_| {},
            )
            .await
            .unwrap();
            assert_eq!(aggregator.delivered(), 4);
        }
    }
}
