//! Concurrent scan coordination.
//!
//! Fans the per-candidate takeover check out across a bounded worker pool and
//! collects verdicts through the stream's single aggregation point. Pipelines
//! share nothing mutable; a stalled candidate never blocks the others.

use futures::{stream, StreamExt};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::checker::{TakeoverChecker, Verdict};
use crate::logger::ScanLogger;

/// Global flag for interrupt signaling. Once set, the coordinator stops
/// dispatching new candidates; in-flight checks finish and their verdicts
/// are still collected.
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

pub fn request_interrupt() {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

pub struct ScanCoordinator {
    checker: Arc<TakeoverChecker>,
    concurrency: usize,
    interrupt_flag: &'static AtomicBool,
}

impl ScanCoordinator {
    pub fn new(checker: Arc<TakeoverChecker>, concurrency: usize) -> Self {
        Self::with_interrupt_flag(checker, concurrency, &INTERRUPTED)
    }

    /// Coordinator watching a caller-owned flag instead of the process-wide
    /// one, so tests can interrupt a scan without affecting each other.
    fn with_interrupt_flag(
        checker: Arc<TakeoverChecker>,
        concurrency: usize,
        interrupt_flag: &'static AtomicBool,
    ) -> Self {
        Self {
            checker,
            concurrency: concurrency.max(1),
            interrupt_flag,
        }
    }

    /// Check every unique candidate and collect the verdicts. Completion
    /// order is unspecified; callers must treat the result as a multiset.
    /// An empty candidate set yields an empty list.
    pub async fn scan(&self, candidates: &HashSet<String>, logger: &ScanLogger) -> Vec<Verdict> {
        if candidates.is_empty() {
            debug!("Empty candidate set, nothing to scan");
            return Vec::new();
        }

        info!(
            "Scanning {} candidates with concurrency {}",
            candidates.len(),
            self.concurrency
        );

        let verdicts: Vec<Verdict> = stream::iter(candidates.iter().cloned())
            .map(|subdomain| {
                let checker = self.checker.clone();
                let interrupt_flag = self.interrupt_flag;
                async move {
                    if interrupt_flag.load(Ordering::SeqCst) {
                        debug!("Interrupt set, skipping dispatch of {}", subdomain);
                        return None;
                    }
                    Some(checker.check(&subdomain).await)
                }
            })
            .buffer_unordered(self.concurrency)
            .filter_map(|verdict| async move { verdict })
            .inspect(|verdict| {
                if verdict.vulnerable {
                    logger.vuln(&format!(
                        "{} -> {}",
                        verdict.subdomain,
                        verdict.service.as_deref().unwrap_or("unknown")
                    ));
                }
                logger.advance_progress_sync(1);
            })
            .collect()
            .await;

        info!(
            "Scan produced {} verdicts ({} vulnerable)",
            verdicts.len(),
            verdicts.iter().filter(|v| v.vulnerable).count()
        );
        verdicts
    }
}
