//! Lock-free scheduler counters and their snapshot.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Statistics about scheduler utilization, cumulative over every run of one
/// scheduler instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Configured concurrency cap.
    pub max_concurrency: usize,
    /// Runs started.
    pub runs: u64,
    /// Factories invoked.
    pub admitted: u64,
    /// Operations that settled successfully.
    pub succeeded: u64,
    /// Operations that settled with an error.
    pub failed: u64,
    /// Factories or operations dropped by a fail-fast abort or timeout.
    pub abandoned: u64,
    /// Operations currently in flight.
    pub in_flight: usize,
    /// Highest in-flight count observed.
    pub peak_in_flight: usize,
}

/// Internal counters for scheduler statistics (thread-safe).
#[derive(Debug, Default)]
pub(crate) struct SchedulerCounters {
    runs: AtomicU64,
    admitted: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    abandoned: AtomicU64,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl SchedulerCounters {
    pub(crate) fn run_started(&self) {
        self.runs.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn admitted(&self) {
        self.admitted.fetch_add(1, Ordering::Relaxed);
        let now = self.in_flight.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::AcqRel);
    }

    pub(crate) fn settled(&self, ok: bool) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
        if ok {
            self.succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// `in_flight` operations were dropped without settling and `queued`
    /// factories never started.
    pub(crate) fn abandoned(&self, in_flight: usize, queued: usize) {
        if in_flight > 0 {
            self.in_flight.fetch_sub(in_flight, Ordering::AcqRel);
        }
        self.abandoned
            .fetch_add((in_flight + queued) as u64, Ordering::Relaxed);
    }

    /// Get a snapshot of current statistics.
    pub(crate) fn snapshot(&self, max_concurrency: usize) -> SchedulerStats {
        SchedulerStats {
            max_concurrency,
            runs: self.runs.load(Ordering::Relaxed),
            admitted: self.admitted.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            abandoned: self.abandoned.load(Ordering::Relaxed),
            in_flight: self.in_flight.load(Ordering::Acquire),
            peak_in_flight: self.peak_in_flight.load(Ordering::Acquire),
        }
    }
}
