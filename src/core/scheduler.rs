//! Bounded task scheduler, inline driver.
//!
//! Runs an ordered list of [`TaskFactory`] values with at most
//! `max_concurrency` operations in flight, and resolves with results placed
//! by input position. Operations are polled inside the caller's task through
//! a `FuturesUnordered` pool, so admission is never racy and no runtime
//! spawning is required.
//!
//! Scheduling rules:
//!
//! - Factories are admitted FIFO by input position and invoked only when a
//!   pool slot is free.
//! - Every settlement immediately refills the pool from the queue.
//! - Results are keyed by slot index, never by factory identity.
//! - On fail-fast abort or timeout, queued factories are dropped unstarted
//!   and in-flight futures are dropped, which cancels them.

use std::collections::VecDeque;
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use tracing::Instrument;

use crate::core::audit::SharedAuditSink;
use crate::core::error::SchedulerError;
use crate::core::factory::TaskFactory;
use crate::core::outcome::{
    FailurePolicy, Progress, ScheduleOptions, ScheduleOutcome, SlotBuffer, SlotOutcome,
};
use crate::core::stats::{SchedulerCounters, SchedulerStats};
use crate::core::tracker::RunTracker;
use crate::util::ids::Slot;

/// Result of a scheduler run.
pub type ScheduleResult<T, E> = Result<ScheduleOutcome<T, E>, SchedulerError<E>>;

/// Run `factories` with at most `max_concurrency` in flight.
///
/// Fails with [`SchedulerError::InvalidArgument`] when `max_concurrency` is 0.
/// With the default fail-fast policy the outcome is
/// [`ScheduleOutcome::Completed`]; with collect-all it is
/// [`ScheduleOutcome::Settled`].
///
/// ```rust
/// use bounded_task_scheduler::core::{schedule, ScheduleOptions};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let factories = (1..=3).map(|n| move || async move { Ok::<_, ()>(n * 10) });
/// let outcome = schedule(factories, 2, ScheduleOptions::default()).await.unwrap();
/// assert_eq!(outcome.into_values(), Some(vec![10, 20, 30]));
/// # });
/// ```
pub async fn schedule<I, F>(
    factories: I,
    max_concurrency: usize,
    options: ScheduleOptions,
) -> ScheduleResult<F::Output, F::Error>
where
    I: IntoIterator<Item = F>,
    F: TaskFactory,
{
    BoundedScheduler::new(max_concurrency)
        .with_options(options)
        .schedule(factories)
        .await
}

/// Reusable scheduler holding a concurrency cap, default options, and
/// observability hooks. Each call owns its own queue, pool and buffer;
/// concurrent calls on one instance only share statistics.
pub struct BoundedScheduler {
    max_concurrency: usize,
    options: ScheduleOptions,
    counters: Arc<SchedulerCounters>,
    audit: Option<SharedAuditSink>,
}

impl BoundedScheduler {
    /// Create a scheduler with the given cap and fail-fast defaults.
    ///
    /// A cap of 0 is accepted here and rejected by every run.
    #[must_use]
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency,
            options: ScheduleOptions::default(),
            counters: Arc::new(SchedulerCounters::default()),
            audit: None,
        }
    }

    /// Replace the default run options.
    #[must_use]
    pub fn with_options(mut self, options: ScheduleOptions) -> Self {
        self.options = options;
        self
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: SharedAuditSink) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Configured concurrency cap.
    #[must_use]
    pub const fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Default options applied by [`BoundedScheduler::schedule`].
    #[must_use]
    pub const fn options(&self) -> ScheduleOptions {
        self.options
    }

    /// Snapshot of cumulative statistics.
    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        self.counters.snapshot(self.max_concurrency)
    }

    /// Run with the configured options.
    pub async fn schedule<I, F>(&self, factories: I) -> ScheduleResult<F::Output, F::Error>
    where
        I: IntoIterator<Item = F>,
        F: TaskFactory,
    {
        self.drive(factories, self.options).await
    }

    /// Run fail-fast and return values in input order.
    pub async fn run<I, F>(&self, factories: I) -> Result<Vec<F::Output>, SchedulerError<F::Error>>
    where
        I: IntoIterator<Item = F>,
        F: TaskFactory,
    {
        let options = self.options.with_failure_policy(FailurePolicy::FailFast);
        match self.drive(factories, options).await? {
            ScheduleOutcome::Completed(values) => Ok(values),
            ScheduleOutcome::Settled(_) => Err(SchedulerError::Internal(
                "fail-fast run produced settled outcomes".into(),
            )),
        }
    }

    /// Run collect-all and return one outcome per slot.
    pub async fn run_settled<I, F>(
        &self,
        factories: I,
    ) -> Result<Vec<SlotOutcome<F::Output, F::Error>>, SchedulerError<F::Error>>
    where
        I: IntoIterator<Item = F>,
        F: TaskFactory,
    {
        let options = self.options.with_failure_policy(FailurePolicy::CollectAll);
        Ok(self.drive(factories, options).await?.into_settled())
    }

    async fn drive<I, F>(
        &self,
        factories: I,
        options: ScheduleOptions,
    ) -> ScheduleResult<F::Output, F::Error>
    where
        I: IntoIterator<Item = F>,
        F: TaskFactory,
    {
        let max_concurrency = self.max_concurrency;
        if max_concurrency == 0 {
            return Err(SchedulerError::InvalidArgument(
                "max_concurrency must be greater than 0".into(),
            ));
        }

        let queue: VecDeque<(Slot, F)> = factories.into_iter().enumerate().collect();
        let tracker = RunTracker::new(
            Arc::clone(&self.counters),
            self.audit.clone(),
            queue.len(),
        );
        let span = tracing::info_span!(
            "schedule",
            run_id = %tracker.run_id(),
            total = queue.len(),
            max_concurrency,
            policy = ?options.on_failure,
        );

        drive_inline(queue, max_concurrency, options, tracker)
            .instrument(span)
            .await
    }
}

async fn drive_inline<F>(
    mut queue: VecDeque<(Slot, F)>,
    max_concurrency: usize,
    options: ScheduleOptions,
    mut tracker: RunTracker,
) -> ScheduleResult<F::Output, F::Error>
where
    F: TaskFactory,
{
    let total = queue.len();
    if total == 0 {
        tracing::info!("empty input, nothing to schedule");
        return Ok(SlotBuffer::empty(options.on_failure));
    }
    tracing::info!("run started");

    let deadline = options
        .timeout
        .map(|limit| (limit, tokio::time::Instant::now() + limit));
    let mut buffer = SlotBuffer::new(total, options.on_failure);
    let mut pool = FuturesUnordered::new();

    loop {
        while pool.len() < max_concurrency {
            let Some((slot, factory)) = queue.pop_front() else {
                break;
            };
            pool.push(factory.start().map(move |result| (slot, result)));
            tracker.admitted(slot);
        }

        let next = match deadline {
            Some((limit, at)) => tokio::select! {
                next = pool.next() => next,
                () = tokio::time::sleep_until(at) => {
                    tracing::warn!(?limit, settled = buffer.settled(), "run timed out");
                    tracker.abandon();
                    return Err(SchedulerError::Timeout(limit));
                }
            },
            None => pool.next().await,
        };

        let Some((slot, result)) = next else {
            return Err(SchedulerError::Internal(format!(
                "pool drained with {} of {total} slots settled",
                buffer.settled()
            )));
        };
        tracker.settled(slot, result.is_ok());

        match buffer.record(slot, result) {
            Progress::Pending => {}
            Progress::Done(outcome) => {
                tracing::info!("run finished");
                return Ok(outcome);
            }
            Progress::Failed { slot, cause } => {
                tracing::warn!(slot, "task failed, aborting run");
                tracker.abandon();
                return Err(SchedulerError::TaskFailure { slot, cause });
            }
        }
    }
}
