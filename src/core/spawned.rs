//! Bounded task scheduler, spawned driver.
//!
//! Every admitted operation runs as its own task on a [`Spawn`]
//! implementation, so operations may settle concurrently on worker threads.
//! Queue, in-flight set and result buffer live behind one
//! `parking_lot::Mutex`; each settlement records its result and reserves the
//! next slots under that lock, which keeps the pool within the cap no matter
//! how many completions race. The aggregate comes back over a oneshot
//! channel.
//!
//! When a run ends early (fail-fast abort, timeout, or the caller dropping
//! the returned future), queued factories are dropped unstarted. Operations
//! already in flight keep running on the runtime and their settlements are
//! discarded.

use std::collections::VecDeque;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::Instrument;

use crate::core::audit::SharedAuditSink;
use crate::core::error::SchedulerError;
use crate::core::factory::TaskFactory;
use crate::core::outcome::{
    FailurePolicy, Progress, ScheduleOptions, ScheduleOutcome, SlotBuffer, SlotOutcome,
};
use crate::core::scheduler::ScheduleResult;
use crate::core::spawn::Spawn;
use crate::core::stats::{SchedulerCounters, SchedulerStats};
use crate::core::tracker::RunTracker;
use crate::util::ids::Slot;

type Completion<F> =
    oneshot::Sender<ScheduleResult<<F as TaskFactory>::Output, <F as TaskFactory>::Error>>;

/// Mutable state of one run, guarded by a single mutex.
///
/// `tracker` is declared before `done` so a run dropped without resolving
/// settles its accounting before the caller is woken.
struct RunState<F: TaskFactory> {
    max_concurrency: usize,
    queue: VecDeque<(Slot, F)>,
    buffer: SlotBuffer<F::Output, F::Error>,
    tracker: RunTracker,
    /// `None` once the run has resolved or been abandoned.
    done: Option<Completion<F>>,
}

impl<F: TaskFactory> RunState<F> {
    fn is_live(&self) -> bool {
        self.done.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    /// Stop tracking the run: drop queued factories, forget in-flight slots.
    fn abandon(&mut self) -> Option<Completion<F>> {
        self.queue.clear();
        self.tracker.abandon();
        self.done.take()
    }
}

type SharedRun<F> = Arc<Mutex<RunState<F>>>;

/// Scheduler that spawns each admitted operation on a runtime.
///
/// Requires `Send + 'static` factories, futures, values and errors. Use
/// [`crate::core::BoundedScheduler`] for borrowed or `!Send` work.
pub struct SpawningScheduler<S> {
    max_concurrency: usize,
    options: ScheduleOptions,
    spawner: S,
    counters: Arc<SchedulerCounters>,
    audit: Option<SharedAuditSink>,
}

impl<S> SpawningScheduler<S>
where
    S: Spawn + Clone + Send + 'static,
{
    /// Create a scheduler spawning on `spawner`, with fail-fast defaults.
    pub fn new(max_concurrency: usize, spawner: S) -> Self {
        Self {
            max_concurrency,
            options: ScheduleOptions::default(),
            spawner,
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
    pub const fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Snapshot of cumulative statistics.
    pub fn stats(&self) -> SchedulerStats {
        self.counters.snapshot(self.max_concurrency)
    }

    /// Run with the configured options.
    pub async fn schedule<I, F>(&self, factories: I) -> ScheduleResult<F::Output, F::Error>
    where
        I: IntoIterator<Item = F>,
        F: TaskFactory + Send + 'static,
        F::Future: Send + 'static,
        F::Output: Send + 'static,
        F::Error: Send + 'static,
    {
        self.drive(factories, self.options).await
    }

    /// Run fail-fast and return values in input order.
    pub async fn run<I, F>(&self, factories: I) -> Result<Vec<F::Output>, SchedulerError<F::Error>>
    where
        I: IntoIterator<Item = F>,
        F: TaskFactory + Send + 'static,
        F::Future: Send + 'static,
        F::Output: Send + 'static,
        F::Error: Send + 'static,
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
        F: TaskFactory + Send + 'static,
        F::Future: Send + 'static,
        F::Output: Send + 'static,
        F::Error: Send + 'static,
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
        F: TaskFactory + Send + 'static,
        F::Future: Send + 'static,
        F::Output: Send + 'static,
        F::Error: Send + 'static,
    {
        let max_concurrency = self.max_concurrency;
        if max_concurrency == 0 {
            return Err(SchedulerError::InvalidArgument(
                "max_concurrency must be greater than 0".into(),
            ));
        }

        let queue: VecDeque<(Slot, F)> = factories.into_iter().enumerate().collect();
        let total = queue.len();
        let tracker = RunTracker::new(Arc::clone(&self.counters), self.audit.clone(), total);
        let span = tracing::info_span!(
            "schedule_spawned",
            run_id = %tracker.run_id(),
            total,
            max_concurrency,
            policy = ?options.on_failure,
        );

        async move {
            if total == 0 {
                tracing::info!("empty input, nothing to schedule");
                return Ok(SlotBuffer::empty(options.on_failure));
            }
            tracing::info!("run started");

            let (tx, rx) = oneshot::channel();
            let shared: SharedRun<F> = Arc::new(Mutex::new(RunState {
                max_concurrency,
                queue,
                buffer: SlotBuffer::new(total, options.on_failure),
                tracker,
                done: Some(tx),
            }));
            // Spawned operations own the run; if they all vanish without
            // resolving it, the sender drops and `rx` reports it.
            let watch = Arc::downgrade(&shared);
            admit(&shared, &self.spawner);
            drop(shared);

            let received = match options.timeout {
                Some(limit) => {
                    if let Ok(received) = tokio::time::timeout(limit, rx).await {
                        received
                    } else {
                        tracing::warn!(?limit, "run timed out");
                        abandon(&watch);
                        return Err(SchedulerError::Timeout(limit));
                    }
                }
                None => rx.await,
            };

            match received {
                Ok(result) => {
                    if result.is_ok() {
                        tracing::info!("run finished");
                    }
                    result
                }
                Err(_) => Err(SchedulerError::Internal(
                    "run state dropped before every slot settled".into(),
                )),
            }
        }
        .instrument(span)
        .await
    }
}

/// Reserve free pool slots under the lock, then start and spawn them.
fn admit<F, S>(shared: &SharedRun<F>, spawner: &S)
where
    F: TaskFactory + Send + 'static,
    F::Future: Send + 'static,
    F::Output: Send + 'static,
    F::Error: Send + 'static,
    S: Spawn + Clone + Send + 'static,
{
    let batch = {
        let mut guard = shared.lock();
        let run = &mut *guard;
        if !run.is_live() {
            run.abandon();
            return;
        }
        let mut batch = Vec::new();
        while run.tracker.in_flight() < run.max_concurrency {
            let Some((slot, factory)) = run.queue.pop_front() else {
                break;
            };
            run.tracker.admitted(slot);
            batch.push((slot, factory));
        }
        batch
    };

    for (slot, factory) in batch {
        let operation = factory.start();
        let shared = Arc::clone(shared);
        let task_spawner = spawner.for_task();
        spawner.spawn(async move {
            let result = operation.await;
            on_settled(&shared, &task_spawner, slot, result);
        });
    }
}

fn on_settled<F, S>(
    shared: &SharedRun<F>,
    spawner: &S,
    slot: Slot,
    result: Result<F::Output, F::Error>,
) where
    F: TaskFactory + Send + 'static,
    F::Future: Send + 'static,
    F::Output: Send + 'static,
    F::Error: Send + 'static,
    S: Spawn + Clone + Send + 'static,
{
    let finished = {
        let mut guard = shared.lock();
        let run = &mut *guard;
        if run.done.is_none() {
            tracing::debug!(slot, "settlement after run ended, discarded");
            return;
        }
        run.tracker.settled(slot, result.is_ok());

        match run.buffer.record(slot, result) {
            Progress::Pending => None,
            Progress::Done(outcome) => run.done.take().map(|tx| (tx, Ok(outcome))),
            Progress::Failed { slot, cause } => {
                tracing::warn!(slot, "task failed, aborting run");
                run.abandon()
                    .map(|tx| (tx, Err(SchedulerError::TaskFailure { slot, cause })))
            }
        }
    };

    match finished {
        Some((tx, result)) => {
            if tx.send(result).is_err() {
                tracing::debug!("caller stopped waiting before the run resolved");
            }
        }
        None => admit(shared, spawner),
    }
}

fn abandon<F: TaskFactory>(watch: &Weak<Mutex<RunState<F>>>) {
    if let Some(shared) = watch.upgrade() {
        shared.lock().abandon();
    }
}
