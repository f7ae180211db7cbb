//! Failure policy, run options and the positional result buffer.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::ids::Slot;

/// What the scheduler does when an operation fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Reject the whole run with the first failure observed.
    #[default]
    FailFast,
    /// Wait for every operation to settle and report each outcome by slot.
    CollectAll,
}

/// Per-run options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleOptions {
    /// Failure policy; fail-fast unless set otherwise.
    pub on_failure: FailurePolicy,
    /// Upper bound on the whole run. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ScheduleOptions {
    /// Fail-fast options with no timeout.
    #[must_use]
    pub fn fail_fast() -> Self {
        Self::default()
    }

    /// Collect-all options with no timeout.
    #[must_use]
    pub fn collect_all() -> Self {
        Self {
            on_failure: FailurePolicy::CollectAll,
            timeout: None,
        }
    }

    /// Set the failure policy.
    #[must_use]
    pub const fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }

    /// Bound the run by `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Settled result of one operation, tagged with its input position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotOutcome<T, E> {
    /// Input position of the factory.
    pub slot: Slot,
    /// Value or error the operation settled with.
    pub result: Result<T, E>,
}

impl<T, E> SlotOutcome<T, E> {
    /// Whether the operation succeeded.
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Aggregate produced by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome<T, E> {
    /// Fail-fast run where every operation succeeded, values in input order.
    Completed(Vec<T>),
    /// Collect-all run, one outcome per slot in input order.
    Settled(Vec<SlotOutcome<T, E>>),
}

impl<T, E> ScheduleOutcome<T, E> {
    /// Number of slots covered by the outcome.
    pub fn len(&self) -> usize {
        match self {
            Self::Completed(values) => values.len(),
            Self::Settled(outcomes) => outcomes.len(),
        }
    }

    /// Whether the run had no slots at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values of a completed run, `None` for a settled one.
    pub fn into_values(self) -> Option<Vec<T>> {
        match self {
            Self::Completed(values) => Some(values),
            Self::Settled(_) => None,
        }
    }

    /// Per-slot outcomes. A completed run is converted into all-success outcomes.
    pub fn into_settled(self) -> Vec<SlotOutcome<T, E>> {
        match self {
            Self::Completed(values) => values
                .into_iter()
                .enumerate()
                .map(|(slot, value)| SlotOutcome {
                    slot,
                    result: Ok(value),
                })
                .collect(),
            Self::Settled(outcomes) => outcomes,
        }
    }
}

/// Progress reported after recording one settlement.
#[derive(Debug)]
pub(crate) enum Progress<T, E> {
    /// More slots are still outstanding.
    Pending,
    /// Every slot is filled; the run resolves with this outcome.
    Done(ScheduleOutcome<T, E>),
    /// Fail-fast run hit its first failure.
    Failed { slot: Slot, cause: E },
}

/// Write-once positional buffer shared by both drivers.
#[derive(Debug)]
pub(crate) struct SlotBuffer<T, E> {
    policy: FailurePolicy,
    slots: Vec<Option<Result<T, E>>>,
    settled: usize,
}

impl<T, E> SlotBuffer<T, E> {
    pub(crate) fn new(len: usize, policy: FailurePolicy) -> Self {
        Self {
            policy,
            slots: std::iter::repeat_with(|| None).take(len).collect(),
            settled: 0,
        }
    }

    pub(crate) const fn settled(&self) -> usize {
        self.settled
    }

    /// Record the settlement of `slot`.
    ///
    /// Each slot is written at most once; a second write is a driver bug.
    pub(crate) fn record(&mut self, slot: Slot, result: Result<T, E>) -> Progress<T, E> {
        debug_assert!(self.slots[slot].is_none(), "slot {slot} settled twice");

        if self.policy == FailurePolicy::FailFast {
            if let Err(cause) = result {
                return Progress::Failed { slot, cause };
            }
        }

        self.slots[slot] = Some(result);
        self.settled += 1;
        if self.settled < self.slots.len() {
            return Progress::Pending;
        }
        Progress::Done(self.take_outcome())
    }

    /// Outcome of a run with zero slots.
    pub(crate) fn empty(policy: FailurePolicy) -> ScheduleOutcome<T, E> {
        match policy {
            FailurePolicy::FailFast => ScheduleOutcome::Completed(Vec::new()),
            FailurePolicy::CollectAll => ScheduleOutcome::Settled(Vec::new()),
        }
    }

    fn take_outcome(&mut self) -> ScheduleOutcome<T, E> {
        let filled = std::mem::take(&mut self.slots)
            .into_iter()
            .enumerate()
            .filter_map(|(slot, entry)| entry.map(|result| (slot, result)));

        match self.policy {
            FailurePolicy::FailFast => {
                ScheduleOutcome::Completed(filled.filter_map(|(_, r)| r.ok()).collect())
            }
            FailurePolicy::CollectAll => ScheduleOutcome::Settled(
                filled
                    .map(|(slot, result)| SlotOutcome { slot, result })
                    .collect(),
            ),
        }
    }
}
