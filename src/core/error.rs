//! Error types for scheduler operations.

use std::time::Duration;

use thiserror::Error;

use crate::util::ids::Slot;

/// Errors produced by a scheduler run.
///
/// `E` is the error type produced by the scheduled operations themselves.
#[derive(Debug, Error)]
pub enum SchedulerError<E> {
    /// Caller supplied an argument the scheduler can never make progress with.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// An operation failed while running under the fail-fast policy.
    #[error("task at slot {slot} failed: {cause}")]
    TaskFailure {
        /// Input position of the failing factory.
        slot: Slot,
        /// Error produced by the operation.
        #[source]
        cause: E,
    },
    /// The run did not finish within the configured timeout.
    #[error("scheduler timed out after {0:?}")]
    Timeout(Duration),
    /// Driver bookkeeping was lost (e.g. a spawned operation panicked).
    #[error("internal error: {0}")]
    Internal(String),
}

impl<E> SchedulerError<E> {
    /// Slot of the failing operation, if this is a task failure.
    pub const fn slot(&self) -> Option<Slot> {
        match self {
            Self::TaskFailure { slot, .. } => Some(*slot),
            _ => None,
        }
    }

    /// Consume the error and return the operation's cause, if any.
    pub fn into_cause(self) -> Option<E> {
        match self {
            Self::TaskFailure { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
