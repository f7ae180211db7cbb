//! Tests for error types

use std::error::Error as _;
use std::time::Duration;

use bounded_task_scheduler::core::SchedulerError;

#[derive(Debug, thiserror::Error)]
#[error("disk unavailable")]
struct DiskError;

#[test]
fn test_invalid_argument_error() {
    let err: SchedulerError<DiskError> =
        SchedulerError::InvalidArgument("max_concurrency must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid argument: max_concurrency must be greater than 0"
    );
    assert!(err.source().is_none());
}

#[test]
fn test_task_failure_error() {
    let err = SchedulerError::TaskFailure {
        slot: 4,
        cause: DiskError,
    };
    assert_eq!(format!("{}", err), "task at slot 4 failed: disk unavailable");
    assert_eq!(err.source().map(ToString::to_string), Some("disk unavailable".to_string()));
    assert_eq!(err.slot(), Some(4));
}

#[test]
fn test_timeout_error() {
    let err: SchedulerError<DiskError> = SchedulerError::Timeout(Duration::from_millis(1500));
    assert_eq!(format!("{}", err), "scheduler timed out after 1.5s");
}

#[test]
fn test_internal_error() {
    let err: SchedulerError<DiskError> = SchedulerError::Internal("lost".to_string());
    assert_eq!(format!("{}", err), "internal error: lost");
    assert!(err.into_cause().is_none());
}

#[test]
fn test_converts_into_anyhow() {
    let err = SchedulerError::TaskFailure {
        slot: 0,
        cause: DiskError,
    };
    let app: anyhow::Error = err.into();
    assert_eq!(app.root_cause().to_string(), "disk unavailable");
}
