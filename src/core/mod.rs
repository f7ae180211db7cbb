//! Core scheduling abstractions: factories, drivers, outcomes and accounting.

pub mod audit;
pub mod error;
pub mod factory;
pub mod outcome;
pub mod scheduler;
pub mod spawn;
pub mod spawned;
pub mod stats;
mod tracker;

pub use audit::{
    build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink, SharedAuditSink,
    TracingAuditSink,
};
pub use error::{AppResult, SchedulerError};
pub use factory::{boxed, BoxTaskFactory, TaskFactory};
pub use outcome::{FailurePolicy, ScheduleOptions, ScheduleOutcome, SlotOutcome};
pub use scheduler::{schedule, BoundedScheduler, ScheduleResult};
pub use spawn::Spawn;
pub use spawned::SpawningScheduler;
pub use stats::SchedulerStats;
