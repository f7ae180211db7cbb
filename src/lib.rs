//! # Bounded Task Scheduler
//!
//! Runs an ordered list of deferred async operations with a cap on how many
//! are in flight at once, and resolves with one aggregate result aligned to
//! the input order regardless of completion order.
//!
//! ## Model
//!
//! - **Task factory**: anything implementing [`core::TaskFactory`], typically a
//!   closure `|| async { ... }` returning `Result<T, E>`. A factory is invoked
//!   only once the operation is admitted into the pool.
//! - **Slot**: the 0-based input position of a factory. Results are placed by
//!   slot, never by factory identity, so one logical factory may appear at
//!   several positions.
//! - **Pool**: the operations currently in flight, never larger than
//!   `max_concurrency`. Each settlement refills it from the FIFO queue.
//!
//! ## Failure policy
//!
//! The default is [`core::FailurePolicy::FailFast`]: the first failure rejects
//! the run with [`core::SchedulerError::TaskFailure`], carrying the failing
//! slot and its cause. [`core::FailurePolicy::CollectAll`] waits for every
//! operation and reports a per-slot [`core::SlotOutcome`] sequence.
//!
//! A `max_concurrency` of 0 is rejected with
//! [`core::SchedulerError::InvalidArgument`] before any factory runs.
//!
//! ## Drivers
//!
//! - [`core::BoundedScheduler`] polls operations inside the caller's task.
//!   Works with borrowed and `!Send` futures.
//! - [`core::SpawningScheduler`] spawns each operation through
//!   [`core::Spawn`] (e.g. [`runtime::TokioSpawner`]) and guards admission
//!   with a mutex, for work that should run on runtime worker threads.
//!
//! ```rust
//! use std::time::Duration;
//! use bounded_task_scheduler::core::BoundedScheduler;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let delays = [30u64, 10, 20];
//! let factories = delays.map(|ms| move || async move {
//!     tokio::time::sleep(Duration::from_millis(ms)).await;
//!     Ok::<_, std::io::Error>(ms)
//! });
//!
//! let values = BoundedScheduler::new(2).run(factories).await.unwrap();
//! assert_eq!(values, vec![30, 10, 20]);
//! # });
//! ```

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions and capacity accounting.
pub mod core;
/// Configuration models and environment loading.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// Runtime adapters.
pub mod runtime;
/// Shared utilities.
pub mod util;

pub use crate::core::{
    schedule, BoundedScheduler, FailurePolicy, ScheduleOptions, ScheduleOutcome, SchedulerError,
    SlotOutcome, SpawningScheduler, TaskFactory,
};
