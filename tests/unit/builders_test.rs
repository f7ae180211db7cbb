//! Tests for builder modules

use std::sync::Arc;

use bounded_task_scheduler::builders::{ConfiguredScheduler, SchedulerBuilder};
use bounded_task_scheduler::config::{DriverConfig, SchedulerConfig};
use bounded_task_scheduler::core::{
    FailurePolicy, InMemoryAuditSink, ScheduleOutcome, SchedulerError,
};
use bounded_task_scheduler::runtime::TokioSpawner;
use parking_lot::Mutex;

fn config(driver: DriverConfig) -> SchedulerConfig {
    SchedulerConfig {
        max_concurrency: 2,
        on_failure: FailurePolicy::CollectAll,
        timeout_ms: Some(1_000),
        driver,
    }
}

#[test]
fn test_builder_inline_carries_config() {
    let builder = SchedulerBuilder::new(config(DriverConfig::Inline));
    assert_eq!(builder.config().max_concurrency, 2);

    let scheduler = builder.build_inline().unwrap();
    assert_eq!(scheduler.max_concurrency(), 2);
    assert_eq!(scheduler.options().on_failure, FailurePolicy::CollectAll);
}

#[test]
fn test_builder_rejects_invalid_config() {
    let mut cfg = config(DriverConfig::Inline);
    cfg.max_concurrency = 0;

    let err = SchedulerBuilder::new(cfg).build_inline().err().unwrap();
    assert!(matches!(err, SchedulerError::InvalidArgument(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_builder_selects_configured_driver() {
    let audit = Arc::new(Mutex::new(InMemoryAuditSink::new(64)));
    let builder = SchedulerBuilder::new(config(DriverConfig::Spawned)).with_audit(audit.clone());

    let scheduler = builder.build(TokioSpawner::current()).unwrap();
    assert!(matches!(scheduler, ConfiguredScheduler::Spawned(_)));

    let factories = (0..3u32).map(|n| move || async move { Ok::<_, String>(n + 1) });
    let outcome = scheduler.schedule(factories).await.unwrap();

    match outcome {
        ScheduleOutcome::Settled(outcomes) => {
            let values: Vec<_> = outcomes.into_iter().map(|o| o.result.unwrap()).collect();
            assert_eq!(values, vec![1, 2, 3]);
        }
        ScheduleOutcome::Completed(_) => panic!("collect-all config must settle"),
    }
    assert_eq!(audit.lock().admission_order(), vec![0, 1, 2]);
    assert_eq!(scheduler.stats().succeeded, 3);
}

#[tokio::test]
async fn test_builder_inline_driver_runs() {
    let builder = SchedulerBuilder::new(config(DriverConfig::Inline));
    let scheduler = builder.build(TokioSpawner::current()).unwrap();
    assert!(matches!(scheduler, ConfiguredScheduler::Inline(_)));

    let factories = vec![|| async { Err::<u8, String>("nope".into()) }];
    let outcome = scheduler.schedule(factories).await.unwrap();
    assert_eq!(outcome.len(), 1);
    assert!(!outcome.into_settled()[0].is_ok());
}
