//! Tests for configuration validation

use std::time::Duration;

use bounded_task_scheduler::builders::SchedulerBuilder;
use bounded_task_scheduler::config::scheduler::{
    ENV_DRIVER, ENV_MAX_CONCURRENCY, ENV_ON_FAILURE, ENV_TIMEOUT_MS,
};
use bounded_task_scheduler::config::{DriverConfig, SchedulerConfig};
use bounded_task_scheduler::core::FailurePolicy;

fn config(max_concurrency: usize, timeout_ms: Option<u64>) -> SchedulerConfig {
    SchedulerConfig {
        max_concurrency,
        on_failure: FailurePolicy::FailFast,
        timeout_ms,
        driver: DriverConfig::Inline,
    }
}

#[test]
fn test_scheduler_config_validation() {
    assert!(config(4, None).validate().is_ok());
    assert!(config(1, Some(250)).validate().is_ok());
}

#[test]
fn test_scheduler_config_invalid_concurrency() {
    assert!(config(0, None).validate().is_err());
}

#[test]
fn test_scheduler_config_invalid_timeout() {
    assert!(config(2, Some(0)).validate().is_err());
}

#[test]
fn test_scheduler_config_default() {
    let cfg = SchedulerConfig::default();
    assert!(cfg.max_concurrency >= 1);
    assert_eq!(cfg.on_failure, FailurePolicy::FailFast);
    assert_eq!(cfg.driver, DriverConfig::Inline);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_scheduler_config_from_json() {
    let json = r#"{
        "max_concurrency": 2,
        "on_failure": "collect-all",
        "timeout_ms": 5000,
        "driver": "spawned"
    }"#;

    let cfg = SchedulerConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.max_concurrency, 2);
    assert_eq!(cfg.on_failure, FailurePolicy::CollectAll);
    assert_eq!(cfg.driver, DriverConfig::Spawned);

    let options = cfg.options();
    assert_eq!(options.on_failure, FailurePolicy::CollectAll);
    assert_eq!(options.timeout, Some(Duration::from_secs(5)));
}

#[test]
fn test_scheduler_config_partial_json_uses_defaults() {
    let cfg = SchedulerConfig::from_json_str(r#"{ "max_concurrency": 3 }"#).unwrap();
    assert_eq!(cfg.max_concurrency, 3);
    assert_eq!(cfg.on_failure, FailurePolicy::FailFast);
    assert_eq!(cfg.timeout_ms, None);
}

#[test]
fn test_scheduler_config_from_json_rejects_invalid() {
    assert!(SchedulerConfig::from_json_str(r#"{ "max_concurrency": 0 }"#).is_err());
    assert!(SchedulerConfig::from_json_str(r#"{ "on_failure": "retry" }"#).is_err());
    assert!(SchedulerConfig::from_json_str("not json").is_err());
}

// Only this test touches the process environment.
#[test]
fn test_scheduler_config_from_env() {
    std::env::set_var(ENV_MAX_CONCURRENCY, "5");
    std::env::set_var(ENV_ON_FAILURE, "collect-all");
    std::env::set_var(ENV_TIMEOUT_MS, "750");
    std::env::set_var(ENV_DRIVER, "spawned");

    let cfg = SchedulerConfig::from_env();
    let builder = SchedulerBuilder::from_env();

    for key in [ENV_MAX_CONCURRENCY, ENV_ON_FAILURE, ENV_TIMEOUT_MS, ENV_DRIVER] {
        std::env::remove_var(key);
    }

    let cfg = cfg.unwrap();
    assert_eq!(cfg.max_concurrency, 5);
    assert_eq!(cfg.on_failure, FailurePolicy::CollectAll);
    assert_eq!(cfg.timeout_ms, Some(750));
    assert_eq!(cfg.driver, DriverConfig::Spawned);
    assert_eq!(builder.unwrap().config(), &cfg);
}
