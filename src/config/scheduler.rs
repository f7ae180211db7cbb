//! Scheduler configuration structures.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::AppResult;
use crate::core::outcome::{FailurePolicy, ScheduleOptions};

/// Environment variable holding the concurrency cap.
pub const ENV_MAX_CONCURRENCY: &str = "SCHEDULER_MAX_CONCURRENCY";
/// Environment variable holding the failure policy (`fail-fast` / `collect-all`).
pub const ENV_ON_FAILURE: &str = "SCHEDULER_ON_FAILURE";
/// Environment variable holding the run timeout in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "SCHEDULER_TIMEOUT_MS";
/// Environment variable selecting the driver (`inline` / `spawned`).
pub const ENV_DRIVER: &str = "SCHEDULER_DRIVER";

/// Where scheduled operations are polled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverConfig {
    /// Poll operations inside the caller's task.
    #[default]
    Inline,
    /// Spawn each operation on the runtime.
    Spawned,
}

/// Root scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Maximum operations in flight.
    pub max_concurrency: usize,
    /// Failure policy.
    pub on_failure: FailurePolicy,
    /// Optional run timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Driver selection.
    pub driver: DriverConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: num_cpus::get().max(1),
            on_failure: FailurePolicy::default(),
            timeout_ms: None,
            driver: DriverConfig::default(),
        }
    }
}

impl SchedulerConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be greater than 0".into());
        }
        if self.timeout_ms == Some(0) {
            return Err("timeout_ms must be greater than 0 when set".into());
        }
        Ok(())
    }

    /// Run options derived from this configuration.
    #[must_use]
    pub fn options(&self) -> ScheduleOptions {
        ScheduleOptions {
            on_failure: self.on_failure,
            timeout: self.timeout_ms.map(Duration::from_millis),
        }
    }

    /// Parse scheduler configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from the process environment, reading a `.env`
    /// file first when one exists. Unset variables keep their defaults.
    pub fn from_env() -> AppResult<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(anyhow::anyhow!("failed to load .env: {e}"));
            }
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<L>(lookup: L) -> AppResult<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(raw) = lookup(ENV_MAX_CONCURRENCY) {
            cfg.max_concurrency = raw
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("{ENV_MAX_CONCURRENCY}={raw:?}: {e}"))?;
        }
        if let Some(raw) = lookup(ENV_ON_FAILURE) {
            cfg.on_failure = parse_enum(ENV_ON_FAILURE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            cfg.timeout_ms = Some(
                raw.trim()
                    .parse()
                    .map_err(|e| anyhow::anyhow!("{ENV_TIMEOUT_MS}={raw:?}: {e}"))?,
            );
        }
        if let Some(raw) = lookup(ENV_DRIVER) {
            cfg.driver = parse_enum(ENV_DRIVER, &raw)?;
        }
        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }
}

/// Parse a bare enum name through its serde representation.
fn parse_enum<T>(key: &str, raw: &str) -> AppResult<T>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_value(serde_json::Value::String(raw.trim().to_owned()))
        .map_err(|e| anyhow::anyhow!("{key}={raw:?}: {e}"))
}
