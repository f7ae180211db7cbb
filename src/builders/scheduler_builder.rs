//! Builders to construct schedulers from configuration.

use std::convert::Infallible;

use crate::config::{DriverConfig, SchedulerConfig};
use crate::core::{
    AppResult, BoundedScheduler, ScheduleResult, SchedulerError, SchedulerStats, SharedAuditSink,
    Spawn, SpawningScheduler, TaskFactory,
};

/// Error returned when a builder's configuration is invalid.
pub type BuildError = SchedulerError<Infallible>;

/// Builds schedulers from a validated [`SchedulerConfig`].
pub struct SchedulerBuilder {
    config: SchedulerConfig,
    audit: Option<SharedAuditSink>,
}

impl SchedulerBuilder {
    /// Create a builder for the given configuration.
    #[must_use]
    pub const fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            audit: None,
        }
    }

    /// Create a builder from environment configuration.
    pub fn from_env() -> AppResult<Self> {
        Ok(Self::new(SchedulerConfig::from_env()?))
    }

    /// Configuration this builder uses.
    #[must_use]
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Attach an audit sink to every scheduler built afterwards.
    #[must_use]
    pub fn with_audit(mut self, audit: SharedAuditSink) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Build an inline scheduler, ignoring the configured driver.
    pub fn build_inline(&self) -> Result<BoundedScheduler, BuildError> {
        self.validate()?;
        let scheduler =
            BoundedScheduler::new(self.config.max_concurrency).with_options(self.config.options());
        Ok(match &self.audit {
            Some(audit) => scheduler.with_audit(audit.clone()),
            None => scheduler,
        })
    }

    /// Build a spawning scheduler on `spawner`, ignoring the configured driver.
    pub fn build_spawned<S>(&self, spawner: S) -> Result<SpawningScheduler<S>, BuildError>
    where
        S: Spawn + Clone + Send + 'static,
    {
        self.validate()?;
        let scheduler = SpawningScheduler::new(self.config.max_concurrency, spawner)
            .with_options(self.config.options());
        Ok(match &self.audit {
            Some(audit) => scheduler.with_audit(audit.clone()),
            None => scheduler,
        })
    }

    /// Build the driver selected by the configuration.
    pub fn build<S>(&self, spawner: S) -> Result<ConfiguredScheduler<S>, BuildError>
    where
        S: Spawn + Clone + Send + 'static,
    {
        match self.config.driver {
            DriverConfig::Inline => self.build_inline().map(ConfiguredScheduler::Inline),
            DriverConfig::Spawned => self.build_spawned(spawner).map(ConfiguredScheduler::Spawned),
        }
    }

    fn validate(&self) -> Result<(), BuildError> {
        self.config
            .validate()
            .map_err(|e| SchedulerError::InvalidArgument(format!("config invalid: {e}")))
    }
}

/// Scheduler whose driver was chosen by configuration.
pub enum ConfiguredScheduler<S> {
    /// Operations polled in the caller's task.
    Inline(BoundedScheduler),
    /// Operations spawned on a runtime.
    Spawned(SpawningScheduler<S>),
}

impl<S> ConfiguredScheduler<S>
where
    S: Spawn + Clone + Send + 'static,
{
    /// Run with the configured options on the configured driver.
    pub async fn schedule<I, F>(&self, factories: I) -> ScheduleResult<F::Output, F::Error>
    where
        I: IntoIterator<Item = F>,
        F: TaskFactory + Send + 'static,
        F::Future: Send + 'static,
        F::Output: Send + 'static,
        F::Error: Send + 'static,
    {
        match self {
            Self::Inline(scheduler) => scheduler.schedule(factories).await,
            Self::Spawned(scheduler) => scheduler.schedule(factories).await,
        }
    }

    /// Snapshot of cumulative statistics.
    pub fn stats(&self) -> SchedulerStats {
        match self {
            Self::Inline(scheduler) => scheduler.stats(),
            Self::Spawned(scheduler) => scheduler.stats(),
        }
    }
}
