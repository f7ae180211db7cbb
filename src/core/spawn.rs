//! Runtime spawning abstraction.

use std::future::Future;

/// Abstraction for spawning task execution on a runtime.
pub trait Spawn {
    /// Spawn a detached future. Its output is discarded.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;

    /// Spawner captured by spawned tasks to spawn follow-up work.
    ///
    /// Tasks may outlive the scheduler and are dropped on the runtime's own
    /// threads, so the returned value must not own the runtime. Defaults to
    /// a plain clone.
    fn for_task(&self) -> Self
    where
        Self: Clone,
    {
        self.clone()
    }
}
