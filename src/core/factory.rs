//! Task factory abstraction.

use std::future::Future;

use futures::future::{BoxFuture, FutureExt};

/// A deferred unit of async work.
///
/// Invoking [`TaskFactory::start`] begins the operation and returns the
/// future that settles with its value or error. The scheduler only calls
/// `start` when the operation is admitted into the pool, so nothing runs
/// before a concurrency slot is free.
///
/// Any `FnOnce() -> impl Future<Output = Result<T, E>>` is a factory:
///
/// ```rust
/// use bounded_task_scheduler::core::TaskFactory;
///
/// let factory = || async { Ok::<_, std::io::Error>(42) };
/// let fut = factory.start();
/// # drop(fut);
/// ```
pub trait TaskFactory {
    /// Value produced on success.
    type Output;
    /// Error produced on failure.
    type Error;
    /// Pending operation returned by [`TaskFactory::start`].
    type Future: Future<Output = Result<Self::Output, Self::Error>>;

    /// Begin the operation.
    fn start(self) -> Self::Future;
}

impl<F, Fut, T, E> TaskFactory for F
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    type Output = T;
    type Error = E;
    type Future = Fut;

    fn start(self) -> Self::Future {
        self()
    }
}

/// Type-erased factory, for lists mixing different closures.
pub type BoxTaskFactory<'a, T, E> = Box<dyn FnOnce() -> BoxFuture<'a, Result<T, E>> + Send + 'a>;

/// Erase the concrete type of a sendable factory.
pub fn boxed<'a, F>(factory: F) -> BoxTaskFactory<'a, F::Output, F::Error>
where
    F: TaskFactory + Send + 'a,
    F::Future: Send + 'a,
{
    Box::new(move || factory.start().boxed())
}
