//! Tests for tokio spawner utilities

use bounded_task_scheduler::core::Spawn;
use bounded_task_scheduler::runtime::tokio_spawner::TokioSpawner;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tokio_spawner_spawn() {
    let spawner = TokioSpawner::new(tokio::runtime::Handle::current());

    let (tx, rx) = tokio::sync::oneshot::channel();
    spawner.spawn(async move {
        tx.send(123).unwrap();
    });

    let result = rx.await.expect("oneshot result");
    assert_eq!(result, 123);
}

#[cfg(feature = "tokio-runtime")]
#[test]
fn test_tokio_spawner_owned_runtime() {
    let spawner = TokioSpawner::with_worker_threads(2).expect("runtime");
    let (tx, rx) = std::sync::mpsc::channel();
    spawner.spawn(async move {
        tx.send(7).unwrap();
    });
    assert_eq!(rx.recv().unwrap(), 7);
}
