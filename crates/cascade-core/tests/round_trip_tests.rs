//! Tests for work that leaves the primary thread and comes back.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use cascade_core::{CoreError, MainQueue, ThreadAffinity, Worker, WorkerConfig};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn pump_until(queue: &MainQueue, mut done: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        queue.wait_and_process(Duration::from_millis(10));
        if done() {
            return true;
        }
    }
    false
}

#[test]
fn test_worker_reads_and_publishes_on_primary() {
    init_tracing();
    let queue = MainQueue::new();
    let primary = ThreadAffinity::current();
    let worker = Worker::spawn(WorkerConfig::with_name("round-trip")).unwrap();

    let published = Arc::new(Mutex::new(Vec::new()));
    for job in 0..3_u32 {
        let main = queue.handle();
        let published = published.clone();
        worker
            .submit(move || {
                assert!(!main.is_primary());
                let base = main
                    .invoke_blocking(move || {
                        assert!(primary.is_same_thread());
                        job * 10
                    })
                    .unwrap();
                let result = base + 1;
                main.post(move || published.lock().push(result)).unwrap();
            })
            .unwrap();
    }

    assert!(pump_until(&queue, || published.lock().len() == 3));
    assert_eq!(*published.lock(), vec![1, 11, 21]);
    assert!(worker.stop_and_join());
}

#[test]
fn test_hop_fails_once_primary_queue_is_gone() {
    init_tracing();
    let queue = MainQueue::new();
    let main = queue.handle();
    let worker = Worker::spawn_default().unwrap();
    drop(queue);

    let result = Arc::new(Mutex::new(None));
    let sink = result.clone();
    worker
        .submit(move || {
            *sink.lock() = Some(main.invoke_blocking(|| 1));
        })
        .unwrap();
    assert!(worker.stop_and_join());

    assert!(matches!(
        result.lock().take(),
        Some(Err(CoreError::MainQueueClosed))
    ));
}

#[test]
fn test_jobs_run_in_submission_order() {
    init_tracing();
    let worker = Worker::spawn(WorkerConfig::default().queue_capacity(16)).unwrap();
    let next = Arc::new(AtomicUsize::new(0));
    let out_of_order = Arc::new(AtomicUsize::new(0));

    for expected in 0..10 {
        let next = next.clone();
        let out_of_order = out_of_order.clone();
        worker
            .submit(move || {
                if next.fetch_add(1, Ordering::SeqCst) != expected {
                    out_of_order.fetch_add(1, Ordering::SeqCst);
                }
            })
            .unwrap();
    }

    assert!(worker.stop_and_join());
    assert_eq!(next.load(Ordering::SeqCst), 10);
    assert_eq!(out_of_order.load(Ordering::SeqCst), 0);
}
