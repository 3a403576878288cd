//! Tests for background layout passes and staging.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use cascade::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn layout(queue: &MainQueue) -> WaterfallLayout {
    // Synchronous passes produce 10pt items; async passes use their own heights.
    let delegate = SimpleDelegate::new(LayoutParameters::new(2), |_, _| 10.0);
    let mut layout = WaterfallLayout::new(Arc::new(delegate), queue.handle())
        .with_worker_config(WorkerConfig::with_name("cascade-test-layout"));
    layout.set_viewport_size(Size::new(100.0, 100.0));
    layout
}

/// Drain the primary queue until `done` holds or the deadline passes.
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
fn test_only_newest_request_is_adopted() {
    init_tracing();
    let queue = MainQueue::new();
    let mut layout = layout(&queue);
    let outcomes = Arc::new(Mutex::new(Vec::new()));

    let sink = outcomes.clone();
    let first = layout
        .compute_async(3, |_, _| 11.0, move |outcome| sink.lock().push(outcome))
        .unwrap();
    let sink = outcomes.clone();
    let second = layout
        .compute_async(6, |_, _| 22.0, move |outcome| sink.lock().push(outcome))
        .unwrap();
    assert!(second > first);

    assert!(pump_until(&queue, || outcomes.lock().len() == 2));
    assert_eq!(
        *outcomes.lock(),
        vec![
            StageOutcome::Superseded { generation: first },
            StageOutcome::Staged { generation: second },
        ]
    );

    assert!(layout.has_staged_layout());
    layout.prepare(6);
    assert!(!layout.has_staged_layout());

    let live = layout.live_pass();
    assert_eq!(live.item_count(), 6);
    assert_eq!(live.attributes()[0].frame.height(), 22.0);
}

#[test]
fn test_async_pass_reads_parameters_on_primary_thread() {
    let queue = MainQueue::new();
    let mut layout = layout(&queue);
    let item_widths = Arc::new(Mutex::new(Vec::new()));

    let widths = item_widths.clone();
    let done = Arc::new(Mutex::new(false));
    let flag = done.clone();
    layout
        .compute_async(
            2,
            move |_, width| {
                widths.lock().push(width);
                width
            },
            move |_| *flag.lock() = true,
        )
        .unwrap();

    assert!(pump_until(&queue, || *done.lock()));
    // Viewport 100, two columns, no margins
    assert_eq!(*item_widths.lock(), vec![50.0, 50.0]);
}

#[test]
fn test_synchronous_pass_skips_older_async_result() {
    let queue = MainQueue::new();
    let mut layout = layout(&queue);
    let done = Arc::new(Mutex::new(None));

    let sink = done.clone();
    layout
        .compute_async(4, |_, _| 33.0, move |outcome| *sink.lock() = Some(outcome))
        .unwrap();

    // A synchronous pass runs before the worker result arrives
    layout.prepare(4);
    assert!(pump_until(&queue, || done.lock().is_some()));
    assert!(layout.has_staged_layout());

    layout.prepare(4);
    assert!(!layout.has_staged_layout());
    assert_eq!(layout.live_pass().attributes()[0].frame.height(), 10.0);
}

#[test]
fn test_commit_drops_staged_result() {
    let queue = MainQueue::new();
    let mut layout = layout(&queue);
    let done = Arc::new(Mutex::new(false));

    let flag = done.clone();
    layout
        .compute_async(1, |_, _| 5.0, move |_| *flag.lock() = true)
        .unwrap();
    assert!(pump_until(&queue, || *done.lock()));
    assert!(layout.has_staged_layout());

    layout.commit();
    assert!(!layout.has_staged_layout());
}

#[test]
fn test_live_pass_stays_readable_while_async_runs() {
    let queue = MainQueue::new();
    let mut layout = layout(&queue);
    layout.prepare(2);
    let stale = layout.live_pass().clone();

    let done = Arc::new(Mutex::new(false));
    let flag = done.clone();
    layout
        .compute_async(8, |_, _| 1.0, move |_| *flag.lock() = true)
        .unwrap();

    // The host keeps rendering the stale pass until it calls prepare
    assert_eq!(layout.attributes_in_rect(Rect::new(0.0, 0.0, 100.0, 100.0)).len(), 2);
    assert!(pump_until(&queue, || *done.lock()));
    assert!(Arc::ptr_eq(layout.live_pass(), &stale));

    layout.prepare(8);
    assert_eq!(layout.live_pass().item_count(), 8);
}

#[test]
fn test_async_recovers_after_panicking_height_fn() {
    init_tracing();
    let queue = MainQueue::new();
    let mut layout = layout(&queue);

    layout
        .compute_async(1, |_, _| panic!("host height callback failed"), |_| {})
        .unwrap();
    // Serve the parameter read so the failing job runs to its panic
    queue.wait_and_process(Duration::from_secs(1));

    let done = Arc::new(Mutex::new(None));
    let sink = done.clone();
    let generation = layout
        .compute_async(1, |_, _| 5.0, move |outcome| *sink.lock() = Some(outcome))
        .unwrap();

    assert!(pump_until(&queue, || done.lock().is_some()));
    assert_eq!(*done.lock(), Some(StageOutcome::Staged { generation }));

    layout.prepare(1);
    assert_eq!(layout.live_pass().attributes()[0].frame.height(), 5.0);
}
