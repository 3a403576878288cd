//! Tests for update transitions driven through `WaterfallLayout`.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use cascade::prelude::*;
use cascade::transition::{APPEARING_Z_INDEX, Transition, TransitionMode};
use cascade::{Seat, UpdateBatch};

/// Host-side data the delegate reads from.
struct Feed {
    heights: Mutex<Vec<f32>>,
    columns: AtomicUsize,
}

impl LayoutDelegate for Feed {
    fn height_for_item(&self, index: usize, _item_width: f32) -> f32 {
        self.heights.lock().get(index).copied().unwrap_or(0.0)
    }

    fn column_count(&self) -> usize {
        self.columns.load(Ordering::Relaxed)
    }

    fn column_margin(&self) -> f32 {
        0.0
    }

    fn row_margin(&self) -> f32 {
        0.0
    }

    fn edge_insets(&self) -> EdgeInsets {
        EdgeInsets::ZERO
    }
}

fn setup(columns: usize, heights: &[f32]) -> (MainQueue, Arc<Feed>, WaterfallLayout) {
    let queue = MainQueue::new();
    let feed = Arc::new(Feed {
        heights: Mutex::new(heights.to_vec()),
        columns: AtomicUsize::new(columns),
    });
    let mut layout = WaterfallLayout::new(feed.clone(), queue.handle());
    layout.set_viewport_size(Size::new(200.0, 600.0));
    layout.prepare(heights.len());
    layout.commit();
    (queue, feed, layout)
}

#[test]
fn test_delete_fades_out_from_previous_frame() {
    let (_queue, feed, mut layout) = setup(2, &[10.0, 20.0, 30.0, 40.0, 50.0]);
    let before = layout.attributes_for_item(2).unwrap();
    assert_eq!(before.frame, Rect::new(0.0, 10.0, 100.0, 30.0));

    feed.heights.lock().remove(2);
    layout.notify_update(&[UpdateItem::delete(2)]);
    layout.prepare(4);
    layout.begin_transition();

    let gone = layout.final_attributes_for_disappearing(2).unwrap();
    assert_eq!(gone.alpha, 0.0);
    assert_eq!(gone.frame, before.frame);

    // The item now at index 2 is the old index 3; it keeps its live geometry
    let moved = layout.initial_attributes_for_appearing(2).unwrap();
    assert_eq!(moved, layout.attributes_for_item(2).unwrap());

    layout.commit();
    assert_eq!(layout.previous_pass().item_count(), 4);
}

#[test]
fn test_insert_fades_in() {
    let (_queue, feed, mut layout) = setup(2, &[10.0, 10.0]);

    feed.heights.lock().insert(0, 25.0);
    layout.notify_update(&[UpdateItem::insert(0)]);
    layout.prepare(3);
    layout.begin_transition();

    let appearing = layout.initial_attributes_for_appearing(0).unwrap();
    assert_eq!(appearing.alpha, 0.0);
    assert_eq!(appearing.frame.height(), 25.0);
}

#[test]
fn test_section_reload_with_identical_data_is_stable() {
    let heights = [12.0, 30.0, 7.0, 18.0, 25.0];
    let (_queue, _feed, mut layout) = setup(3, &heights);
    let previous = layout.previous_pass().clone();

    layout.notify_update(&[UpdateItem::reload_section()]);
    layout.prepare(heights.len());
    layout.begin_transition();

    assert!(layout.batch().is_whole_section_reload());

    for index in 0..heights.len() {
        let initial = layout.initial_attributes_for_appearing(index).unwrap();
        assert_eq!(initial.frame, previous.attributes()[index].frame);
        assert_eq!(initial.alpha, 0.0);
        assert_eq!(initial.z_index, APPEARING_Z_INDEX);

        let fin = layout.final_attributes_for_disappearing(index).unwrap();
        assert_eq!(fin.frame, layout.attributes_for_item(index).unwrap().frame);
    }
}

#[test]
fn test_section_reload_growing_column_stacks_below_old_bottom() {
    let (_queue, feed, mut layout) = setup(1, &[10.0, 10.0]);

    *feed.heights.lock() = vec![5.0, 5.0, 5.0, 5.0];
    layout.notify_update(&[UpdateItem::reload_section()]);
    layout.prepare(4);
    layout.begin_transition();

    // Seats 0 and 1 exist in both passes and start from the old frames
    assert_eq!(layout.initial_attributes_for_appearing(1).unwrap().frame.top(), 10.0);
    // Seats 2 and 3 are new and start below the old column bottom (20)
    assert_eq!(layout.initial_attributes_for_appearing(2).unwrap().frame.top(), 20.0);
    assert_eq!(layout.initial_attributes_for_appearing(3).unwrap().frame.top(), 25.0);
}

#[test]
fn test_section_reload_across_column_change_fades_per_index() {
    let (_queue, feed, mut layout) = setup(2, &[10.0, 10.0, 10.0]);

    feed.columns.store(3, Ordering::Relaxed);
    layout.notify_update(&[UpdateItem::reload_section()]);
    layout.prepare(3);
    layout.begin_transition();

    let initial = layout.initial_attributes_for_appearing(2).unwrap();
    assert_eq!(initial.alpha, 1.0);
    assert_eq!(initial.frame, layout.attributes_for_item(2).unwrap().frame);

    let fin = layout.final_attributes_for_disappearing(2).unwrap();
    assert_eq!(fin.alpha, 0.0);
    assert_eq!(fin.frame, layout.previous_pass().attributes()[2].frame);
}

#[test]
fn test_commit_resets_for_next_cycle() {
    let (_queue, _feed, mut layout) = setup(2, &[10.0, 10.0]);

    layout.notify_update(&[UpdateItem::reload(1)]);
    layout.prepare(2);
    layout.begin_transition();
    assert_eq!(layout.final_attributes_for_disappearing(1).unwrap().alpha, 0.0);
    layout.commit();

    // Without a new batch the next transition changes nothing
    layout.prepare(2);
    layout.begin_transition();
    assert_eq!(layout.final_attributes_for_disappearing(1).unwrap().alpha, 1.0);
    assert_eq!(layout.initial_attributes_for_appearing(1).unwrap().alpha, 1.0);
}

#[test]
fn test_transition_mode_reported() {
    let previous = Arc::new(compute_layout(LayoutParameters::new(2), 20.0, 1, |_, _| 1.0));
    let current = Arc::new(compute_layout(LayoutParameters::new(2), 20.0, 2, |_, _| 1.0));
    let mut batch = UpdateBatch::new();
    batch.record(&UpdateItem::reload_section());

    let transition = Transition::begin(previous, current, &batch);
    match transition.mode() {
        TransitionMode::SeatMatched(offsets) => {
            assert_eq!(offsets.appearing_initial_y(Seat::new(1, 0)), Some(0.0));
        }
        other => panic!("unexpected mode {other:?}"),
    }
}
