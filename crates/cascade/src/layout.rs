//! The layout facade consumed by a rendering host.
//!
//! [`WaterfallLayout`] owns two passes: `live`, the pass currently shown, and
//! `previous`, the pass that was live at the last commit. A host drives it in
//! cycles:
//!
//! 1. `prepare(item_count)` computes (or adopts) the live pass.
//! 2. For an animated update: `notify_update`, `begin_transition`, then any
//!    number of `initial_attributes_for_appearing` /
//!    `final_attributes_for_disappearing` queries.
//! 3. `commit()` rolls live into previous and forgets the batch.
//!
//! Passes can also be computed off the primary thread with
//! [`WaterfallLayout::compute_async`]; the result is staged and picked up by
//! the next `prepare`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use cascade::prelude::*;
//!
//! let queue = MainQueue::new();
//! let delegate = SimpleDelegate::new(LayoutParameters::new(2), |_, width| width);
//! let mut layout = WaterfallLayout::new(Arc::new(delegate), queue.handle());
//! layout.set_viewport_size(Size::new(200.0, 400.0));
//!
//! layout.prepare(5);
//! layout.commit();
//!
//! layout.notify_update(&[UpdateItem::delete(2)]);
//! layout.prepare(4);
//! layout.begin_transition();
//! let gone = layout.final_attributes_for_disappearing(2).unwrap();
//! assert_eq!(gone.alpha, 0.0);
//! layout.commit();
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

use cascade_core::logging::span_names;
use cascade_core::{MainHandle, PerfSpan, ThreadAffinity, Worker, WorkerConfig};

use crate::attributes::LayoutAttributes;
use crate::batch::{UpdateBatch, UpdateItem};
use crate::error::Result;
use crate::geometry::{Rect, Size};
use crate::params::{LayoutDelegate, LayoutParameters};
use crate::placement::{LayoutPass, compute_layout};
use crate::staging::{Generations, StageOutcome, StagedLayout, StagingSlot};
use crate::transition::Transition;

/// Primary-context inputs read by every pass.
struct LayoutSource {
    delegate: Arc<dyn LayoutDelegate>,
    viewport: Mutex<Size>,
}

impl LayoutSource {
    fn read(&self) -> (LayoutParameters, f32) {
        (self.delegate.parameters(), self.viewport.lock().width)
    }
}

/// Column-balanced waterfall layout.
///
/// Must be created and used on the primary context, the thread that drains
/// the [`MainQueue`](cascade_core::MainQueue) behind `main`.
pub struct WaterfallLayout {
    source: Arc<LayoutSource>,
    main: MainHandle,
    affinity: ThreadAffinity,
    live: Arc<LayoutPass>,
    previous: Arc<LayoutPass>,
    batch: UpdateBatch,
    transition: Option<Transition>,
    staging: StagingSlot,
    generations: Arc<Generations>,
    /// Newest request generation at the last synchronous pass.
    sync_watermark: u64,
    worker: Option<Worker>,
    worker_config: WorkerConfig,
}

impl std::fmt::Debug for WaterfallLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaterfallLayout")
            .field("viewport", &*self.source.viewport.lock())
            .field("live_items", &self.live.item_count())
            .field("previous_items", &self.previous.item_count())
            .field("in_transition", &self.transition.is_some())
            .field("staged", &self.staging.staged_generation())
            .finish_non_exhaustive()
    }
}

impl WaterfallLayout {
    /// Create a layout on the primary context.
    pub fn new(delegate: Arc<dyn LayoutDelegate>, main: MainHandle) -> Self {
        Self {
            source: Arc::new(LayoutSource {
                delegate,
                viewport: Mutex::new(Size::ZERO),
            }),
            main,
            affinity: ThreadAffinity::current(),
            live: Arc::new(LayoutPass::empty()),
            previous: Arc::new(LayoutPass::empty()),
            batch: UpdateBatch::new(),
            transition: None,
            staging: StagingSlot::new(),
            generations: Arc::new(Generations::new()),
            sync_watermark: 0,
            worker: None,
            worker_config: WorkerConfig::default(),
        }
    }

    /// Configure the background worker. Takes effect if the worker has not
    /// been spawned yet.
    pub fn with_worker_config(mut self, config: WorkerConfig) -> Self {
        self.worker_config = config;
        self
    }

    /// Set the viewport size used by subsequent passes.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.affinity.debug_assert_same_thread("set_viewport_size");
        *self.source.viewport.lock() = size;
    }

    pub fn viewport_size(&self) -> Size {
        *self.source.viewport.lock()
    }

    /// The delegate supplying parameters and heights.
    pub fn delegate(&self) -> &Arc<dyn LayoutDelegate> {
        &self.source.delegate
    }

    /// Produce the live pass for `item_count` items.
    ///
    /// Adopts the staged async pass instead when it belongs to the newest
    /// request and no synchronous pass has run since that request was
    /// issued. The staging slot is empty afterwards either way.
    pub fn prepare(&mut self, item_count: usize) {
        self.affinity.debug_assert_same_thread("prepare");

        if let Some(staged) = self.staging.take() {
            let newest = self.generations.is_latest(staged.generation);
            if newest && staged.generation > self.sync_watermark {
                if staged.pass.item_count() != item_count {
                    tracing::debug!(
                        target: "cascade::staging",
                        staged = staged.pass.item_count(),
                        requested = item_count,
                        "adopting async layout with a different item count"
                    );
                }
                tracing::debug!(
                    target: "cascade::staging",
                    generation = staged.generation,
                    "async layout adopted"
                );
                self.live = staged.pass;
                return;
            }
            tracing::debug!(
                target: "cascade::staging",
                generation = staged.generation,
                "discarding stale async layout"
            );
        }

        let (params, viewport_width) = self.source.read();
        let delegate = &self.source.delegate;
        let pass = compute_layout(params, viewport_width, item_count, |index, width| {
            delegate.height_for_item(index, width)
        });
        self.live = Arc::new(pass);
        self.sync_watermark = self.generations.latest();
    }

    /// Compute a pass on the background worker.
    ///
    /// Parameters and viewport width are read on the primary context through
    /// a blocking hop, so the host must keep draining its
    /// [`MainQueue`](cascade_core::MainQueue). Heights come from `height_fn`,
    /// which runs on the worker. When the pass is done it is published on the
    /// primary context and `on_complete` is called there with the outcome.
    ///
    /// Returns the request generation. Issuing a request supersedes every
    /// request still in flight.
    pub fn compute_async<H, C>(
        &mut self,
        item_count: usize,
        height_fn: H,
        on_complete: C,
    ) -> Result<u64>
    where
        H: FnMut(usize, f32) -> f32 + Send + 'static,
        C: FnOnce(StageOutcome) + Send + 'static,
    {
        self.affinity.debug_assert_same_thread("compute_async");
        let worker = ensure_worker(&mut self.worker, &self.worker_config)?;

        let generation = self.generations.next();
        let source = Arc::clone(&self.source);
        let main = self.main.clone();
        let staging = self.staging.clone();
        let generations = Arc::clone(&self.generations);

        let job = move || {
            let _span = PerfSpan::new(span_names::ASYNC_LAYOUT);

            let (params, viewport_width) = match main.invoke_blocking(move || source.read()) {
                Ok(inputs) => inputs,
                Err(err) => {
                    tracing::warn!(
                        target: "cascade::staging",
                        generation,
                        %err,
                        "abandoning async layout"
                    );
                    return;
                }
            };

            let pass = Arc::new(compute_layout(params, viewport_width, item_count, height_fn));
            let publish = main.post(move || {
                let outcome = staging.publish(&generations, StagedLayout { generation, pass });
                on_complete(outcome);
            });
            if let Err(err) = publish {
                tracing::warn!(
                    target: "cascade::staging",
                    generation,
                    %err,
                    "could not publish async layout"
                );
            }
        };

        worker.submit(job)?;

        tracing::debug!(
            target: "cascade::staging",
            generation,
            item_count,
            "async layout dispatched"
        );
        Ok(generation)
    }

    /// Whether an async pass is waiting for the next `prepare`.
    pub fn has_staged_layout(&self) -> bool {
        self.staging.is_occupied()
    }

    /// Live attributes intersecting `rect`. Touching edges count.
    pub fn attributes_in_rect(&self, rect: Rect) -> Vec<LayoutAttributes> {
        self.live.attributes_in_rect(rect)
    }

    /// Live attributes of one item.
    pub fn attributes_for_item(&self, index: usize) -> Option<LayoutAttributes> {
        self.live.attributes_for(index).copied()
    }

    /// Scrollable content size of the live pass.
    pub fn content_size(&self) -> Size {
        self.live.content_size()
    }

    /// The pass currently shown.
    pub fn live_pass(&self) -> &Arc<LayoutPass> {
        &self.live
    }

    /// The pass that was live at the last commit.
    pub fn previous_pass(&self) -> &Arc<LayoutPass> {
        &self.previous
    }

    /// Record structural changes for the next transition.
    pub fn notify_update(&mut self, items: &[UpdateItem]) {
        self.affinity.debug_assert_same_thread("notify_update");
        self.batch.notify(items);
    }

    /// The changes recorded since the last commit.
    pub fn batch(&self) -> &UpdateBatch {
        &self.batch
    }

    /// Start answering transition queries for the recorded batch.
    ///
    /// Call after `prepare` has produced the post-update pass.
    pub fn begin_transition(&mut self) {
        self.affinity.debug_assert_same_thread("begin_transition");
        self.transition = Some(Transition::begin(
            Arc::clone(&self.previous),
            Arc::clone(&self.live),
            &self.batch,
        ));
    }

    pub fn is_in_transition(&self) -> bool {
        self.transition.is_some()
    }

    /// Start state of the item at `index` in the live pass.
    ///
    /// Outside a transition this is the item's live attributes.
    pub fn initial_attributes_for_appearing(&self, index: usize) -> Option<LayoutAttributes> {
        match &self.transition {
            Some(transition) => transition.initial_for_appearing(&self.batch, index),
            None => self.attributes_for_item(index),
        }
    }

    /// End state of the item at `index` in the previous pass.
    ///
    /// Outside a transition this is the item's previous attributes.
    pub fn final_attributes_for_disappearing(&self, index: usize) -> Option<LayoutAttributes> {
        match &self.transition {
            Some(transition) => transition.final_for_disappearing(&self.batch, index),
            None => self.previous.attributes_for(index).copied(),
        }
    }

    /// Finish the current cycle: live becomes previous, the batch, offsets
    /// and any staged pass are dropped.
    pub fn commit(&mut self) {
        self.affinity.debug_assert_same_thread("commit");
        self.previous = Arc::clone(&self.live);
        self.batch.reset();
        self.transition = None;
        self.staging.clear();
        tracing::trace!(
            target: "cascade::transition",
            items = self.live.item_count(),
            "layout committed"
        );
    }
}

/// The running worker in `slot`, spawning a fresh one if there is none.
fn ensure_worker<'a>(slot: &'a mut Option<Worker>, config: &WorkerConfig) -> Result<&'a Worker> {
    let worker = match slot.take() {
        Some(worker) if worker.is_running() => worker,
        _ => Worker::spawn(config.clone())?,
    };
    Ok(slot.insert(worker))
}

impl Drop for WaterfallLayout {
    fn drop(&mut self) {
        if let Some(worker) = &self.worker {
            worker.stop();
        }
    }
}

static_assertions::assert_impl_all!(WaterfallLayout: Send);
