//! Single-slot staging for asynchronously computed passes.
//!
//! Async passes finish on the worker and are published on the primary
//! context into a [`StagingSlot`]. The slot holds at most one pass. Each pass
//! carries the generation of the request that produced it, and only the
//! newest request may publish; anything older is dropped on arrival.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::placement::LayoutPass;

/// A finished async pass waiting for adoption.
#[derive(Debug, Clone)]
pub struct StagedLayout {
    pub generation: u64,
    pub pass: Arc<LayoutPass>,
}

/// What happened to an async result when it reached the primary context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The pass was staged and will be adopted by the next `prepare`.
    Staged { generation: u64 },
    /// A newer request was issued meanwhile; the pass was dropped.
    Superseded { generation: u64 },
}

impl StageOutcome {
    /// Generation of the request this outcome belongs to.
    pub fn generation(&self) -> u64 {
        match *self {
            Self::Staged { generation } | Self::Superseded { generation } => generation,
        }
    }

    pub fn is_staged(&self) -> bool {
        matches!(self, Self::Staged { .. })
    }
}

/// Request counter shared between the layout and its async jobs.
#[derive(Debug, Default)]
pub struct Generations {
    requested: AtomicU64,
}

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next generation.
    pub fn next(&self) -> u64 {
        self.requested.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// The newest generation issued so far (0 before any request).
    pub fn latest(&self) -> u64 {
        self.requested.load(Ordering::Acquire)
    }

    pub fn is_latest(&self, generation: u64) -> bool {
        self.latest() == generation
    }
}

/// The staging slot.
///
/// Cloning shares the slot.
#[derive(Debug, Clone, Default)]
pub struct StagingSlot {
    inner: Arc<Mutex<Option<StagedLayout>>>,
}

impl StagingSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a pass unless a newer request exists.
    ///
    /// Must run on the primary context.
    pub fn publish(&self, generations: &Generations, staged: StagedLayout) -> StageOutcome {
        let generation = staged.generation;
        if !generations.is_latest(generation) {
            tracing::debug!(
                target: "cascade::staging",
                generation,
                latest = generations.latest(),
                "async layout superseded"
            );
            return StageOutcome::Superseded { generation };
        }

        *self.inner.lock() = Some(staged);
        tracing::debug!(target: "cascade::staging", generation, "async layout staged");
        StageOutcome::Staged { generation }
    }

    /// Remove and return the staged pass.
    pub fn take(&self) -> Option<StagedLayout> {
        self.inner.lock().take()
    }

    pub fn clear(&self) {
        self.inner.lock().take();
    }

    pub fn is_occupied(&self) -> bool {
        self.inner.lock().is_some()
    }

    /// Generation of the staged pass, if any.
    pub fn staged_generation(&self) -> Option<u64> {
        self.inner.lock().as_ref().map(|staged| staged.generation)
    }
}

static_assertions::assert_impl_all!(StagingSlot: Send, Sync, Clone);
static_assertions::assert_impl_all!(Generations: Send, Sync);
