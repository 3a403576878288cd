//! Transitional attributes for appearing and disappearing items.
//!
//! A [`Transition`] is created when the host starts animating a batch of
//! updates and lives until commit. It answers two questions: where does an
//! item in the new pass start from, and where does an item of the old pass
//! end up. Whole-section reloads answer by seat; explicit inserts, deletes
//! and reloads answer per index with an opacity change.

use std::sync::Arc;

use crate::attributes::LayoutAttributes;
use crate::batch::UpdateBatch;
use crate::differ::ColumnOffsets;
use crate::placement::LayoutPass;

/// Stacking order of appearing items during a seat-matched reload.
pub const APPEARING_Z_INDEX: i32 = 1;
/// Stacking order of disappearing items during a seat-matched reload.
pub const DISAPPEARING_Z_INDEX: i32 = 0;

/// How transitional attributes are derived.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionMode {
    /// Whole-section reload with matching column counts.
    SeatMatched(ColumnOffsets),
    /// Explicit per-index updates.
    PerIndex,
    /// Whole-section reload across a column count change. Every index is
    /// treated as reloaded.
    AllReloaded,
}

/// Transition state between `begin_transition` and `commit`.
#[derive(Debug, Clone)]
pub struct Transition {
    previous: Arc<LayoutPass>,
    current: Arc<LayoutPass>,
    mode: TransitionMode,
}

impl Transition {
    /// Plan a transition from `previous` to `current` for `batch`.
    pub fn begin(previous: Arc<LayoutPass>, current: Arc<LayoutPass>, batch: &UpdateBatch) -> Self {
        let mode = if batch.is_whole_section_reload() {
            match ColumnOffsets::diff(previous.grid(), current.grid(), current.params()) {
                Some(offsets) => TransitionMode::SeatMatched(offsets),
                None => TransitionMode::AllReloaded,
            }
        } else {
            TransitionMode::PerIndex
        };

        tracing::debug!(
            target: "cascade::transition",
            mode = mode.name(),
            previous_items = previous.item_count(),
            current_items = current.item_count(),
            "transition started"
        );

        Self {
            previous,
            current,
            mode,
        }
    }

    #[inline]
    pub fn mode(&self) -> &TransitionMode {
        &self.mode
    }

    /// Starting attributes for the item at `index` of the current pass.
    pub fn initial_for_appearing(&self, batch: &UpdateBatch, index: usize) -> Option<LayoutAttributes> {
        match &self.mode {
            TransitionMode::SeatMatched(offsets) => {
                appearing_by_seat(&self.previous, &self.current, offsets, index)
            }
            TransitionMode::PerIndex => appearing_by_index(&self.current, batch, index, false),
            TransitionMode::AllReloaded => appearing_by_index(&self.current, batch, index, true),
        }
    }

    /// Ending attributes for the item at `index` of the previous pass.
    pub fn final_for_disappearing(&self, batch: &UpdateBatch, index: usize) -> Option<LayoutAttributes> {
        match &self.mode {
            TransitionMode::SeatMatched(offsets) => {
                disappearing_by_seat(&self.previous, &self.current, offsets, index)
            }
            TransitionMode::PerIndex => disappearing_by_index(&self.previous, batch, index, false),
            TransitionMode::AllReloaded => {
                disappearing_by_index(&self.previous, batch, index, true)
            }
        }
    }
}

impl TransitionMode {
    fn name(&self) -> &'static str {
        match self {
            Self::SeatMatched(_) => "seat-matched",
            Self::PerIndex => "per-index",
            Self::AllReloaded => "all-reloaded",
        }
    }
}

/// Seat-matched start state: the previous occupant's frame, or the current
/// frame shifted to its synthesized start y.
pub fn appearing_by_seat(
    previous: &LayoutPass,
    current: &LayoutPass,
    offsets: &ColumnOffsets,
    index: usize,
) -> Option<LayoutAttributes> {
    let seat = current.grid().seat_of(index)?;
    let live = current.grid().attributes_at(seat)?;

    let frame = match previous.grid().attributes_at(seat) {
        Some(before) => before.frame,
        None => match offsets.appearing_initial_y(seat) {
            Some(y) => live.frame.with_y(y),
            None => live.frame,
        },
    };

    Some(
        live.with_frame(frame)
            .with_alpha(0.0)
            .with_z_index(APPEARING_Z_INDEX),
    )
}

/// Seat-matched end state: the new occupant's frame, or the previous frame
/// shifted to its synthesized end y.
pub fn disappearing_by_seat(
    previous: &LayoutPass,
    current: &LayoutPass,
    offsets: &ColumnOffsets,
    index: usize,
) -> Option<LayoutAttributes> {
    let seat = previous.grid().seat_of(index)?;
    let before = previous.grid().attributes_at(seat)?;

    let frame = match current.grid().attributes_at(seat) {
        Some(after) => after.frame,
        None => match offsets.disappearing_final_y(seat) {
            Some(y) => before.frame.with_y(y),
            None => before.frame,
        },
    };

    Some(
        before
            .with_frame(frame)
            .with_alpha(0.0)
            .with_z_index(DISAPPEARING_Z_INDEX),
    )
}

/// Per-index start state, based on the live attributes at `index`.
pub fn appearing_by_index(
    current: &LayoutPass,
    batch: &UpdateBatch,
    index: usize,
    all_reloaded: bool,
) -> Option<LayoutAttributes> {
    let base = *current.attributes_for(index)?;
    let alpha = if batch.is_inserted(index) {
        Some(0.0)
    } else if batch.is_deleted(index) || all_reloaded || batch.is_reloaded(index) {
        Some(1.0)
    } else {
        None
    };
    Some(alpha.map_or(base, |alpha| base.with_alpha(alpha)))
}

/// Per-index end state, based on the previous attributes at `index`.
pub fn disappearing_by_index(
    previous: &LayoutPass,
    batch: &UpdateBatch,
    index: usize,
    all_reloaded: bool,
) -> Option<LayoutAttributes> {
    let base = *previous.attributes_for(index)?;
    let alpha = if batch.is_inserted(index) {
        Some(1.0)
    } else if batch.is_deleted(index) || all_reloaded || batch.is_reloaded(index) {
        Some(0.0)
    } else {
        None
    };
    Some(alpha.map_or(base, |alpha| base.with_alpha(alpha)))
}
