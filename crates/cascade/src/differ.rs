//! Snapshot diffing for whole-section reloads.
//!
//! When every item reloads, items are matched by [`Seat`] rather than by
//! identity. Seats present in both snapshots animate from one frame to the
//! other. Surplus seats have no counterpart, so the differ invents one: it
//! continues stacking the surplus rows below the other snapshot's column,
//! giving appearing items a start position and disappearing items an end
//! position that line up with the neighbouring column contents.

use std::collections::HashMap;

use cascade_core::PerfSpan;
use cascade_core::logging::span_names;

use crate::params::LayoutParameters;
use crate::snapshot::{Column, GridSnapshot, Seat};

/// Synthesized y-coordinates for seats present in only one snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnOffsets {
    /// Start y for seats only the current snapshot has.
    appearing_initial_y: HashMap<Seat, f32>,
    /// End y for seats only the previous snapshot has.
    disappearing_final_y: HashMap<Seat, f32>,
}

impl ColumnOffsets {
    /// No offsets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute offsets between two snapshots with equal column counts.
    ///
    /// Returns `None` when the column counts differ; the caller then falls
    /// back to per-index transitions.
    pub fn diff(
        previous: &GridSnapshot,
        current: &GridSnapshot,
        params: &LayoutParameters,
    ) -> Option<Self> {
        if previous.column_count() != current.column_count() {
            tracing::debug!(
                target: "cascade::transition",
                previous = previous.column_count(),
                current = current.column_count(),
                "column count changed, skipping snapshot diff"
            );
            return None;
        }

        let _span = PerfSpan::new(span_names::DIFF);
        let top = params.edge_insets.top;
        let mut offsets = Self::new();

        let row_margin = params.row_margin;
        let pairs = previous.columns().iter().zip(current.columns());
        for (column, (before, after)) in pairs.enumerate() {
            if before.row_count() > after.row_count() {
                let out = &mut offsets.disappearing_final_y;
                stack_surplus(column, before, after, top, row_margin, out);
            } else if after.row_count() > before.row_count() {
                let out = &mut offsets.appearing_initial_y;
                stack_surplus(column, after, before, top, row_margin, out);
            }
        }

        tracing::debug!(
            target: "cascade::transition",
            appearing = offsets.appearing_initial_y.len(),
            disappearing = offsets.disappearing_final_y.len(),
            "snapshot diff complete"
        );
        Some(offsets)
    }

    /// Start y for an appearing item at `seat`.
    #[inline]
    pub fn appearing_initial_y(&self, seat: Seat) -> Option<f32> {
        self.appearing_initial_y.get(&seat).copied()
    }

    /// End y for a disappearing item at `seat`.
    #[inline]
    pub fn disappearing_final_y(&self, seat: Seat) -> Option<f32> {
        self.disappearing_final_y.get(&seat).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.appearing_initial_y.is_empty() && self.disappearing_final_y.is_empty()
    }

    /// Drop both caches.
    pub fn clear(&mut self) {
        self.appearing_initial_y.clear();
        self.disappearing_final_y.clear();
    }
}

/// Stack the rows `longer` has beyond `shorter` below `shorter`'s height.
fn stack_surplus(
    column: usize,
    longer: &Column,
    shorter: &Column,
    top: f32,
    row_margin: f32,
    out: &mut HashMap<Seat, f32>,
) {
    let mut height = shorter.height();
    for (row, attrs) in longer.attributes().iter().enumerate().skip(shorter.row_count()) {
        let y = if height > top { height + row_margin } else { height };
        out.insert(Seat::new(column, row), y);
        height = y + attrs.frame.height();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::EdgeInsets;
    use crate::placement::compute_layout;

    fn grid(params: LayoutParameters, heights: &[f32]) -> GridSnapshot {
        compute_layout(params, 100.0, heights.len(), |i, _| heights[i])
            .grid()
            .clone()
    }

    #[test]
    fn test_identical_snapshots_have_no_offsets() {
        let params = LayoutParameters::new(2);
        let before = grid(params, &[10.0, 20.0, 30.0]);
        let after = grid(params, &[10.0, 20.0, 30.0]);

        let offsets = ColumnOffsets::diff(&before, &after, &params).unwrap();
        assert!(offsets.is_empty());
    }

    #[test]
    fn test_mismatched_columns() {
        let before = grid(LayoutParameters::new(2), &[10.0]);
        let after = grid(LayoutParameters::new(3), &[10.0]);

        assert!(ColumnOffsets::diff(&before, &after, &LayoutParameters::new(3)).is_none());
    }

    #[test]
    fn test_surplus_rows_stack_below_other_column() {
        let params = LayoutParameters::new(1)
            .with_row_margin(5.0)
            .with_edge_insets(EdgeInsets::new(10.0, 0.0, 0.0, 0.0));
        // Previous column bottom: 10 + 20 = 30
        let before = grid(params, &[20.0]);
        let after = grid(params, &[20.0, 30.0, 40.0]);

        let offsets = ColumnOffsets::diff(&before, &after, &params).unwrap();
        assert_eq!(offsets.appearing_initial_y(Seat::new(0, 0)), None);
        assert_eq!(offsets.appearing_initial_y(Seat::new(0, 1)), Some(35.0));
        // 35 + 30 + 5
        assert_eq!(offsets.appearing_initial_y(Seat::new(0, 2)), Some(70.0));
        assert_eq!(offsets.disappearing_final_y(Seat::new(0, 1)), None);
    }

    #[test]
    fn test_disappearing_rows_start_at_top_when_column_empties() {
        let params = LayoutParameters::new(2)
            .with_row_margin(4.0)
            .with_edge_insets(EdgeInsets::new(2.0, 0.0, 0.0, 0.0));
        let before = grid(params, &[10.0, 10.0, 10.0]);
        let after = grid(params, &[10.0]);

        let offsets = ColumnOffsets::diff(&before, &after, &params).unwrap();
        // Column 0 had two rows and now has one
        assert_eq!(offsets.disappearing_final_y(Seat::new(0, 1)), Some(16.0));
        // Column 1 is empty now, no leading margin
        assert_eq!(offsets.disappearing_final_y(Seat::new(1, 0)), Some(2.0));
        assert!(offsets.appearing_initial_y(Seat::new(1, 0)).is_none());
    }

    #[test]
    fn test_clear() {
        let params = LayoutParameters::new(1);
        let before = grid(params, &[]);
        let after = grid(params, &[5.0]);

        let mut offsets = ColumnOffsets::diff(&before, &after, &params).unwrap();
        assert!(!offsets.is_empty());
        offsets.clear();
        assert!(offsets.is_empty());
    }
}
