//! Greedy shortest-column placement.
//!
//! Items are placed in index order, each into the column that is currently
//! shortest (lowest column index on ties). The row margin is only inserted
//! above an item when its column already holds something, so no column starts
//! with a leading gap. The pass is a pure function of its inputs: identical
//! parameters, viewport width, item count and heights always produce identical
//! output.
//!
//! # Example
//!
//! ```
//! use cascade::params::LayoutParameters;
//! use cascade::placement::compute_layout;
//!
//! let heights = [10.0, 10.0, 10.0, 10.0];
//! let pass = compute_layout(LayoutParameters::new(3), 30.0, heights.len(), |i, _| heights[i]);
//!
//! // Items 0..3 take one column each, item 3 wraps to column 0.
//! assert_eq!(pass.attributes()[3].frame.origin.x, 0.0);
//! assert_eq!(pass.attributes()[3].frame.origin.y, 10.0);
//! ```

use cascade_core::PerfSpan;
use cascade_core::logging::span_names;

use crate::attributes::LayoutAttributes;
use crate::geometry::{Rect, Size};
use crate::params::LayoutParameters;
use crate::snapshot::GridSnapshot;

/// The complete output of one placement pass.
///
/// Published behind an `Arc` and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPass {
    params: LayoutParameters,
    viewport_width: f32,
    item_width: f32,
    grid: GridSnapshot,
    attributes: Vec<LayoutAttributes>,
    content_size: Size,
}

impl LayoutPass {
    /// A pass with no columns and no items.
    pub fn empty() -> Self {
        Self {
            params: LayoutParameters::default(),
            viewport_width: 0.0,
            item_width: 0.0,
            grid: GridSnapshot::empty(),
            attributes: Vec::new(),
            content_size: Size::ZERO,
        }
    }

    /// The sanitized parameters this pass was computed with.
    #[inline]
    pub fn params(&self) -> &LayoutParameters {
        &self.params
    }

    /// Viewport width the pass was computed for.
    #[inline]
    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    /// Width shared by every item.
    #[inline]
    pub fn item_width(&self) -> f32 {
        self.item_width
    }

    /// The grid snapshot.
    #[inline]
    pub fn grid(&self) -> &GridSnapshot {
        &self.grid
    }

    /// Attributes in item index order.
    #[inline]
    pub fn attributes(&self) -> &[LayoutAttributes] {
        &self.attributes
    }

    /// Attributes of a single item.
    #[inline]
    pub fn attributes_for(&self, index: usize) -> Option<&LayoutAttributes> {
        self.attributes.get(index)
    }

    /// Number of items laid out.
    #[inline]
    pub fn item_count(&self) -> usize {
        self.attributes.len()
    }

    /// Scrollable content size: viewport width by tallest column plus the
    /// bottom inset.
    #[inline]
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Every item whose frame intersects `rect`, in index order.
    ///
    /// A linear scan; item counts here do not warrant a spatial index.
    pub fn attributes_in_rect(&self, rect: Rect) -> Vec<LayoutAttributes> {
        self.attributes
            .iter()
            .filter(|attrs| attrs.frame.intersects(&rect))
            .copied()
            .collect()
    }
}

impl Default for LayoutPass {
    fn default() -> Self {
        Self::empty()
    }
}

/// Place `item_count` items into columns.
///
/// `height_fn(index, item_width)` is called exactly once per item, in index
/// order. Negative (or NaN) heights are treated as zero.
pub fn compute_layout<F>(
    params: LayoutParameters,
    viewport_width: f32,
    item_count: usize,
    mut height_fn: F,
) -> LayoutPass
where
    F: FnMut(usize, f32) -> f32,
{
    let _span = PerfSpan::new(span_names::PLACEMENT);

    let params = params.resolved();
    let insets = params.edge_insets;
    let item_width = params.item_width(viewport_width);

    let mut grid = GridSnapshot::with_columns(params.column_count, insets.top);
    let mut attributes = Vec::with_capacity(item_count);

    for index in 0..item_count {
        let Some(column) = grid.shortest_column() else {
            break;
        };
        let column_height = grid.columns()[column].height();

        let x = insets.left + column as f32 * (item_width + params.column_margin);
        let y = if column_height > insets.top {
            column_height + params.row_margin
        } else {
            column_height
        };
        let height = height_fn(index, item_width).max(0.0);

        let attrs = LayoutAttributes::new(index, Rect::new(x, y, item_width, height));
        grid.place(column, attrs);
        attributes.push(attrs);
    }

    let content_height = grid.max_column_height().unwrap_or(insets.top) + insets.bottom;
    let content_size = Size::new(viewport_width.max(0.0), content_height);

    tracing::debug!(
        target: "cascade::placement",
        item_count,
        columns = params.column_count,
        item_width,
        content_height,
        "layout pass complete"
    );

    LayoutPass {
        params,
        viewport_width,
        item_width,
        grid,
        attributes,
        content_size,
    }
}
