//! Layout parameters and the host capability interface.
//!
//! The engine never hardcodes layout constants. A host supplies them through a
//! [`LayoutDelegate`], a small trait of pure accessors whose default methods
//! provide the standard values. Hosts that keep their settings in a config
//! file can deserialize [`LayoutParameters`] from TOML and wrap them in a
//! [`SimpleDelegate`].
//!
//! # Example
//!
//! ```
//! use cascade::params::{LayoutDelegate, LayoutParameters, SimpleDelegate};
//!
//! let params = LayoutParameters::from_toml_str(
//!     r#"
//!     column_count = 2
//!     column_margin = 5.0
//!     row_margin = 5.0
//!
//!     [edge_insets]
//!     top = 49.0
//!     left = 5.0
//!     bottom = 5.0
//!     right = 5.0
//!     "#,
//! )
//! .unwrap();
//!
//! let delegate = SimpleDelegate::new(params, |index, width| width * (1.0 + index as f32 * 0.1));
//! assert_eq!(delegate.parameters().column_count, 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::EdgeInsets;

/// Default number of columns.
pub const DEFAULT_COLUMN_COUNT: usize = 3;
/// Default horizontal gap between columns.
pub const DEFAULT_COLUMN_MARGIN: f32 = 10.0;
/// Default vertical gap between items in a column.
pub const DEFAULT_ROW_MARGIN: f32 = 10.0;
/// Default viewport insets.
pub const DEFAULT_EDGE_INSETS: EdgeInsets = EdgeInsets::uniform(10.0);

/// Column count, spacing and insets for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParameters {
    /// Number of columns. Values below 1 are treated as 1.
    pub column_count: usize,
    /// Horizontal gap between adjacent columns.
    pub column_margin: f32,
    /// Vertical gap between consecutive items in a column.
    pub row_margin: f32,
    /// Insets from the viewport edges.
    pub edge_insets: EdgeInsets,
}

impl Default for LayoutParameters {
    fn default() -> Self {
        Self {
            column_count: DEFAULT_COLUMN_COUNT,
            column_margin: DEFAULT_COLUMN_MARGIN,
            row_margin: DEFAULT_ROW_MARGIN,
            edge_insets: DEFAULT_EDGE_INSETS,
        }
    }
}

impl LayoutParameters {
    /// Parameters with the given column count and no margins or insets.
    pub fn new(column_count: usize) -> Self {
        Self {
            column_count,
            column_margin: 0.0,
            row_margin: 0.0,
            edge_insets: EdgeInsets::ZERO,
        }
    }

    /// Set the gap between columns.
    pub fn with_column_margin(mut self, margin: f32) -> Self {
        self.column_margin = margin;
        self
    }

    /// Set the gap between rows.
    pub fn with_row_margin(mut self, margin: f32) -> Self {
        self.row_margin = margin;
        self
    }

    /// Set the viewport insets.
    pub fn with_edge_insets(mut self, insets: EdgeInsets) -> Self {
        self.edge_insets = insets;
        self
    }

    /// Sanitize the parameters: at least one column, non-negative margins
    /// and insets.
    ///
    /// `f32::max` discards NaN, so a NaN margin or inset also becomes zero.
    pub fn resolved(self) -> Self {
        let insets = self.edge_insets;
        Self {
            column_count: self.column_count.max(1),
            column_margin: self.column_margin.max(0.0),
            row_margin: self.row_margin.max(0.0),
            edge_insets: EdgeInsets::new(
                insets.top.max(0.0),
                insets.left.max(0.0),
                insets.bottom.max(0.0),
                insets.right.max(0.0),
            ),
        }
    }

    /// Width of every item for the given viewport width, never negative.
    pub fn item_width(&self, viewport_width: f32) -> f32 {
        let columns = self.column_count.max(1) as f32;
        let gaps = (columns - 1.0) * self.column_margin;
        ((viewport_width - self.edge_insets.horizontal() - gaps) / columns).max(0.0)
    }

    /// Parse parameters from a TOML document. Missing keys take defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Serialize the parameters as a TOML document.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}

/// Capability interface through which the host configures the layout.
///
/// Every accessor must be a pure read. Accessors are only ever called on the
/// primary context; async passes hop there to read them.
pub trait LayoutDelegate: Send + Sync {
    /// Height of the item at `index` when laid out at `item_width`.
    ///
    /// Negative results are clamped to zero.
    fn height_for_item(&self, index: usize, item_width: f32) -> f32;

    /// Number of columns.
    fn column_count(&self) -> usize {
        DEFAULT_COLUMN_COUNT
    }

    /// Horizontal gap between columns.
    fn column_margin(&self) -> f32 {
        DEFAULT_COLUMN_MARGIN
    }

    /// Vertical gap between items in a column.
    fn row_margin(&self) -> f32 {
        DEFAULT_ROW_MARGIN
    }

    /// Insets from the viewport edges.
    fn edge_insets(&self) -> EdgeInsets {
        DEFAULT_EDGE_INSETS
    }

    /// Read every accessor once and sanitize the result.
    fn parameters(&self) -> LayoutParameters {
        LayoutParameters {
            column_count: self.column_count(),
            column_margin: self.column_margin(),
            row_margin: self.row_margin(),
            edge_insets: self.edge_insets(),
        }
        .resolved()
    }
}

/// A delegate built from fixed parameters and a height closure.
pub struct SimpleDelegate<F> {
    params: LayoutParameters,
    height: F,
}

impl<F> SimpleDelegate<F>
where
    F: Fn(usize, f32) -> f32 + Send + Sync,
{
    /// Create a delegate from parameters and a height function.
    pub fn new(params: LayoutParameters, height: F) -> Self {
        Self { params, height }
    }
}

impl SimpleDelegate<fn(usize, f32) -> f32> {
    /// A delegate whose items are square (height equals item width).
    pub fn square(params: LayoutParameters) -> Self {
        fn square_height(_index: usize, item_width: f32) -> f32 {
            item_width
        }
        Self {
            params,
            height: square_height,
        }
    }
}

impl<F> std::fmt::Debug for SimpleDelegate<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleDelegate")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl<F> LayoutDelegate for SimpleDelegate<F>
where
    F: Fn(usize, f32) -> f32 + Send + Sync,
{
    fn height_for_item(&self, index: usize, item_width: f32) -> f32 {
        (self.height)(index, item_width)
    }

    fn column_count(&self) -> usize {
        self.params.column_count
    }

    fn column_margin(&self) -> f32 {
        self.params.column_margin
    }

    fn row_margin(&self) -> f32 {
        self.params.row_margin
    }

    fn edge_insets(&self) -> EdgeInsets {
        self.params.edge_insets
    }
}
