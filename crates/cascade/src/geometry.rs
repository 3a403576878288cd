//! Geometry used by the layout engine.
//!
//! All coordinates are in the host's logical units with y growing downward,
//! so a column's height is also the y-coordinate of its bottom edge.

use serde::{Deserialize, Serialize};

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Width and height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An item frame: top-left origin plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    /// The bottom edge (`y + height`).
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.height
    }

    /// Closed-interval overlap test: rects that only share an edge still
    /// intersect, and so does a zero-height item inside the query rect.
    pub fn intersects(&self, other: &Rect) -> bool {
        let overlaps = |a0: f32, a1: f32, b0: f32, b1: f32| a0 <= b1 && b0 <= a1;
        overlaps(self.left(), self.right(), other.left(), other.right())
            && overlaps(self.top(), self.bottom(), other.top(), other.bottom())
    }

    /// The same frame moved vertically to `y`.
    #[inline]
    pub fn with_y(self, y: f32) -> Rect {
        Rect::new(self.origin.x, y, self.size.width, self.size.height)
    }
}

/// Distance kept clear between the viewport edges and the items.
///
/// Missing keys default to zero when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeInsets {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl EdgeInsets {
    pub const fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Same inset on every side.
    pub const fn uniform(inset: f32) -> Self {
        Self::new(inset, inset, inset, inset)
    }

    pub const ZERO: Self = Self::uniform(0.0);

    /// Width taken from the viewport by the left and right insets.
    #[inline]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }
}
