//! Per-item layout output.

use crate::geometry::Rect;

/// Declarative geometry for one item.
///
/// Produced for every item of a pass, and synthesized for the initial and
/// final states of items that appear or disappear during a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutAttributes {
    /// Index of the item in the host's sequence.
    pub index: usize,
    /// Position and size.
    pub frame: Rect,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
    /// Stacking order; higher draws on top.
    pub z_index: i32,
}

impl LayoutAttributes {
    /// Fully opaque attributes at the base stacking level.
    pub fn new(index: usize, frame: Rect) -> Self {
        Self {
            index,
            frame,
            alpha: 1.0,
            z_index: 0,
        }
    }

    /// Return a copy with the given opacity, clamped to `[0, 1]`.
    #[inline]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    /// Return a copy with the given stacking order.
    #[inline]
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Return a copy with a different frame.
    #[inline]
    pub fn with_frame(mut self, frame: Rect) -> Self {
        self.frame = frame;
        self
    }
}
