//! Prelude module for Cascade.
//!
//! ```
//! use cascade::prelude::*;
//! ```
//!
//! Brings in the layout facade, its inputs and outputs, and the primary-queue
//! plumbing a host needs to drive async passes.

// ============================================================================
// Layout
// ============================================================================

pub use crate::layout::WaterfallLayout;
pub use crate::placement::{LayoutPass, compute_layout};

// ============================================================================
// Inputs and Outputs
// ============================================================================

pub use crate::attributes::LayoutAttributes;
pub use crate::batch::{UpdateAction, UpdateItem};
pub use crate::geometry::{EdgeInsets, Point, Rect, Size};
pub use crate::params::{LayoutDelegate, LayoutParameters, SimpleDelegate};
pub use crate::staging::StageOutcome;

// ============================================================================
// Threading
// ============================================================================

pub use cascade_core::{MainHandle, MainQueue, WorkerConfig};
