//! Cascade - a column-balanced waterfall layout engine.
//!
//! Cascade positions a sequence of variable-height items into a fixed number
//! of columns, always filling the shortest column next, and produces the
//! geometry a host needs to animate structural updates between two passes.
//! It never renders anything: every output is a declarative
//! [`LayoutAttributes`] (frame, opacity, stacking order).
//!
//! # Overview
//!
//! - [`placement`]: the pure placement pass, [`compute_layout`]
//! - [`snapshot`]: per-column item sequences, addressed by [`Seat`]
//! - [`batch`] / [`differ`] / [`transition`]: update tracking and the
//!   start/end states of appearing and disappearing items
//! - [`staging`]: single-slot hand-off for passes computed off-thread
//! - [`layout`]: [`WaterfallLayout`], the facade a host drives
//! - [`animation`]: a caller-clocked intensity driver for blur effects
//!
//! # Example
//!
//! ```
//! use cascade::prelude::*;
//!
//! let params = LayoutParameters::new(3);
//! let heights = [10.0, 10.0, 10.0, 10.0];
//! let pass = compute_layout(params, 30.0, heights.len(), |index, _| heights[index]);
//!
//! let fourth = pass.attributes()[3];
//! assert_eq!((fourth.frame.origin.x, fourth.frame.origin.y), (0.0, 10.0));
//! assert_eq!(pass.content_size(), Size::new(30.0, 20.0));
//! ```

pub mod animation;
pub mod attributes;
pub mod batch;
pub mod differ;
mod error;
pub mod geometry;
pub mod layout;
pub mod params;
pub mod placement;
pub mod prelude;
pub mod snapshot;
pub mod staging;
pub mod transition;

pub use attributes::LayoutAttributes;
pub use batch::{UpdateAction, UpdateBatch, UpdateItem};
pub use error::{LayoutError, Result};
pub use geometry::{EdgeInsets, Point, Rect, Size};
pub use layout::WaterfallLayout;
pub use params::{LayoutDelegate, LayoutParameters, SimpleDelegate};
pub use placement::{LayoutPass, compute_layout};
pub use snapshot::{Column, GridSnapshot, Seat};
pub use staging::{StageOutcome, StagedLayout, StagingSlot};

pub use cascade_core::{MainHandle, MainQueue, WorkerConfig};
