//! Scalar animation support.
//!
//! The engine itself never animates; it hands the host declarative start and
//! end states. This module carries the one animated value a waterfall host
//! typically drives alongside it, a blur intensity, as a small state machine
//! the host clocks from its own frame loop.
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use cascade::animation::{AnimatorState, Easing, IntensityAnimator};
//!
//! let start = Instant::now();
//! let mut blur = IntensityAnimator::new(0.0);
//! blur.start(None, 1.0, Duration::from_millis(200), Easing::EaseOut, start);
//!
//! blur.tick(start + Duration::from_millis(100));
//! assert_eq!(blur.state(), AnimatorState::Animating);
//!
//! assert_eq!(blur.tick(start + Duration::from_millis(200)), 1.0);
//! assert_eq!(blur.state(), AnimatorState::Idle);
//! ```

mod easing;
mod intensity;

pub use easing::Easing;
pub use intensity::{AnimatorState, DEFAULT_DURATION, IntensityAnimator};
