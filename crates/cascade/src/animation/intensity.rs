//! Caller-clocked driver for a single intensity value in `[0, 1]`.
//!
//! The driver never reads a clock. Every call that advances or changes the
//! animation takes the host's current [`Instant`], which keeps it
//! deterministic under test and lets the host tie it to its own frame clock.

use std::time::{Duration, Instant};

use super::easing::Easing;

/// Duration used by [`IntensityAnimator::set_intensity`] when animated.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(300);

/// Lifecycle of the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimatorState {
    /// Holding a value, nothing in flight.
    #[default]
    Idle,
    /// Interpolating towards a target.
    Animating,
    /// In flight but frozen, e.g. while the host is in the background.
    Paused,
    /// Halted mid-flight by [`IntensityAnimator::stop`].
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Run {
    from: f32,
    to: f32,
    duration: Duration,
    easing: Easing,
    /// Start of the current unpaused segment.
    segment_start: Instant,
    /// Progress accumulated before the current segment.
    carried: Duration,
}

impl Run {
    fn elapsed(&self, now: Instant) -> Duration {
        self.carried + now.saturating_duration_since(self.segment_start)
    }

    fn progress(&self, now: Instant) -> f32 {
        self.elapsed(now).as_secs_f32() / self.duration.as_secs_f32()
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// Animates one intensity value, such as a blur strength.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityAnimator {
    value: f32,
    state: AnimatorState,
    run: Option<Run>,
}

impl Default for IntensityAnimator {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl IntensityAnimator {
    pub fn new(initial: f32) -> Self {
        Self {
            value: clamp_unit(initial),
            state: AnimatorState::Idle,
            run: None,
        }
    }

    /// The most recently computed value.
    #[inline]
    pub fn intensity(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn state(&self) -> AnimatorState {
        self.state
    }

    /// Target of the animation in flight, if any.
    pub fn target(&self) -> Option<f32> {
        self.run.map(|run| run.to)
    }

    pub fn is_animating(&self) -> bool {
        self.state == AnimatorState::Animating
    }

    /// Move to `value`, over [`DEFAULT_DURATION`] when `animated`.
    pub fn set_intensity(&mut self, value: f32, animated: bool, now: Instant) {
        let duration = if animated { DEFAULT_DURATION } else { Duration::ZERO };
        self.start(None, value, duration, Easing::Linear, now);
    }

    /// Animate from `from` (the current value when `None`) to `to`.
    ///
    /// Replaces any animation in flight. A zero duration, or equal endpoints,
    /// jumps straight to `to`.
    pub fn start(
        &mut self,
        from: Option<f32>,
        to: f32,
        duration: Duration,
        easing: Easing,
        now: Instant,
    ) {
        let from = from.map_or(self.value, clamp_unit);
        let to = clamp_unit(to);

        if duration.is_zero() || from == to {
            self.value = to;
            self.run = None;
            self.state = AnimatorState::Idle;
            tracing::trace!(target: "cascade::animation", to, "intensity set");
            return;
        }

        self.value = from;
        self.run = Some(Run {
            from,
            to,
            duration,
            easing,
            segment_start: now,
            carried: Duration::ZERO,
        });
        self.state = AnimatorState::Animating;
        tracing::trace!(
            target: "cascade::animation",
            from,
            to,
            duration_ms = duration.as_millis() as u64,
            ?easing,
            "intensity animation started"
        );
    }

    /// Advance to `now` and return the current value.
    pub fn tick(&mut self, now: Instant) -> f32 {
        if self.state != AnimatorState::Animating {
            return self.value;
        }
        let Some(run) = self.run else {
            self.state = AnimatorState::Idle;
            return self.value;
        };

        let progress = run.progress(now);
        if progress >= 1.0 {
            self.value = run.to;
            self.run = None;
            self.state = AnimatorState::Idle;
            tracing::trace!(target: "cascade::animation", value = run.to, "intensity animation finished");
        } else {
            self.value = clamp_unit(run.easing.interpolate(run.from, run.to, progress));
        }
        self.value
    }

    /// Halt the animation at its current value.
    ///
    /// Returns the value it froze at, or `None` if nothing was in flight.
    pub fn stop(&mut self, now: Instant) -> Option<f32> {
        match self.state {
            AnimatorState::Animating => {
                self.tick(now);
                // The tick may have completed the run.
                if self.state == AnimatorState::Idle {
                    return Some(self.value);
                }
            }
            AnimatorState::Paused => {}
            AnimatorState::Idle | AnimatorState::Stopped => return None,
        }

        self.run = None;
        self.state = AnimatorState::Stopped;
        tracing::trace!(target: "cascade::animation", value = self.value, "intensity animation stopped");
        Some(self.value)
    }

    /// Jump to the target of the animation in flight and return it.
    pub fn finish(&mut self) -> Option<f32> {
        let run = self.run.take()?;
        self.value = run.to;
        self.state = AnimatorState::Idle;
        Some(run.to)
    }

    /// Freeze progress, e.g. when the host goes to the background.
    pub fn pause(&mut self, now: Instant) {
        if self.state != AnimatorState::Animating {
            return;
        }
        self.tick(now);
        if let Some(run) = self.run.as_mut() {
            run.carried = run.elapsed(now);
            self.state = AnimatorState::Paused;
        }
    }

    /// Continue a paused animation with its remaining duration.
    pub fn resume(&mut self, now: Instant) {
        if self.state != AnimatorState::Paused {
            return;
        }
        if let Some(run) = self.run.as_mut() {
            run.segment_start = now;
            self.state = AnimatorState::Animating;
        }
    }
}

static_assertions::assert_impl_all!(IntensityAnimator: Send, Sync);
