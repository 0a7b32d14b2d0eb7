//! Molecular layer: page offset animation controller
//!
//! Combines easing curves and timing utilities to glide the page offset.
//! Time is passed in by the caller so the controller stays deterministic.

use std::time::{Duration, Instant};

use liftoff_core::motion::timing::{is_complete_at, lerp, progress_at};

use super::config::{ScrollConfig, ScrollConfigExt};
use super::{EasingType, EasingTypeExt};

/// Active scroll animation state
#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Instant,
    from: f64,
    to: f64,
    duration: Duration,
    easing: EasingType,
}

/// Page offset animation controller
///
/// Call `scroll_by()` / `scroll_to()` from input handlers, then `update()`
/// once per frame to get the current interpolated offset.
#[derive(Debug, Clone, Default)]
pub struct ScrollAnimator {
    animation: Option<ActiveAnimation>,
    config: ScrollConfig,
    /// Current page offset, virtual pixels
    current: f64,
    /// Pending delta for batching multiple scroll events within one frame
    pending_delta: f64,
}

impl ScrollAnimator {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            animation: None,
            config,
            current: 0.0,
            pending_delta: 0.0,
        }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Whether there is work left (animation or pending delta)
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.animation.is_some() || self.pending_delta != 0.0
    }

    /// Final offset once the running animation completes
    pub fn target(&self) -> f64 {
        self.animation.as_ref().map_or(self.current, |a| a.to)
    }

    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Set the offset immediately (no animation)
    pub fn set_offset(&mut self, offset: f64) {
        self.animation = None;
        self.current = offset;
        self.pending_delta = 0.0;
    }

    /// Start gliding to `target`; jumps straight there when smoothing is off
    pub fn scroll_to(&mut self, target: f64, max: f64, now: Instant) {
        let target = target.clamp(0.0, max.max(0.0));
        self.pending_delta = 0.0;

        if !self.config.is_smooth() {
            self.current = target;
            self.animation = None;
            return;
        }

        if (self.current - target).abs() < f64::EPSILON {
            self.animation = None;
            return;
        }

        self.start(self.current, target, now);
    }

    /// Scroll by a delta (positive = down). Deltas are batched until the next `update`.
    pub fn scroll_by(&mut self, delta: f64, max: f64) {
        if !self.config.is_smooth() {
            self.current = (self.current + delta).clamp(0.0, max.max(0.0));
            self.animation = None;
            return;
        }
        self.pending_delta += delta;
    }

    fn start(&mut self, from: f64, to: f64, now: Instant) {
        self.animation = Some(ActiveAnimation {
            start: now,
            from,
            to,
            duration: self.config.animation_duration(),
            easing: self.config.easing,
        });
    }

    /// Advance the animation and return the current offset
    pub fn update(&mut self, max: f64, now: Instant) -> f64 {
        let max = max.max(0.0);

        // Pending deltas extend the current target, so repeated notches accumulate
        if self.pending_delta != 0.0 {
            let new_target = (self.target() + self.pending_delta).clamp(0.0, max);
            self.pending_delta = 0.0;
            if (new_target - self.current).abs() >= f64::EPSILON {
                self.start(self.current, new_target, now);
            }
        }

        if let Some(anim) = &self.animation {
            if is_complete_at(anim.start, anim.duration, now) {
                self.current = anim.to.min(max);
                self.animation = None;
            } else {
                let t = anim.easing.apply(progress_at(anim.start, anim.duration, now));
                self.current = lerp(anim.from, anim.to, t).min(max);
            }
        }

        self.current
    }

    /// Stop at the current position
    pub fn cancel(&mut self) {
        self.animation = None;
        self.pending_delta = 0.0;
    }

    pub fn reset(&mut self) {
        self.animation = None;
        self.current = 0.0;
        self.pending_delta = 0.0;
    }
}
