//! Molecular layer: per-frame exponential smoothing
//!
//! Scroll progress eases toward the sampled target with factor `k`. The
//! pointer drives two signals: a smoothed position used for parallax and a
//! "steering" rotation fed by pointer velocity through an inertia
//! accumulator that decays and relaxes back to neutral.

use crate::config::MotionConfig;
use crate::input::InputSampler;

/// Below this distance the progress settles onto its target
const SETTLE_EPSILON: f64 = 1e-6;

/// Smoothed scroll position.
///
/// `current_progress` moves toward `target_progress` by a fraction `k` of the
/// remaining gap each frame and never overshoots it. The one exception to
/// "never reaches the target in a single step" is the settle snap: once the
/// gap left after a step is below `1e-6`, current is set to target exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    pub raw_offset: f64,
    pub target_progress: f64,
    pub current_progress: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub normalized_x: f64,
    pub normalized_y: f64,
    pub smoothed_x: f64,
    pub smoothed_y: f64,
    pub rotation: f64,
    pub inertia: f64,
}

/// Exponential step toward `target`; never overshoots for 0 < k < 1
#[inline]
pub fn smooth_toward(current: f64, target: f64, k: f64) -> f64 {
    current + (target - current) * k
}

/// Frames needed to bring `distance` below `epsilon` with factor `k`
pub fn frames_to_converge(k: f64, distance: f64, epsilon: f64) -> u32 {
    if distance.abs() <= epsilon || k >= 1.0 {
        return 0;
    }
    if k <= 0.0 {
        return u32::MAX;
    }
    ((epsilon / distance.abs()).ln() / (1.0 - k).ln()).ceil() as u32
}

#[derive(Debug, Clone)]
pub struct MotionSmoother {
    config: MotionConfig,
    scroll: ScrollState,
    pointer: PointerState,
    last_pointer_x: f64,
}

impl MotionSmoother {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            scroll: ScrollState::default(),
            pointer: PointerState::default(),
            last_pointer_x: 0.0,
        }
    }

    /// Advance one frame from the latest input sample.
    ///
    /// Progress eases by `k` of the gap, snapping onto the target when the
    /// remaining gap drops below `SETTLE_EPSILON`.
    pub fn advance(&mut self, input: &InputSampler) {
        self.scroll.raw_offset = input.raw_offset();
        self.scroll.target_progress = input.target_progress();
        let next = smooth_toward(
            self.scroll.current_progress,
            self.scroll.target_progress,
            self.config.scroll_smoothing,
        );
        self.scroll.current_progress = if (self.scroll.target_progress - next).abs() < SETTLE_EPSILON {
            self.scroll.target_progress
        } else {
            next.clamp(0.0, 1.0)
        };

        let (x, y) = input.pointer();
        let delta_x = x - self.last_pointer_x;
        self.last_pointer_x = x;

        let p = &mut self.pointer;
        p.normalized_x = x;
        p.normalized_y = y;
        p.smoothed_x = smooth_toward(p.smoothed_x, x, self.config.pointer_smoothing);
        p.smoothed_y = smooth_toward(p.smoothed_y, y, self.config.pointer_smoothing);

        p.inertia += delta_x * self.config.steer_strength;
        p.rotation += p.inertia * self.config.steer_damp;
        p.rotation += (0.0 - p.rotation) * self.config.steer_return;
        p.inertia *= self.config.steer_decay;
    }

    /// Force both scroll fields to zero and drop pointer history
    pub fn reset(&mut self, input: &InputSampler) {
        self.scroll = ScrollState::default();
        let (x, y) = input.pointer();
        self.pointer = PointerState {
            normalized_x: x,
            normalized_y: y,
            smoothed_x: x,
            smoothed_y: y,
            ..Default::default()
        };
        self.last_pointer_x = x;
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// World group rotation (x, y, z) in radians
    pub fn world_rotation(&self) -> (f64, f64, f64) {
        (
            self.pointer.smoothed_y * self.config.tilt_x,
            -self.pointer.smoothed_x * self.config.tilt_y,
            self.pointer.rotation,
        )
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }
}
