//! Opacity curves shared by the visual drivers

use std::f64::consts::PI;

/// 1 up to `start`, falling linearly to 0 at `end`
#[inline]
pub fn distance_fade(distance: f64, start: f64, end: f64) -> f64 {
    if end <= start {
        return if distance <= start { 1.0 } else { 0.0 };
    }
    ((end - distance) / (end - start)).clamp(0.0, 1.0)
}

/// 0 closer than `end`, rising linearly to 1 at `start` (`start > end`)
#[inline]
pub fn near_fade(distance: f64, start: f64, end: f64) -> f64 {
    if start <= end {
        return if distance >= end { 1.0 } else { 0.0 };
    }
    ((distance - end) / (start - end)).clamp(0.0, 1.0)
}

/// Half-sine lifecycle: 0 at birth, 1 at mid-life, 0 at death
#[inline]
pub fn cyclic_opacity(age: f64, period: f64) -> f64 {
    if period <= 0.0 {
        return 0.0;
    }
    (age / period * PI).sin().clamp(0.0, 1.0)
}

/// Delayed progress: 0 until `delay`, then rising to 1 at section end
#[inline]
pub fn staggered_progress(section_progress: f64, delay: f64) -> f64 {
    if delay >= 1.0 {
        return if section_progress >= 1.0 { 1.0 } else { 0.0 };
    }
    ((section_progress - delay) / (1.0 - delay)).clamp(0.0, 1.0)
}

/// Opacity of a text plane by its depth relative to the viewer.
///
/// Invisible far away, fades in on approach, fully visible around the
/// viewer and dims (never below 0.3) once it gets very close.
pub fn depth_band_opacity(effective_z: f64) -> f64 {
    let opacity = if effective_z < -800.0 {
        0.0
    } else if effective_z < -100.0 {
        (effective_z + 800.0) / 700.0
    } else if effective_z <= 300.0 {
        1.0
    } else {
        (1.0 - (effective_z - 300.0) / 500.0).max(0.3)
    };
    opacity.clamp(0.0, 1.0)
}
