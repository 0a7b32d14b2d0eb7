//! Motion primitives shared by the sequencer, the drivers and the TUI scroller
//!
//! # Layers
//!
//! ## Atomic
//! - `easing` - Pure easing curves mapping [0, 1] to [0, 1]
//! - `timing` - Interpolation and time-progress helpers (time is always injected)
//!
//! ## Molecular
//! - `smoother` - Per-frame exponential smoothing of scroll progress and pointer steering

// Atomic
pub mod easing;
pub mod timing;

// Molecular
pub mod smoother;

pub use easing::EasingTypeExt;
pub use smoother::{MotionSmoother, PointerState, ScrollState};
