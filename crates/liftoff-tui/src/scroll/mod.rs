//! Smooth page scrolling for the terminal scene
//!
//! Wheel notches, scroll keys and marker clicks move a virtual page offset.
//! The offset glides to its target with an exponential ease-out instead of
//! jumping, and the frame loop samples it every tick as the raw scroll input.
//!
//! # Layers
//!
//! ## Atomic
//! - `config` - Duration helpers on top of the core `ScrollConfig`
//! - easing and timing come from `liftoff_core::motion`
//!
//! ## Molecular
//! - `animation` - Animation controller combining atoms

// Atomic
pub mod config;

// Molecular
pub mod animation;

pub use animation::ScrollAnimator;
pub use config::{ScrollConfig, ScrollConfigExt};
pub use liftoff_core::motion::EasingTypeExt;
pub use liftoff_core::EasingType;
