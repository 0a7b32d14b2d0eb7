//! Visual drivers
//!
//! Each driver owns its items exclusively and turns the read-only frame
//! context into its part of the [`SceneFrame`]. Drivers never see each
//! other; the frame loop composes them and isolates their failures.

pub mod asteroids;
pub mod content;
pub mod fade;
pub mod galaxy;
pub mod indicator;
pub mod starfield;

use std::time::{Duration, Instant};

use crate::camera::Camera;
use crate::error::Result;
use crate::motion::{PointerState, ScrollState};
use crate::scene::SceneFrame;
use crate::sequence::{SectionSequence, SectionView};

pub use asteroids::{repulsion_force, AsteroidField};
pub use content::ContentLayer;
pub use galaxy::{procedural_galaxy, Galaxy};
pub use indicator::ProgressIndicator;
pub use starfield::Starfield;

/// Everything a driver may read during one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub now: Instant,
    /// Time since the previous frame
    pub dt: Duration,
    /// Time since the loop started
    pub elapsed: Duration,
    pub frame: u64,
    pub scroll: &'a ScrollState,
    /// Raw scroll offset change since the previous frame, virtual pixels
    pub scroll_delta: f64,
    pub pointer: &'a PointerState,
    pub section: &'a SectionView,
    pub sequence: &'a SectionSequence,
    pub camera: &'a Camera,
}

pub trait VisualDriver: Send {
    /// Compute this frame's visual parameters into `scene`
    fn update(&mut self, ctx: &FrameContext<'_>, scene: &mut SceneFrame) -> Result<()>;

    /// Release owned items; called when the driver is unregistered
    fn destroy(&mut self) {}
}
