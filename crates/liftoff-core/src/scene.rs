//! Per-frame scene description handed to the render surface

use std::sync::Arc;

use crate::assets::Texture;
use crate::camera::Camera;

pub use glam::{DQuat, DVec2, DVec3};

use glam::EulerRot;

/// Orientation of the world group from Euler angles applied in XYZ order
pub fn world_orientation(x: f64, y: f64, z: f64) -> DQuat {
    DQuat::from_euler(EulerRot::XYZ, x, y, z)
}

/// A point-like item in world space (star, asteroid)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub position: DVec3,
    pub size: f64,
    pub opacity: f64,
    /// Spin around the view axis, radians
    pub spin: f64,
    /// Base brightness in [0, 1]
    pub shade: f64,
}

#[derive(Debug, Clone)]
pub struct GalaxyView {
    pub position: DVec3,
    pub size: f64,
    pub opacity: f64,
    pub rotation: f64,
    pub texture: Arc<Texture>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphView {
    pub ch: char,
    pub opacity: f64,
    /// Remaining fraction of the rise offset
    pub rise: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub label: String,
    pub opacity: f64,
    /// Approach progress in [0, 1]
    pub approach: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingView {
    pub title: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentView {
    pub section: usize,
    pub title: Vec<GlyphView>,
    pub subtitle: Vec<GlyphView>,
    pub opacity: f64,
    /// Parallax offset in virtual pixels
    pub offset_x: f64,
    pub offset_y: f64,
    /// Steering tilt, degrees
    pub tilt_deg: f64,
    pub items: Vec<ItemView>,
    pub upcoming: Option<UpcomingView>,
    /// Last section uses its own layout
    pub is_final: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStatus {
    Upcoming,
    Active,
    Passed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    pub index: usize,
    pub label: String,
    pub progress: f64,
    pub status: MarkerStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Smoke,
    Debris,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleView {
    pub kind: ParticleKind,
    /// Track position in [0, 1]
    pub progress: f64,
    /// Sideways offset from the track, in cells
    pub offset: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelDirection {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RocketMode {
    AtRest,
    Traveling(TravelDirection),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorView {
    pub rocket_progress: f64,
    pub mode: RocketMode,
    pub flame_visible: bool,
    pub markers: Vec<MarkerView>,
    pub particles: Vec<ParticleView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreloaderView {
    pub logo: String,
    pub progress: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DebugInfo {
    pub scroll_percent: f64,
    pub world_z: f64,
    pub mouse_x: f64,
    pub mouse_y: f64,
}

impl DebugInfo {
    pub fn line(&self) -> String {
        format!(
            "Scroll: {}% | Z: {} | Mouse: {:.2}, {:.2}",
            self.scroll_percent.round(),
            self.world_z.round(),
            self.mouse_x,
            self.mouse_y
        )
    }
}

/// Everything the surface needs to draw one frame
#[derive(Debug, Clone)]
pub struct SceneFrame {
    pub frame: u64,
    pub camera: Camera,
    /// Rotation of the world group (parallax steering)
    pub world_rotation: DQuat,
    /// Whole-scene fade-in
    pub scene_opacity: f64,
    /// Global starfield brightness
    pub star_brightness: f64,
    pub stars: Vec<Sprite>,
    pub asteroids: Vec<Sprite>,
    pub galaxy: Option<GalaxyView>,
    pub content: Option<ContentView>,
    pub indicator: Option<IndicatorView>,
    pub preloader: Option<PreloaderView>,
    pub debug: DebugInfo,
}

impl SceneFrame {
    pub fn new(frame: u64, camera: Camera) -> Self {
        Self {
            frame,
            camera,
            world_rotation: DQuat::IDENTITY,
            scene_opacity: 0.0,
            star_brightness: 1.0,
            stars: Vec::new(),
            asteroids: Vec::new(),
            galaxy: None,
            content: None,
            indicator: None,
            preloader: None,
            debug: DebugInfo::default(),
        }
    }
}
