//! Scroll-driven perspective camera

use crate::config::{CameraConfig, SequenceConfig};
use crate::scene::{DQuat, DVec2, DVec3};
use crate::sequence::{compute_section, SectionSequence};

const NEAR: f64 = 0.1;

/// A point projected to normalized device coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// [-1, 1] left to right
    pub x: f64,
    /// [-1, 1] top to bottom
    pub y: f64,
    pub distance: f64,
    /// World units per NDC unit at this distance (half the visible height)
    pub half_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub z: f64,
    pub fov_deg: f64,
    pub aspect: f64,
    pub far: f64,
    /// Distance travelled from the start position
    pub travel: f64,
}

impl Camera {
    /// Visible height of the frustum at `distance` in front of the camera
    pub fn visible_height(&self, distance: f64) -> f64 {
        2.0 * distance * (self.fov_deg.to_radians() / 2.0).tan()
    }

    pub fn visible_width(&self, distance: f64) -> f64 {
        self.visible_height(distance) * self.aspect
    }

    /// Half extents of the frustum cross-section at `distance`
    pub fn half_extent(&self, distance: f64) -> DVec2 {
        DVec2::new(self.visible_width(distance), self.visible_height(distance)) / 2.0
    }

    /// Project a world point, applying the world group rotation first
    pub fn project(&self, point: DVec3, world_rotation: DQuat) -> Option<Projection> {
        let p = world_rotation * point;
        let distance = self.z - p.z;
        if distance <= NEAR || distance > self.far {
            return None;
        }
        let half = self.half_extent(distance);
        let ndc = p.truncate() / half;
        Some(Projection {
            x: ndc.x,
            y: -ndc.y,
            distance,
            half_height: half.y,
        })
    }
}

/// Moves the camera forward through cumulative section depth
#[derive(Debug, Clone)]
pub struct CameraRig {
    start_z: f64,
    fov_deg: f64,
    far: f64,
    /// Travel between section i and i + 1
    intervals: Vec<f64>,
}

impl CameraRig {
    pub fn new(config: &CameraConfig, sequence_config: &SequenceConfig, sequence: &SectionSequence) -> Self {
        let n = sequence.len();
        let intervals = sequence
            .sections()
            .iter()
            .take(n.saturating_sub(1))
            .map(|s| sequence_config.section_depth * s.depth_multiplier)
            .collect();
        Self {
            start_z: config.start_z,
            fov_deg: config.fov_deg,
            far: config.far,
            intervals,
        }
    }

    pub fn total_depth(&self) -> f64 {
        self.intervals.iter().sum()
    }

    /// Depth at which a section starts
    pub fn section_depth(&self, index: usize) -> f64 {
        self.intervals.iter().take(index).sum()
    }

    /// Travelled depth for a progress value
    pub fn depth_at(&self, progress: f64) -> f64 {
        let pos = compute_section(progress, self.intervals.len() + 1);
        let within = self
            .intervals
            .get(pos.index)
            .map_or(0.0, |len| len * pos.progress);
        self.section_depth(pos.index) + within
    }

    pub fn camera(&self, progress: f64, aspect: f64) -> Camera {
        let travel = self.depth_at(progress);
        Camera {
            z: self.start_z - travel,
            fov_deg: self.fov_deg,
            aspect,
            far: self.far,
            travel,
        }
    }

    pub fn start_z(&self) -> f64 {
        self.start_z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn rig() -> CameraRig {
        let config = AppConfig::default();
        let seq = SectionSequence::from_config(&config.sequence).unwrap();
        CameraRig::new(&config.camera, &config.sequence, &seq)
    }

    #[test]
    fn test_depth_uses_multipliers() {
        let rig = rig();
        // THE CREW spends 1.5x the travel of the others
        assert_eq!(rig.total_depth(), 4500.0);
        assert_eq!(rig.section_depth(3), 3500.0);
        assert_eq!(rig.depth_at(0.0), 0.0);
        assert_eq!(rig.depth_at(1.0), 4500.0);
        assert!((rig.depth_at(0.625) - 2750.0).abs() < 1e-6);
    }

    #[test]
    fn test_depth_is_monotonic() {
        let rig = rig();
        let mut prev = -1.0;
        for i in 0..=200 {
            let d = rig.depth_at(i as f64 / 200.0);
            assert!(d >= prev);
            prev = d;
        }
    }

    #[test]
    fn test_camera_starts_at_configured_z() {
        let cam = rig().camera(0.0, 1.5);
        assert_eq!(cam.z, 100.0);
        assert_eq!(cam.fov_deg, 75.0);
    }

    #[test]
    fn test_projection() {
        let cam = rig().camera(0.0, 2.0);
        let center = cam.project(DVec3::new(0.0, 0.0, -100.0), DQuat::IDENTITY).unwrap();
        assert_eq!((center.x, center.y), (0.0, 0.0));
        assert_eq!(center.distance, 200.0);

        let half_h = cam.visible_height(200.0) / 2.0;
        let top_right = cam
            .project(DVec3::new(half_h * 2.0, half_h, -100.0), DQuat::IDENTITY)
            .unwrap();
        assert!((top_right.x - 1.0).abs() < 1e-9);
        assert!((top_right.y + 1.0).abs() < 1e-9);

        assert!(cam.project(DVec3::new(0.0, 0.0, 150.0), DQuat::IDENTITY).is_none());
    }
}
