use tracing::info;

use super::fade::cyclic_opacity;
use super::{FrameContext, VisualDriver};
use crate::config::StarfieldConfig;
use crate::error::Result;
use crate::scene::{DVec3, SceneFrame, Sprite};

#[derive(Debug, Clone)]
struct Star {
    position: DVec3,
    size: f64,
    /// Loop time of birth, seconds
    born: f64,
    /// Lifecycle length, seconds
    period: f64,
}

/// Twinkling stars that live one sine half-period each and respawn around the camera
#[derive(Debug)]
pub struct Starfield {
    config: StarfieldConfig,
    stars: Vec<Star>,
    rng: fastrand::Rng,
}

impl Starfield {
    pub fn new(config: StarfieldConfig, rng: fastrand::Rng) -> Self {
        Self {
            config,
            stars: Vec::new(),
            rng,
        }
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    fn random_period(&mut self) -> f64 {
        let base = self.config.twinkle_ms as f64 / 1000.0;
        let variance = self.config.twinkle_variance_ms as f64 / 1000.0;
        (base + (self.rng.f64() * 2.0 - 1.0) * variance).max(0.1)
    }

    fn spawn(&mut self, camera_z: f64, now: f64) -> Star {
        let spread = self.config.spread;
        let position = DVec3::new(
            (self.rng.f64() - 0.5) * spread,
            (self.rng.f64() - 0.5) * spread,
            camera_z - self.config.near - self.rng.f64() * self.config.depth,
        );
        let size = self.config.size_min + self.rng.f64() * (self.config.size_max - self.config.size_min);
        Star {
            position,
            size,
            born: now,
            period: self.random_period(),
        }
    }

    fn populate(&mut self, camera_z: f64, now: f64) {
        for _ in 0..self.config.count {
            let mut star = self.spawn(camera_z, now);
            // random phase so the field does not pulse in unison
            star.born = now - self.rng.f64() * star.period;
            self.stars.push(star);
        }
        info!(count = self.stars.len(), "Starfield created");
    }
}

impl VisualDriver for Starfield {
    fn update(&mut self, ctx: &FrameContext<'_>, scene: &mut SceneFrame) -> Result<()> {
        let now = ctx.elapsed.as_secs_f64();
        let camera_z = ctx.camera.z;
        if self.stars.is_empty() && self.config.count > 0 {
            self.populate(camera_z, now);
        }

        scene.star_brightness = 0.95 + now.sin() * 0.05;

        for i in 0..self.stars.len() {
            let expired = {
                let star = &self.stars[i];
                now - star.born >= star.period || star.position.z >= camera_z
            };
            if expired {
                self.stars[i] = self.spawn(camera_z, now);
            }
        }

        scene.stars.extend(self.stars.iter().map(|star| Sprite {
            position: star.position,
            size: star.size,
            opacity: cyclic_opacity(now - star.born, star.period),
            spin: 0.0,
            shade: 1.0,
        }));
        Ok(())
    }

    fn destroy(&mut self) {
        self.stars.clear();
        info!("Starfield destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FrameFixture;
    use std::time::Duration;

    fn config() -> StarfieldConfig {
        StarfieldConfig {
            count: 50,
            ..Default::default()
        }
    }

    #[test]
    fn test_spawns_in_front_of_camera() {
        let mut fixture = FrameFixture::new();
        let mut field = Starfield::new(config(), fastrand::Rng::with_seed(7));
        let scene = fixture.run(&mut field, 0.0, Duration::ZERO);
        assert_eq!(scene.stars.len(), 50);
        let cam_z = scene.camera.z;
        for star in &scene.stars {
            assert!(star.position.z <= cam_z - 200.0);
            assert!(star.position.z >= cam_z - 2000.0);
            assert!((0.0..=1.0).contains(&star.opacity));
        }
    }

    #[test]
    fn test_stars_respawn_near_the_moving_camera() {
        let mut fixture = FrameFixture::new();
        let mut field = Starfield::new(config(), fastrand::Rng::with_seed(7));
        fixture.run(&mut field, 0.0, Duration::ZERO);

        // fly to the end; every star is behind or expired after a long time
        let scene = fixture.run(&mut field, 1.0, Duration::from_secs(60));
        let cam_z = scene.camera.z;
        assert!(cam_z < -4000.0);
        for star in &scene.stars {
            assert!(star.position.z < cam_z);
        }
    }

    #[test]
    fn test_global_twinkle_range() {
        let mut fixture = FrameFixture::new();
        let mut field = Starfield::new(config(), fastrand::Rng::with_seed(1));
        for s in 0..20 {
            let scene = fixture.run(&mut field, 0.0, Duration::from_millis(s * 450));
            assert!((0.9..=1.0).contains(&scene.star_brightness));
        }
    }

    #[test]
    fn test_destroy_releases_items() {
        let mut fixture = FrameFixture::new();
        let mut field = Starfield::new(config(), fastrand::Rng::with_seed(3));
        fixture.run(&mut field, 0.0, Duration::ZERO);
        field.destroy();
        assert!(field.is_empty());
    }
}
