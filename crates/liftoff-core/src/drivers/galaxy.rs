use std::f64::consts::TAU;

use tracing::info;

use super::{FrameContext, VisualDriver};
use crate::assets::{AssetSlot, Texture};
use crate::config::GalaxyConfig;
use crate::error::Result;
use crate::motion::timing::smoothstep;
use crate::scene::{DVec3, GalaxyView, SceneFrame};

/// Edge fade of the galaxy plane at UV coordinates
pub fn radial_fade(u: f64, v: f64) -> f64 {
    let dist = ((u - 0.5).powi(2) + (v - 0.5).powi(2)).sqrt();
    1.0 - smoothstep(0.2, 0.5, dist)
}

/// Two-armed logarithmic spiral used when no galaxy image is configured
pub fn procedural_galaxy(size: u32, seed: u64) -> Result<Texture> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let size = size.max(8);
    let mut pixels = Vec::with_capacity((size * size) as usize);
    for y in 0..size {
        for x in 0..size {
            let u = x as f64 / (size - 1) as f64 - 0.5;
            let v = y as f64 / (size - 1) as f64 - 0.5;
            let r = (u * u + v * v).sqrt();
            let theta = v.atan2(u);

            let arm = ((theta * 2.0 - r.max(1e-3).ln() * 4.0).rem_euclid(TAU) - std::f64::consts::PI).abs()
                / std::f64::consts::PI;
            let arm_glow = arm.powi(6) * (-r * 5.0).exp();
            let core = (-r * r * 120.0).exp();
            let dust = rng.f64() * 0.08 * (-r * 4.0).exp();
            let intensity = (arm_glow + core + dust).clamp(0.0, 1.0);

            let red = (intensity * 235.0 + core * 20.0).min(255.0) as u8;
            let green = (intensity * 205.0).min(255.0) as u8;
            let blue = (intensity * 255.0).min(255.0) as u8;
            pixels.push([red, green, blue, (intensity * 255.0) as u8]);
        }
    }
    Texture::from_pixels(size, size, pixels)
}

/// Distant rotating galaxy that keeps its distance from the camera
pub struct Galaxy {
    config: GalaxyConfig,
    texture: AssetSlot<Texture>,
    rotation: f64,
    announced: bool,
}

impl Galaxy {
    pub fn new(config: GalaxyConfig, texture: AssetSlot<Texture>) -> Self {
        Self {
            config,
            texture,
            rotation: 0.0,
            announced: false,
        }
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }
}

impl VisualDriver for Galaxy {
    fn update(&mut self, ctx: &FrameContext<'_>, scene: &mut SceneFrame) -> Result<()> {
        let Some(texture) = self.texture.poll() else {
            return Ok(());
        };
        if !self.announced {
            info!(width = texture.width(), height = texture.height(), "Galaxy added to scene");
            self.announced = true;
        }

        self.rotation += self.config.rotation_speed;
        scene.galaxy = Some(GalaxyView {
            position: DVec3::new(0.0, 0.0, self.config.z - ctx.camera.travel),
            size: self.config.size,
            opacity: self.config.opacity,
            rotation: self.rotation,
            texture,
        });
        Ok(())
    }
}
