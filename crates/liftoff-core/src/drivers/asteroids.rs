use std::f64::consts::PI;

use tracing::info;

use super::fade::{distance_fade, near_fade};
use super::{FrameContext, VisualDriver};
use crate::camera::Camera;
use crate::config::AsteroidConfig;
use crate::error::{Error, Result};
use crate::physics::{BodyDesc, BodyId, PhysicsWorld};
use crate::scene::{DQuat, DVec2, DVec3, SceneFrame, Sprite};

use glam::EulerRot;

/// Pointer position projected onto the plane `distance` in front of the camera
pub fn pointer_at_depth(camera: &Camera, pointer: DVec2, distance: f64) -> DVec2 {
    // pointer Y grows downward, world Y grows upward
    pointer * DVec2::new(1.0, -1.0) * camera.half_extent(distance)
}

/// Radial push away from the pointer within `radius`, with no Z component.
///
/// Magnitude is `strength × (1 − dist/radius)²`; `None` outside the radius
/// or exactly under the pointer.
pub fn repulsion_force(item: DVec3, pointer: DVec2, radius: f64, strength: f64) -> Option<DVec3> {
    let offset = item.truncate() - pointer;
    let dist = offset.length();
    if dist >= radius || dist <= 0.0 {
        return None;
    }
    let magnitude = strength * (1.0 - dist / radius).powi(2);
    Some((offset / dist * magnitude).extend(0.0))
}

#[derive(Debug, Clone, Copy)]
struct Rock {
    body: BodyId,
    size: f64,
    shade: f64,
}

/// Drifting asteroids pushed around by the pointer; integration is left to the physics world
pub struct AsteroidField {
    config: AsteroidConfig,
    physics: Box<dyn PhysicsWorld>,
    rocks: Vec<Rock>,
    rng: fastrand::Rng,
}

impl AsteroidField {
    pub fn new(config: AsteroidConfig, physics: Box<dyn PhysicsWorld>, rng: fastrand::Rng) -> Self {
        let mut field = Self {
            config,
            physics,
            rocks: Vec::new(),
            rng,
        };
        for _ in 0..field.config.count {
            let position = DVec3::new(
                (field.rng.f64() - 0.5) * field.config.spread_x,
                (field.rng.f64() - 0.5) * field.config.spread_y,
                -field.config.z_near - field.rng.f64() * field.config.z_depth,
            );
            let size = field.config.size_min
                + field.rng.f64() * (field.config.size_max - field.config.size_min);
            field.spawn_rock(position, size);
        }
        info!(count = field.rocks.len(), "Physics asteroids created");
        field
    }

    /// Add one asteroid body at `position`
    pub fn spawn_rock(&mut self, position: DVec3, size: f64) {
        let spin = 0.1 + self.rng.f64() * 0.8;
        let desc = BodyDesc {
            position,
            orientation: DQuat::from_euler(
                EulerRot::XYZ,
                self.rng.f64() * PI,
                self.rng.f64() * PI,
                self.rng.f64() * PI,
            ),
            radius: size * 0.8,
            mass: size * 0.5,
            linear_damping: self.config.linear_damping,
            angular_damping: self.config.angular_damping,
            angular_velocity: DVec3::new(
                (self.rng.f64() - 0.5) * spin,
                (self.rng.f64() - 0.5) * spin,
                (self.rng.f64() - 0.5) * spin,
            ),
        };
        let body = self.physics.add_body(desc);
        let shade = 0.35 + self.rng.f64() * 0.4;
        self.rocks.push(Rock { body, size, shade });
    }

    pub fn len(&self) -> usize {
        self.rocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rocks.is_empty()
    }

    fn opacity(&self, distance: f64) -> f64 {
        distance_fade(distance, self.config.fade_start, self.config.fade_end)
            * near_fade(distance, self.config.near_fade_start, self.config.near_fade_end)
    }
}

impl VisualDriver for AsteroidField {
    fn update(&mut self, ctx: &FrameContext<'_>, scene: &mut SceneFrame) -> Result<()> {
        let pointer = DVec2::new(ctx.pointer.smoothed_x, ctx.pointer.smoothed_y);

        for rock in &self.rocks {
            let state = self
                .physics
                .body(rock.body)
                .ok_or_else(|| Error::Physics(format!("asteroid body {} missing", rock.body.0)))?;
            let distance = ctx.camera.z - state.position.z;
            if distance <= 0.0 {
                continue;
            }
            let at_depth = pointer_at_depth(ctx.camera, pointer, distance);
            if let Some(force) = repulsion_force(
                state.position,
                at_depth,
                self.config.repel_radius,
                self.config.repel_strength,
            ) {
                self.physics.apply_force(rock.body, force)?;
            }
        }

        self.physics.step(self.config.physics_dt);

        for rock in &self.rocks {
            let Some(state) = self.physics.body(rock.body) else {
                continue;
            };
            let distance = ctx.camera.z - state.position.z;
            scene.asteroids.push(Sprite {
                position: state.position,
                size: rock.size,
                opacity: self.opacity(distance),
                spin: state.orientation.to_euler(EulerRot::XYZ).2,
                shade: rock.shade,
            });
        }
        Ok(())
    }

    fn destroy(&mut self) {
        for rock in self.rocks.drain(..) {
            // body may already be gone if the world was reset
            let _ = self.physics.remove_body(rock.body);
        }
        info!("Asteroids destroyed");
    }
}
