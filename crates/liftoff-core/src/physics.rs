//! Rigid-body seam used by the asteroid field
//!
//! The asteroid driver only talks to [`PhysicsWorld`]. [`DriftWorld`] is a
//! minimal zero-gravity solver that ships as the default: forces, linear and
//! angular damping, and sphere contacts found by a naive all-pairs broadphase.

use glam::{DQuat, DVec3};

use crate::error::{Error, Result};

/// Bounciness of sphere contacts
const RESTITUTION: f64 = 0.3;

/// Contact resolution passes per substep
const SOLVER_ITERATIONS: usize = 5;

/// Upper bound on substeps when bodies move fast relative to their size
const MAX_SUBSTEPS: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub position: DVec3,
    pub orientation: DQuat,
    /// Collision sphere radius
    pub radius: f64,
    /// Zero makes the body immovable
    pub mass: f64,
    pub linear_damping: f64,
    pub angular_damping: f64,
    pub angular_velocity: DVec3,
}

/// Readout of a body after a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: DVec3,
    pub orientation: DQuat,
    pub velocity: DVec3,
}

pub trait PhysicsWorld: Send {
    fn add_body(&mut self, desc: BodyDesc) -> BodyId;

    fn remove_body(&mut self, id: BodyId) -> Result<()>;

    /// Accumulate a force applied at the body's center of mass until the next step
    fn apply_force(&mut self, id: BodyId, force: DVec3) -> Result<()>;

    fn step(&mut self, dt: f64);

    fn body(&self, id: BodyId) -> Option<BodyState>;

    fn body_count(&self) -> usize;
}

#[derive(Debug, Clone)]
struct Body {
    desc: BodyDesc,
    position: DVec3,
    orientation: DQuat,
    velocity: DVec3,
    angular_velocity: DVec3,
    force: DVec3,
}

impl Body {
    fn inverse_mass(&self) -> f64 {
        if self.desc.mass > 0.0 {
            1.0 / self.desc.mass
        } else {
            0.0
        }
    }

    fn integrate(&mut self, dt: f64) {
        self.velocity += self.force * self.inverse_mass() * dt;
        // damping as a per-second fraction
        self.velocity *= (1.0 - self.desc.linear_damping).clamp(0.0, 1.0).powf(dt);
        self.angular_velocity *= (1.0 - self.desc.angular_damping).clamp(0.0, 1.0).powf(dt);

        self.position += self.velocity * dt;
        self.orientation =
            (DQuat::from_scaled_axis(self.angular_velocity * dt) * self.orientation).normalize();
    }
}

/// Push two overlapping spheres apart and bounce them if they are closing.
/// Returns whether they were in contact.
fn resolve_contact(a: &mut Body, b: &mut Body) -> bool {
    let offset = b.position - a.position;
    let reach = a.desc.radius + b.desc.radius;
    if offset.length_squared() >= reach * reach {
        return false;
    }
    let (inv_a, inv_b) = (a.inverse_mass(), b.inverse_mass());
    let inv_sum = inv_a + inv_b;
    if inv_sum <= 0.0 {
        return false;
    }

    let distance = offset.length();
    let normal = offset.try_normalize().unwrap_or(DVec3::X);
    let correction = normal * ((reach - distance) / inv_sum);
    a.position -= correction * inv_a;
    b.position += correction * inv_b;

    let closing = (b.velocity - a.velocity).dot(normal);
    if closing < 0.0 {
        let impulse = normal * (-(1.0 + RESTITUTION) * closing / inv_sum);
        a.velocity -= impulse * inv_a;
        b.velocity += impulse * inv_b;
    }
    true
}

/// Semi-implicit Euler integrator with sphere contacts
#[derive(Debug, Default)]
pub struct DriftWorld {
    bodies: Vec<Option<Body>>,
}

impl DriftWorld {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_mut(&mut self, id: BodyId) -> Result<&mut Body> {
        self.bodies
            .get_mut(id.0 as usize)
            .and_then(Option::as_mut)
            .ok_or_else(|| Error::Physics(format!("unknown body {}", id.0)))
    }

    /// Enough substeps that no body moves further than its own radius in one
    fn substeps(&self, dt: f64) -> u32 {
        let worst = self
            .bodies
            .iter()
            .flatten()
            .filter(|b| b.desc.radius > 0.0)
            .map(|b| {
                let speed = b.velocity.length() + b.force.length() * b.inverse_mass() * dt;
                speed * dt / b.desc.radius
            })
            .fold(0.0, f64::max);
        (worst.ceil() as u32).clamp(1, MAX_SUBSTEPS)
    }

    fn resolve_contacts(&mut self) {
        for _ in 0..SOLVER_ITERATIONS {
            let mut touching = false;
            for j in 1..self.bodies.len() {
                let (head, tail) = self.bodies.split_at_mut(j);
                let Some(b) = tail[0].as_mut() else {
                    continue;
                };
                for a in head.iter_mut().flatten() {
                    touching |= resolve_contact(a, b);
                }
            }
            if !touching {
                break;
            }
        }
    }
}

impl PhysicsWorld for DriftWorld {
    fn add_body(&mut self, desc: BodyDesc) -> BodyId {
        let id = BodyId(self.bodies.len() as u32);
        self.bodies.push(Some(Body {
            desc,
            position: desc.position,
            orientation: desc.orientation,
            velocity: DVec3::ZERO,
            angular_velocity: desc.angular_velocity,
            force: DVec3::ZERO,
        }));
        id
    }

    fn remove_body(&mut self, id: BodyId) -> Result<()> {
        match self.bodies.get_mut(id.0 as usize) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                Ok(())
            }
            _ => Err(Error::Physics(format!("unknown body {}", id.0))),
        }
    }

    fn apply_force(&mut self, id: BodyId, force: DVec3) -> Result<()> {
        let body = self.get_mut(id)?;
        body.force += force;
        Ok(())
    }

    fn step(&mut self, dt: f64) {
        let substeps = self.substeps(dt);
        let sub_dt = dt / substeps as f64;
        for _ in 0..substeps {
            for body in self.bodies.iter_mut().flatten() {
                body.integrate(sub_dt);
            }
            self.resolve_contacts();
        }
        for body in self.bodies.iter_mut().flatten() {
            body.force = DVec3::ZERO;
        }
    }

    fn body(&self, id: BodyId) -> Option<BodyState> {
        self.bodies
            .get(id.0 as usize)
            .and_then(Option::as_ref)
            .map(|b| BodyState {
                position: b.position,
                orientation: b.orientation,
                velocity: b.velocity,
            })
    }

    fn body_count(&self) -> usize {
        self.bodies.iter().flatten().count()
    }
}
