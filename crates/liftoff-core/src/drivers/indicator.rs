//! Rocket progress indicator
//!
//! The rocket climbs a vertical track with the smoothed progress. Scroll
//! deltas outside a small dead band put it in `Traveling`, which emits a
//! smoke trail whose density follows the recent scroll speed. A short quiet
//! period returns it to rest. Section markers are classified from the
//! current section index alone.

use std::time::{Duration, Instant};

use tracing::debug;

use super::{FrameContext, VisualDriver};
use crate::config::IndicatorConfig;
use crate::error::Result;
use crate::scene::{
    IndicatorView, MarkerStatus, MarkerView, ParticleKind, ParticleView, RocketMode, SceneFrame,
    TravelDirection,
};

#[derive(Debug, Clone, Copy)]
struct Particle {
    kind: ParticleKind,
    born: Instant,
    life: Duration,
    progress: f64,
    offset: f64,
}

/// Marker classification against the current section
pub fn marker_status(marker: usize, current: usize) -> MarkerStatus {
    use std::cmp::Ordering;
    match marker.cmp(&current) {
        Ordering::Equal => MarkerStatus::Active,
        Ordering::Less => MarkerStatus::Passed,
        Ordering::Greater => MarkerStatus::Upcoming,
    }
}

/// Smoke particles per burst for a speed sample
pub fn burst_size(speed: f64, min_burst: usize) -> usize {
    min_burst.max((speed / 10.0).floor() as usize * 3)
}

#[derive(Debug)]
pub struct ProgressIndicator {
    config: IndicatorConfig,
    mode: RocketMode,
    speed: f64,
    last_delta_at: Option<Instant>,
    last_smoke: Option<Instant>,
    last_debris: Option<Instant>,
    particles: Vec<Particle>,
    rng: fastrand::Rng,
}

impl ProgressIndicator {
    pub fn new(config: IndicatorConfig, rng: fastrand::Rng) -> Self {
        Self {
            config,
            mode: RocketMode::AtRest,
            speed: 0.0,
            last_delta_at: None,
            last_smoke: None,
            last_debris: None,
            particles: Vec::new(),
            rng,
        }
    }

    pub fn mode(&self) -> RocketMode {
        self.mode
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Feed one scroll delta (virtual pixels, positive = forward)
    pub fn on_scroll_delta(&mut self, delta: f64, now: Instant) {
        let threshold = self.config.delta_threshold;
        let direction = if delta > threshold {
            TravelDirection::Forward
        } else if delta < -threshold {
            TravelDirection::Backward
        } else {
            return;
        };

        if self.mode != RocketMode::Traveling(direction) {
            debug!(?direction, "Rocket traveling");
        }
        self.mode = RocketMode::Traveling(direction);
        self.speed = match direction {
            TravelDirection::Forward => delta.min(self.config.speed_cap),
            TravelDirection::Backward => 0.0,
        };
        self.last_delta_at = Some(now);
    }

    /// Return to rest once the quiet period has passed
    fn settle(&mut self, now: Instant) {
        if let (RocketMode::Traveling(_), Some(last)) = (self.mode, self.last_delta_at) {
            if now.saturating_duration_since(last) >= Duration::from_millis(self.config.quiet_ms) {
                self.mode = RocketMode::AtRest;
                self.speed = 0.0;
                self.last_smoke = None;
            }
        }
    }

    fn jitter(&mut self, base_ms: u64, variance_ms: u64) -> Duration {
        Duration::from_millis(base_ms + (self.rng.f64() * variance_ms as f64) as u64)
    }

    fn emit(&mut self, now: Instant, rocket: f64) {
        let smoke_every = Duration::from_millis(self.config.smoke_interval_ms.max(1));
        if self.mode == RocketMode::Traveling(TravelDirection::Forward) {
            // after a stalled frame only the most recent interval is replayed
            let floor = now.checked_sub(smoke_every).unwrap_or(now);
            let mut next = match self.last_smoke {
                Some(last) => (last + smoke_every).max(floor),
                None => now,
            };
            while next <= now {
                for _ in 0..burst_size(self.speed, self.config.min_burst) {
                    let life = self.jitter(self.config.smoke_life_ms, self.config.smoke_life_variance_ms);
                    let trail = self.rng.f64() * 0.03;
                    self.particles.push(Particle {
                        kind: ParticleKind::Smoke,
                        born: next,
                        life,
                        progress: (rocket - trail).max(0.0),
                        offset: (self.rng.f64() - 0.5) * 2.0,
                    });
                }
                self.last_smoke = Some(next);
                next += smoke_every;
            }
        }

        let debris_every = Duration::from_millis(self.config.debris_interval_ms.max(1));
        let due = self
            .last_debris
            .map_or(true, |last| now.saturating_duration_since(last) >= debris_every);
        if due {
            let life = self.jitter(self.config.debris_life_ms, self.config.debris_life_variance_ms);
            let offset = 1.0 + self.rng.f64() * 3.0;
            self.particles.push(Particle {
                kind: ParticleKind::Debris,
                born: now,
                life,
                progress: rocket,
                offset,
            });
            self.last_debris = Some(now);
        }
    }

    pub fn particle_count(&self, kind: ParticleKind) -> usize {
        self.particles.iter().filter(|p| p.kind == kind).count()
    }
}

impl VisualDriver for ProgressIndicator {
    fn update(&mut self, ctx: &FrameContext<'_>, scene: &mut SceneFrame) -> Result<()> {
        let now = ctx.now;
        let rocket = ctx.scroll.current_progress.clamp(0.0, 1.0);

        self.on_scroll_delta(ctx.scroll_delta, now);
        self.settle(now);

        self.particles
            .retain(|p| now.saturating_duration_since(p.born) < p.life);
        self.emit(now, rocket);

        let current = ctx.section.position.index;
        let markers = ctx
            .sequence
            .sections()
            .iter()
            .enumerate()
            .map(|(index, section)| MarkerView {
                index,
                label: section.title.clone(),
                progress: ctx.sequence.marker_progress(index),
                status: marker_status(index, current),
            })
            .collect();

        let particles = self
            .particles
            .iter()
            .map(|p| {
                let age = now.saturating_duration_since(p.born).as_secs_f64();
                let opacity = (1.0 - age / p.life.as_secs_f64().max(1e-6)).clamp(0.0, 1.0);
                let drift = match p.kind {
                    ParticleKind::Smoke => -age * 0.05,
                    ParticleKind::Debris => age * 0.5,
                };
                ParticleView {
                    kind: p.kind,
                    progress: (p.progress + if p.kind == ParticleKind::Smoke { drift } else { 0.0 })
                        .clamp(0.0, 1.0),
                    offset: p.offset + if p.kind == ParticleKind::Debris { drift } else { 0.0 },
                    opacity,
                }
            })
            .collect();

        scene.indicator = Some(IndicatorView {
            rocket_progress: rocket,
            mode: self.mode,
            flame_visible: self.mode != RocketMode::Traveling(TravelDirection::Backward),
            markers,
            particles,
        });
        Ok(())
    }

    fn destroy(&mut self) {
        self.particles.clear();
        self.mode = RocketMode::AtRest;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FrameFixture;

    fn indicator() -> ProgressIndicator {
        ProgressIndicator::new(IndicatorConfig::default(), fastrand::Rng::with_seed(5))
    }

    #[test]
    fn test_dead_band_and_direction() {
        let t0 = Instant::now();
        let mut ind = indicator();
        ind.on_scroll_delta(2.0, t0);
        assert_eq!(ind.mode(), RocketMode::AtRest);
        ind.on_scroll_delta(-2.0, t0);
        assert_eq!(ind.mode(), RocketMode::AtRest);
        ind.on_scroll_delta(120.0, t0);
        assert_eq!(ind.mode(), RocketMode::Traveling(TravelDirection::Forward));
        assert_eq!(ind.speed(), 50.0);
        ind.on_scroll_delta(-30.0, t0);
        assert_eq!(ind.mode(), RocketMode::Traveling(TravelDirection::Backward));
    }

    #[test]
    fn test_returns_to_rest_after_quiet_period() {
        let t0 = Instant::now();
        let mut ind = indicator();
        ind.on_scroll_delta(20.0, t0);
        ind.settle(t0 + Duration::from_millis(149));
        assert_eq!(ind.mode(), RocketMode::Traveling(TravelDirection::Forward));
        ind.settle(t0 + Duration::from_millis(150));
        assert_eq!(ind.mode(), RocketMode::AtRest);
    }

    #[test]
    fn test_burst_size() {
        assert_eq!(burst_size(0.0, 8), 8);
        assert_eq!(burst_size(29.0, 8), 8);
        assert_eq!(burst_size(50.0, 8), 15);
    }

    #[test]
    fn test_smoke_only_while_traveling_forward() {
        let t0 = Instant::now();
        let mut ind = indicator();
        ind.emit(t0, 0.2);
        assert_eq!(ind.particle_count(ParticleKind::Smoke), 0);
        assert_eq!(ind.particle_count(ParticleKind::Debris), 1);

        ind.on_scroll_delta(50.0, t0);
        ind.emit(t0, 0.2);
        assert_eq!(ind.particle_count(ParticleKind::Smoke), 15);
        // two more intervals elapse
        ind.emit(t0 + Duration::from_millis(60), 0.25);
        assert_eq!(ind.particle_count(ParticleKind::Smoke), 45);

        ind.on_scroll_delta(-50.0, t0 + Duration::from_millis(70));
        ind.emit(t0 + Duration::from_millis(200), 0.2);
        assert_eq!(ind.particle_count(ParticleKind::Smoke), 45);
    }

    #[test]
    fn test_smoke_catch_up_is_bounded_after_stall() {
        let t0 = Instant::now();
        let mut ind = indicator();
        ind.on_scroll_delta(50.0, t0);
        ind.emit(t0, 0.2);
        assert_eq!(ind.particle_count(ParticleKind::Smoke), 15);

        let later = t0 + Duration::from_secs(60);
        ind.on_scroll_delta(50.0, later);
        ind.settle(later);
        ind.emit(later, 0.3);
        // two bursts at most, not one per missed interval
        assert_eq!(ind.particle_count(ParticleKind::Smoke), 45);
    }

    #[test]
    fn test_flame_hidden_backwards() {
        let mut fixture = FrameFixture::new();
        fixture.scroll_delta = -40.0;
        let mut ind = indicator();
        let view = fixture
            .run(&mut ind, 0.5, Duration::ZERO)
            .indicator
            .unwrap();
        assert_eq!(view.mode, RocketMode::Traveling(TravelDirection::Backward));
        assert!(!view.flame_visible);
    }

    #[test]
    fn test_markers_after_arriving_at_last_section() {
        let mut fixture = FrameFixture::new();
        let mut ind = indicator();
        let view = fixture
            .run(&mut ind, 1.0, Duration::ZERO)
            .indicator
            .unwrap();
        let statuses: Vec<_> = view.markers.iter().map(|m| m.status).collect();
        assert_eq!(
            statuses,
            vec![
                MarkerStatus::Passed,
                MarkerStatus::Passed,
                MarkerStatus::Passed,
                MarkerStatus::Passed,
                MarkerStatus::Active
            ]
        );
        assert_eq!(view.markers[4].progress, 1.0);
    }

    #[test]
    fn test_particles_expire() {
        let mut fixture = FrameFixture::new();
        fixture.scroll_delta = 40.0;
        let mut ind = indicator();
        fixture.run(&mut ind, 0.1, Duration::ZERO);
        assert!(ind.particle_count(ParticleKind::Smoke) > 0);

        fixture.scroll_delta = 0.0;
        fixture.run(&mut ind, 0.1, Duration::from_secs(5));
        assert_eq!(ind.particle_count(ParticleKind::Smoke), 0);
        // a fresh debris particle is emitted on every interval
        assert_eq!(ind.particle_count(ParticleKind::Debris), 1);
    }
}
