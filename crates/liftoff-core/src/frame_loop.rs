//! Per-frame coordinator
//!
//! One tick runs input → smoothing → sequencing → drivers → render, in that
//! order. Drivers are registered by name; a failing driver is logged and
//! skipped for that frame while the others and the render still run. A
//! driver that panics is logged and unregistered.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::camera::CameraRig;
use crate::config::{AppConfig, EasingType};
use crate::drivers::{FrameContext, VisualDriver};
use crate::error::Result;
use crate::input::InputSampler;
use crate::motion::easing::EasingTypeExt;
use crate::motion::timing::progress_at;
use crate::motion::MotionSmoother;
use crate::preloader::Preloader;
use crate::render::RenderSurface;
use crate::scene::{world_orientation, DebugInfo, SceneFrame};
use crate::sequence::SectionSequencer;

pub struct FrameLoop {
    input: InputSampler,
    smoother: MotionSmoother,
    sequencer: SectionSequencer,
    rig: CameraRig,
    preloader: Preloader,
    drivers: Vec<(String, Box<dyn VisualDriver>)>,
    scene_fade: Duration,
    scroll_length: f64,
    running: bool,
    started_at: Option<Instant>,
    last_tick: Option<Instant>,
    last_offset: f64,
    frame: u64,
}

impl FrameLoop {
    /// Build the loop for a viewport (virtual pixels)
    pub fn new(config: &AppConfig, viewport_width: f64, viewport_height: f64) -> Result<Self> {
        let sequencer = SectionSequencer::from_config(&config.sequence)?;
        let rig = CameraRig::new(&config.camera, &config.sequence, sequencer.sequence());
        let document_height = config.page.scroll_length + viewport_height;
        Ok(Self {
            input: InputSampler::new(viewport_width, viewport_height, document_height),
            smoother: MotionSmoother::new(config.motion.clone()),
            sequencer,
            rig,
            preloader: Preloader::new(config.preloader.clone()),
            drivers: Vec::new(),
            scene_fade: Duration::from_millis(config.sequence.scene_fade_ms),
            scroll_length: config.page.scroll_length,
            running: false,
            started_at: None,
            last_tick: None,
            last_offset: 0.0,
            frame: 0,
        })
    }

    /// Start from the top of the page regardless of any restored offset
    pub fn init(&mut self) {
        self.input.force_top();
        self.smoother.reset(&self.input);
        self.last_offset = 0.0;
        info!(sections = self.sequencer.sequence().len(), "Scroll tracking initialized");
    }

    /// Register a driver; an existing driver with the same name is replaced
    pub fn on_update(&mut self, name: impl Into<String>, driver: Box<dyn VisualDriver>) {
        let name = name.into();
        if let Some(slot) = self.drivers.iter_mut().find(|(n, _)| *n == name) {
            slot.1.destroy();
            slot.1 = driver;
            debug!(driver = %name, "Driver replaced");
        } else {
            debug!(driver = %name, "Driver registered");
            self.drivers.push((name, driver));
        }
    }

    /// Unregister and destroy a driver; returns whether it existed
    pub fn off_update(&mut self, name: &str) -> bool {
        match self.drivers.iter().position(|(n, _)| n == name) {
            Some(index) => {
                let (_, mut driver) = self.drivers.remove(index);
                driver.destroy();
                debug!(driver = %name, "Driver removed");
                true
            }
            None => false,
        }
    }

    pub fn driver_names(&self) -> impl Iterator<Item = &str> {
        self.drivers.iter().map(|(n, _)| n.as_str())
    }

    pub fn start(&mut self, now: Instant) {
        if self.running {
            return;
        }
        self.running = true;
        self.started_at.get_or_insert(now);
        self.last_tick = Some(now);
        info!("Animation loop started");
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        info!("Animation loop stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn on_scroll(&mut self, offset: f64) {
        self.input.on_scroll(offset);
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.input.on_pointer_move(x, y);
    }

    pub fn resize(&mut self, viewport_width: f64, viewport_height: f64) {
        self.input
            .resize(viewport_width, viewport_height, self.scroll_length + viewport_height);
    }

    /// Explicit jump; returns the page offset the host must scroll to
    pub fn request_section(&mut self, index: usize, now: Instant) -> Result<f64> {
        let progress = self.sequencer.request_section(index, now)?;
        Ok(self.input.progress_to_offset(progress))
    }

    pub fn input(&self) -> &InputSampler {
        &self.input
    }

    pub fn smoother(&self) -> &MotionSmoother {
        &self.smoother
    }

    pub fn sequencer(&self) -> &SectionSequencer {
        &self.sequencer
    }

    pub fn preloader(&self) -> &Preloader {
        &self.preloader
    }

    pub fn preloader_mut(&mut self) -> &mut Preloader {
        &mut self.preloader
    }

    pub fn max_scroll(&self) -> f64 {
        self.input.max_scroll()
    }

    /// Compute the next scene; `None` while stopped
    pub fn advance(&mut self, now: Instant) -> Option<SceneFrame> {
        if !self.running {
            return None;
        }
        let dt = self
            .last_tick
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last_tick = Some(now);
        let elapsed = self
            .started_at
            .map_or(Duration::ZERO, |start| now.saturating_duration_since(start));
        self.frame += 1;

        self.smoother.advance(&self.input);
        let scroll_delta = self.input.raw_offset() - self.last_offset;
        self.last_offset = self.input.raw_offset();

        if self.preloader.tick(now) {
            self.sequencer.reveal_intro(now);
            info!("Scene fading in");
        }

        let progress = self.smoother.scroll().current_progress;
        let section = self.sequencer.update(progress, now);
        let camera = self.rig.camera(progress, self.input.aspect());

        let mut scene = SceneFrame::new(self.frame, camera);
        let (rx, ry, rz) = self.smoother.world_rotation();
        scene.world_rotation = world_orientation(rx, ry, rz);
        scene.scene_opacity = section.intro_started.map_or(0.0, |at| {
            EasingType::Cubic.apply(progress_at(at, self.scene_fade, now))
        });
        scene.preloader = self.preloader.view(now);
        let pointer = self.smoother.pointer();
        scene.debug = DebugInfo {
            scroll_percent: progress * 100.0,
            world_z: camera.travel,
            mouse_x: pointer.smoothed_x,
            mouse_y: pointer.smoothed_y,
        };

        let ctx = FrameContext {
            now,
            dt,
            elapsed,
            frame: self.frame,
            scroll: self.smoother.scroll(),
            scroll_delta,
            pointer,
            section: &section,
            sequence: self.sequencer.sequence(),
            camera: &camera,
        };
        // a panicking driver is dropped; its state can no longer be trusted
        self.drivers.retain_mut(|(name, driver)| {
            match panic::catch_unwind(AssertUnwindSafe(|| driver.update(&ctx, &mut scene))) {
                Ok(Ok(())) => true,
                Ok(Err(e)) => {
                    error!(driver = %name, error = %e, "Error in update function");
                    true
                }
                Err(payload) => {
                    error!(driver = %name, panic = %panic_message(&*payload), "Driver panicked, removed");
                    false
                }
            }
        });

        Some(scene)
    }

    /// Advance and render one frame; returns whether a frame was drawn
    pub fn tick(&mut self, now: Instant, surface: &mut dyn RenderSurface) -> Result<bool> {
        match self.advance(now) {
            Some(scene) => {
                surface.render_frame(&scene)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Destroy every registered driver
    pub fn destroy(&mut self) {
        for (name, mut driver) in self.drivers.drain(..) {
            driver.destroy();
            debug!(driver = %name, "Driver destroyed");
        }
        self.running = false;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::{ContentLayer, ProgressIndicator};
    use crate::error::Error;
    use crate::render::RecordingSurface;
    use crate::scene::MarkerStatus;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const FRAME: Duration = Duration::from_millis(16);

    struct Failing;

    impl VisualDriver for Failing {
        fn update(&mut self, _ctx: &FrameContext<'_>, _scene: &mut SceneFrame) -> Result<()> {
            Err(Error::Driver {
                driver: "failing".into(),
                message: "boom".into(),
            })
        }
    }

    struct Panicking;

    impl VisualDriver for Panicking {
        fn update(&mut self, _ctx: &FrameContext<'_>, _scene: &mut SceneFrame) -> Result<()> {
            panic!("texture index out of range");
        }
    }

    struct Counting {
        updates: Arc<AtomicUsize>,
        destroyed: Arc<AtomicUsize>,
    }

    impl VisualDriver for Counting {
        fn update(&mut self, _ctx: &FrameContext<'_>, _scene: &mut SceneFrame) -> Result<()> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn destroy(&mut self) {
            self.destroyed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn counting() -> (Counting, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let updates = Arc::new(AtomicUsize::new(0));
        let destroyed = Arc::new(AtomicUsize::new(0));
        (
            Counting {
                updates: Arc::clone(&updates),
                destroyed: Arc::clone(&destroyed),
            },
            updates,
            destroyed,
        )
    }

    fn frame_loop() -> FrameLoop {
        FrameLoop::new(&AppConfig::default(), 1600.0, 900.0).unwrap()
    }

    #[test]
    fn test_restored_offset_is_discarded_on_init() {
        let mut fl = frame_loop();
        fl.on_scroll(5000.0);
        assert!(fl.input().raw_offset() > 0.0);
        fl.init();
        let t0 = Instant::now();
        fl.start(t0);
        fl.advance(t0 + FRAME).unwrap();
        assert_eq!(fl.input().raw_offset(), 0.0);
        assert_eq!(fl.smoother().scroll().current_progress, 0.0);
    }

    #[test]
    fn test_failing_driver_does_not_stop_others_or_render() {
        let mut fl = frame_loop();
        let (counter, updates, _) = counting();
        fl.on_update("failing", Box::new(Failing));
        fl.on_update("counting", Box::new(counter));

        let mut surface = RecordingSurface::default();
        let t0 = Instant::now();
        fl.start(t0);
        for i in 1..=3 {
            assert!(fl.tick(t0 + FRAME * i, &mut surface).unwrap());
        }
        assert_eq!(updates.load(Ordering::SeqCst), 3);
        assert_eq!(surface.frames, 3);
    }

    #[test]
    fn test_panicking_driver_is_removed_and_others_keep_running() {
        let mut fl = frame_loop();
        let (before, before_updates, _) = counting();
        let (after, after_updates, _) = counting();
        fl.on_update("before", Box::new(before));
        fl.on_update("panicking", Box::new(Panicking));
        fl.on_update("after", Box::new(after));

        let mut surface = RecordingSurface::default();
        let t0 = Instant::now();
        fl.start(t0);
        for i in 1..=3 {
            assert!(fl.tick(t0 + FRAME * i, &mut surface).unwrap());
        }
        assert_eq!(before_updates.load(Ordering::SeqCst), 3);
        assert_eq!(after_updates.load(Ordering::SeqCst), 3);
        assert_eq!(surface.frames, 3);
        assert_eq!(fl.driver_names().collect::<Vec<_>>(), vec!["before", "after"]);
    }

    #[test]
    fn test_stopped_loop_does_not_tick() {
        let mut fl = frame_loop();
        let mut surface = RecordingSurface::default();
        let t0 = Instant::now();
        assert!(!fl.tick(t0, &mut surface).unwrap());
        fl.start(t0);
        assert!(fl.tick(t0 + FRAME, &mut surface).unwrap());
        fl.stop();
        assert!(!fl.tick(t0 + FRAME * 2, &mut surface).unwrap());
        assert_eq!(surface.frames, 1);
    }

    #[test]
    fn test_register_replace_and_remove() {
        let mut fl = frame_loop();
        let (first, first_updates, first_destroyed) = counting();
        let (second, second_updates, second_destroyed) = counting();
        fl.on_update("stars", Box::new(first));
        fl.on_update("stars", Box::new(second));
        assert_eq!(first_destroyed.load(Ordering::SeqCst), 1);
        assert_eq!(fl.driver_names().count(), 1);

        let t0 = Instant::now();
        fl.start(t0);
        fl.advance(t0 + FRAME);
        assert_eq!(first_updates.load(Ordering::SeqCst), 0);
        assert_eq!(second_updates.load(Ordering::SeqCst), 1);

        assert!(fl.off_update("stars"));
        assert!(!fl.off_update("stars"));
        assert_eq!(second_destroyed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_preloader_completion_reveals_intro_and_scene() {
        let mut fl = frame_loop();
        fl.on_update("content", Box::new(ContentLayer::new(Default::default())));
        fl.init();
        let t0 = Instant::now();
        fl.start(t0);

        let scene = fl.advance(t0 + FRAME).unwrap();
        assert_eq!(scene.scene_opacity, 0.0);
        assert!(scene.preloader.is_some());
        assert_eq!(scene.content.unwrap().opacity, 0.0);

        fl.preloader_mut().hide(Duration::from_millis(500), t0 + FRAME);
        let mut t = t0 + FRAME;
        while !fl.preloader().is_hidden() {
            t += FRAME;
            fl.advance(t);
        }
        assert!(fl.sequencer().intro_started().is_some());

        let scene = fl.advance(t + Duration::from_secs(4)).unwrap();
        assert_eq!(scene.scene_opacity, 1.0);
        assert!(scene.preloader.is_none());
        assert_eq!(scene.content.unwrap().opacity, 1.0);
    }

    #[test]
    fn test_jump_to_last_section_marks_markers() {
        let mut fl = frame_loop();
        fl.on_update(
            "indicator",
            Box::new(ProgressIndicator::new(Default::default(), fastrand::Rng::with_seed(1))),
        );
        fl.init();
        let mut surface = RecordingSurface::default();
        let t0 = Instant::now();
        fl.start(t0);
        fl.tick(t0 + FRAME, &mut surface).unwrap();

        let offset = fl.request_section(4, t0 + FRAME).unwrap();
        assert_eq!(offset, fl.max_scroll());
        fl.on_scroll(offset);

        let mut t = t0 + FRAME;
        for _ in 0..400 {
            t += FRAME;
            fl.tick(t, &mut surface).unwrap();
        }
        assert_eq!(fl.sequencer().jump_target(), None);
        assert_eq!(fl.sequencer().displayed(), 4);
        assert_eq!(fl.sequencer().swap_count(), 1);

        let indicator = surface.last.unwrap().indicator.unwrap();
        for marker in &indicator.markers[..4] {
            assert_eq!(marker.status, MarkerStatus::Passed);
        }
        assert_eq!(indicator.markers[4].status, MarkerStatus::Active);
    }

    #[test]
    fn test_debug_info_tracks_camera() {
        let mut fl = frame_loop();
        fl.init();
        let t0 = Instant::now();
        fl.start(t0);
        fl.on_scroll(fl.max_scroll());
        let mut scene = fl.advance(t0 + FRAME).unwrap();
        for i in 2..400 {
            scene = fl.advance(t0 + FRAME * i).unwrap();
        }
        assert_eq!(scene.debug.scroll_percent, 100.0);
        assert_eq!(scene.debug.world_z, 4500.0);
        assert_eq!(scene.camera.z, -4400.0);
    }
}
