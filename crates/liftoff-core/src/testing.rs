//! Single-frame harness for driver tests

use std::time::{Duration, Instant};

use crate::camera::CameraRig;
use crate::config::AppConfig;
use crate::drivers::{FrameContext, VisualDriver};
use crate::motion::{PointerState, ScrollState};
use crate::scene::SceneFrame;
use crate::sequence::{SectionSequence, SectionView, TransitionState};

pub(crate) struct FrameFixture {
    pub sequence: SectionSequence,
    pub rig: CameraRig,
    pub start: Instant,
    pub frame: u64,
    pub pointer: PointerState,
    pub scroll_delta: f64,
    /// Whether the intro reveal has fired
    pub intro: bool,
}

impl FrameFixture {
    pub fn new() -> Self {
        let config = AppConfig::default();
        let sequence = SectionSequence::from_config(&config.sequence).unwrap();
        let rig = CameraRig::new(&config.camera, &config.sequence, &sequence);
        Self {
            sequence,
            rig,
            start: Instant::now(),
            frame: 0,
            pointer: PointerState::default(),
            scroll_delta: 0.0,
            intro: true,
        }
    }

    /// Run one idle-state frame at `progress`, `elapsed` after the fixture start
    pub fn run(&mut self, driver: &mut dyn VisualDriver, progress: f64, elapsed: Duration) -> SceneFrame {
        self.frame += 1;
        let now = self.start + elapsed;
        let position = self.sequence.compute(progress);
        let section = SectionView {
            position,
            displayed: position.index,
            state: TransitionState::Idle,
            text_opacity: if self.intro { 1.0 } else { 0.0 },
            jump_target: None,
            intro_started: self.intro.then_some(self.start),
            count: self.sequence.len(),
        };
        let scroll = ScrollState {
            raw_offset: progress * 1000.0,
            target_progress: progress,
            current_progress: progress,
        };
        let camera = self.rig.camera(progress, 16.0 / 9.0);
        let ctx = FrameContext {
            now,
            dt: Duration::from_millis(16),
            elapsed,
            frame: self.frame,
            scroll: &scroll,
            scroll_delta: self.scroll_delta,
            pointer: &self.pointer,
            section: &section,
            sequence: &self.sequence,
            camera: &camera,
        };
        let mut scene = SceneFrame::new(self.frame, camera);
        driver.update(&ctx, &mut scene).unwrap();
        scene
    }
}
