use crate::error::Result;
use crate::scene::SceneFrame;

/// Anything that can draw a finished scene; invoked once per tick
pub trait RenderSurface {
    fn render_frame(&mut self, scene: &SceneFrame) -> Result<()>;
}

/// Keeps the last frame around; used by tests and headless runs
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub frames: u64,
    pub last: Option<SceneFrame>,
}

impl RenderSurface for RecordingSurface {
    fn render_frame(&mut self, scene: &SceneFrame) -> Result<()> {
        self.frames += 1;
        self.last = Some(scene.clone());
        Ok(())
    }
}
