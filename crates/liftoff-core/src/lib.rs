pub mod assets;
pub mod camera;
pub mod config;
pub mod dependency;
pub mod drivers;
pub mod error;
pub mod frame_loop;
pub mod input;
pub mod motion;
pub mod physics;
pub mod preloader;
pub mod render;
pub mod scene;
pub mod sequence;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{AppConfig, EasingType, ScrollConfig};
pub use error::{Error, Result};
pub use frame_loop::FrameLoop;
pub use render::RenderSurface;
pub use scene::SceneFrame;
