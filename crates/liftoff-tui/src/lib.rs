pub mod app;
pub mod assets;
pub mod event;
pub mod input;
pub mod keymap;
pub mod layout;
pub mod scroll;
pub mod surface;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use surface::TerminalSurface;
pub use theme::Theme;
