//! Terminal render surface

use liftoff_core::{RenderSurface, SceneFrame};
use ratatui::{backend::Backend, layout::Rect, Frame, Terminal};

use crate::layout::SceneLayout;
use crate::theme::Theme;
use crate::widgets::{
    ContentWidget, IndicatorWidget, PreloaderWidget, SpaceWidget, StatusBarWidget,
};

/// Draws finished scenes into a ratatui terminal
pub struct TerminalSurface<B: Backend> {
    terminal: Terminal<B>,
    theme: Theme,
    show_debug: bool,
}

impl<B: Backend> TerminalSurface<B> {
    pub fn new(terminal: Terminal<B>, theme: Theme) -> Self {
        Self {
            terminal,
            theme,
            show_debug: false,
        }
    }

    pub fn set_debug(&mut self, show: bool) {
        self.show_debug = show;
    }

    pub fn show_debug(&self) -> bool {
        self.show_debug
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    /// Current screen regions
    pub fn layout(&self) -> std::io::Result<SceneLayout> {
        let size = self.terminal.size()?;
        Ok(SceneLayout::new(
            Rect::new(0, 0, size.width, size.height),
            self.show_debug,
        ))
    }
}

impl<B: Backend> RenderSurface for TerminalSurface<B> {
    fn render_frame(&mut self, scene: &SceneFrame) -> liftoff_core::Result<()> {
        let theme = &self.theme;
        let show_debug = self.show_debug;
        self.terminal
            .draw(|frame| draw_scene(frame, scene, theme, show_debug))?;
        Ok(())
    }
}

/// Compose every layer of a scene, back to front
pub fn draw_scene(frame: &mut Frame, scene: &SceneFrame, theme: &Theme, show_debug: bool) {
    let layout = SceneLayout::new(frame.area(), show_debug);

    SpaceWidget::render(frame, layout.space, scene, theme);
    ContentWidget::render(frame, layout.content, scene, theme);
    IndicatorWidget::render(frame, layout.indicator, scene, theme);
    PreloaderWidget::render(frame, layout.space, scene, theme);
    if let Some(status) = layout.status {
        StatusBarWidget::render(frame, status, scene, theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::buffer_lines;
    use liftoff_core::config::AppConfig;
    use liftoff_core::drivers::{ContentLayer, ProgressIndicator};
    use liftoff_core::FrameLoop;
    use ratatui::backend::TestBackend;
    use std::time::{Duration, Instant};

    fn surface(show_debug: bool) -> TerminalSurface<TestBackend> {
        let terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut surface = TerminalSurface::new(terminal, Theme::default());
        surface.set_debug(show_debug);
        surface
    }

    fn running_loop(t0: Instant) -> FrameLoop {
        let config = AppConfig::default();
        let mut fl = FrameLoop::new(&config, 800.0, 480.0).unwrap();
        fl.on_update("content", Box::new(ContentLayer::new(config.content.clone())));
        fl.on_update(
            "indicator",
            Box::new(ProgressIndicator::new(config.indicator.clone(), fastrand::Rng::with_seed(3))),
        );
        fl.init();
        fl.start(t0);
        fl.preloader_mut().hide(Duration::ZERO, t0);
        fl
    }

    #[test]
    fn test_preloader_covers_scene_until_hidden() {
        let t0 = Instant::now();
        let mut fl = running_loop(t0);
        let mut surface = surface(false);

        fl.tick(t0 + Duration::from_millis(16), &mut surface).unwrap();
        let lines = buffer_lines(surface.terminal().backend().buffer());
        assert!(lines.iter().any(|l| l.contains("T R I G L A S S")));

        let mut t = t0;
        for _ in 0..300 {
            t += Duration::from_millis(16);
            fl.tick(t, &mut surface).unwrap();
        }
        let lines = buffer_lines(surface.terminal().backend().buffer());
        assert!(!lines.iter().any(|l| l.contains("T R I G L A S S")));
        assert!(lines.iter().any(|l| l.contains("LIFTOFF")));
    }

    #[test]
    fn test_status_line_only_in_debug() {
        let t0 = Instant::now();
        let mut fl = running_loop(t0);

        let mut plain = surface(false);
        fl.tick(t0 + Duration::from_millis(16), &mut plain).unwrap();
        let lines = buffer_lines(plain.terminal().backend().buffer());
        assert!(!lines[23].contains("Scroll:"));

        let mut debug = surface(true);
        fl.tick(t0 + Duration::from_millis(32), &mut debug).unwrap();
        let lines = buffer_lines(debug.terminal().backend().buffer());
        assert!(lines[23].starts_with(" Scroll: 0% | Z: 0 | Mouse:"));
    }

    #[test]
    fn test_layout_follows_terminal_size() {
        let surface = surface(true);
        let layout = surface.layout().unwrap();
        assert_eq!(layout.status, Some(Rect::new(0, 23, 80, 1)));
    }
}
