use liftoff_core::scene::SceneFrame;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::theme::Theme;

const HELP_HINT: &str = " q:quit j/k:scroll n/p:section 1-9:jump d:debug ";

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, scene: &SceneFrame, theme: &Theme) {
        let status_text = format!(" {}", scene.debug.line());
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + HELP_HINT.width());

        let line = Line::from(vec![
            Span::styled(
                status_text,
                Style::default().fg(theme.status_fg).bg(theme.status_bg),
            ),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.status_bg)),
            Span::styled(
                HELP_HINT,
                Style::default().fg(theme.hint).bg(theme.status_bg),
            ),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::buffer_lines;
    use liftoff_core::camera::Camera;
    use liftoff_core::scene::DebugInfo;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_debug_line() {
        let camera = Camera {
            z: 100.0,
            fov_deg: 75.0,
            aspect: 2.0,
            far: 5000.0,
            travel: 0.0,
        };
        let mut scene = SceneFrame::new(1, camera);
        scene.debug = DebugInfo {
            scroll_percent: 42.4,
            world_z: 1890.0,
            mouse_x: 0.25,
            mouse_y: -0.5,
        };

        let mut terminal = Terminal::new(TestBackend::new(100, 1)).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|f| StatusBarWidget::render(f, f.area(), &scene, &theme))
            .unwrap();
        let line = &buffer_lines(terminal.backend().buffer())[0];
        assert!(line.starts_with(" Scroll: 42% | Z: 1890 | Mouse: 0.25, -0.50"));
        assert!(line.trim_end().ends_with("d:debug"));
    }
}
