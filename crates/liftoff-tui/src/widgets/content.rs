use liftoff_core::scene::{ContentView, GlyphView, SceneFrame};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::{centered_x, put_char, put_str};
use crate::theme::Theme;

/// Virtual pixels per terminal column / row for the parallax offset
const PIXELS_PER_COLUMN: f64 = 10.0;
const PIXELS_PER_ROW: f64 = 20.0;

/// Columns of horizontal shear per text line and degree of tilt
const SHEAR_PER_DEGREE: f64 = 0.1;

/// Columns an item travels while approaching
const ITEM_APPROACH_COLUMNS: f64 = 6.0;

pub struct ContentWidget;

impl ContentWidget {
    pub fn render(frame: &mut Frame, area: Rect, scene: &SceneFrame, theme: &Theme) {
        let Some(content) = &scene.content else {
            return;
        };
        let visibility = content.opacity * scene.scene_opacity;
        let buf = frame.buffer_mut();

        let dx = (content.offset_x / PIXELS_PER_COLUMN).round() as i32;
        let dy = (content.offset_y / PIXELS_PER_ROW).round() as i32;
        let shear = |line: i32| (content.tilt_deg * SHEAR_PER_DEGREE * line as f64).round() as i32;
        let base_row = area.y as i32 + area.height as i32 / 2 - 2 + dy;

        // Glyph opacity already carries the container fade from the sequencer
        let glyph_scale = scene.scene_opacity;
        let title: String = content.title.iter().map(|g| g.ch).collect();
        let title_x = centered_x(area, &title, dx);
        Self::draw_glyphs(buf, area, &content.title, title_x, base_row, glyph_scale, theme.title, theme, true);

        let subtitle: String = content.subtitle.iter().map(|g| g.ch).collect();
        let subtitle_x = centered_x(area, &subtitle, dx + shear(2));
        Self::draw_glyphs(buf, area, &content.subtitle, subtitle_x, base_row + 2, glyph_scale, theme.subtitle, theme, false);

        if content.is_final && visibility > 0.0 {
            Self::draw_frame(buf, area, content, &title, base_row, dx, visibility, theme);
        }

        for (i, item) in content.items.iter().enumerate() {
            let opacity = item.opacity * scene.scene_opacity;
            if opacity <= 0.0 {
                continue;
            }
            let line = 4 + i as i32;
            let text = format!("▸ {}", item.label);
            let drift = ((1.0 - item.approach) * ITEM_APPROACH_COLUMNS).round() as i32;
            let x = centered_x(area, &text, dx + shear(line) + drift);
            let style = Style::default().fg(theme.fade(theme.item, opacity));
            put_str(buf, area, x, base_row + line, &text, style);
        }

        if let Some(upcoming) = &content.upcoming {
            let opacity = upcoming.opacity * scene.scene_opacity;
            if opacity > 0.0 {
                let text = format!("NEXT · {}", upcoming.title);
                let x = centered_x(area, &text, dx / 2);
                let style = Style::default()
                    .fg(theme.fade(theme.upcoming, opacity))
                    .add_modifier(Modifier::DIM);
                put_str(buf, area, x, area.y as i32 + 1, &text, style);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_glyphs(
        buf: &mut Buffer,
        area: Rect,
        glyphs: &[GlyphView],
        x: i32,
        y: i32,
        scale: f64,
        color: Color,
        theme: &Theme,
        bold: bool,
    ) {
        for (i, glyph) in glyphs.iter().enumerate() {
            let opacity = glyph.opacity * scale;
            if opacity <= 0.0 || glyph.ch == ' ' {
                continue;
            }
            // still rising glyphs sit one row lower
            let row = y + i32::from(glyph.rise > 0.5);
            let mut style = Style::default().fg(theme.fade(color, opacity));
            if bold {
                style = style.add_modifier(Modifier::BOLD);
            }
            put_char(buf, area, x + i as i32, row, glyph.ch, style);
        }
    }

    /// Rules above and below the final section's text
    #[allow(clippy::too_many_arguments)]
    fn draw_frame(
        buf: &mut Buffer,
        area: Rect,
        content: &ContentView,
        title: &str,
        base_row: i32,
        dx: i32,
        visibility: f64,
        theme: &Theme,
    ) {
        let subtitle_width = content.subtitle.len();
        let width = title.width().max(subtitle_width) + 8;
        let rule = "─".repeat(width);
        let x = centered_x(area, &rule, dx);
        let style = Style::default().fg(theme.fade(theme.marker_active, visibility));
        put_str(buf, area, x, base_row - 2, &rule, style);
        put_str(buf, area, x, base_row + 4, &rule, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::buffer_lines;
    use liftoff_core::camera::Camera;
    use liftoff_core::scene::{ItemView, UpcomingView};
    use ratatui::{backend::TestBackend, Terminal};

    fn glyphs(text: &str, opacity: f64) -> Vec<GlyphView> {
        text.chars()
            .map(|ch| GlyphView {
                ch,
                opacity,
                rise: 0.0,
            })
            .collect()
    }

    fn scene(content: ContentView) -> SceneFrame {
        let camera = Camera {
            z: 100.0,
            fov_deg: 75.0,
            aspect: 2.0,
            far: 5000.0,
            travel: 0.0,
        };
        let mut scene = SceneFrame::new(1, camera);
        scene.scene_opacity = 1.0;
        scene.content = Some(content);
        scene
    }

    fn content() -> ContentView {
        ContentView {
            section: 0,
            title: glyphs("LIFTOFF", 1.0),
            subtitle: glyphs("A journey", 1.0),
            opacity: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            tilt_deg: 0.0,
            items: Vec::new(),
            upcoming: None,
            is_final: false,
        }
    }

    fn draw(scene: &SceneFrame) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|f| ContentWidget::render(f, f.area(), scene, &theme))
            .unwrap();
        buffer_lines(terminal.backend().buffer())
    }

    #[test]
    fn test_title_and_subtitle_centered() {
        let lines = draw(&scene(content()));
        assert_eq!(lines[8].trim(), "LIFTOFF");
        assert_eq!(lines[8].find('L'), Some(16));
        assert_eq!(lines[10].trim(), "A journey");
    }

    #[test]
    fn test_parallax_shifts_text() {
        let mut c = content();
        c.offset_x = 40.0;
        c.offset_y = 20.0;
        let lines = draw(&scene(c));
        assert_eq!(lines[9].find('L'), Some(20));
    }

    #[test]
    fn test_hidden_glyphs_are_not_drawn() {
        let mut c = content();
        c.title = glyphs("LIFTOFF", 0.0);
        let lines = draw(&scene(c));
        assert!(lines[8].trim().is_empty());
    }

    #[test]
    fn test_items_and_upcoming() {
        let mut c = content();
        c.items = vec![ItemView {
            label: "COMMANDER".into(),
            opacity: 1.0,
            approach: 1.0,
        }];
        c.upcoming = Some(UpcomingView {
            title: "THE CREW".into(),
            opacity: 0.5,
        });
        let lines = draw(&scene(c));
        assert_eq!(lines[12].trim(), "▸ COMMANDER");
        assert_eq!(lines[1].trim(), "NEXT · THE CREW");
    }

    #[test]
    fn test_final_section_gets_rules() {
        let mut c = content();
        c.is_final = true;
        let lines = draw(&scene(c));
        assert!(lines[6].contains("────"));
        assert!(lines[12].contains("────"));
    }
}
