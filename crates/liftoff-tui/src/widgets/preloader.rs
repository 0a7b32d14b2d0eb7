use liftoff_core::scene::SceneFrame;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    Frame,
};

use super::{centered_x, put_str};
use crate::theme::{blend, Theme};

const BAR_WIDTH: usize = 24;

/// Opacity of logo letters not yet revealed
const UNREVEALED: f64 = 0.12;

pub struct PreloaderWidget;

impl PreloaderWidget {
    pub fn render(frame: &mut Frame, area: Rect, scene: &SceneFrame, theme: &Theme) {
        let Some(view) = &scene.preloader else {
            return;
        };
        let opacity = view.opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 {
            return;
        }
        let buf = frame.buffer_mut();

        // Cover whatever is underneath in proportion to the preloader opacity
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    let fg = blend(cell.fg, theme.space, opacity);
                    let bg = blend(cell.bg, theme.space, opacity);
                    cell.set_fg(fg).set_bg(bg);
                }
            }
        }

        let letters: Vec<char> = view.logo.chars().collect();
        let revealed = (view.progress.clamp(0.0, 1.0) * letters.len() as f64).ceil() as usize;
        let spaced: String = letters
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let row = area.y as i32 + area.height as i32 / 2 - 1;
        let x = centered_x(area, &spaced, 0);
        for (i, ch) in letters.iter().enumerate() {
            let strength = if i < revealed { 1.0 } else { UNREVEALED };
            let style = Style::default()
                .fg(theme.fade(theme.logo, strength * opacity))
                .add_modifier(Modifier::BOLD);
            put_str(buf, area, x + 2 * i as i32, row, &ch.to_string(), style);
        }

        let filled = (view.progress.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
        let bar_x = centered_x(area, &"━".repeat(BAR_WIDTH), 0);
        let done = Style::default().fg(theme.fade(theme.logo, opacity));
        let rest = Style::default().fg(theme.fade(theme.track, opacity));
        put_str(buf, area, bar_x, row + 2, &"━".repeat(filled), done);
        put_str(buf, area, bar_x + filled as i32, row + 2, &"─".repeat(BAR_WIDTH - filled), rest);
    }
}
