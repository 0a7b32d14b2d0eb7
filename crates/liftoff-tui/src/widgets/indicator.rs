use liftoff_core::scene::{MarkerStatus, ParticleKind, RocketMode, SceneFrame};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    Frame,
};

use super::{put_char, put_str};
use crate::layout::{track_column, track_row};
use crate::theme::Theme;

pub struct IndicatorWidget;

impl IndicatorWidget {
    pub fn render(frame: &mut Frame, area: Rect, scene: &SceneFrame, theme: &Theme) {
        let Some(indicator) = &scene.indicator else {
            return;
        };
        if area.width < 3 || area.height < 2 {
            return;
        }
        let visibility = scene.scene_opacity;
        if visibility <= 0.0 {
            return;
        }
        let buf = frame.buffer_mut();
        let column = track_column(area) as i32;

        let track = Style::default().fg(theme.fade(theme.track, visibility));
        for y in area.top()..area.bottom() {
            put_char(buf, area, column, y as i32, '│', track);
        }

        for particle in &indicator.particles {
            let opacity = particle.opacity * visibility;
            if opacity <= 0.0 {
                continue;
            }
            let (glyph, color, spread) = match particle.kind {
                ParticleKind::Smoke => ('░', theme.smoke, 1.0),
                ParticleKind::Debris => ('·', theme.debris, 2.0),
            };
            let x = column + (particle.offset * spread).round() as i32;
            let y = track_row(area, particle.progress) as i32;
            put_char(buf, area, x, y, glyph, Style::default().fg(theme.fade(color, opacity)));
        }

        let label_width = area.right().saturating_sub(column as u16 + 2) as usize;
        for marker in &indicator.markers {
            let y = track_row(area, marker.progress) as i32;
            let (glyph, color) = match marker.status {
                MarkerStatus::Active => ('◆', theme.marker_active),
                MarkerStatus::Passed => ('●', theme.marker_passed),
                MarkerStatus::Upcoming => ('○', theme.marker_upcoming),
            };
            let mut style = Style::default().fg(theme.fade(color, visibility));
            put_char(buf, area, column, y, glyph, style);
            if marker.status == MarkerStatus::Active {
                style = style.add_modifier(Modifier::BOLD);
            }
            let label: String = marker.label.chars().take(label_width).collect();
            put_str(buf, area, column + 2, y, &label, style);
        }

        let rocket_y = track_row(area, indicator.rocket_progress) as i32;
        let rocket = Style::default().fg(theme.fade(theme.rocket, visibility));
        put_char(buf, area, column, rocket_y, '▲', rocket);
        if indicator.flame_visible {
            let glyph = match indicator.mode {
                RocketMode::Traveling(_) => '▼',
                RocketMode::AtRest => '·',
            };
            let flame = Style::default().fg(theme.fade(theme.flame, visibility));
            put_char(buf, area, column, rocket_y + 1, glyph, flame);
        }
    }
}
