//! Starfield, asteroids and the galaxy backdrop projected onto cells

use std::f64::consts::TAU;

use liftoff_core::camera::Projection;
use liftoff_core::drivers::galaxy::radial_fade;
use liftoff_core::scene::{GalaxyView, SceneFrame, Sprite};
use ratatui::{buffer::Buffer, layout::Rect, style::Style, Frame};

use super::put_char;
use crate::theme::{rgba_over, Theme};

/// Below this a point is not worth a cell
const MIN_VISIBLE: f64 = 0.04;

/// Asteroids bigger than this many rows are clipped to it
const MAX_ROCK_ROWS: f64 = 12.0;

const ROCK_SHADES: [char; 4] = ['@', '%', '#', '&'];

pub struct SpaceWidget;

impl SpaceWidget {
    pub fn render(frame: &mut Frame, area: Rect, scene: &SceneFrame, theme: &Theme) {
        let buf = frame.buffer_mut();
        Self::clear(buf, area, theme);

        if let Some(galaxy) = &scene.galaxy {
            Self::draw_galaxy(buf, area, scene, galaxy, theme);
        }
        for star in &scene.stars {
            Self::draw_star(buf, area, scene, star, theme);
        }
        for rock in &scene.asteroids {
            Self::draw_rock(buf, area, scene, rock, theme);
        }
    }

    fn clear(buf: &mut Buffer, area: Rect, theme: &Theme) {
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.reset();
                    cell.set_bg(theme.space);
                }
            }
        }
    }

    fn draw_galaxy(buf: &mut Buffer, area: Rect, scene: &SceneFrame, galaxy: &GalaxyView, theme: &Theme) {
        let Some(center) = scene.camera.project(galaxy.position, scene.world_rotation) else {
            return;
        };
        let (cx, cy) = cell_position(area, &center);
        let half_rows = galaxy.size / 2.0 / center.half_height * area.height as f64 / 2.0;
        let half_cols = half_rows * 2.0;
        if half_rows < 0.5 {
            return;
        }

        let (sin, cos) = (-galaxy.rotation).sin_cos();
        let alpha = galaxy.opacity * scene.scene_opacity;
        let top = (cy - half_rows).floor().max(area.top() as f64) as u16;
        let bottom = (cy + half_rows).ceil().min(area.bottom() as f64) as u16;
        let left = (cx - half_cols).floor().max(area.left() as f64) as u16;
        let right = (cx + half_cols).ceil().min(area.right() as f64) as u16;

        for y in top..bottom {
            for x in left..right {
                // plane coordinates in [-0.5, 0.5], rotated back into texture space
                let px = (x as f64 + 0.5 - cx) / (half_cols * 2.0);
                let py = (y as f64 + 0.5 - cy) / (half_rows * 2.0);
                let u = px * cos - py * sin + 0.5;
                let v = px * sin + py * cos + 0.5;
                if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
                    continue;
                }
                let fade = radial_fade(u, v) * alpha;
                if fade <= 0.0 {
                    continue;
                }
                let pixel = galaxy.texture.sample(u, v);
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_bg(rgba_over(theme.space, pixel, fade));
                }
            }
        }
    }

    fn draw_star(buf: &mut Buffer, area: Rect, scene: &SceneFrame, star: &Sprite, theme: &Theme) {
        let brightness = star.opacity * star.shade * scene.star_brightness * scene.scene_opacity;
        if brightness < MIN_VISIBLE {
            return;
        }
        let Some(p) = scene.camera.project(star.position, scene.world_rotation) else {
            return;
        };
        let glyph = match (star.size, p.distance < 400.0) {
            (s, true) if s >= 1.5 => '*',
            (s, _) if s >= 1.5 => '+',
            (_, true) => '+',
            _ => '.',
        };
        let (x, y) = cell_position(area, &p);
        let style = Style::default().fg(theme.fade(theme.star, brightness));
        put_char(buf, area, x.floor() as i32, y.floor() as i32, glyph, style);
    }

    fn draw_rock(buf: &mut Buffer, area: Rect, scene: &SceneFrame, rock: &Sprite, theme: &Theme) {
        let opacity = rock.opacity * scene.scene_opacity;
        if opacity < MIN_VISIBLE {
            return;
        }
        let Some(p) = scene.camera.project(rock.position, scene.world_rotation) else {
            return;
        };
        let (cx, cy) = cell_position(area, &p);
        let rows = (rock.size / 2.0 / p.half_height * area.height as f64 / 2.0).min(MAX_ROCK_ROWS);
        let shade = ROCK_SHADES[((rock.spin.rem_euclid(TAU) / TAU) * ROCK_SHADES.len() as f64) as usize
            % ROCK_SHADES.len()];
        let style = Style::default().fg(theme.fade(theme.asteroid, opacity));

        if rows < 0.75 {
            let glyph = if rows < 0.35 { '.' } else { 'o' };
            put_char(buf, area, cx.floor() as i32, cy.floor() as i32, glyph, style);
            return;
        }

        let reach = rows.ceil() as i32;
        for dy in -reach..=reach {
            for dx in -reach * 2..=reach * 2 {
                let ex = dx as f64 / 2.0;
                let ey = dy as f64;
                if ex * ex + ey * ey <= rows * rows {
                    put_char(buf, area, cx.floor() as i32 + dx, cy.floor() as i32 + dy, shade, style);
                }
            }
        }
    }
}

/// Fractional cell position of a projected point
fn cell_position(area: Rect, p: &Projection) -> (f64, f64) {
    (
        area.x as f64 + (p.x + 1.0) / 2.0 * area.width as f64,
        area.y as f64 + (p.y + 1.0) / 2.0 * area.height as f64,
    )
}
