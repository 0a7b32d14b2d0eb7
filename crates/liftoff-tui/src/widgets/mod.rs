mod content;
mod indicator;
mod preloader;
mod space;
mod status_bar;

pub use content::ContentWidget;
pub use indicator::IndicatorWidget;
pub use preloader::PreloaderWidget;
pub use space::SpaceWidget;
pub use status_bar::StatusBarWidget;

use ratatui::{buffer::Buffer, layout::Rect, style::Style};
use unicode_width::UnicodeWidthStr;

/// Write one character at signed coordinates, clipped to `area`
fn put_char(buf: &mut Buffer, area: Rect, x: i32, y: i32, ch: char, style: Style) {
    if x < area.left() as i32 || y < area.top() as i32 {
        return;
    }
    if x >= area.right() as i32 || y >= area.bottom() as i32 {
        return;
    }
    if let Some(cell) = buf.cell_mut((x as u16, y as u16)) {
        cell.set_char(ch).set_style(style);
    }
}

/// Write a string starting at signed coordinates, clipped to `area`
fn put_str(buf: &mut Buffer, area: Rect, x: i32, y: i32, text: &str, style: Style) {
    for (i, ch) in text.chars().enumerate() {
        put_char(buf, area, x + i as i32, y, ch, style);
    }
}

/// Left column that centers `text` in `area`, shifted by `offset` cells
fn centered_x(area: Rect, text: &str, offset: i32) -> i32 {
    area.x as i32 + (area.width as i32 - text.width() as i32) / 2 + offset
}

#[cfg(test)]
pub(crate) fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect()
        })
        .collect()
}
