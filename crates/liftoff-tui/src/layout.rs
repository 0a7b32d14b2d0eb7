//! Screen regions shared by drawing and mouse hit-testing

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};

/// Width of the progress indicator column
pub const INDICATOR_WIDTH: u16 = 18;

/// Rows kept free above and below the indicator track
const TRACK_MARGIN: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneLayout {
    /// Backdrop, always the whole screen minus the status line
    pub space: Rect,
    /// Text layer
    pub content: Rect,
    pub indicator: Rect,
    pub status: Option<Rect>,
}

impl SceneLayout {
    pub fn new(area: Rect, show_status: bool) -> Self {
        let (main, status) = if show_status && area.height > 1 {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(area);
            (rows[0], Some(rows[1]))
        } else {
            (area, None)
        };

        let width = INDICATOR_WIDTH.min(main.width / 3);
        let margin = if main.height > TRACK_MARGIN * 4 { TRACK_MARGIN } else { 0 };
        let indicator = Rect::new(
            main.right() - width,
            main.y + margin,
            width,
            main.height - margin * 2,
        );
        let content = Rect::new(main.x, main.y, main.width - width, main.height);

        Self {
            space: main,
            content,
            indicator,
            status,
        }
    }
}

/// Column of the rocket track inside the indicator
pub fn track_column(indicator: Rect) -> u16 {
    indicator.x + 2.min(indicator.width.saturating_sub(1))
}

/// Row of a track position; progress 0 sits at the bottom, 1 at the top
pub fn track_row(indicator: Rect, progress: f64) -> u16 {
    let Some(span) = indicator.height.checked_sub(1) else {
        return indicator.y;
    };
    let climbed = (progress.clamp(0.0, 1.0) * span as f64).round() as u16;
    indicator.y + span - climbed
}

/// Marker under a click, if any
pub fn marker_at(indicator: Rect, markers: &[f64], column: u16, row: u16) -> Option<usize> {
    if !indicator.contains(Position::new(column, row)) {
        return None;
    }
    markers
        .iter()
        .position(|&progress| track_row(indicator, progress) == row)
}
