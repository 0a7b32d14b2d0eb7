use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};

/// Event handler for terminal events
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Tick rate matching a target frame rate
    pub fn with_fps(fps: u32) -> Self {
        Self::new(1000 / u64::from(fps.max(1)))
    }

    /// Poll for the next event
    pub fn next(&self) -> Result<Option<AppEvent>> {
        if event::poll(self.tick_rate)? {
            Ok(translate(event::read()?))
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }

    /// Drain events already queued without waiting
    pub fn drain(&self) -> Result<Vec<AppEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Some(e) = translate(event::read()?) {
                events.push(e);
            }
        }
        Ok(events)
    }
}

/// Map a raw terminal event to an application event
pub fn translate(event: Event) -> Option<AppEvent> {
    match event {
        // Only handle key press events, ignore release events
        // (crossterm 0.27+ sends release events on some systems)
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        Event::Mouse(mouse) => translate_mouse(mouse),
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        _ => None,
    }
}

fn translate_mouse(mouse: MouseEvent) -> Option<AppEvent> {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(AppEvent::Pointer { column, row }),
        MouseEventKind::ScrollDown => Some(AppEvent::Wheel { column, row, lines: 1 }),
        MouseEventKind::ScrollUp => Some(AppEvent::Wheel { column, row, lines: -1 }),
        MouseEventKind::Down(MouseButton::Left) => Some(AppEvent::Click { column, row }),
        _ => None,
    }
}

/// Application events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Pointer moved to a cell
    Pointer { column: u16, row: u16 },
    /// Wheel notches, positive = down
    Wheel { column: u16, row: u16, lines: i32 },
    /// Left click
    Click { column: u16, row: u16 },
    /// Terminal was resized
    Resize(u16, u16),
    /// Tick event for periodic updates
    Tick,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn mouse(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: 7,
            row: 3,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_mouse_translation() {
        assert_eq!(
            translate(mouse(MouseEventKind::Moved)),
            Some(AppEvent::Pointer { column: 7, row: 3 })
        );
        assert_eq!(
            translate(mouse(MouseEventKind::ScrollUp)),
            Some(AppEvent::Wheel { column: 7, row: 3, lines: -1 })
        );
        assert_eq!(
            translate(mouse(MouseEventKind::Down(MouseButton::Left))),
            Some(AppEvent::Click { column: 7, row: 3 })
        );
        assert_eq!(translate(mouse(MouseEventKind::Down(MouseButton::Right))), None);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut key = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        assert_eq!(translate(Event::Key(key)), Some(AppEvent::Key(key)));
        key.kind = KeyEventKind::Release;
        assert_eq!(translate(Event::Key(key)), None);
    }
}
