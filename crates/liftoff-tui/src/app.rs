use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use liftoff_core::{AppConfig, FrameLoop};
use ratatui::{backend::Backend, layout::Rect};
use tracing::{debug, warn};

use crate::event::AppEvent;
use crate::input::{handle_key_event, Action};
use crate::keymap::Keymap;
use crate::layout::{marker_at, SceneLayout};
use crate::scroll::ScrollAnimator;
use crate::surface::TerminalSurface;

/// Application state
pub struct App {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Scene coordinator fed by this app's input
    pub frame_loop: FrameLoop,
    /// Smooth page offset in virtual pixels
    pub scroller: ScrollAnimator,
    pub keymap: Keymap,
    /// Pending key for multi-key sequences (e.g., 'gg')
    pub pending_key: Option<char>,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Whether the debug status line is shown
    pub show_debug: bool,
    /// Terminal size in cells
    columns: u16,
    rows: u16,
}

impl App {
    pub fn new(config: Arc<AppConfig>, columns: u16, rows: u16) -> Result<Self> {
        let (width, height) = viewport(&config, columns, rows);
        let frame_loop = FrameLoop::new(&config, width, height)?;
        Ok(Self {
            scroller: ScrollAnimator::new(config.page.scroll.clone()),
            keymap: Keymap::from_config(&config.keymap),
            show_debug: config.ui.show_debug,
            config,
            frame_loop,
            pending_key: None,
            should_quit: false,
            columns,
            rows,
        })
    }

    /// Size of one terminal cell in virtual pixels
    fn cell_size(&self) -> (f64, f64) {
        cell_size(&self.config)
    }

    fn max_scroll(&self) -> f64 {
        self.frame_loop.max_scroll()
    }

    pub fn layout(&self) -> SceneLayout {
        SceneLayout::new(Rect::new(0, 0, self.columns, self.rows), self.show_debug)
    }

    pub fn handle_event(&mut self, event: AppEvent, now: Instant) {
        match event {
            AppEvent::Key(key) => {
                let action = handle_key_event(key, &self.keymap, self.pending_key);
                self.handle_action(action, now);
            }
            AppEvent::Pointer { column, row } => {
                let (cell_w, cell_h) = self.cell_size();
                self.frame_loop.on_pointer_move(
                    (column as f64 + 0.5) * cell_w,
                    (row as f64 + 0.5) * cell_h,
                );
            }
            AppEvent::Wheel { lines, .. } => {
                let max = self.max_scroll();
                self.scroller
                    .scroll_by(lines as f64 * self.config.page.wheel_step, max);
            }
            AppEvent::Click { column, row } => {
                let markers = self.frame_loop.sequencer().sequence().markers();
                if let Some(index) = marker_at(self.layout().indicator, &markers, column, row) {
                    debug!(section = index, "Marker clicked");
                    self.jump_to_section(index, now);
                }
            }
            AppEvent::Resize(columns, rows) => {
                self.columns = columns;
                self.rows = rows;
                let (width, height) = viewport(&self.config, columns, rows);
                self.frame_loop.resize(width, height);
                debug!(columns, rows, "Terminal resized");
            }
            AppEvent::Tick => {}
        }
    }

    pub fn handle_action(&mut self, action: Action, now: Instant) {
        if action != Action::PendingG {
            self.pending_key = None;
        }
        let max = self.max_scroll();
        let step = self.config.page.wheel_step;
        let page = self.rows as f64 * self.cell_size().1;

        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollDown => self.scroller.scroll_by(step, max),
            Action::ScrollUp => self.scroller.scroll_by(-step, max),
            Action::PageDown => self.scroller.scroll_by(page, max),
            Action::PageUp => self.scroller.scroll_by(-page, max),
            Action::JumpToTop => self.scroller.scroll_to(0.0, max, now),
            Action::JumpToBottom => self.scroller.scroll_to(max, max, now),
            Action::PendingG => self.pending_key = Some('g'),
            Action::NextSection => {
                let next = self.current_section() + 1;
                if next < self.frame_loop.sequencer().sequence().len() {
                    self.jump_to_section(next, now);
                }
            }
            Action::PrevSection => {
                if let Some(prev) = self.current_section().checked_sub(1) {
                    self.jump_to_section(prev, now);
                }
            }
            Action::JumpToSection(index) => {
                if index < self.frame_loop.sequencer().sequence().len() {
                    self.jump_to_section(index, now);
                } else {
                    debug!(section = index, "No such section");
                }
            }
            Action::ToggleDebug => self.show_debug = !self.show_debug,
            Action::None => {}
        }
    }

    /// Section a next/previous request is relative to; a jump in flight counts as arrived
    fn current_section(&self) -> usize {
        let sequencer = self.frame_loop.sequencer();
        sequencer.jump_target().unwrap_or(sequencer.displayed())
    }

    /// Request a section and glide the page to its marker
    pub fn jump_to_section(&mut self, index: usize, now: Instant) {
        match self.frame_loop.request_section(index, now) {
            Ok(offset) => {
                let max = self.max_scroll();
                self.scroller.scroll_to(offset, max, now);
            }
            Err(e) => warn!(section = index, error = %e, "Section jump rejected"),
        }
    }

    /// Feed the animated page offset to the frame loop and draw one frame
    pub fn tick<B: Backend>(&mut self, now: Instant, surface: &mut TerminalSurface<B>) -> Result<bool> {
        surface.set_debug(self.show_debug);
        let offset = self.scroller.update(self.max_scroll(), now);
        self.frame_loop.on_scroll(offset);
        Ok(self.frame_loop.tick(now, surface)?)
    }
}

/// Size of one terminal cell in virtual pixels; cells are about twice as tall as wide
pub fn cell_size(config: &AppConfig) -> (f64, f64) {
    let row = config.page.pixels_per_row;
    (row / 2.0, row)
}

/// Virtual viewport for a terminal size
pub fn viewport(config: &AppConfig, columns: u16, rows: u16) -> (f64, f64) {
    let (cell_w, cell_h) = cell_size(config);
    (columns as f64 * cell_w, rows as f64 * cell_h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use liftoff_core::drivers::ProgressIndicator;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    fn app() -> App {
        let mut app = App::new(Arc::new(AppConfig::default()), 80, 24).unwrap();
        app.frame_loop.init();
        app
    }

    fn key(c: char) -> AppEvent {
        let modifiers = if c.is_ascii_uppercase() {
            KeyModifiers::SHIFT
        } else {
            KeyModifiers::NONE
        };
        AppEvent::Key(KeyEvent::new(KeyCode::Char(c), modifiers))
    }

    #[test]
    fn test_viewport_in_virtual_pixels() {
        let app = app();
        assert_eq!(viewport(&app.config, 80, 24), (800.0, 480.0));
        assert_eq!(app.max_scroll(), 5000.0);
    }

    #[test]
    fn test_pointer_maps_to_normalized_coordinates() {
        let mut app = app();
        let t0 = Instant::now();
        app.handle_event(AppEvent::Pointer { column: 79, row: 0 }, t0);
        let (x, y) = app.frame_loop.input().pointer();
        assert!(x > 0.95 && y < -0.9, "{x} {y}");
    }

    #[test]
    fn test_wheel_and_keys_scroll() {
        let mut app = app();
        let t0 = Instant::now();
        app.handle_event(AppEvent::Wheel { column: 0, row: 0, lines: 2 }, t0);
        app.handle_event(key('j'), t0);
        app.scroller.update(app.max_scroll(), t0);
        assert_eq!(app.scroller.target(), 360.0);

        app.handle_event(key('G'), t0);
        assert_eq!(app.scroller.target(), 5000.0);

        app.handle_event(key('g'), t0);
        assert_eq!(app.pending_key, Some('g'));
        app.handle_event(key('g'), t0);
        assert_eq!(app.pending_key, None);
        assert_eq!(app.scroller.target(), 0.0);
    }

    #[test]
    fn test_digit_jumps_to_section_marker() {
        let mut app = app();
        let t0 = Instant::now();
        app.handle_event(key('3'), t0);
        assert_eq!(app.frame_loop.sequencer().jump_target(), Some(2));
        assert_eq!(app.scroller.target(), 2500.0);

        // sections past the end are ignored
        app.handle_event(key('9'), t0);
        assert_eq!(app.frame_loop.sequencer().jump_target(), Some(2));
    }

    #[test]
    fn test_next_section_counts_pending_jump() {
        let mut app = app();
        let t0 = Instant::now();
        app.handle_event(key('n'), t0);
        app.handle_event(key('n'), t0);
        assert_eq!(app.frame_loop.sequencer().jump_target(), Some(2));
        app.handle_event(key('p'), t0);
        assert_eq!(app.frame_loop.sequencer().jump_target(), Some(1));
    }

    #[test]
    fn test_marker_click_requests_section() {
        let mut app = app();
        let t0 = Instant::now();
        let indicator = app.layout().indicator;
        // last marker sits at the top of the track
        app.handle_event(
            AppEvent::Click {
                column: indicator.x + 4,
                row: indicator.y,
            },
            t0,
        );
        assert_eq!(app.frame_loop.sequencer().jump_target(), Some(4));
        assert_eq!(app.scroller.target(), app.max_scroll());

        // a click on the empty screen does nothing
        let mut other = self::app();
        other.handle_event(AppEvent::Click { column: 10, row: 10 }, t0);
        assert_eq!(other.frame_loop.sequencer().jump_target(), None);
    }

    #[test]
    fn test_quit_and_debug_toggle() {
        let mut app = app();
        let t0 = Instant::now();
        app.handle_event(key('d'), t0);
        assert!(app.show_debug);
        assert_eq!(app.layout().status, Some(Rect::new(0, 23, 80, 1)));
        app.handle_event(key('q'), t0);
        assert!(app.should_quit);
    }

    #[test]
    fn test_tick_feeds_scroll_offset_to_frame_loop() {
        let mut app = app();
        let indicator = ProgressIndicator::new(app.config.indicator.clone(), fastrand::Rng::with_seed(9));
        app.frame_loop.on_update("indicator", Box::new(indicator));
        let mut surface = TerminalSurface::new(
            Terminal::new(TestBackend::new(80, 24)).unwrap(),
            crate::theme::Theme::default(),
        );

        let t0 = Instant::now();
        app.frame_loop.start(t0);
        app.handle_event(key('G'), t0);
        let mut t = t0;
        for _ in 0..100 {
            t += Duration::from_millis(16);
            assert!(app.tick(t, &mut surface).unwrap());
        }
        assert_eq!(app.scroller.current(), 5000.0);
        assert_eq!(app.frame_loop.input().raw_offset(), 5000.0);
        assert!(app.frame_loop.smoother().scroll().current_progress > 0.9);
    }

    #[test]
    fn test_resize_updates_layout_and_viewport() {
        let mut app = app();
        app.handle_event(AppEvent::Resize(120, 40), Instant::now());
        assert_eq!(app.frame_loop.input().viewport(), (1200.0, 800.0));
        assert_eq!(app.layout().indicator.x, 102);
    }
}
