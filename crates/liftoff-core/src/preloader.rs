//! Logo preloader shown while the scene comes up

use std::time::{Duration, Instant};

use tracing::info;

use crate::config::PreloaderConfig;
use crate::motion::timing::progress_at;
use crate::scene::PreloaderView;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PreloaderPhase {
    Loading,
    /// Progress completed, fade-out starts at `fade_at`
    Completing { fade_at: Instant },
    FadingOut { started: Instant },
    Hidden,
}

type ReadyCallback = Box<dyn FnOnce() + Send>;

pub struct Preloader {
    config: PreloaderConfig,
    progress: f64,
    phase: PreloaderPhase,
    callbacks: Vec<ReadyCallback>,
}

impl Preloader {
    pub fn new(config: PreloaderConfig) -> Self {
        Self {
            config,
            progress: 0.0,
            phase: PreloaderPhase::Loading,
            callbacks: Vec::new(),
        }
    }

    /// Reveal the logo up to `progress`, clamped to [0, 1]
    pub fn set_progress(&mut self, progress: f64) {
        if self.phase == PreloaderPhase::Loading {
            self.progress = progress.clamp(0.0, 1.0);
        }
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn phase(&self) -> PreloaderPhase {
        self.phase
    }

    /// Complete the progress, wait `delay`, then fade out. Later calls are ignored.
    pub fn hide(&mut self, delay: Duration, now: Instant) {
        if self.phase != PreloaderPhase::Loading {
            return;
        }
        self.progress = 1.0;
        self.phase = PreloaderPhase::Completing {
            fade_at: now + delay,
        };
    }

    /// `hide` with the configured delay
    pub fn hide_default(&mut self, now: Instant) {
        self.hide(Duration::from_millis(self.config.hide_delay_ms), now);
    }

    /// Register a callback fired once when the preloader is gone.
    /// Registering after that point runs it immediately.
    pub fn on_ready<F>(&mut self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_hidden() {
            callback();
        } else {
            self.callbacks.push(Box::new(callback));
        }
    }

    /// Advance timers; returns true on the tick the preloader disappears
    pub fn tick(&mut self, now: Instant) -> bool {
        let fade = Duration::from_millis(self.config.fade_ms);
        if let PreloaderPhase::Completing { fade_at } = self.phase {
            if now >= fade_at {
                self.phase = PreloaderPhase::FadingOut { started: fade_at };
            }
        }
        if let PreloaderPhase::FadingOut { started } = self.phase {
            if now >= started + fade {
                self.phase = PreloaderPhase::Hidden;
                for callback in self.callbacks.drain(..) {
                    callback();
                }
                info!("Preloader hidden");
                return true;
            }
        }
        false
    }

    pub fn is_hidden(&self) -> bool {
        self.phase == PreloaderPhase::Hidden
    }

    pub fn opacity(&self, now: Instant) -> f64 {
        match self.phase {
            PreloaderPhase::Loading | PreloaderPhase::Completing { .. } => 1.0,
            PreloaderPhase::FadingOut { started } => {
                1.0 - progress_at(started, Duration::from_millis(self.config.fade_ms), now)
            }
            PreloaderPhase::Hidden => 0.0,
        }
    }

    pub fn view(&self, now: Instant) -> Option<PreloaderView> {
        (!self.is_hidden()).then(|| PreloaderView {
            logo: self.config.logo_text.clone(),
            progress: self.progress,
            opacity: self.opacity(now),
        })
    }
}
