//! Character-level text reveal

use std::time::{Duration, Instant};

use crate::config::{EasingType, SequenceConfig};
use crate::motion::easing::EasingTypeExt;
use crate::motion::timing::progress_at;

/// Staggered per-character fade/rise animation.
///
/// Character `i` starts `i × stagger` after `start` and takes
/// `char_duration` to finish.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharReveal {
    start: Instant,
    stagger: Duration,
    char_duration: Duration,
    easing: EasingType,
    len: usize,
}

impl CharReveal {
    pub fn new(
        start: Instant,
        len: usize,
        stagger: Duration,
        char_duration: Duration,
        easing: EasingType,
    ) -> Self {
        Self {
            start,
            stagger,
            char_duration,
            easing,
            len,
        }
    }

    pub fn from_config(config: &SequenceConfig, start: Instant, len: usize) -> Self {
        Self::new(
            start,
            len,
            Duration::from_millis(config.reveal_stagger_ms),
            Duration::from_millis(config.reveal_char_ms),
            config.reveal_easing,
        )
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn total_duration(&self) -> Duration {
        match self.len {
            0 => Duration::ZERO,
            n => self.stagger * (n as u32 - 1) + self.char_duration,
        }
    }

    /// Eased progress of one character; characters past the end read 1
    pub fn char_progress(&self, index: usize, now: Instant) -> f64 {
        if index >= self.len {
            return 1.0;
        }
        let char_start = self.start + self.stagger * index as u32;
        self.easing
            .apply(progress_at(char_start, self.char_duration, now))
    }

    pub fn char_opacity(&self, index: usize, now: Instant) -> f64 {
        self.char_progress(index, now)
    }

    /// Remaining fraction of the rise offset (1 = fully lowered, 0 = in place)
    pub fn char_rise(&self, index: usize, now: Instant) -> f64 {
        1.0 - self.char_progress(index, now)
    }

    pub fn overall_progress(&self, now: Instant) -> f64 {
        progress_at(self.start, self.total_duration(), now)
    }

    pub fn is_complete(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start) >= self.total_duration()
    }
}
