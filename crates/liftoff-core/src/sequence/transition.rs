//! Text transition state machine
//!
//! Arriving at a new section fades the current text out for a fixed
//! wall-clock period, swaps it, and reveals the new text character by
//! character. At most one deferred swap exists at a time; every new
//! transition replaces it. Explicit jumps pin the target section until the
//! scroll position catches up with it.

use std::time::{Duration, Instant};

use tracing::debug;

use super::reveal::CharReveal;
use super::section::{SectionPosition, SectionSequence};
use crate::config::SequenceConfig;
use crate::error::{Error, Result};
use crate::motion::timing::progress_at;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionState {
    Idle,
    FadingOut {
        started: Instant,
        /// Text opacity when the fade began
        from_opacity: f64,
    },
    FadingIn {
        reveal: CharReveal,
    },
}

/// Fieldless view of [`TransitionState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Idle,
    FadingOut,
    FadingIn,
}

impl TransitionState {
    pub fn phase(&self) -> TransitionPhase {
        match self {
            TransitionState::Idle => TransitionPhase::Idle,
            TransitionState::FadingOut { .. } => TransitionPhase::FadingOut,
            TransitionState::FadingIn { .. } => TransitionPhase::FadingIn,
        }
    }
}

/// The one owned deferred text swap
#[derive(Debug, Clone, Copy, PartialEq)]
struct DeferredSwap {
    due: Instant,
    target: usize,
}

/// Snapshot of the sequencer handed to drivers each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionView {
    /// Section derived from the current scroll progress
    pub position: SectionPosition,
    /// Section whose text is on screen
    pub displayed: usize,
    pub state: TransitionState,
    /// Container opacity of the text layer
    pub text_opacity: f64,
    pub jump_target: Option<usize>,
    pub intro_started: Option<Instant>,
    pub count: usize,
}

impl SectionView {
    pub fn is_last(&self) -> bool {
        self.displayed + 1 == self.count
    }

    /// Current reveal, if the text is fading in
    pub fn reveal(&self) -> Option<&CharReveal> {
        match &self.state {
            TransitionState::FadingIn { reveal } => Some(reveal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SectionSequencer {
    sequence: SectionSequence,
    config: SequenceConfig,
    state: TransitionState,
    pending: Option<DeferredSwap>,
    /// `None` until the first frame
    displayed: Option<usize>,
    /// Destination of the latest transition
    arrival: usize,
    position: SectionPosition,
    jump_target: Option<usize>,
    intro_started: Option<Instant>,
    swap_count: u64,
}

impl SectionSequencer {
    pub fn new(sequence: SectionSequence, config: SequenceConfig) -> Self {
        Self {
            sequence,
            config,
            state: TransitionState::Idle,
            pending: None,
            displayed: None,
            arrival: 0,
            position: SectionPosition {
                index: 0,
                progress: 0.0,
            },
            jump_target: None,
            intro_started: None,
            swap_count: 0,
        }
    }

    pub fn from_config(config: &SequenceConfig) -> Result<Self> {
        Ok(Self::new(SectionSequence::from_config(config)?, config.clone()))
    }

    pub fn sequence(&self) -> &SectionSequence {
        &self.sequence
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn displayed(&self) -> usize {
        self.displayed.unwrap_or(0)
    }

    pub fn jump_target(&self) -> Option<usize> {
        self.jump_target
    }

    pub fn has_pending_swap(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of text swaps performed so far
    pub fn swap_count(&self) -> u64 {
        self.swap_count
    }

    fn fade_out(&self) -> Duration {
        Duration::from_millis(self.config.fade_out_ms)
    }

    /// Advance the sequencer for this frame's smoothed progress
    pub fn update(&mut self, progress: f64, now: Instant) -> SectionView {
        self.position = self.sequence.compute(progress);
        let index = self.position.index;

        if self.displayed.is_none() {
            // First frame: set directly, the intro reveal shows it later
            self.displayed = Some(index);
            self.arrival = index;
        }

        match self.jump_target {
            Some(target) if index == target => {
                debug!(section = target, "Jump arrived");
                self.jump_target = None;
            }
            Some(_) => {}
            None => {
                if index != self.arrival {
                    self.begin_transition(index, now);
                }
            }
        }

        self.fire_due_swap(now);

        if let TransitionState::FadingIn { reveal } = &self.state {
            if reveal.is_complete(now) {
                self.state = TransitionState::Idle;
            }
        }

        self.view(now)
    }

    /// Jump to a section from outside the scroll flow (marker click).
    ///
    /// Returns the scroll progress the host has to scroll to. Scroll-driven
    /// section changes are ignored until the scroll position reaches it.
    pub fn request_section(&mut self, index: usize, now: Instant) -> Result<f64> {
        let count = self.sequence.len();
        if index >= count {
            return Err(Error::InvalidSection { index, count });
        }

        if self.displayed.is_none() {
            self.displayed = Some(self.position.index);
            self.arrival = self.position.index;
        }

        self.jump_target = (self.position.index != index).then_some(index);
        if index != self.arrival {
            self.begin_transition(index, now);
        }
        debug!(section = index, "Section requested");
        Ok(self.sequence.marker_progress(index))
    }

    /// One-shot reveal of the first displayed section
    pub fn reveal_intro(&mut self, now: Instant) {
        if self.intro_started.is_some() {
            return;
        }
        self.intro_started = Some(now);
        let displayed = self.displayed();
        self.displayed = Some(displayed);
        if self.pending.is_none() {
            self.state = TransitionState::FadingIn {
                reveal: self.reveal_for(displayed, now),
            };
        }
        debug!(section = displayed, "Intro reveal started");
    }

    pub fn intro_started(&self) -> Option<Instant> {
        self.intro_started
    }

    /// Container opacity of the text layer at `now`
    pub fn text_opacity(&self, now: Instant) -> f64 {
        if self.intro_started.is_none() {
            return 0.0;
        }
        match &self.state {
            TransitionState::Idle | TransitionState::FadingIn { .. } => 1.0,
            TransitionState::FadingOut {
                started,
                from_opacity,
            } => from_opacity * (1.0 - progress_at(*started, self.fade_out(), now)),
        }
    }

    pub fn view(&self, now: Instant) -> SectionView {
        SectionView {
            position: self.position,
            displayed: self.displayed(),
            state: self.state,
            text_opacity: self.text_opacity(now),
            jump_target: self.jump_target,
            intro_started: self.intro_started,
            count: self.sequence.len(),
        }
    }

    /// Cancel whatever is pending and start fading toward `target`
    fn begin_transition(&mut self, target: usize, now: Instant) {
        let from_opacity = self.text_opacity(now);
        if let Some(old) = self.pending.take() {
            debug!(from = old.target, to = target, "Pending swap superseded");
        }
        self.arrival = target;
        self.state = TransitionState::FadingOut {
            started: now,
            from_opacity,
        };
        self.pending = Some(DeferredSwap {
            due: now + self.fade_out(),
            target,
        });
    }

    fn fire_due_swap(&mut self, now: Instant) {
        let Some(swap) = self.pending else {
            return;
        };
        if now < swap.due {
            return;
        }
        self.pending = None;
        self.displayed = Some(swap.target);
        self.swap_count += 1;
        self.state = TransitionState::FadingIn {
            reveal: self.reveal_for(swap.target, now),
        };
        debug!(section = swap.target, "Section text swapped");
    }

    fn reveal_for(&self, index: usize, now: Instant) -> CharReveal {
        let len = self.sequence.get(index).map_or(0, |s| s.reveal_len());
        CharReveal::from_config(&self.config, now, len)
    }
}
