//! Section layout, character reveal and the text transition state machine

pub mod reveal;
pub mod section;
pub mod transition;

pub use reveal::CharReveal;
pub use section::{compute_section, AuxItem, Section, SectionPosition, SectionSequence};
pub use transition::{SectionSequencer, SectionView, TransitionPhase, TransitionState};
