use serde::Serialize;

use crate::config::SequenceConfig;
use crate::error::{Error, Result};

/// Absorbs float error when a progress value sits exactly on a section boundary
const BOUNDARY_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuxItem {
    pub label: String,
    /// Stagger delay in [0, 1)
    pub delay: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub subtitle: String,
    pub items: Vec<AuxItem>,
    pub depth_multiplier: f64,
}

impl Section {
    /// Number of characters revealed when this section fades in
    pub fn reveal_len(&self) -> usize {
        self.title.chars().count() + self.subtitle.chars().count()
    }
}

/// Discrete position within the section list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionPosition {
    pub index: usize,
    /// Progress inside the section, in [0, 1)
    pub progress: f64,
}

/// Map overall progress to a section index and intra-section progress.
///
/// `sectionFloat = progress × (count − 1)`; the index is its floor clamped
/// to the last section, so progress 1 lands on `(count − 1, 0)`.
pub fn compute_section(progress: f64, count: usize) -> SectionPosition {
    if count <= 1 {
        return SectionPosition { index: 0, progress: 0.0 };
    }
    let last = count - 1;
    let float = progress.clamp(0.0, 1.0) * last as f64;
    let index = ((float + BOUNDARY_EPSILON).floor() as usize).min(last);
    SectionPosition {
        index,
        progress: (float - index as f64).clamp(0.0, 1.0 - f64::EPSILON),
    }
}

/// Ordered, fixed list of content sections
#[derive(Debug, Clone)]
pub struct SectionSequence {
    sections: Vec<Section>,
    marker_offset: f64,
}

impl SectionSequence {
    pub fn new(sections: Vec<Section>, marker_offset: f64) -> Result<Self> {
        if sections.is_empty() {
            return Err(Error::Config("a sequence needs at least one section".into()));
        }
        Ok(Self {
            sections,
            marker_offset: marker_offset.clamp(0.0, 1.0 - f64::EPSILON),
        })
    }

    pub fn from_config(config: &SequenceConfig) -> Result<Self> {
        let sections = config
            .sections
            .iter()
            .map(|s| Section {
                title: s.title.clone(),
                subtitle: s.subtitle.clone(),
                items: s
                    .items
                    .iter()
                    .map(|i| AuxItem {
                        label: i.label.clone(),
                        delay: i.delay,
                    })
                    .collect(),
                depth_multiplier: s.depth_multiplier,
            })
            .collect();
        Self::new(sections, config.marker_offset)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 == self.sections.len()
    }

    pub fn compute(&self, progress: f64) -> SectionPosition {
        compute_section(progress, self.sections.len())
    }

    /// Progress at which a section begins
    pub fn start_progress(&self, index: usize) -> f64 {
        let last = self.sections.len().saturating_sub(1);
        if last == 0 {
            0.0
        } else {
            (index.min(last) as f64 / last as f64).min(1.0)
        }
    }

    /// Progress a marker sits at (section start plus the configured offset)
    pub fn marker_progress(&self, index: usize) -> f64 {
        let last = self.sections.len().saturating_sub(1);
        if last == 0 {
            0.0
        } else {
            ((index.min(last) as f64 + self.marker_offset) / last as f64).min(1.0)
        }
    }

    pub fn markers(&self) -> Vec<f64> {
        (0..self.sections.len()).map(|i| self.marker_progress(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_compute_section_endpoints() {
        assert_eq!(compute_section(0.0, 5), SectionPosition { index: 0, progress: 0.0 });
        assert_eq!(compute_section(1.0, 5), SectionPosition { index: 4, progress: 0.0 });
        let mid = compute_section(0.6, 5);
        assert_eq!(mid.index, 2);
        assert!((mid.progress - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_compute_section_monotonic_and_covering() {
        let mut seen = [false; 5];
        let mut prev = 0;
        for i in 0..=1000 {
            let pos = compute_section(i as f64 / 1000.0, 5);
            assert!(pos.index >= prev);
            assert!((0.0..1.0).contains(&pos.progress));
            seen[pos.index] = true;
            prev = pos.index;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_exact_boundaries_land_on_section() {
        for n in 2..12 {
            let seq = SectionSequence::new(
                (0..n)
                    .map(|i| Section {
                        title: format!("S{i}"),
                        subtitle: String::new(),
                        items: Vec::new(),
                        depth_multiplier: 1.0,
                    })
                    .collect(),
                0.0,
            )
            .unwrap();
            for i in 0..n {
                assert_eq!(seq.compute(seq.start_progress(i)).index, i, "n={n} i={i}");
            }
        }
    }

    #[test]
    fn test_single_section() {
        assert_eq!(compute_section(0.7, 1), SectionPosition { index: 0, progress: 0.0 });
    }

    #[test]
    fn test_marker_progress_with_offset() {
        let mut config = AppConfig::default().sequence;
        config.marker_offset = 0.5;
        let seq = SectionSequence::from_config(&config).unwrap();
        assert!((seq.marker_progress(1) - 0.375).abs() < 1e-9);
        assert_eq!(seq.marker_progress(4), 1.0);
        assert_eq!(seq.compute(seq.marker_progress(1)).index, 1);
    }

    #[test]
    fn test_empty_sequence_is_rejected() {
        assert!(SectionSequence::new(Vec::new(), 0.0).is_err());
    }
}
