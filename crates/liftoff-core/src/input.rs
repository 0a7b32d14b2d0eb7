//! Raw pointer and scroll sampling

/// Tracks the raw pointer position and page scroll offset and normalizes them.
///
/// Pointer coordinates map to [-1, 1] on both axes (positive X right,
/// positive Y down). The scroll offset maps to [0, 1] over the scrollable
/// height (`document_height - viewport_height`).
#[derive(Debug, Clone)]
pub struct InputSampler {
    viewport_width: f64,
    viewport_height: f64,
    document_height: f64,
    raw_offset: f64,
    target_progress: f64,
    pointer_x: f64,
    pointer_y: f64,
}

impl InputSampler {
    pub fn new(viewport_width: f64, viewport_height: f64, document_height: f64) -> Self {
        Self {
            viewport_width: viewport_width.max(1.0),
            viewport_height: viewport_height.max(1.0),
            document_height: document_height.max(0.0),
            raw_offset: 0.0,
            target_progress: 0.0,
            pointer_x: 0.0,
            pointer_y: 0.0,
        }
    }

    /// Scrollable height; zero when the document fits the viewport
    pub fn max_scroll(&self) -> f64 {
        (self.document_height - self.viewport_height).max(0.0)
    }

    /// Record a pointer position in viewport pixels
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.pointer_x = ((x / self.viewport_width - 0.5) * 2.0).clamp(-1.0, 1.0);
        self.pointer_y = ((y / self.viewport_height - 0.5) * 2.0).clamp(-1.0, 1.0);
    }

    /// Record a new scroll offset and return the delta from the previous one
    pub fn on_scroll(&mut self, offset: f64) -> f64 {
        let offset = offset.clamp(0.0, self.max_scroll());
        let delta = offset - self.raw_offset;
        self.raw_offset = offset;
        self.target_progress = self.offset_to_progress(offset);
        delta
    }

    /// Drop any restored offset and go back to the top of the page
    pub fn force_top(&mut self) {
        self.raw_offset = 0.0;
        self.target_progress = 0.0;
    }

    /// New viewport and document size; the offset is clamped to the new range
    pub fn resize(&mut self, viewport_width: f64, viewport_height: f64, document_height: f64) {
        self.viewport_width = viewport_width.max(1.0);
        self.viewport_height = viewport_height.max(1.0);
        self.document_height = document_height.max(0.0);
        self.raw_offset = self.raw_offset.clamp(0.0, self.max_scroll());
        self.target_progress = self.offset_to_progress(self.raw_offset);
    }

    pub fn offset_to_progress(&self, offset: f64) -> f64 {
        let max = self.max_scroll();
        if max > 0.0 {
            (offset / max).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn progress_to_offset(&self, progress: f64) -> f64 {
        progress.clamp(0.0, 1.0) * self.max_scroll()
    }

    pub fn raw_offset(&self) -> f64 {
        self.raw_offset
    }

    pub fn target_progress(&self) -> f64 {
        self.target_progress
    }

    /// Normalized pointer position
    pub fn pointer(&self) -> (f64, f64) {
        (self.pointer_x, self.pointer_y)
    }

    pub fn viewport(&self) -> (f64, f64) {
        (self.viewport_width, self.viewport_height)
    }

    pub fn aspect(&self) -> f64 {
        self.viewport_width / self.viewport_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_normalization() {
        let mut input = InputSampler::new(800.0, 600.0, 3000.0);
        input.on_pointer_move(400.0, 300.0);
        assert_eq!(input.pointer(), (0.0, 0.0));
        input.on_pointer_move(800.0, 0.0);
        assert_eq!(input.pointer(), (1.0, -1.0));
        input.on_pointer_move(-100.0, 900.0);
        assert_eq!(input.pointer(), (-1.0, 1.0));
    }

    #[test]
    fn test_scroll_progress_and_delta() {
        let mut input = InputSampler::new(800.0, 1000.0, 3000.0);
        assert_eq!(input.max_scroll(), 2000.0);
        assert_eq!(input.on_scroll(500.0), 500.0);
        assert!((input.target_progress() - 0.25).abs() < 1e-9);
        assert_eq!(input.on_scroll(400.0), -100.0);
        input.on_scroll(10_000.0);
        assert_eq!(input.target_progress(), 1.0);
        assert_eq!(input.raw_offset(), 2000.0);
    }

    #[test]
    fn test_unscrollable_document_reads_zero() {
        let mut input = InputSampler::new(800.0, 1000.0, 500.0);
        input.on_scroll(300.0);
        assert_eq!(input.target_progress(), 0.0);
        assert_eq!(input.progress_to_offset(0.7), 0.0);
    }

    #[test]
    fn test_force_top() {
        let mut input = InputSampler::new(800.0, 600.0, 10_000.0);
        input.on_scroll(5000.0);
        input.force_top();
        assert_eq!(input.raw_offset(), 0.0);
        assert_eq!(input.target_progress(), 0.0);
    }

    #[test]
    fn test_resize_clamps_offset() {
        let mut input = InputSampler::new(800.0, 600.0, 3600.0);
        input.on_scroll(3000.0);
        input.resize(800.0, 600.0, 2600.0);
        assert_eq!(input.raw_offset(), 2000.0);
        assert_eq!(input.target_progress(), 1.0);
    }
}
