//! Transcript scroll state.
//!
//! The transcript is bottom-anchored: `offset_from_bottom == 0` follows new
//! entries, any other value pins the view that many lines above the end.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptState {
    offset_from_bottom: usize,
    /// Wrapped line count at the last frame.
    total_lines: usize,
    /// Visible rows at the last frame.
    viewport_height: usize,
}

impl TranscriptState {
    /// Records layout from the latest frame and keeps the offset in range.
    pub fn update_layout(&mut self, total_lines: usize, viewport_height: usize) {
        self.total_lines = total_lines;
        self.viewport_height = viewport_height;
        self.offset_from_bottom = self.offset_from_bottom.min(self.max_offset());
    }

    pub fn is_following(&self) -> bool {
        self.offset_from_bottom == 0
    }

    pub fn page_up(&mut self) {
        let step = self.page_step();
        self.offset_from_bottom = (self.offset_from_bottom + step).min(self.max_offset());
    }

    pub fn page_down(&mut self) {
        self.offset_from_bottom = self.offset_from_bottom.saturating_sub(self.page_step());
    }

    /// Lines hidden above the viewport for `total_lines` and `viewport_height`.
    pub fn top_offset(&self, total_lines: usize, viewport_height: usize) -> usize {
        let max = total_lines.saturating_sub(viewport_height);
        max.saturating_sub(self.offset_from_bottom.min(max))
    }

    fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.viewport_height)
    }

    fn page_step(&self) -> usize {
        self.viewport_height.saturating_sub(1).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follows_by_default() {
        let state = TranscriptState::default();
        assert!(state.is_following());
        assert_eq!(state.top_offset(30, 10), 20);
    }

    #[test]
    fn test_page_up_and_down() {
        let mut state = TranscriptState::default();
        state.update_layout(30, 10);

        state.page_up();
        assert!(!state.is_following());
        assert_eq!(state.top_offset(30, 10), 11);

        state.page_up();
        state.page_up();
        // Clamped at the top
        assert_eq!(state.top_offset(30, 10), 0);

        state.page_down();
        state.page_down();
        state.page_down();
        assert!(state.is_following());
    }

    #[test]
    fn test_layout_shrink_clamps_offset() {
        let mut state = TranscriptState::default();
        state.update_layout(30, 10);
        state.page_up();
        state.update_layout(12, 10);
        assert_eq!(state.top_offset(12, 10), 0);
    }

    #[test]
    fn test_no_scroll_when_content_fits() {
        let mut state = TranscriptState::default();
        state.update_layout(5, 10);
        state.page_up();
        assert!(state.is_following());
    }
}
