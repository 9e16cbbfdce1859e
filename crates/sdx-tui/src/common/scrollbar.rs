//! Transcript scrollbar with a fixed thumb length.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

const THUMB_SYMBOL: &str = "█";
const TRACK_SYMBOL: &str = "│";

/// Vertical scrollbar drawn on the right edge of its area.
#[derive(Debug, Clone)]
pub struct Scrollbar {
    total_lines: usize,
    viewport_height: usize,
    /// Lines hidden above the viewport.
    scroll_offset: usize,
}

impl Scrollbar {
    pub fn new(total_lines: usize, viewport_height: usize, scroll_offset: usize) -> Self {
        Self {
            total_lines,
            viewport_height,
            scroll_offset,
        }
    }

    fn should_display(&self) -> bool {
        self.total_lines > self.viewport_height
    }

    /// Returns (thumb_start, thumb_len) for a track of `track_len` rows.
    fn thumb(&self, track_len: usize) -> Option<(usize, usize)> {
        let max_scroll = self.total_lines.saturating_sub(self.viewport_height);
        if track_len == 0 || max_scroll == 0 {
            return None;
        }
        let viewport_len = self.viewport_height.min(track_len);
        let thumb_len = (track_len * viewport_len / self.total_lines.max(1)).clamp(1, track_len);
        let available = track_len - thumb_len;
        let thumb_start = self.scroll_offset.min(max_scroll) * available / max_scroll;
        Some((thumb_start, thumb_len))
    }
}

impl Widget for Scrollbar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.should_display() {
            return;
        }
        let Some((start, len)) = self.thumb(area.height as usize) else {
            return;
        };

        let x = area.x + area.width.saturating_sub(1);
        let style = Style::default().fg(Color::DarkGray);
        for (idx, y) in (area.y..area.y + area.height).enumerate() {
            let symbol = if idx >= start && idx < start + len {
                THUMB_SYMBOL
            } else {
                TRACK_SYMBOL
            };
            buf.set_string(x, y, symbol, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_when_content_fits() {
        assert!(!Scrollbar::new(10, 20, 0).should_display());
        assert!(!Scrollbar::new(20, 20, 0).should_display());
        assert!(Scrollbar::new(21, 20, 0).should_display());
    }

    #[test]
    fn test_thumb_reaches_bottom_at_max_scroll() {
        let bar = Scrollbar::new(100, 20, 80);
        let (start, len) = bar.thumb(20).unwrap();
        assert_eq!(start + len, 20);
    }

    #[test]
    fn test_thumb_at_top() {
        let bar = Scrollbar::new(100, 20, 0);
        let (start, len) = bar.thumb(20).unwrap();
        assert_eq!(start, 0);
        assert_eq!(len, 4);
    }
}
