//! Text utilities for TUI rendering.
//!
//! Width calculations use terminal columns (unicode-width), so wide
//! characters are measured correctly.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncates `text` to `max_width` columns, ending with `…` when cut.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 1 {
        return "…".to_string();
    }
    let mut truncated = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width + 1 > max_width {
            break;
        }
        used += ch_width;
        truncated.push(ch);
    }
    truncated.push('…');
    truncated
}

/// Greedy word wrap to `width` columns.
///
/// Words longer than a full line are split. Always returns at least one line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();
        let needed = if current.is_empty() {
            word_width
        } else {
            current_width + 1 + word_width
        };

        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_width = needed;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width <= width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        // Hard-split a word wider than the line
        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width + ch_width > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += ch_width;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_with_ellipsis_short() {
        assert_eq!(truncate_with_ellipsis("fever", 10), "fever");
    }

    #[test]
    fn test_truncate_with_ellipsis_long() {
        assert_eq!(truncate_with_ellipsis("abdominal_pain", 6), "abdom…");
    }

    #[test]
    fn test_truncate_with_ellipsis_tiny_width() {
        assert_eq!(truncate_with_ellipsis("cough", 1), "…");
    }

    #[test]
    fn test_truncate_with_ellipsis_wide_chars() {
        // Each CJK char is two columns
        assert_eq!(truncate_with_ellipsis("頭痛発熱", 5), "頭痛…");
    }

    #[test]
    fn test_wrap_text_words() {
        let lines = wrap_text("Based on your symptoms, the possible diagnosis is: flu", 20);
        assert_eq!(
            lines,
            vec!["Based on your", "symptoms, the", "possible diagnosis", "is: flu"]
        );
    }

    #[test]
    fn test_wrap_text_splits_long_word() {
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_wrap_text_empty() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }
}
