//! Input slice rendering: editor box, suggestion list, and symptom chips.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use sdx_core::session::SessionState;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::state::InputState;
use crate::common::text::truncate_with_ellipsis;

/// Editor box height (one text line plus borders).
pub const INPUT_HEIGHT: u16 = 3;

/// Maximum rows used by the chip area.
const MAX_CHIP_ROWS: usize = 3;

const CHIP_GAP: usize = 1;

/// Rows needed for the chips at `width`.
pub fn chips_height(session: &SessionState, width: u16) -> u16 {
    chip_rows(session.selected().as_slice(), width as usize)
        .len()
        .min(MAX_CHIP_ROWS) as u16
}

/// Rows needed for the suggestion list.
pub fn suggestions_height(session: &SessionState) -> u16 {
    InputState::suggestions(session).len() as u16
}

/// Renders the editor box with the cursor.
pub fn render_input(input: &InputState, session: &SessionState, frame: &mut Frame, area: Rect) {
    let border_color = if session.is_pending() {
        Color::DarkGray
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Line::from(Span::styled(
            " Symptom ",
            Style::default().fg(Color::DarkGray),
        )));
    let inner = block.inner(area);

    let (visible, cursor_x) = visible_window(
        input.buffer.text(),
        input.buffer.cursor(),
        inner.width as usize,
    );

    let content = if visible.is_empty() && input.buffer.is_empty() {
        Line::from(Span::styled(
            "Type a symptom and press Enter",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(visible)
    };

    frame.render_widget(Paragraph::new(content).block(block), area);

    if inner.width > 0 && inner.height > 0 {
        frame.set_cursor_position((inner.x + cursor_x as u16, inner.y));
    }
}

/// Renders the catalog suggestions for the pending symptom.
pub fn render_suggestions(
    input: &InputState,
    session: &SessionState,
    frame: &mut Frame,
    area: Rect,
) {
    if area.height == 0 {
        return;
    }
    let width = area.width.saturating_sub(2) as usize;
    let match_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let lines: Vec<Line<'static>> = InputState::suggestions(session)
        .iter()
        .enumerate()
        .filter_map(|(row, entry)| {
            let name = session.catalog().get(entry.index)?;
            let highlighted = input.highlighted == Some(row);
            let base = if highlighted {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::Gray)
            };
            let marker = if highlighted { "› " } else { "  " };

            let text = truncate_with_ellipsis(name, width);
            let mut spans = vec![Span::styled(marker, base)];
            for (byte_idx, ch) in text.char_indices() {
                let style = if entry.match_indices.contains(&byte_idx) {
                    base.patch(match_style)
                } else {
                    base
                };
                spans.push(Span::styled(ch.to_string(), style));
            }
            Some(Line::from(spans))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

/// Renders the selected symptoms as chips.
pub fn render_chips(input: &InputState, session: &SessionState, frame: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }
    let chip_style = Style::default().fg(Color::Black).bg(Color::Green);
    let focused_style = Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let lines: Vec<Line<'static>> = chip_rows(session.selected().as_slice(), area.width as usize)
        .into_iter()
        .take(area.height as usize)
        .map(|row| {
            let mut spans = Vec::new();
            for (index, label) in row {
                if !spans.is_empty() {
                    spans.push(Span::raw(" ".repeat(CHIP_GAP)));
                }
                let style = if input.focused_chip == Some(index) {
                    focused_style
                } else {
                    chip_style
                };
                spans.push(Span::styled(label, style));
            }
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

/// Packs chip labels into rows that fit `width`.
fn chip_rows(names: &[String], width: usize) -> Vec<Vec<(usize, String)>> {
    let mut rows: Vec<Vec<(usize, String)>> = Vec::new();
    let mut row_width = 0;

    for (index, name) in names.iter().enumerate() {
        let label = truncate_with_ellipsis(&format!(" {name} × "), width.max(1));
        let label_width = label.width();

        let fits = row_width == 0 || row_width + CHIP_GAP + label_width <= width;
        match rows.last_mut() {
            Some(row) if fits => {
                row_width += CHIP_GAP + label_width;
                row.push((index, label));
            }
            _ => {
                row_width = label_width;
                rows.push(vec![(index, label)]);
            }
        }
    }
    rows
}

/// Returns the tail of `text` that fits `width` with the cursor visible,
/// plus the cursor column within it.
fn visible_window(text: &str, cursor: usize, width: usize) -> (String, usize) {
    if width == 0 {
        return (String::new(), 0);
    }
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());

    // Scroll so the cursor column stays inside the box
    let mut start = 0;
    let mut before: usize = chars[..cursor].iter().map(|c| c.width().unwrap_or(0)).sum();
    while before >= width && start < cursor {
        before -= chars[start].width().unwrap_or(0);
        start += 1;
    }

    let mut visible = String::new();
    let mut used = 0;
    for ch in &chars[start..] {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        visible.push(*ch);
    }
    (visible, before)
}
