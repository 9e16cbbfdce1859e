//! Transcript rendering.

use chrono::Local;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use sdx_core::session::{ChatEntry, ChatKind, SessionState};
use unicode_width::UnicodeWidthStr;

use super::state::TranscriptState;
use crate::common::{Scrollbar, wrap_text};

/// Width reserved for the scrollbar on the right side.
pub const SCROLLBAR_WIDTH: u16 = 1;

/// Horizontal margin on each side of the transcript.
pub const TRANSCRIPT_MARGIN: u16 = 1;

fn entry_style(kind: ChatKind) -> (&'static str, Style) {
    match kind {
        ChatKind::User => ("you", Style::default().fg(Color::Cyan)),
        ChatKind::Bot => ("bot", Style::default().fg(Color::Green)),
        ChatKind::Error => (
            "err",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    }
}

/// Renders one entry as wrapped lines with a timestamped label.
fn entry_lines(entry: &ChatEntry, width: usize) -> Vec<Line<'static>> {
    let (label, style) = entry_style(entry.kind);
    let time = entry.created_at.with_timezone(&Local).format("%H:%M");
    let prefix = format!("{time} {label} ");
    let prefix_width = prefix.width();
    let indent = " ".repeat(prefix_width);

    let text_style = match entry.kind {
        ChatKind::Error => Style::default().fg(Color::Red),
        _ => Style::default(),
    };

    wrap_text(&entry.text, width.saturating_sub(prefix_width))
        .into_iter()
        .enumerate()
        .map(|(idx, text)| {
            let lead = if idx == 0 {
                Span::styled(prefix.clone(), style.add_modifier(Modifier::DIM))
            } else {
                Span::raw(indent.clone())
            };
            Line::from(vec![lead, Span::styled(text, text_style)])
        })
        .collect()
}

/// Wraps the whole transcript to `width` columns.
pub fn transcript_lines(session: &SessionState, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (idx, entry) in session.history().iter().enumerate() {
        if idx > 0 {
            lines.push(Line::default());
        }
        lines.extend(entry_lines(entry, width));
    }
    lines
}

/// Content width for a transcript area of `area_width` columns.
pub fn content_width(area_width: u16) -> usize {
    area_width.saturating_sub(TRANSCRIPT_MARGIN * 2 + SCROLLBAR_WIDTH) as usize
}

/// Renders the visible slice of the transcript, bottom-aligned.
pub fn render_transcript(
    transcript: &TranscriptState,
    session: &SessionState,
    frame: &mut Frame,
    area: Rect,
) {
    let width = content_width(area.width);
    let height = area.height as usize;
    let all_lines = transcript_lines(session, width);
    let total = all_lines.len();
    let offset = transcript.top_offset(total, height);

    let mut visible: Vec<Line<'static>> = all_lines.into_iter().skip(offset).take(height).collect();
    if visible.len() < height {
        let mut padded = vec![Line::default(); height - visible.len()];
        padded.append(&mut visible);
        visible = padded;
    }

    let content_area = Rect {
        x: area.x + TRANSCRIPT_MARGIN,
        y: area.y,
        width: width as u16,
        height: area.height,
    };
    frame.render_widget(Paragraph::new(visible), content_area);
    frame.render_widget(Scrollbar::new(total, height, offset), area);
}
