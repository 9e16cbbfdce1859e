//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui Frame, and never
//! mutate state or return effects.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::common::truncate_with_ellipsis;
use crate::state::AppState;
use crate::{input, transcript};

const TITLE_HEIGHT: u16 = 1;
const STATUS_HEIGHT: u16 = 1;

/// Spinner frames for status line animation.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Ticks per spinner frame.
const SPINNER_SPEED_DIVISOR: usize = 3;

struct Heights {
    banner: u16,
    chips: u16,
    suggestions: u16,
}

impl Heights {
    fn for_state(app: &AppState, width: u16) -> Self {
        Self {
            banner: u16::from(app.session.last_error().is_some()),
            chips: input::chips_height(&app.session, width),
            suggestions: input::suggestions_height(&app.session),
        }
    }

    fn fixed(&self) -> u16 {
        TITLE_HEIGHT
            + self.banner
            + self.chips
            + self.suggestions
            + input::INPUT_HEIGHT
            + STATUS_HEIGHT
    }
}

/// Rows available to the transcript for a terminal of `width` x `height`.
pub fn transcript_height(app: &AppState, width: u16, height: u16) -> u16 {
    height.saturating_sub(Heights::for_state(app, width).fixed())
}

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let heights = Heights::for_state(app, area.width);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(TITLE_HEIGHT),          // Title
            Constraint::Length(heights.banner),        // Error banner
            Constraint::Min(1),                        // Transcript
            Constraint::Length(heights.chips),         // Selected symptoms
            Constraint::Length(heights.suggestions),   // Catalog suggestions
            Constraint::Length(input::INPUT_HEIGHT),   // Input
            Constraint::Length(STATUS_HEIGHT),         // Status line
        ])
        .split(area);

    render_title(app, frame, chunks[0]);
    if heights.banner > 0 {
        render_banner(app, frame, chunks[1]);
    }
    transcript::render_transcript(&app.transcript, &app.session, frame, chunks[2]);
    input::render_chips(&app.input, &app.session, frame, chunks[3]);
    input::render_suggestions(&app.input, &app.session, frame, chunks[4]);
    input::render_input(&app.input, &app.session, frame, chunks[5]);
    render_status_line(app, frame, chunks[6]);
}

fn render_title(app: &AppState, frame: &mut Frame, area: Rect) {
    let catalog = if app.catalog_loading {
        "loading symptoms…".to_string()
    } else {
        format!("{} symptoms", app.session.catalog().len())
    };
    let right = format!("{} · {catalog}", app.service_url);
    let width = area.width as usize;

    let spans = vec![
        Span::styled(
            "SDX Symptom Checker",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            truncate_with_ellipsis(&right, width.saturating_sub(21)),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_banner(app: &AppState, frame: &mut Frame, area: Rect) {
    let Some(message) = app.session.last_error() else {
        return;
    };
    let text = truncate_with_ellipsis(&format!(" ⚠ {message}"), area.width as usize);
    let banner = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(Color::White).bg(Color::Red),
    )))
    .style(Style::default().bg(Color::Red));
    frame.render_widget(banner, area);
}

fn render_status_line(app: &AppState, frame: &mut Frame, area: Rect) {
    let hint = Style::default().fg(Color::DarkGray);

    let mut spans: Vec<Span> = if app.session.is_pending() {
        let spinner_idx = (app.spinner_frame / SPINNER_SPEED_DIVISOR) % SPINNER_FRAMES.len();
        vec![
            Span::styled(SPINNER_FRAMES[spinner_idx], Style::default().fg(Color::Yellow)),
            Span::raw(" "),
            Span::styled("Diagnosing...", Style::default().fg(Color::Yellow)),
            Span::raw("  "),
        ]
    } else if let Some(diagnosis) = app.session.last_diagnosis() {
        vec![
            Span::styled("Last diagnosis: ", hint),
            Span::styled(
                diagnosis.to_string(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
        ]
    } else {
        Vec::new()
    };

    spans.extend([
        Span::styled("Enter", hint),
        Span::raw(" add  "),
        Span::styled("Ctrl+D", hint),
        Span::raw(" diagnose  "),
        Span::styled("←/Bksp", hint),
        Span::raw(" remove  "),
        Span::styled("Ctrl+C", hint),
        Span::raw(" quit"),
    ]);

    let status = Paragraph::new(Line::from(spans)).alignment(Alignment::Left);
    frame.render_widget(status, area);
}
