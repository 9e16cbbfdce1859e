//! Input feature reducer.
//!
//! Maps key presses onto session operations. Editing keys change the pending
//! symptom; the rest add, remove, or diagnose.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sdx_core::session::SessionState;

use super::state::InputState;
use crate::effects::UiEffect;

/// Handles a key press that was not consumed by global bindings.
pub fn handle_main_key(
    input: &mut InputState,
    session: &mut SessionState,
    key: KeyEvent,
) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('d') if ctrl => request_diagnosis(session),
        KeyCode::Enter => {
            submit_symptom(input, session);
            vec![]
        }
        KeyCode::Tab => {
            complete_highlighted(input, session);
            vec![]
        }
        KeyCode::Up => {
            let available = InputState::suggestions(session).len();
            input.move_highlight(-1, available);
            vec![]
        }
        KeyCode::Down => {
            let available = InputState::suggestions(session).len();
            input.move_highlight(1, available);
            vec![]
        }
        KeyCode::Left if input.buffer.is_empty() => {
            input.focus_prev_chip(session.selected().len());
            vec![]
        }
        KeyCode::Right if input.buffer.is_empty() => {
            input.focus_next_chip(session.selected().len());
            vec![]
        }
        KeyCode::Backspace | KeyCode::Delete if input.buffer.is_empty() => {
            remove_chip(input, session);
            vec![]
        }
        _ => {
            if input.buffer.input(key) {
                sync_pending(input, session);
            }
            vec![]
        }
    }
}

/// Handles pasted text as typed input.
pub fn handle_paste(input: &mut InputState, session: &mut SessionState, text: &str) {
    input.buffer.insert_str(text);
    sync_pending(input, session);
}

/// Starts a diagnosis when idle. The session records validation errors.
fn request_diagnosis(session: &mut SessionState) -> Vec<UiEffect> {
    match session.begin_diagnosis() {
        Ok(symptoms) => vec![UiEffect::RequestDiagnosis { symptoms }],
        Err(err) => {
            tracing::debug!(error = %err, "Diagnosis not started");
            vec![]
        }
    }
}

/// Adds the highlighted suggestion, or the typed text when nothing is highlighted.
fn submit_symptom(input: &mut InputState, session: &mut SessionState) {
    if let Some(name) = input.highlighted_suggestion(session).map(str::to_string) {
        session.select_pending_symptom(name);
    }
    session.add_symptom();

    // A rejected add leaves the pending text in place
    input.buffer.set_text(session.pending_symptom());
    input.highlighted = None;
}

fn complete_highlighted(input: &mut InputState, session: &mut SessionState) {
    let name = input
        .highlighted_suggestion(session)
        .or_else(|| {
            let first = InputState::suggestions(session).into_iter().next()?;
            session.catalog().get(first.index)
        })
        .map(str::to_string);

    if let Some(name) = name {
        input.buffer.set_text(&name);
        session.select_pending_symptom(name);
        input.highlighted = None;
    }
}

/// Removes the focused chip, or the last one when none is focused.
fn remove_chip(input: &mut InputState, session: &mut SessionState) {
    let count = session.selected().len();
    if count == 0 {
        return;
    }
    let index = input.focused_chip.unwrap_or(count - 1).min(count - 1);
    let Some(name) = session.selected().as_slice().get(index).cloned() else {
        return;
    };
    session.remove_symptom(&name);
    input.clamp_chip_focus(session.selected().len());
}

fn sync_pending(input: &mut InputState, session: &mut SessionState) {
    session.select_pending_symptom(input.buffer.text());
    input.reset_focus();
}
