//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{input, render, transcript};

/// Effects to run once at startup.
pub fn init(app: &mut AppState) -> Vec<UiEffect> {
    app.catalog_loading = true;
    vec![UiEffect::LoadCatalog]
}

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Frame { width, height } => {
            handle_frame(app, width, height);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::CatalogLoaded(result) => {
            app.catalog_loading = false;
            // Failure is recorded on the session and shown in the banner
            let _ = app.session.apply_catalog(result);
            app.input.highlighted = None;
            vec![]
        }
        UiEvent::DiagnosisCompleted(result) => {
            let _ = app.session.complete_diagnosis(result);
            vec![]
        }
    }
}

fn handle_frame(app: &mut AppState, width: u16, height: u16) {
    let viewport_height = render::transcript_height(app, width, height);
    let content_width = transcript::content_width(width);
    let total_lines = transcript::transcript_lines(&app.session, content_width).len();
    app.transcript
        .update_layout(total_lines, viewport_height as usize);
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Paste(text) => {
            input::handle_paste(&mut app.input, &mut app.session, &text);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => vec![UiEffect::Quit],
        KeyCode::PageUp => {
            app.transcript.page_up();
            vec![]
        }
        KeyCode::PageDown => {
            app.transcript.page_down();
            vec![]
        }
        KeyCode::Esc => {
            app.input.reset_focus();
            vec![]
        }
        _ => input::handle_main_key(&mut app.input, &mut app.session, key),
    }
}

#[cfg(test)]
mod tests {
    use sdx_core::service::{Diagnosis, ServiceError};
    use sdx_core::session::{
        ChatKind, DIAGNOSIS_FALLBACK_MESSAGE, NO_SYMPTOMS_MESSAGE, WELCOME_MESSAGE,
    };

    use super::*;

    fn app() -> AppState {
        AppState::new("http://localhost:5001")
    }

    fn app_with_catalog(names: &[&str]) -> AppState {
        let mut app = app();
        let effects = init(&mut app);
        assert_eq!(effects, vec![UiEffect::LoadCatalog]);
        update(
            &mut app,
            UiEvent::CatalogLoaded(Ok(names.iter().map(|s| (*s).to_string()).collect())),
        );
        app
    }

    fn press(app: &mut AppState, code: KeyCode) -> Vec<UiEffect> {
        press_with(app, code, KeyModifiers::NONE)
    }

    fn press_with(app: &mut AppState, code: KeyCode, modifiers: KeyModifiers) -> Vec<UiEffect> {
        update(
            app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(code, modifiers))),
        )
    }

    fn type_text(app: &mut AppState, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn selected(app: &AppState) -> Vec<&str> {
        app.session.selected().iter().collect()
    }

    #[test]
    fn test_catalog_loaded_welcomes() {
        let app = app_with_catalog(&["fever", "cough"]);
        assert!(!app.catalog_loading);
        assert_eq!(app.session.history()[0].text, WELCOME_MESSAGE);
    }

    #[test]
    fn test_catalog_failure_sets_banner() {
        let mut app = app();
        init(&mut app);
        update(
            &mut app,
            UiEvent::CatalogLoaded(Err(ServiceError::transport("connection refused"))),
        );
        assert!(!app.catalog_loading);
        assert_eq!(
            app.session.last_error(),
            Some("Failed to load available symptoms: connection refused")
        );
    }

    #[test]
    fn test_typing_updates_pending_symptom() {
        let mut app = app_with_catalog(&["fever"]);
        type_text(&mut app, "fev");
        assert_eq!(app.session.pending_symptom(), "fev");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.session.pending_symptom(), "fe");
    }

    #[test]
    fn test_enter_adds_typed_symptom() {
        let mut app = app_with_catalog(&[]);
        type_text(&mut app, "made up");
        press(&mut app, KeyCode::Enter);

        assert_eq!(selected(&app), vec!["made up"]);
        assert!(app.input.buffer.is_empty());
        assert_eq!(app.session.pending_symptom(), "");
    }

    #[test]
    fn test_enter_accepts_highlighted_suggestion() {
        let mut app = app_with_catalog(&["fever", "cough", "high_fever"]);
        type_text(&mut app, "hig");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(selected(&app), vec!["high_fever"]);
        assert!(app.input.buffer.is_empty());
        assert_eq!(app.input.highlighted, None);
    }

    #[test]
    fn test_tab_completes_first_suggestion() {
        let mut app = app_with_catalog(&["fever", "cough"]);
        type_text(&mut app, "cou");
        press(&mut app, KeyCode::Tab);

        assert_eq!(app.input.buffer.text(), "cough");
        assert_eq!(app.session.pending_symptom(), "cough");
        assert!(selected(&app).is_empty());
    }

    #[test]
    fn test_duplicate_enter_keeps_text() {
        let mut app = app_with_catalog(&[]);
        type_text(&mut app, "fever");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "fever");
        press(&mut app, KeyCode::Enter);

        assert_eq!(selected(&app), vec!["fever"]);
        assert_eq!(app.input.buffer.text(), "fever");
        assert_eq!(app.session.history().len(), 2);
    }

    #[test]
    fn test_backspace_on_empty_input_removes_last_chip() {
        let mut app = app_with_catalog(&[]);
        for name in ["fever", "cough"] {
            type_text(&mut app, name);
            press(&mut app, KeyCode::Enter);
        }

        press(&mut app, KeyCode::Backspace);
        assert_eq!(selected(&app), vec!["fever"]);
        let last = app.session.history().last().unwrap();
        assert_eq!(last.text, "Removed symptom: cough");
    }

    #[test]
    fn test_focused_chip_is_removed() {
        let mut app = app_with_catalog(&[]);
        for name in ["fever", "cough", "chills"] {
            type_text(&mut app, name);
            press(&mut app, KeyCode::Enter);
        }

        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.input.focused_chip, Some(1));
        press(&mut app, KeyCode::Delete);

        assert_eq!(selected(&app), vec!["fever", "chills"]);
        assert_eq!(app.input.focused_chip, Some(1));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input.focused_chip, None);
    }

    #[test]
    fn test_ctrl_d_without_symptoms_shows_banner() {
        let mut app = app_with_catalog(&["fever"]);
        let effects = press_with(&mut app, KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert!(effects.is_empty());
        assert_eq!(app.session.last_error(), Some(NO_SYMPTOMS_MESSAGE));
        assert!(!app.session.is_pending());
    }

    #[test]
    fn test_diagnosis_round_trip() {
        let mut app = app_with_catalog(&["fever", "cough"]);
        for name in ["fever", "cough"] {
            type_text(&mut app, name);
            press(&mut app, KeyCode::Enter);
        }

        let effects = press_with(&mut app, KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert_eq!(
            effects,
            vec![UiEffect::RequestDiagnosis {
                symptoms: vec!["fever".to_string(), "cough".to_string()]
            }]
        );
        assert!(app.session.is_pending());

        // Second request while pending is ignored
        let effects = press_with(&mut app, KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert!(effects.is_empty());

        update(
            &mut app,
            UiEvent::DiagnosisCompleted(Ok(Diagnosis {
                diagnosis: "flu".to_string(),
                symptoms: vec![],
            })),
        );
        assert!(!app.session.is_pending());
        assert_eq!(app.session.last_diagnosis(), Some("flu"));
        assert_eq!(app.session.history().last().unwrap().kind, ChatKind::Bot);
    }

    #[test]
    fn test_diagnosis_failure_appends_error() {
        let mut app = app_with_catalog(&[]);
        type_text(&mut app, "fever");
        press(&mut app, KeyCode::Enter);
        press_with(&mut app, KeyCode::Char('d'), KeyModifiers::CONTROL);

        update(
            &mut app,
            UiEvent::DiagnosisCompleted(Err(ServiceError::transport("reset"))),
        );
        assert!(!app.session.is_pending());
        assert_eq!(app.session.last_error(), Some(DIAGNOSIS_FALLBACK_MESSAGE));
        assert_eq!(app.session.history().last().unwrap().kind, ChatKind::Error);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = app();
        let effects = press_with(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(effects, vec![UiEffect::Quit]);
    }

    #[test]
    fn test_paste_is_inserted() {
        let mut app = app();
        update(&mut app, UiEvent::Terminal(Event::Paste("skin\nrash".into())));
        assert_eq!(app.session.pending_symptom(), "skin rash");
    }

    #[test]
    fn test_frame_then_page_up_scrolls() {
        let mut app = app_with_catalog(&[]);
        for idx in 0..30 {
            type_text(&mut app, &format!("symptom {idx}"));
            press(&mut app, KeyCode::Enter);
        }
        update(
            &mut app,
            UiEvent::Frame {
                width: 80,
                height: 24,
            },
        );
        assert!(app.transcript.is_following());
        press(&mut app, KeyCode::PageUp);
        assert!(!app.transcript.is_following());
        press(&mut app, KeyCode::PageDown);
        assert!(app.transcript.is_following());
    }
}
