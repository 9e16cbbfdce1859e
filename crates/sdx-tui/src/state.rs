//! Application state composition.
//!
//! ```text
//! AppState
//! ├── session: SessionState       (catalog, selection, transcript, request)
//! ├── input: InputState           (pending symptom editor, highlight, chip focus)
//! └── transcript: TranscriptState (scroll position, viewport)
//! ```
//!
//! `SessionState` is the single source of truth for session data. The TUI
//! slices only hold view state derived from user interaction.

use sdx_core::session::SessionState;

use crate::input::InputState;
use crate::transcript::TranscriptState;

pub struct AppState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    /// Diagnosis session data.
    pub session: SessionState,
    /// Pending symptom editor and selection focus.
    pub input: InputState,
    /// Transcript scroll state.
    pub transcript: TranscriptState,
    /// Base URL shown in the title bar.
    pub service_url: String,
    /// True until the first catalog result arrives.
    pub catalog_loading: bool,
    /// Spinner animation frame counter.
    pub spinner_frame: usize,
}

impl AppState {
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            should_quit: false,
            session: SessionState::new(),
            input: InputState::default(),
            transcript: TranscriptState::default(),
            service_url: service_url.into(),
            catalog_loading: false,
            spinner_frame: 0,
        }
    }
}
