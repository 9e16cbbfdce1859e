//! Diagnosis session: selected symptoms, transcript, and request lifecycle.
//!
//! `SessionState` is the synchronous state machine. `SessionController`
//! drives it against a `SymptomService` for callers that simply await each
//! operation (line mode, one-shot commands). The TUI drives `SessionState`
//! directly from its reducer and runs requests as spawned effects.

mod catalog;
mod error;
mod state;

pub use catalog::{SymptomCatalog, SymptomMatch};
pub use error::{CatalogLoadError, DiagnosisError};
pub use state::{ChatEntry, ChatKind, SelectedSymptoms, SessionState};

use crate::service::{Diagnosis, SymptomService};

/// Bot greeting appended once the catalog has loaded.
pub const WELCOME_MESSAGE: &str = "Welcome! Please select your symptoms from the list below.";

/// Banner shown when a diagnosis is requested with nothing selected.
pub const NO_SYMPTOMS_MESSAGE: &str =
    "Please add at least one symptom before getting a diagnosis.";

/// Transcript error line for a failed diagnosis; also the banner fallback.
pub const DIAGNOSIS_FALLBACK_MESSAGE: &str = "Error getting diagnosis. Please try again.";

/// Banner shown when the catalog payload has the wrong shape.
pub const INVALID_CATALOG_MESSAGE: &str = "Invalid symptoms data received from server";

/// Owns a session and the service it talks to.
pub struct SessionController<S> {
    service: S,
    state: SessionState,
}

impl<S: SymptomService> SessionController<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: SessionState::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Fetches the catalog and applies it to the session.
    ///
    /// # Errors
    /// Returns `CatalogLoadError` if the fetch fails; the session stays usable.
    pub async fn load_catalog(&mut self) -> Result<&SymptomCatalog, CatalogLoadError> {
        let result = self.service.list_symptoms().await;
        self.state.apply_catalog(result)
    }

    pub fn select_pending_symptom(&mut self, name: impl Into<String>) {
        self.state.select_pending_symptom(name);
    }

    /// Adds the pending symptom. Returns true if the selection changed.
    pub fn add_symptom(&mut self) -> bool {
        self.state.add_symptom()
    }

    /// Removes `name`. Returns true if it was selected.
    pub fn remove_symptom(&mut self, name: &str) -> bool {
        self.state.remove_symptom(name)
    }

    /// Sends the selected symptoms for diagnosis and records the outcome.
    ///
    /// # Errors
    /// Returns `NoSymptoms` without calling the service when nothing is
    /// selected, or `Request` when the service call fails.
    pub async fn request_diagnosis(&mut self) -> Result<Diagnosis, DiagnosisError> {
        let symptoms = self.state.begin_diagnosis()?;
        let result = self.service.diagnose(&symptoms).await;
        self.state.complete_diagnosis(result)
    }
}
