//! Session state machine.
//!
//! `SessionState` owns every piece of session data and is the only place it
//! is mutated. Network round-trips are split into a begin/complete pair so a
//! caller can run the request anywhere (inline await, spawned task) while the
//! state transitions stay synchronous.

use chrono::{DateTime, Utc};

use super::catalog::{SymptomCatalog, SymptomMatch};
use super::error::{CatalogLoadError, DiagnosisError};
use super::{
    DIAGNOSIS_FALLBACK_MESSAGE, INVALID_CATALOG_MESSAGE, NO_SYMPTOMS_MESSAGE, WELCOME_MESSAGE,
};
use crate::service::{Diagnosis, ServiceError, ServiceResult};

/// Who a transcript line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    User,
    Bot,
    Error,
}

/// One line of the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub kind: ChatKind,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl ChatEntry {
    pub fn new(kind: ChatKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ChatKind::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(ChatKind::Bot, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(ChatKind::Error, text)
    }
}

/// Selected symptoms: unique names in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedSymptoms {
    names: Vec<String>,
}

impl SelectedSymptoms {
    /// Inserts `name`; returns false if it was already present.
    fn insert(&mut self, name: String) -> bool {
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    /// Removes `name`; returns false if it was absent.
    fn remove(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        self.names.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Complete client-side session state.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    catalog: SymptomCatalog,
    pending_symptom: String,
    selected: SelectedSymptoms,
    history: Vec<ChatEntry>,
    pending_request: bool,
    last_error: Option<String>,
    last_diagnosis: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    // ======================================================================
    // Read access
    // ======================================================================

    pub fn catalog(&self) -> &SymptomCatalog {
        &self.catalog
    }

    pub fn pending_symptom(&self) -> &str {
        &self.pending_symptom
    }

    pub fn selected(&self) -> &SelectedSymptoms {
        &self.selected
    }

    pub fn history(&self) -> &[ChatEntry] {
        &self.history
    }

    pub fn is_pending(&self) -> bool {
        self.pending_request
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_diagnosis(&self) -> Option<&str> {
        self.last_diagnosis.as_deref()
    }

    /// Catalog suggestions for the pending symptom, excluding selected ones.
    pub fn suggestions(&self, limit: usize) -> Vec<SymptomMatch> {
        self.catalog
            .suggest(&self.pending_symptom, limit, |name| self.selected.contains(name))
    }

    // ======================================================================
    // Catalog
    // ======================================================================

    /// Applies the outcome of a catalog fetch.
    ///
    /// Success replaces the catalog and appends the welcome message. Failure
    /// empties the catalog and records a banner message; it never touches the
    /// selection or the transcript.
    ///
    /// # Errors
    /// Returns `CatalogLoadError` when `result` is an error.
    pub fn apply_catalog(
        &mut self,
        result: ServiceResult<Vec<String>>,
    ) -> Result<&SymptomCatalog, CatalogLoadError> {
        match result {
            Ok(names) => {
                tracing::info!(count = names.len(), "Symptom catalog loaded");
                self.catalog = SymptomCatalog::new(names);
                self.history.push(ChatEntry::bot(WELCOME_MESSAGE));
                Ok(&self.catalog)
            }
            Err(source) => {
                let message = catalog_error_message(&source);
                tracing::warn!(error = %source, "Symptom catalog unavailable");
                self.catalog = SymptomCatalog::default();
                self.last_error = Some(message.clone());
                Err(CatalogLoadError { message, source })
            }
        }
    }

    // ======================================================================
    // Selection
    // ======================================================================

    /// Sets the typed-but-not-yet-added symptom. Any string is accepted.
    pub fn select_pending_symptom(&mut self, name: impl Into<String>) {
        self.pending_symptom = name.into();
    }

    /// Adds the pending symptom to the selection.
    ///
    /// The text is stored exactly as typed. Empty or duplicate entries are
    /// silently ignored. Returns true if the selection changed.
    pub fn add_symptom(&mut self) -> bool {
        if self.pending_symptom.is_empty() {
            return false;
        }
        let name = self.pending_symptom.clone();
        if !self.selected.insert(name.clone()) {
            tracing::debug!(symptom = %name, "Ignoring duplicate symptom");
            return false;
        }

        self.pending_symptom.clear();
        self.history
            .push(ChatEntry::user(format!("Added symptom: {name}")));
        tracing::debug!(symptom = %name, selected = self.selected.len(), "Symptom added");
        true
    }

    /// Removes `name` from the selection. Returns true if it was present.
    pub fn remove_symptom(&mut self, name: &str) -> bool {
        if !self.selected.remove(name) {
            return false;
        }
        self.history
            .push(ChatEntry::user(format!("Removed symptom: {name}")));
        tracing::debug!(symptom = %name, selected = self.selected.len(), "Symptom removed");
        true
    }

    // ======================================================================
    // Diagnosis
    // ======================================================================

    /// Starts a diagnosis request and returns the symptoms to send.
    ///
    /// On success the request is pending until `complete_diagnosis` runs.
    ///
    /// # Errors
    /// - `RequestPending` if a request is already in flight (no state change)
    /// - `NoSymptoms` if nothing is selected (sets the banner message)
    pub fn begin_diagnosis(&mut self) -> Result<Vec<String>, DiagnosisError> {
        if self.pending_request {
            return Err(DiagnosisError::RequestPending);
        }
        if self.selected.is_empty() {
            self.last_error = Some(NO_SYMPTOMS_MESSAGE.to_string());
            return Err(DiagnosisError::NoSymptoms);
        }

        self.pending_request = true;
        self.last_error = None;
        tracing::info!(symptoms = ?self.selected.as_slice(), "Requesting diagnosis");
        Ok(self.selected.as_slice().to_vec())
    }

    /// Finishes the in-flight request with its outcome.
    ///
    /// Always clears the pending flag, then runs exactly one of the success
    /// or failure paths.
    ///
    /// # Errors
    /// Returns `DiagnosisError::Request` when `result` is an error.
    pub fn complete_diagnosis(
        &mut self,
        result: ServiceResult<Diagnosis>,
    ) -> Result<Diagnosis, DiagnosisError> {
        if !self.pending_request {
            tracing::warn!("Diagnosis completed without a pending request");
        }
        self.pending_request = false;

        match result {
            Ok(diagnosis) => {
                tracing::info!(diagnosis = %diagnosis.diagnosis, "Diagnosis received");
                self.last_diagnosis = Some(diagnosis.diagnosis.clone());
                self.history.push(ChatEntry::bot(format!(
                    "Based on your symptoms, the possible diagnosis is: {}",
                    diagnosis.diagnosis
                )));
                Ok(diagnosis)
            }
            Err(source) => {
                let message = source
                    .server_message()
                    .unwrap_or(DIAGNOSIS_FALLBACK_MESSAGE)
                    .to_string();
                tracing::warn!(error = %source, kind = %source.kind, "Diagnosis failed");
                self.history
                    .push(ChatEntry::error(DIAGNOSIS_FALLBACK_MESSAGE));
                self.last_error = Some(message.clone());
                Err(DiagnosisError::Request { message, source })
            }
        }
    }
}

fn catalog_error_message(err: &ServiceError) -> String {
    if err.is_parse() {
        INVALID_CATALOG_MESSAGE.to_string()
    } else {
        let detail = err.server_message().unwrap_or(&err.message);
        format!("Failed to load available symptoms: {detail}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ServiceError;

    fn select_and_add(state: &mut SessionState, name: &str) -> bool {
        state.select_pending_symptom(name);
        state.add_symptom()
    }

    fn diagnosis(text: &str) -> Diagnosis {
        Diagnosis {
            diagnosis: text.to_string(),
            symptoms: Vec::new(),
        }
    }

    fn selected(state: &SessionState) -> Vec<&str> {
        state.selected().iter().collect()
    }

    #[test]
    fn test_catalog_success_appends_welcome() {
        let mut state = SessionState::new();
        let catalog = state
            .apply_catalog(Ok(vec!["fever".to_string(), "cough".to_string()]))
            .unwrap();
        assert_eq!(catalog.names(), ["fever", "cough"]);

        assert_eq!(state.history().len(), 1);
        assert_eq!(state.history()[0].kind, ChatKind::Bot);
        assert_eq!(state.history()[0].text, WELCOME_MESSAGE);
        assert_eq!(state.last_error(), None);
    }

    #[test]
    fn test_catalog_malformed_payload_message() {
        let mut state = SessionState::new();
        let err = state
            .apply_catalog(Err(ServiceError::parse("Expected a list", "{}")))
            .unwrap_err();
        assert_eq!(err.message, INVALID_CATALOG_MESSAGE);
        assert_eq!(state.last_error(), Some(INVALID_CATALOG_MESSAGE));
        assert!(state.catalog().is_empty());
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_catalog_server_error_message() {
        let mut state = SessionState::new();
        let err = state
            .apply_catalog(Err(ServiceError::http_status(
                500,
                r#"{"error":"dataset missing"}"#,
            )))
            .unwrap_err();
        assert_eq!(
            err.message,
            "Failed to load available symptoms: dataset missing"
        );
    }

    #[test]
    fn test_catalog_transport_error_uses_raw_message() {
        let mut state = SessionState::new();
        state
            .apply_catalog(Err(ServiceError::transport("connection refused")))
            .unwrap_err();
        assert_eq!(
            state.last_error(),
            Some("Failed to load available symptoms: connection refused")
        );
    }

    #[test]
    fn test_failed_catalog_still_allows_free_text_and_diagnosis() {
        let mut state = SessionState::new();
        let _ = state.apply_catalog(Err(ServiceError::transport("down")));

        assert!(select_and_add(&mut state, "made up symptom"));
        assert!(state.begin_diagnosis().is_ok());
        assert!(state.is_pending());
    }

    #[test]
    fn test_add_duplicate_is_noop() {
        let mut state = SessionState::new();
        assert!(select_and_add(&mut state, "fever"));
        assert!(!select_and_add(&mut state, "fever"));

        assert_eq!(selected(&state), vec!["fever"]);
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.history()[0].text, "Added symptom: fever");
        // Duplicate leaves the pending text in place for the user to edit
        assert_eq!(state.pending_symptom(), "fever");
    }

    #[test]
    fn test_add_empty_is_noop() {
        let mut state = SessionState::new();
        assert!(!state.add_symptom());
        assert!(!select_and_add(&mut state, ""));
        assert!(state.selected().is_empty());
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_add_keeps_text_as_typed() {
        let mut state = SessionState::new();
        assert!(select_and_add(&mut state, " fever "));
        assert_eq!(state.pending_symptom(), "");

        // Whitespace is content, not padding
        assert!(select_and_add(&mut state, "fever"));
        assert!(select_and_add(&mut state, "   "));
        assert_eq!(selected(&state), vec![" fever ", "fever", "   "]);
        assert_eq!(state.history()[0].text, "Added symptom:  fever ");
    }

    #[test]
    fn test_entry_constructors_set_kind() {
        let before = Utc::now();
        let entries = [
            ChatEntry::user("a"),
            ChatEntry::bot("b"),
            ChatEntry::error("c"),
        ];
        let kinds: Vec<ChatKind> = entries.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![ChatKind::User, ChatKind::Bot, ChatKind::Error]);
        assert!(entries.iter().all(|e| e.created_at >= before));
    }

    #[test]
    fn test_remove_present_and_absent() {
        let mut state = SessionState::new();
        select_and_add(&mut state, "fever");

        assert!(!state.remove_symptom("cough"));
        assert_eq!(state.history().len(), 1);

        assert!(state.remove_symptom("fever"));
        assert!(state.selected().is_empty());
        assert_eq!(state.history().len(), 2);
        assert_eq!(state.history()[1].kind, ChatKind::User);
        assert_eq!(state.history()[1].text, "Removed symptom: fever");
    }

    #[test]
    fn test_add_remove_sequence_reflects_net_effect() {
        let mut state = SessionState::new();
        let ops: &[(&str, &str)] = &[
            ("add", "fever"),
            ("add", "cough"),
            ("add", "fever"),
            ("remove", "fever"),
            ("remove", "fever"),
            ("add", "chills"),
            ("add", "fever"),
            ("remove", "nausea"),
            ("add", "cough"),
        ];

        let mut appended = 0;
        for (op, name) in ops {
            let changed = match *op {
                "add" => select_and_add(&mut state, name),
                _ => state.remove_symptom(name),
            };
            if changed {
                appended += 1;
            }
        }

        assert_eq!(selected(&state), vec!["cough", "chills", "fever"]);
        assert_eq!(state.history().len(), appended);
        assert_eq!(appended, 5);
    }

    #[test]
    fn test_diagnosis_without_symptoms_is_validation_error() {
        let mut state = SessionState::new();
        let err = state.begin_diagnosis().unwrap_err();
        assert_eq!(err, DiagnosisError::NoSymptoms);
        assert!(err.is_validation());
        assert_eq!(state.last_error(), Some(NO_SYMPTOMS_MESSAGE));
        assert!(!state.is_pending());
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_diagnosis_success_flow() {
        let mut state = SessionState::new();
        select_and_add(&mut state, "fever");
        select_and_add(&mut state, "cough");
        let before = state.history().len();

        let symptoms = state.begin_diagnosis().unwrap();
        assert_eq!(symptoms, vec!["fever", "cough"]);
        assert!(state.is_pending());

        let result = state.complete_diagnosis(Ok(diagnosis("flu"))).unwrap();
        assert_eq!(result.diagnosis, "flu");
        assert!(!state.is_pending());
        assert_eq!(state.last_diagnosis(), Some("flu"));
        assert_eq!(state.history().len(), before + 1);

        let last = state.history().last().unwrap();
        assert_eq!(last.kind, ChatKind::Bot);
        assert!(last.text.contains("flu"));
    }

    #[test]
    fn test_diagnosis_rejected_uses_server_message() {
        let mut state = SessionState::new();
        select_and_add(&mut state, "fever");
        select_and_add(&mut state, "cough");
        let before = state.history().len();

        state.begin_diagnosis().unwrap();
        let err = state
            .complete_diagnosis(Err(ServiceError::http_status(
                400,
                r#"{"error":"model unavailable"}"#,
            )))
            .unwrap_err();

        assert_eq!(err.to_string(), "model unavailable");
        assert_eq!(state.last_error(), Some("model unavailable"));
        assert!(!state.is_pending());
        assert_eq!(state.history().len(), before + 1);
        assert_eq!(state.history().last().unwrap().kind, ChatKind::Error);
        assert_eq!(selected(&state), vec!["fever", "cough"]);
    }

    #[test]
    fn test_diagnosis_transport_failure_uses_fallback() {
        let mut state = SessionState::new();
        select_and_add(&mut state, "fever");

        state.begin_diagnosis().unwrap();
        state
            .complete_diagnosis(Err(ServiceError::transport("connection reset")))
            .unwrap_err();

        assert!(!state.is_pending());
        assert_eq!(state.last_error(), Some(DIAGNOSIS_FALLBACK_MESSAGE));
        assert_eq!(
            state.history().last().unwrap().text,
            DIAGNOSIS_FALLBACK_MESSAGE
        );
    }

    #[test]
    fn test_second_request_rejected_while_pending() {
        let mut state = SessionState::new();
        select_and_add(&mut state, "fever");
        state.begin_diagnosis().unwrap();

        let err = state.begin_diagnosis().unwrap_err();
        assert_eq!(err, DiagnosisError::RequestPending);
        assert!(state.is_pending());
        assert_eq!(state.last_error(), None);
    }

    #[test]
    fn test_begin_clears_previous_error() {
        let mut state = SessionState::new();
        state.begin_diagnosis().unwrap_err();
        assert!(state.last_error().is_some());

        select_and_add(&mut state, "fever");
        state.begin_diagnosis().unwrap();
        assert_eq!(state.last_error(), None);
    }

    #[test]
    fn test_retry_after_failure() {
        let mut state = SessionState::new();
        select_and_add(&mut state, "fever");

        state.begin_diagnosis().unwrap();
        let _ = state.complete_diagnosis(Err(ServiceError::transport("down")));
        state.begin_diagnosis().unwrap();
        state.complete_diagnosis(Ok(diagnosis("flu"))).unwrap();

        let kinds: Vec<ChatKind> = state.history().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![ChatKind::User, ChatKind::Error, ChatKind::Bot]);
    }

    #[test]
    fn test_suggestions_exclude_selected() {
        let mut state = SessionState::new();
        state
            .apply_catalog(Ok(vec!["fever".to_string(), "high_fever".to_string()]))
            .unwrap();
        select_and_add(&mut state, "fever");
        state.select_pending_symptom("fev");

        let suggestions = state.suggestions(5);
        let names: Vec<&str> = suggestions
            .iter()
            .filter_map(|m| state.catalog().get(m.index))
            .collect();
        assert_eq!(names, vec!["high_fever"]);
    }
}
