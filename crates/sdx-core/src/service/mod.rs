//! Symptom service integration boundary.
//!
//! The service exposes three endpoints:
//! - `GET /api/symptoms` → JSON array of symptom names
//! - `POST /api/diagnose` with `{"symptoms": [...]}` → `{"diagnosis": "..."}`
//! - `GET /` → `{"status": "...", "message": "..."}` health probe
//!
//! Response shapes are validated here; nothing malformed reaches session state.

mod client;
mod error;

use std::future::Future;

pub use client::ApiClient;
pub use error::{ServiceError, ServiceErrorKind, ServiceResult};
use serde::{Deserialize, Serialize};

/// A diagnosis returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    /// The diagnosis label.
    pub diagnosis: String,
    /// Symptoms the service echoed back (empty if it did not echo them).
    #[serde(default)]
    pub symptoms: Vec<String>,
}

/// Health probe response from `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Operations the session controller needs from the symptom service.
///
/// `ApiClient` is the HTTP implementation; tests substitute in-memory fakes.
pub trait SymptomService {
    /// Fetches the symptom catalog.
    fn list_symptoms(&self) -> impl Future<Output = ServiceResult<Vec<String>>> + Send;

    /// Requests a diagnosis for the given symptoms.
    fn diagnose(&self, symptoms: &[String])
    -> impl Future<Output = ServiceResult<Diagnosis>> + Send;
}
