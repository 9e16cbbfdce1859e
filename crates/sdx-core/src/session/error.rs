use std::fmt;

use crate::service::ServiceError;

/// The symptom catalog could not be loaded.
///
/// Non-fatal: the session keeps an empty catalog and free-text entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogLoadError {
    /// User-facing banner message.
    pub message: String,
    pub source: ServiceError,
}

impl fmt::Display for CatalogLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CatalogLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// A diagnosis request was not made or did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosisError {
    /// No symptoms were selected; nothing was sent.
    NoSymptoms,
    /// A request is already in flight; nothing was sent.
    RequestPending,
    /// The service rejected the request or could not be reached.
    Request {
        /// User-facing banner message.
        message: String,
        source: ServiceError,
    },
}

impl DiagnosisError {
    /// Returns true for errors raised before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DiagnosisError::NoSymptoms | DiagnosisError::RequestPending
        )
    }
}

impl fmt::Display for DiagnosisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosisError::NoSymptoms => write!(f, "{}", super::NO_SYMPTOMS_MESSAGE),
            DiagnosisError::RequestPending => {
                write!(f, "A diagnosis request is already in progress.")
            }
            DiagnosisError::Request { message, .. } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for DiagnosisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiagnosisError::Request { source, .. } => Some(source),
            _ => None,
        }
    }
}
