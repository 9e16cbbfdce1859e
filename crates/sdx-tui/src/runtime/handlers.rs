//! Effect handlers.
//!
//! Pure async functions that call the service and return the resulting
//! `UiEvent`. The runtime spawns them and routes the event to the inbox.

use sdx_core::service::SymptomService;

use crate::events::UiEvent;

pub async fn load_catalog<S: SymptomService>(service: S) -> UiEvent {
    UiEvent::CatalogLoaded(service.list_symptoms().await)
}

pub async fn request_diagnosis<S: SymptomService>(service: S, symptoms: Vec<String>) -> UiEvent {
    UiEvent::DiagnosisCompleted(service.diagnose(&symptoms).await)
}
