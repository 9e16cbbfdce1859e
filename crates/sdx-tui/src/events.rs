//! UI event types.
//!
//! Everything the reducer reacts to arrives as a `UiEvent`: timer ticks,
//! frame size, terminal input, and results of spawned service calls.

use crossterm::event::Event;
use sdx_core::service::{Diagnosis, ServiceResult};

#[derive(Debug)]
pub enum UiEvent {
    /// Animation/render cadence.
    Tick,

    /// Current terminal size, sent before each batch of events.
    Frame { width: u16, height: u16 },

    /// Raw terminal input.
    Terminal(Event),

    /// Result of `UiEffect::LoadCatalog`.
    CatalogLoaded(ServiceResult<Vec<String>>),

    /// Result of `UiEffect::RequestDiagnosis`.
    DiagnosisCompleted(ServiceResult<Diagnosis>),
}
