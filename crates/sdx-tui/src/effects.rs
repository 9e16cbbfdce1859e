//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only; the reducer never performs I/O
//! itself.

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Fetch the symptom catalog.
    LoadCatalog,

    /// Send the given symptoms for diagnosis.
    ///
    /// The session is already marked pending when this is emitted.
    RequestDiagnosis { symptoms: Vec<String> },
}
