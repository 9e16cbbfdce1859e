//! Full-screen TUI for the sdx diagnosis session.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr, stdout};

use anyhow::Result;
pub use features::{input, transcript};
pub use runtime::TuiRuntime;
use sdx_core::service::ApiClient;

/// Runs the interactive diagnosis session until the user quits.
///
/// # Errors
/// Returns an error if stdout is not a terminal or terminal setup fails.
pub async fn run_interactive_session(client: ApiClient) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!(
            "Interactive mode requires a terminal.\n\
             Use `sdx repl` or pipe commands on stdin for line mode."
        );
    }

    let mut err = stderr();
    writeln!(err, "SDX")?;
    writeln!(err, "Service: {}", client.base_url())?;
    err.flush()?;

    tracing::info!(service = %client.base_url(), "Starting interactive session");
    let mut runtime = TuiRuntime::new(client)?;
    runtime.run()?;
    drop(runtime);

    // Terminal is restored once the runtime is dropped
    writeln!(stderr(), "Goodbye!")?;
    Ok(())
}
