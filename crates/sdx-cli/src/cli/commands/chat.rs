//! Session command handlers.

use std::io::{IsTerminal, stdin, stdout};

use anyhow::{Context, Result};
use sdx_core::service::ApiClient;
use sdx_core::session::SessionController;

use crate::modes;

/// Runs the default session: full-screen when attached to a terminal,
/// line mode otherwise.
pub async fn run(client: ApiClient) -> Result<()> {
    if !stdin().is_terminal() || !stdout().is_terminal() {
        return repl(client).await;
    }

    modes::run_interactive_session(client)
        .await
        .context("interactive session failed")
}

/// Runs the line-mode session on stdin/stdout.
pub async fn repl(client: ApiClient) -> Result<()> {
    tracing::info!(service = %client.base_url(), "Starting line-mode session");
    let mut controller = SessionController::new(client);
    let input = stdin().lock();
    let mut output = stdout().lock();
    modes::repl::run_repl(input, &mut output, &mut controller).await
}
