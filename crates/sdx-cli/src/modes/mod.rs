//! Runtime execution modes.
//!
//! - `repl`: line-oriented session on stdin/stdout
//! - `tui`: full-screen terminal UI (optional feature)

pub mod repl;

#[cfg(feature = "tui")]
pub use sdx_tui::run_interactive_session;

#[cfg(not(feature = "tui"))]
pub async fn run_interactive_session(
    _client: sdx_core::service::ApiClient,
) -> anyhow::Result<()> {
    anyhow::bail!("TUI support is disabled in this build (feature \"tui\").");
}
