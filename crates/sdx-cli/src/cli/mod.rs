//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use sdx_core::config::Config;
use sdx_core::logging;
use sdx_core::service::ApiClient;

mod commands;

#[derive(Parser)]
#[command(name = "sdx")]
#[command(version)]
#[command(about = "Symptom checker client for a diagnosis service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Base URL of the symptom service (overrides SDX_SERVICE_URL and config)
    #[arg(long, global = true, value_name = "URL")]
    service_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run a line-oriented session on stdin/stdout
    Repl,
    /// List the symptoms the service recognizes
    Symptoms,
    /// Request a single diagnosis
    Diagnose {
        /// Symptom to include (repeatable)
        #[arg(short, long = "symptom", value_name = "SYMPTOM", required = true)]
        symptoms: Vec<String>,

        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that the service is reachable
    Status,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Print a fresh config generated from defaults
    Generate,
    /// Show the effective settings
    Show,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

/// Service client plus the log guard that must outlive it.
struct Connection {
    client: ApiClient,
    _log_guard: Option<logging::WorkerGuard>,
}

/// Loads config, starts file logging, and builds the service client.
fn connect(service_url: Option<&str>) -> Result<Connection> {
    let config = Config::load().context("load config")?;

    // Logging is best-effort; the session works without a log file
    let log_guard = match logging::init(&config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e:#}");
            None
        }
    };

    let client = ApiClient::from_config(&config, service_url)?;
    tracing::debug!(service = %client.base_url(), "Resolved service URL");

    Ok(Connection {
        client,
        _log_guard: log_guard,
    })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli {
        command,
        service_url,
    } = cli;
    let service_url = service_url.as_deref();

    // default to the interactive session
    let Some(command) = command else {
        let conn = connect(service_url)?;
        return commands::chat::run(conn.client).await;
    };

    match command {
        Commands::Repl => {
            let conn = connect(service_url)?;
            commands::chat::repl(conn.client).await
        }
        Commands::Symptoms => {
            let conn = connect(service_url)?;
            commands::symptoms::run(&conn.client).await
        }
        Commands::Diagnose { symptoms, json } => {
            let conn = connect(service_url)?;
            commands::diagnose::run(conn.client, &symptoms, json).await
        }
        Commands::Status => {
            let conn = connect(service_url)?;
            commands::status::run(&conn.client).await
        }

        // Config commands skip logging and the service client
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Generate => commands::config::generate(),
            ConfigCommands::Show => commands::config::show(service_url),
        },
    }
}
