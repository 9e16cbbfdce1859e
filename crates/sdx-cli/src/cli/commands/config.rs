//! Config command handlers.

use anyhow::{Context, Result};
use sdx_core::config::{self, Config};

pub fn path() {
    println!("{}", config::paths::config_path().display());
}

pub fn init() -> Result<()> {
    let config_path = config::paths::config_path();
    Config::init(&config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    Ok(())
}

pub fn generate() -> Result<()> {
    print!("{}", Config::generate()?);
    Ok(())
}

/// Prints the effective settings after env and flag overrides.
pub fn show(service_url: Option<&str>) -> Result<()> {
    let config_path = config::paths::config_path();
    let config = Config::load().context("load config")?;
    let url = config.resolve_service_url(service_url)?;

    let source = if config_path.exists() {
        config_path.display().to_string()
    } else {
        "defaults (no config file)".to_string()
    };
    let timeout = config
        .request_timeout()
        .map_or_else(|| "disabled".to_string(), |t| format!("{}s", t.as_secs()));

    println!("config:          {source}");
    println!("service_url:     {url}");
    println!("request_timeout: {timeout}");
    println!(
        "log_level:       {}",
        config.log_level.as_deref().unwrap_or("info")
    );
    Ok(())
}
