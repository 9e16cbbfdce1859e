//! Configuration management for SDX.
//!
//! Loads configuration from ${SDX_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides the configured service URL.
pub const SERVICE_URL_ENV: &str = "SDX_SERVICE_URL";

/// Returns the default config template with comments.
///
/// Embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for SDX configuration and data directories.
    //!
    //! SDX_HOME resolution order:
    //! 1. SDX_HOME environment variable (if set)
    //! 2. ~/.config/sdx (default)

    use std::path::PathBuf;

    /// Returns the SDX home directory.
    ///
    /// Checks SDX_HOME env var first, falls back to ~/.config/sdx, and
    /// finally to a relative `.sdx` directory when no home is known.
    pub fn sdx_home() -> PathBuf {
        if let Ok(home) = std::env::var("SDX_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".sdx"),
            |h| h.join(".config").join("sdx"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        sdx_home().join("config.toml")
    }

    /// Returns the directory holding rolling log files.
    pub fn logs_dir() -> PathBuf {
        sdx_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the symptom service
    pub service_base_url: String,

    /// Timeout for service requests in seconds (0 disables)
    pub request_timeout_secs: u32,

    /// Log filter directive for the file log (e.g. "info", "sdx_core=debug")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_base_url: Self::DEFAULT_SERVICE_BASE_URL.to_string(),
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            log_level: None,
        }
    }
}

impl Config {
    pub const DEFAULT_SERVICE_BASE_URL: &str = "http://localhost:5001";
    /// Default is disabled
    const DEFAULT_REQUEST_TIMEOUT_SECS: u32 = 0;

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Resolves the service base URL with precedence: override > env > config.
    ///
    /// The override is the `--service-url` CLI flag. Empty values are skipped.
    /// Trailing slashes are trimmed so endpoint paths can be appended directly.
    ///
    /// # Errors
    /// Returns an error if the winning value is not a valid URL.
    pub fn resolve_service_url(&self, cli_override: Option<&str>) -> Result<String> {
        let env_value = std::env::var(SERVICE_URL_ENV).ok();
        let candidates = [
            cli_override,
            env_value.as_deref(),
            Some(self.service_base_url.as_str()),
        ];

        let url = candidates
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(Self::DEFAULT_SERVICE_BASE_URL);

        url::Url::parse(url).with_context(|| format!("Invalid service base URL: {url}"))?;
        Ok(url.trim_end_matches('/').to_string())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.request_timeout_secs)))
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    ///
    /// # Errors
    /// Returns an error if the file exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Generates a fresh config TOML from Rust defaults.
    ///
    /// Uses the embedded template for structure/comments and merges
    /// generated values from `Config::default()` into it.
    ///
    /// # Errors
    /// Returns an error if serialization or template parsing fails.
    pub fn generate() -> Result<String> {
        use toml_edit::{DocumentMut, Item};

        let config = Config::default();
        let generated_toml =
            toml::to_string(&config).context("Failed to serialize default config to TOML")?;

        // Parse template as base (preserves comments)
        let mut doc: DocumentMut = default_config_template()
            .parse()
            .context("Failed to parse default config template")?;

        let generated_doc: DocumentMut = generated_toml
            .parse()
            .context("Failed to parse generated config")?;

        for (key, value) in generated_doc.iter() {
            if let Item::Value(v) = value {
                // Keep the template's decor (comments) on the key
                if let Some(Item::Value(existing)) = doc.get_mut(key) {
                    let decor = existing.decor().clone();
                    *existing = v.clone();
                    *existing.decor_mut() = decor;
                } else {
                    doc[key] = Item::Value(v.clone());
                }
            }
        }

        Ok(doc.to_string())
    }

    fn write_config(path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
        }
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}
