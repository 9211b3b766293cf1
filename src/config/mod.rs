use crate::models::FilterConfig;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;

/// Runtime settings: service endpoints and local paths.
///
/// Layered at load time: built-in defaults, then the optional settings file,
/// then `PACKMETER_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the pack catalog service.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Well-known fallback host for the progress-channel settings lookup.
    #[serde(default = "default_api_url")]
    pub fallback_api_url: String,

    /// Directory holding the local repository working copies.
    #[serde(default = "default_repos_root")]
    pub repos_root: String,

    /// Timeout for individual catalog requests.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            fallback_api_url: default_api_url(),
            repos_root: default_repos_root(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.faithfulpack.net/v2/".to_string()
}

fn default_repos_root() -> String {
    "repos".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

/// Configuration manager for the settings and filter files.
///
/// Manages two files inside the configuration directory:
/// - Settings (`packmeter.yaml`): endpoints, repos root, timeouts
/// - Filters (`ignored-paths.yaml`): per-edition ignore lists and the
///   extension allow-list
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    settings_path: Utf8PathBuf,
    filter_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// The directory is created if it does not exist.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            settings_path: config_dir.join("packmeter.yaml"),
            filter_path: config_dir.join("ignored-paths.yaml"),
            config_dir,
        })
    }

    /// Load runtime settings: defaults, then the optional settings file,
    /// then `PACKMETER_*` environment overrides.
    pub fn load_settings(&self) -> Result<Settings> {
        let settings = config::Config::builder()
            .add_source(config::File::from(self.settings_path.as_std_path()).required(false))
            .add_source(config::Environment::with_prefix("PACKMETER"))
            .build()
            .with_context(|| format!("Failed to load settings: {}", self.settings_path))?
            .try_deserialize::<Settings>()
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        tracing::info!(
            "Loaded settings - api: {}, repos root: {}",
            settings.api_url,
            settings.repos_root
        );
        Ok(settings)
    }

    /// Load the filter configuration file.
    ///
    /// Falls back to the built-in defaults when the file is absent.
    pub fn load_filter_config(&self) -> Result<FilterConfig> {
        if !self.filter_path.exists() {
            tracing::warn!(
                "Filter config not found at {}, using defaults",
                self.filter_path
            );
            return Ok(FilterConfig::default());
        }

        let file_contents = fs::read_to_string(&self.filter_path)
            .with_context(|| format!("Failed to read filter config: {}", self.filter_path))?;

        let config: FilterConfig = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse filter config: {}", self.filter_path))?;

        tracing::info!("Loaded filter config from {}", self.filter_path);
        Ok(config)
    }

    /// Save the filter configuration file.
    pub fn save_filter_config(&self, config: &FilterConfig) -> Result<()> {
        let yaml_string = serde_yaml_ng::to_string(config)
            .context("Failed to serialize filter config to YAML")?;

        fs::write(&self.filter_path, yaml_string)
            .with_context(|| format!("Failed to write filter config: {}", self.filter_path))?;

        tracing::info!("Saved filter config to {}", self.filter_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}
