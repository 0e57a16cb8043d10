//! Layered configuration: defaults, TOML file, environment, then CLI flags

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::api::{Endpoints, MonitoringConfig};

const APP_DIR: &str = "ledger-sync";
const CONFIG_FILE: &str = "config.toml";

pub const ENV_AUTH_URL: &str = "LEDGER_SYNC_AUTH_URL";
pub const ENV_GATEWAY_URL: &str = "LEDGER_SYNC_GATEWAY_URL";
pub const ENV_WORKBOOK: &str = "LEDGER_SYNC_WORKBOOK";
pub const ENV_WORKERS: &str = "LEDGER_SYNC_WORKERS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub auth_url: String,
    pub gateway_url: String,
    /// Workbook path: an `.xlsx` file or a directory of CSV sheets
    pub workbook: PathBuf,
    pub sync: SyncSettings,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Worker hint passed to the bulk endpoint
    pub workers: u32,
    pub skip_processed: bool,
    pub fallback_to_single: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auth_url: "http://localhost:8081".to_string(),
            gateway_url: "http://localhost:8080".to_string(),
            workbook: PathBuf::from("ledger.xlsx"),
            sync: SyncSettings::default(),
            monitoring: MonitoringConfig::default(),
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            workers: 4,
            skip_processed: false,
            fallback_to_single: false,
        }
    }
}

/// Default config file location, `<config_dir>/ledger-sync/config.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

impl Config {
    /// Load from `path`, or from the default location when it exists.
    /// An explicit path that does not exist is an error; a missing default
    /// file just means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file does not exist: {}", path.display());
                }
                path.to_path_buf()
            }
            None => match config_path().filter(|p| p.exists()) {
                Some(path) => path,
                None => {
                    debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        if config.sync.workers == 0 {
            anyhow::bail!("sync.workers must be at least 1 in {}", path.display());
        }
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Overlay environment variables read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_AUTH_URL) {
            self.auth_url = url;
        }
        if let Some(url) = lookup(ENV_GATEWAY_URL) {
            self.gateway_url = url;
        }
        if let Some(path) = lookup(ENV_WORKBOOK) {
            self.workbook = PathBuf::from(path);
        }
        if let Some(workers) = lookup(ENV_WORKERS) {
            self.sync.workers = workers
                .trim()
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .with_context(|| {
                    format!("{} must be a positive integer, got '{}'", ENV_WORKERS, workers)
                })?;
        }
        Ok(())
    }

    /// Defaults, then file, then process environment
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(&self.auth_url, &self.gateway_url)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

/// Write a default config file, refusing to overwrite an existing one
pub fn init(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("Config file already exists: {}", path.display());
    }
    Config::default().save(path)
}
