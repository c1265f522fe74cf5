//! Try-on gateway configuration, resolved once at startup

use std::path::Path;
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::paths::get_config_path;

/// Default image-synthesis endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.banana.dev/v4/inference";

pub const ENV_API_KEY: &str = "BANANA_API_KEY";
pub const ENV_MODEL_KEY: &str = "BANANA_MODEL_KEY";
pub const ENV_ENDPOINT: &str = "RESTYLE_TRYON_ENDPOINT";
pub const ENV_TIMEOUT_MS: &str = "RESTYLE_TRYON_TIMEOUT_MS";
pub const ENV_SIMULATION_DELAY_MS: &str = "RESTYLE_TRYON_SIMULATION_DELAY_MS";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    pub api_key: Option<String>,
    pub model_key: Option<String>,
    pub endpoint: String,
    pub timeout_ms: u64,
    pub simulation_delay_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: 60_000,
            simulation_delay_ms: 2_000,
        }
    }
}

/// Both keys, present and non-blank
#[derive(Clone, Copy, Debug)]
pub struct Credentials<'a> {
    pub api_key: &'a str,
    pub model_key: &'a str,
}

impl GatewayConfig {
    /// Resolves defaults, then the config file, then the environment.
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = get_config_path()?;
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;

        if config.credentials().is_none() {
            warn!("[config] Try-on API keys not configured, demo mode will be used");
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("[config] Loaded try-on config from {:?}", path);
        Ok(config)
    }

    /// Overrides fields from variables returned by `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(key) = lookup(ENV_MODEL_KEY) {
            self.model_key = Some(key);
        }
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Some(value) = lookup(ENV_TIMEOUT_MS) {
            self.timeout_ms = parse_millis(ENV_TIMEOUT_MS, value)?;
        }
        if let Some(value) = lookup(ENV_SIMULATION_DELAY_MS) {
            self.simulation_delay_ms = parse_millis(ENV_SIMULATION_DELAY_MS, value)?;
        }
        Ok(())
    }

    pub fn credentials(&self) -> Option<Credentials<'_>> {
        let api_key = non_blank(self.api_key.as_deref())?;
        let model_key = non_blank(self.model_key.as_deref())?;
        Some(Credentials { api_key, model_key })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn simulation_delay(&self) -> Duration {
        Duration::from_millis(self.simulation_delay_ms)
    }
}

fn non_blank(key: Option<&str>) -> Option<&str> {
    key.map(str::trim).filter(|k| !k.is_empty())
}

fn parse_millis(key: &'static str, value: String) -> Result<u64, ConfigError> {
    match value.trim().parse() {
        Ok(millis) => Ok(millis),
        Err(_) => Err(ConfigError::InvalidEnv { key, value }),
    }
}
