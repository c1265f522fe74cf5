//! Path utilities for the storefront's local files

use std::path::PathBuf;

use crate::error::ConfigError;

/// Application identifier used for the data directory
pub const APP_ID: &str = "com.restyle.storefront";

/// Gets the application data directory
pub fn get_app_data_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|p| p.join(APP_ID))
        .ok_or(ConfigError::NoDataDir)
}

/// Gets the try-on gateway configuration file path
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    get_app_data_dir().map(|p| p.join(".tryon_config.json"))
}
