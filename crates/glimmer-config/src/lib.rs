//! Configuration and persisted preferences for glimmer.

mod error;
mod settings;
mod store;

pub use error::ConfigError;
pub use settings::{CanvasSettings, ParticleSettings, RainSettings, Settings};
pub use store::{FileStore, MemoryStore, PreferenceStore, THEME_KEY, load_theme, save_theme};

use std::path::PathBuf;

use directories::ProjectDirs;

/// Application directories for glimmer.
pub(crate) fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("", "", "glimmer").ok_or(ConfigError::NoConfigDir)
}

/// Directory holding `config.toml` and `preferences.toml`.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

/// Directory for the log file.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}
