//! Key-value preference storage.
//!
//! Only the theme is persisted today, stored under [`THEME_KEY`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glimmer_core::Theme;

use crate::ConfigError;

/// Key holding the persisted theme name.
pub const THEME_KEY: &str = "theme";

/// A string-to-string preference store.
pub trait PreferenceStore {
    /// Stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError>;
}

/// In-memory store, used when no config directory is available and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept as a flat TOML table on disk.
///
/// The file is read once on open and rewritten in full on every `set`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let values = if path.exists() {
            toml::from_str(&std::fs::read_to_string(&path)?)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    /// Open `<config dir>/glimmer/preferences.toml`.
    pub fn open_default() -> Result<Self, ConfigError> {
        Self::open(crate::config_dir()?.join("preferences.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string(&self.values)?)?;
        Ok(())
    }
}

/// Persisted theme, or `None` when absent or unrecognised.
pub fn load_theme(store: &dyn PreferenceStore) -> Option<Theme> {
    let raw = store.get(THEME_KEY)?;
    match raw.parse() {
        Ok(theme) => Some(theme),
        Err(err) => {
            tracing::warn!(%err, "ignoring stored theme");
            None
        }
    }
}

/// Persist `theme`. Failures are logged, never fatal.
pub fn save_theme(store: &mut dyn PreferenceStore, theme: Theme) {
    if let Err(err) = store.set(THEME_KEY, theme.as_str()) {
        tracing::warn!(%err, %theme, "failed to persist theme");
    }
}
