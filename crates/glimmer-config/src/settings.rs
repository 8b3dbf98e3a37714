//! User settings loaded from `config.toml`.

use std::path::{Path, PathBuf};

use glimmer_core::MAX_PARTICLES;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Host refresh rate in frames per second.
    pub fps: u32,
    /// Seed for both renderers; random when absent.
    pub seed: Option<u64>,
    /// Falling glyph effect.
    pub rain: RainSettings,
    /// Particle field effect.
    pub particles: ParticleSettings,
    /// Mapping from logical pixels to terminal cells.
    pub canvas: CanvasSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps: 30,
            seed: None,
            rain: RainSettings::default(),
            particles: ParticleSettings::default(),
            canvas: CanvasSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainSettings {
    pub enabled: bool,
}

impl Default for RainSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSettings {
    pub enabled: bool,
    /// Particles created at startup and on every theme change.
    pub count: usize,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 80,
        }
    }
}

/// Widest cell that still gives each 14 px rain lane two terminal columns.
///
/// Rain glyphs are double width, so a lane must span two cells or
/// neighbouring lanes overwrite each other.
const MAX_CELL_WIDTH: f32 = 7.0;

/// Size of one terminal cell in logical pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    pub cell_width: f32,
    pub cell_height: f32,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            cell_width: 7.0,
            cell_height: 14.0,
        }
    }
}

impl Settings {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing default file yields the defaults; a missing explicit file is
    /// an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    tracing::debug!(path = %path.display(), "no config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load from a specific file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let settings: Self = toml::from_str(&content)?;
        tracing::info!(path = %path.as_ref().display(), "loaded settings");
        Ok(settings.sanitized())
    }

    /// Write to a specific file, creating parent directories.
    #[cfg(test)]
    fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// `<config dir>/glimmer/config.toml`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(crate::config_dir()?.join("config.toml"))
    }

    /// Frame interval in milliseconds for the host loop.
    pub fn frame_interval_ms(&self) -> u64 {
        1000 / u64::from(self.fps.max(1))
    }

    /// Clamp values that would make the renderers misbehave.
    fn sanitized(mut self) -> Self {
        self.fps = self.fps.clamp(1, 240);
        if self.particles.count > MAX_PARTICLES {
            tracing::warn!(
                count = self.particles.count,
                max = MAX_PARTICLES,
                "particle count capped"
            );
            self.particles.count = MAX_PARTICLES;
        }
        let width = self.canvas.cell_width;
        if !(width.is_finite() && (1.0..=MAX_CELL_WIDTH).contains(&width)) {
            tracing::warn!(cell_width = width, "cell width out of range, using default");
            self.canvas.cell_width = CanvasSettings::default().cell_width;
        }
        if !(self.canvas.cell_height.is_finite() && self.canvas.cell_height >= 1.0) {
            self.canvas.cell_height = CanvasSettings::default().cell_height;
        }
        self
    }
}
