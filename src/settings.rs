//! Runtime settings
//!
//! Read from a JSON file: the path in `DINO_RUN_SETTINGS`, else `dino-run.json`
//! in the working directory. Missing fields take their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::TICK_MS;

/// Environment variable naming the settings file
pub const SETTINGS_ENV: &str = "DINO_RUN_SETTINGS";
/// Settings file looked for in the working directory
pub const SETTINGS_FILE: &str = "dino-run.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Scheduler cadence in milliseconds
    pub tick_ms: u64,
    /// RNG seed; derived from the wall clock when absent
    pub seed: Option<u64>,

    // === Audio ===
    /// Drop all tone requests
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub volume: f32,

    // === Terminal input ===
    /// How long a key counts as held on terminals without release events
    pub key_hold_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            seed: None,
            muted: false,
            volume: 0.8,
            key_hold_ms: 150,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str, path: &Path) -> Result<Self, SettingsError> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json, path)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_ms == 0 {
            return Err(SettingsError::Invalid("tick_ms must be positive".into()));
        }
        if !self.volume.is_finite() {
            return Err(SettingsError::Invalid("volume must be a number".into()));
        }
        Ok(())
    }

    /// Volume clamped into range
    pub fn effective_volume(&self) -> f32 {
        self.volume.clamp(0.0, 1.0)
    }

    /// Where settings would be read from, if anywhere
    pub fn location() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(SETTINGS_ENV) {
            return Some(PathBuf::from(path));
        }
        let local = PathBuf::from(SETTINGS_FILE);
        local.exists().then_some(local)
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load() -> Self {
        let Some(path) = Self::location() else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }
}
