//! Configuration module for SensorView
//!
//! Configuration is a single TOML file with three sections:
//!
//! ```toml
//! [server]
//! base_url = "http://localhost:5002"
//! timeout_secs = 30
//!
//! [history]
//! default_window = { samples = 1000 }   # or "all"
//! max_render_points = 1000
//! label_precision = "auto"              # "seconds" | "minutes" | "auto"
//!
//! [signals]
//! ecg_hz = 250.0
//! adc_hz = 250.0
//! temp_hz = 0.5
//! ```
//!
//! Every key is optional. The default location is platform-specific:
//! - **Linux**: `~/.config/dev.sensorview/config.toml`
//! - **macOS**: `~/Library/Application Support/dev.sensorview/config.toml`
//! - **Windows**: `%APPDATA%\dev.sensorview\config.toml`

pub mod settings;

pub use settings::*;

use crate::error::{Result, SensorViewError};
use crate::history::WindowSize;
use crate::types::SignalRates;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for config directories
pub const APP_ID: &str = "dev.sensorview";

/// Config filename
pub const CONFIG_FILE: &str = "config.toml";

/// Default history API location
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5002";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default window size in samples
pub const DEFAULT_WINDOW_SAMPLES: usize = 1000;

/// Default maximum number of points handed to the renderer
pub const DEFAULT_MAX_RENDER_POINTS: usize = 1000;

/// Get the default config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID).join(CONFIG_FILE))
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub history: HistoryConfig,
    pub signals: SignalRates,
}

impl AppConfig {
    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SensorViewError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            SensorViewError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or the default location; fall back to defaults
    ///
    /// A missing file is not an error. A file that exists but cannot be read
    /// or parsed is logged and ignored.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(default_config_path) else {
            return Self::default();
        };
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save config file to disk as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SensorViewError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| SensorViewError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| SensorViewError::Config(format!("Failed to write config: {}", e)))
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.server.base_url.trim().is_empty() {
            return Err(SensorViewError::Config(
                "server.base_url must not be empty".to_string(),
            ));
        }
        if self.server.timeout_secs == 0 {
            return Err(SensorViewError::Config(
                "server.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.history.default_window == WindowSize::Samples(0) {
            return Err(SensorViewError::Config(
                "history.default_window must be positive".to_string(),
            ));
        }
        self.signals.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::LabelPrecision;

    #[test]
    fn test_default_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = AppConfig::default();
        config.server.base_url = "http://10.0.0.2:5002".to_string();
        config.history.default_window = WindowSize::All;
        config.history.label_precision = LabelPrecision::Seconds;
        config.signals.temp_hz = 1.0;

        config.save(&path).unwrap();
        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[signals]\ntemp_hz = 0.25\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.signals.temp_hz, 0.25);
        assert_eq!(config.signals.ecg_hz, crate::types::DEFAULT_ECG_RATE_HZ);
        assert_eq!(config.server.base_url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[signals]\necg_hz = -1.0\n").unwrap();
        assert!(AppConfig::load(&path).is_err());

        std::fs::write(&path, "[server]\ntimeout_secs = 0\n").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert_eq!(AppConfig::load_or_default(Some(&path)), AppConfig::default());
    }

    #[test]
    fn test_load_or_default_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "this is = = not toml").unwrap();
        assert_eq!(AppConfig::load_or_default(Some(&path)), AppConfig::default());
    }
}
