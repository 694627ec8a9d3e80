//! Configuration sections
//!
//! # Main Types
//!
//! - [`ServerConfig`] - Where the history API lives and how long to wait for it
//! - [`HistoryConfig`] - Window size, label precision and render decimation

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::history::{LabelPrecision, WindowSize};

use super::{DEFAULT_MAX_RENDER_POINTS, DEFAULT_SERVER_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_WINDOW_SAMPLES};

/// Connection settings for the history API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the acquisition server
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// History browsing preferences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Window size used when a session is opened
    pub default_window: WindowSize,

    /// Decimate windows longer than this before rendering (0 disables)
    pub max_render_points: usize,

    /// Resolution of time labels
    pub label_precision: LabelPrecision,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            default_window: WindowSize::Samples(DEFAULT_WINDOW_SAMPLES),
            max_render_points: DEFAULT_MAX_RENDER_POINTS,
            label_precision: LabelPrecision::Auto,
        }
    }
}
