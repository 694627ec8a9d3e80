//! DataSource trait for unified history access
//!
//! This module provides a common trait for every place session history can
//! be read from, enabling both the real HTTP backend and in-memory sources
//! for testing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::session::{Session, SessionId};
use crate::types::{HistoryDate, Signal};

/// A day with at least one recorded session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateEntry {
    pub date: HistoryDate,
    /// Human readable label, e.g. `07 March 2025`
    pub label: String,
}

impl DateEntry {
    pub fn new(date: HistoryDate) -> Self {
        Self {
            label: date.label(),
            date,
        }
    }
}

/// Raw answer to a window request, before normalization
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowResponse {
    /// Index of the first returned sample
    pub offset: usize,
    /// Number of samples the source claims to have returned
    pub returned_count: usize,
    /// Samples available for this signal right now
    pub total_count: usize,
    /// One array per channel (channel-major)
    pub channels: Vec<Vec<f64>>,
}

impl WindowResponse {
    /// An empty answer reporting `total_count` available samples
    pub fn empty(offset: usize, total_count: usize) -> Self {
        Self {
            offset,
            returned_count: 0,
            total_count,
            channels: Vec::new(),
        }
    }
}

/// Read access to recorded session history
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Days that have recordings, newest first
    async fn list_dates(&self) -> Result<Vec<DateEntry>>;

    /// Sessions recorded on `date`, newest first
    async fn list_sessions_for_date(&self, date: HistoryDate) -> Result<Vec<Session>>;

    /// One window of samples for a signal
    async fn get_window(
        &self,
        session_id: &SessionId,
        signal: Signal,
        position: usize,
        window_size: usize,
    ) -> Result<WindowResponse>;

    /// Short name for logs
    fn name(&self) -> &str {
        "data-source"
    }
}
