//! Session data types

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, SensorViewError};
use crate::types::{HistoryDate, Signal};

/// Format of a session identifier, which doubles as its start instant
const SESSION_ID_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Validated session identifier (`YYYYMMDD_HHMMSS`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Parse and validate a session identifier
    pub fn parse(value: &str) -> Result<Self> {
        if value.len() != 15 {
            return Err(SensorViewError::Validation(format!(
                "session id '{}' must be in YYYYMMDD_HHMMSS form",
                value
            )));
        }
        NaiveDateTime::parse_from_str(value, SESSION_ID_FORMAT).map_err(|e| {
            SensorViewError::Validation(format!("invalid session id '{}': {}", value, e))
        })?;
        Ok(SessionId(value.to_string()))
    }

    /// The identifier as sent on the wire
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The instant encoded in the identifier
    pub fn started_at(&self) -> NaiveDateTime {
        // Validated in `parse`, so this cannot fail for a constructed id
        NaiveDateTime::parse_from_str(&self.0, SESSION_ID_FORMAT).unwrap_or_default()
    }

    /// The recording day this session belongs to
    pub fn date(&self) -> HistoryDate {
        HistoryDate::from(self.started_at().date())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SessionId {
    type Err = SensorViewError;

    fn from_str(s: &str) -> Result<Self> {
        SessionId::parse(s)
    }
}

impl TryFrom<String> for SessionId {
    type Error = SensorViewError;

    fn try_from(value: String) -> Result<Self> {
        SessionId::parse(&value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

/// Recording status reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Device is still streaming into this session
    Recording,
    /// Session was closed normally
    Completed,
    /// Metadata missing or unrecognized
    #[default]
    #[serde(other)]
    Unknown,
}

impl SessionStatus {
    /// Display name for the status
    pub fn display_name(&self) -> &'static str {
        match self {
            SessionStatus::Recording => "Recording",
            SessionStatus::Completed => "Completed",
            SessionStatus::Unknown => "Unknown",
        }
    }
}

/// One acquisition run
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Unique identifier
    pub id: SessionId,
    /// When recording started
    pub start: NaiveDateTime,
    /// When recording stopped; `None` while still recording
    pub end: Option<NaiveDateTime>,
    /// Backend status
    pub status: SessionStatus,
    /// Samples stored per signal at listing time
    pub total_samples: BTreeMap<Signal, usize>,
}

impl Session {
    /// Create a session starting at the instant encoded in its id
    pub fn new(id: SessionId) -> Self {
        Self {
            start: id.started_at(),
            id,
            end: None,
            status: SessionStatus::Recording,
            total_samples: BTreeMap::new(),
        }
    }

    /// Set the end instant and mark the session completed
    pub fn with_end(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self.status = SessionStatus::Completed;
        self
    }

    /// Set the stored sample count for a signal
    pub fn with_total(mut self, signal: Signal, count: usize) -> Self {
        self.total_samples.insert(signal, count);
        self
    }

    /// Stored sample count for a signal, zero if the signal was not recorded
    pub fn total_for(&self, signal: Signal) -> usize {
        self.total_samples.get(&signal).copied().unwrap_or(0)
    }

    /// Wall-clock length of the session, if it has ended
    ///
    /// An end instant earlier than the start is treated as zero length.
    pub fn duration(&self) -> Option<Duration> {
        let end = self.end?;
        let delta: TimeDelta = end - self.start;
        Some(delta.to_std().unwrap_or(Duration::ZERO))
    }

    /// Whether the device is still writing to this session
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }
}
