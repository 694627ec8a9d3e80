//! In-memory data source for testing and offline demos
//!
//! Sessions and their samples live in process memory and are served with the
//! same window contract as the real server. The source can be mutated while
//! shared, which lets tests model a session that keeps recording, one that
//! is deleted server-side, or a transport that fails.
//!
//! # Example
//!
//! ```ignore
//! use sensorview::backend::MemoryDataSource;
//!
//! let source = MemoryDataSource::new();
//! source.insert_session(session, [(Signal::Ecg, ecg_samples)]);
//!
//! // Simulate more data arriving
//! source.append_samples(&session.id, Signal::Ecg, more_samples);
//! ```

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::RwLock;

use crate::error::{Result, SensorViewError};
use crate::session::{Session, SessionId};
use crate::types::{HistoryDate, Signal};

use super::data_source::{DataSource, DateEntry, WindowResponse};

/// One stored session: metadata plus sample-major series per signal
#[derive(Debug, Clone)]
struct StoredSession {
    session: Session,
    /// signal -> samples, each sample holding one value per channel
    series: BTreeMap<Signal, Vec<Vec<f64>>>,
}

#[derive(Debug, Default)]
struct Inner {
    sessions: HashMap<SessionId, StoredSession>,
    /// Number of upcoming requests that should fail
    pending_failures: usize,
    /// Number of window requests served
    window_requests: usize,
}

/// Data source backed by process memory
#[derive(Debug, Default)]
pub struct MemoryDataSource {
    inner: RwLock<Inner>,
}

impl MemoryDataSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a session with its samples
    pub fn insert_session(
        &self,
        session: Session,
        series: impl IntoIterator<Item = (Signal, Vec<Vec<f64>>)>,
    ) {
        let series: BTreeMap<_, _> = series.into_iter().collect();
        let mut inner = self.write();
        inner
            .sessions
            .insert(session.id.clone(), StoredSession { session, series });
    }

    /// Add a session with `count` generated samples per listed signal
    ///
    /// Sample `i` of channel `c` has value `i + c * 0.1`, which makes windows
    /// easy to verify.
    pub fn insert_generated(&self, session: Session, counts: &[(Signal, usize)]) {
        let series = counts.iter().map(|&(signal, count)| {
            let samples = (0..count)
                .map(|i| {
                    (0..signal.cardinality())
                        .map(|c| i as f64 + c as f64 * 0.1)
                        .collect()
                })
                .collect();
            (signal, samples)
        });
        self.insert_session(session, series);
    }

    /// Append samples to a signal, as a still-recording session would
    pub fn append_samples(&self, session_id: &SessionId, signal: Signal, samples: Vec<Vec<f64>>) {
        let mut inner = self.write();
        if let Some(stored) = inner.sessions.get_mut(session_id) {
            stored.series.entry(signal).or_default().extend(samples);
        }
    }

    /// Drop the tail of a signal so only `keep` samples remain
    pub fn truncate_samples(&self, session_id: &SessionId, signal: Signal, keep: usize) {
        let mut inner = self.write();
        if let Some(series) = inner
            .sessions
            .get_mut(session_id)
            .and_then(|s| s.series.get_mut(&signal))
        {
            series.truncate(keep);
        }
    }

    /// Delete a session entirely
    pub fn remove_session(&self, session_id: &SessionId) -> bool {
        self.write().sessions.remove(session_id).is_some()
    }

    /// Make the next `count` requests fail with a transport error
    pub fn fail_next(&self, count: usize) {
        self.write().pending_failures = count;
    }

    /// Number of window requests served so far
    pub fn window_requests(&self) -> usize {
        self.read().window_requests
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    fn take_failure(&self) -> Result<()> {
        let mut inner = self.write();
        if inner.pending_failures > 0 {
            inner.pending_failures -= 1;
            return Err(SensorViewError::Transport(
                "simulated connection failure".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DataSource for MemoryDataSource {
    async fn list_dates(&self) -> Result<Vec<DateEntry>> {
        self.take_failure()?;
        let dates: BTreeSet<HistoryDate> =
            self.read().sessions.keys().map(|id| id.date()).collect();
        Ok(dates.into_iter().rev().map(DateEntry::new).collect())
    }

    async fn list_sessions_for_date(&self, date: HistoryDate) -> Result<Vec<Session>> {
        self.take_failure()?;
        let inner = self.read();
        let mut sessions: Vec<Session> = inner
            .sessions
            .values()
            .filter(|stored| stored.session.id.date() == date)
            .map(|stored| {
                let mut session = stored.session.clone();
                for (signal, samples) in &stored.series {
                    session.total_samples.insert(*signal, samples.len());
                }
                session
            })
            .collect();
        sessions.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(sessions)
    }

    async fn get_window(
        &self,
        session_id: &SessionId,
        signal: Signal,
        position: usize,
        window_size: usize,
    ) -> Result<WindowResponse> {
        self.take_failure()?;
        let mut inner = self.write();
        inner.window_requests += 1;

        let Some(samples) = inner
            .sessions
            .get(session_id)
            .and_then(|stored| stored.series.get(&signal))
        else {
            return Ok(WindowResponse::empty(position, 0));
        };

        let total = samples.len();
        let start = position.min(total);
        let end = position.saturating_add(window_size).min(total);
        let slice = &samples[start..end];

        let channels = (0..signal.cardinality())
            .map(|c| {
                slice
                    .iter()
                    .map(|sample| sample.get(c).copied().unwrap_or(0.0))
                    .collect()
            })
            .collect();

        Ok(WindowResponse {
            offset: position,
            returned_count: slice.len(),
            total_count: total,
            channels,
        })
    }

    fn name(&self) -> &str {
        "memory"
    }
}
