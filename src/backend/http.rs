//! HTTP client for the acquisition server's history API
//!
//! Endpoints used:
//!
//! - `GET /api/history/dates`
//! - `GET /api/history/sessions/<YYYYMMDD>`
//! - `GET /api/history/window/<session>/<SIGNAL>?position=&window_size=`

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::{Result, ResultExt, SensorViewError};
use crate::session::{Session, SessionId, SessionStatus};
use crate::types::{HistoryDate, Signal};

use super::data_source::{DataSource, DateEntry, WindowResponse};

/// REST data source backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpDataSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDataSource {
    /// Create a new client with the given base URL and request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SensorViewError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn window_url(&self, session_id: &SessionId, signal: Signal) -> String {
        format!(
            "{}/api/history/window/{}/{}",
            self.base_url,
            session_id,
            signal.as_str()
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        tracing::debug!("GET {} {:?}", url, query);
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| status.to_string());
            return Err(SensorViewError::Transport(format!(
                "{} returned {}: {}",
                url, status, message
            )));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn list_dates(&self) -> Result<Vec<DateEntry>> {
        let url = format!("{}/api/history/dates", self.base_url);
        let body: DatesBody = self
            .get_json(&url, &[])
            .await
            .context("Failed to fetch history dates")?;

        Ok(body
            .dates
            .into_iter()
            .filter_map(|d| match HistoryDate::parse(&d.value) {
                Ok(date) => Some(DateEntry {
                    date,
                    label: d.label.unwrap_or_else(|| date.label()),
                }),
                Err(e) => {
                    tracing::warn!("Skipping malformed history date: {}", e);
                    None
                }
            })
            .collect())
    }

    async fn list_sessions_for_date(&self, date: HistoryDate) -> Result<Vec<Session>> {
        let url = format!("{}/api/history/sessions/{}", self.base_url, date.compact());
        let body: SessionsBody = self
            .get_json(&url, &[])
            .await
            .with_context(|| format!("Failed to fetch sessions for {}", date))?;

        Ok(body
            .sessions
            .into_iter()
            .filter_map(|s| match s.into_session() {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!("Skipping malformed session entry: {}", e);
                    None
                }
            })
            .collect())
    }

    async fn get_window(
        &self,
        session_id: &SessionId,
        signal: Signal,
        position: usize,
        window_size: usize,
    ) -> Result<WindowResponse> {
        let url = self.window_url(session_id, signal);
        let query = [
            ("position", position.to_string()),
            ("window_size", window_size.to_string()),
        ];
        let body: WindowBody = self
            .get_json(&url, &query)
            .await
            .with_context(|| format!("Failed to fetch {} window for {}", signal, session_id))?;

        Ok(body.into_response(position))
    }

    fn name(&self) -> &str {
        &self.base_url
    }
}

// ==================== Wire Format ====================

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct DatesBody {
    #[serde(default)]
    dates: Vec<DateBody>,
}

#[derive(Debug, Deserialize)]
struct DateBody {
    value: String,
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionsBody {
    #[serde(default)]
    sessions: Vec<SessionBody>,
}

#[derive(Debug, Deserialize)]
struct SessionBody {
    session_id: String,
    #[serde(default)]
    start_time: String,
    #[serde(default)]
    end_time: String,
    #[serde(default)]
    status: SessionStatus,
    #[serde(default)]
    total_samples: BTreeMap<String, usize>,
}

impl SessionBody {
    fn into_session(self) -> Result<Session> {
        let id = SessionId::parse(&self.session_id)?;
        let start = parse_timestamp(&self.start_time).unwrap_or_else(|| id.started_at());
        let end = parse_timestamp(&self.end_time);

        let total_samples = self
            .total_samples
            .into_iter()
            .filter_map(|(name, count)| name.parse::<Signal>().ok().map(|s| (s, count)))
            .collect();

        Ok(Session {
            id,
            start,
            end,
            status: self.status,
            total_samples,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WindowBody {
    #[serde(default)]
    data: ChartBody,
    #[serde(default)]
    count: usize,
    #[serde(default)]
    total_count: usize,
}

#[derive(Debug, Default, Deserialize)]
struct ChartBody {
    #[serde(default)]
    x: Vec<usize>,
    #[serde(default)]
    y: Vec<Vec<f64>>,
}

impl WindowBody {
    fn into_response(self, requested_position: usize) -> WindowResponse {
        WindowResponse {
            offset: self.data.x.first().copied().unwrap_or(requested_position),
            returned_count: self.count,
            total_count: self.total_count,
            channels: self.data.y,
        }
    }
}

/// Parse the server's ISO-8601 timestamps; empty means "not set"
fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value
        .parse::<NaiveDateTime>()
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.naive_local()))
}
