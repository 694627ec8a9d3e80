//! Window retrieval and normalization
//!
//! [`WindowFetcher`] asks a [`DataSource`] for exactly one window and turns
//! the raw [`WindowResponse`] into a [`Window`] whose channel arrays all have
//! `returned_count` samples. After every successful fetch the reported total
//! is fed back into the [`WindowStore`] with [`WindowFetcher::reconcile`],
//! because a session that is still recording keeps growing between calls.

use std::ops::Range;
use std::sync::Arc;

use crate::backend::{DataSource, WindowResponse};
use crate::error::{Result, SensorViewError};
use crate::session::SessionId;
use crate::types::Signal;

use super::window_store::WindowStore;

/// A normalized page of samples
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Window {
    /// Index of the first sample
    pub offset: usize,
    /// Number of samples per channel
    pub returned_count: usize,
    /// Samples available when the window was served
    pub total_count: usize,
    /// One array of `returned_count` values per channel
    pub channels: Vec<Vec<f64>>,
}

impl Window {
    /// Whether the source had nothing at this position
    pub fn is_empty(&self) -> bool {
        self.returned_count == 0
    }

    /// Absolute sample indices covered by this window
    pub fn index_range(&self) -> Range<usize> {
        self.offset..self.offset + self.returned_count
    }

    /// Absolute sample indices, one per sample, for the renderer's x axis
    pub fn x_indices(&self) -> Vec<usize> {
        self.index_range().collect()
    }

    /// Number of channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

/// Fetches single windows from a data source
#[derive(Clone)]
pub struct WindowFetcher {
    source: Arc<dyn DataSource>,
}

impl std::fmt::Debug for WindowFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowFetcher")
            .field("source", &self.source.name())
            .finish()
    }
}

impl WindowFetcher {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }

    /// The underlying source
    pub fn source(&self) -> &Arc<dyn DataSource> {
        &self.source
    }

    /// Request one window
    ///
    /// An empty window is a successful result. Transport and decoding
    /// failures are returned as errors and must leave the caller's state
    /// untouched.
    pub async fn fetch_window(
        &self,
        session_id: &SessionId,
        signal: Signal,
        position: usize,
        window_size: usize,
    ) -> Result<Window> {
        let response = self
            .source
            .get_window(session_id, signal, position, window_size)
            .await?;
        normalize(response, signal, position, window_size)
    }

    /// Feed the window's total into the store
    ///
    /// Returns true if the store's bounds or position changed.
    pub fn reconcile(window: &Window, store: &mut WindowStore) -> bool {
        store.set_total(window.total_count)
    }
}

/// Bring a raw response into the common window shape
fn normalize(
    response: WindowResponse,
    signal: Signal,
    position: usize,
    window_size: usize,
) -> Result<Window> {
    let WindowResponse {
        offset,
        returned_count,
        mut total_count,
        mut channels,
    } = response;

    let mut len = channels.iter().map(Vec::len).min().unwrap_or(0);
    if len > window_size {
        tracing::warn!(
            "Source returned {} samples for a window of {}, truncating",
            len,
            window_size
        );
        len = window_size;
    }

    if len == 0 {
        return Ok(Window {
            offset: position,
            returned_count: 0,
            total_count,
            channels: vec![Vec::new(); signal.cardinality()],
        });
    }

    if offset != position {
        return Err(SensorViewError::Parse(format!(
            "window for {} starts at {} but {} was requested",
            signal, offset, position
        )));
    }

    if returned_count != len {
        tracing::debug!(
            "Reported count {} differs from {} samples received",
            returned_count,
            len
        );
    }

    let expected = signal.cardinality();
    if channels.len() != expected {
        tracing::warn!(
            "{} window has {} channels, expected {}",
            signal,
            channels.len(),
            expected
        );
        channels.resize_with(expected, || vec![0.0; len]);
    }
    for channel in &mut channels {
        channel.truncate(len);
    }

    if total_count < offset + len {
        tracing::warn!(
            "Reported total {} is smaller than served range end {}",
            total_count,
            offset + len
        );
        total_count = offset + len;
    }

    Ok(Window {
        offset,
        returned_count: len,
        total_count,
        channels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockDataSource;
    use crate::history::WindowSize;

    fn sid() -> SessionId {
        SessionId::parse("20250307_100000").unwrap()
    }

    fn response(offset: usize, channels: Vec<Vec<f64>>, total: usize) -> WindowResponse {
        WindowResponse {
            offset,
            returned_count: channels.first().map(Vec::len).unwrap_or(0),
            total_count: total,
            channels,
        }
    }

    #[tokio::test]
    async fn test_fetch_passes_request_through() {
        let mut mock = MockDataSource::new();
        mock.expect_get_window()
            .withf(|id, signal, position, size| {
                id.as_str() == "20250307_100000"
                    && *signal == Signal::Ecg
                    && *position == 200
                    && *size == 3
            })
            .times(1)
            .returning(|_, _, position, _| Ok(response(position, vec![vec![1.0, 2.0, 3.0]], 1000)));

        let fetcher = WindowFetcher::new(Arc::new(mock));
        let window = fetcher.fetch_window(&sid(), Signal::Ecg, 200, 3).await.unwrap();

        assert_eq!(window.offset, 200);
        assert_eq!(window.returned_count, 3);
        assert_eq!(window.x_indices(), vec![200, 201, 202]);
    }

    #[tokio::test]
    async fn test_fetch_propagates_transport_error() {
        let mut mock = MockDataSource::new();
        mock.expect_get_window()
            .returning(|_, _, _, _| Err(SensorViewError::Transport("refused".to_string())));

        let fetcher = WindowFetcher::new(Arc::new(mock));
        let err = fetcher
            .fetch_window(&sid(), Signal::Ecg, 0, 10)
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_normalize_empty() {
        let window = normalize(WindowResponse::empty(40, 0), Signal::Adc, 40, 10).unwrap();
        assert!(window.is_empty());
        assert_eq!(window.offset, 40);
        assert_eq!(window.channel_count(), 3);
    }

    #[test]
    fn test_normalize_pads_missing_channels() {
        let window = normalize(
            response(0, vec![vec![1.0, 2.0]], 2),
            Signal::Adc,
            0,
            10,
        )
        .unwrap();
        assert_eq!(window.channel_count(), 3);
        assert_eq!(window.channels[2], vec![0.0, 0.0]);
    }

    #[test]
    fn test_normalize_truncates_ragged_and_oversized() {
        let window = normalize(
            response(0, vec![vec![1.0, 2.0, 3.0, 4.0]], 100),
            Signal::Ecg,
            0,
            2,
        )
        .unwrap();
        assert_eq!(window.returned_count, 2);
        assert_eq!(window.channels[0], vec![1.0, 2.0]);

        let ragged = WindowResponse {
            offset: 0,
            returned_count: 3,
            total_count: 3,
            channels: vec![vec![1.0, 2.0, 3.0], vec![1.0], vec![1.0, 2.0]],
        };
        let window = normalize(ragged, Signal::Adc, 0, 10).unwrap();
        assert_eq!(window.returned_count, 1);
        assert!(window.channels.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn test_normalize_rejects_misplaced_window() {
        let result = normalize(response(10, vec![vec![1.0]], 100), Signal::Ecg, 0, 5);
        assert!(matches!(result, Err(SensorViewError::Parse(_))));
    }

    #[test]
    fn test_normalize_raises_inconsistent_total() {
        let window = normalize(response(5, vec![vec![1.0, 2.0]], 3), Signal::Ecg, 5, 5).unwrap();
        assert_eq!(window.total_count, 7);
    }

    #[test]
    fn test_reconcile_updates_store() {
        let mut store = WindowStore::new(1000, WindowSize::All);
        let window = Window {
            offset: 0,
            returned_count: 800,
            total_count: 800,
            channels: vec![vec![0.0; 800]],
        };
        assert!(WindowFetcher::reconcile(&window, &mut store));
        assert_eq!(store.position(), 0);
        assert_eq!(store.window_size(), 800);
    }
}
