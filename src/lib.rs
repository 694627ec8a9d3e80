//! # SensorView: windowed history browser for sensor sessions
//!
//! Client-side engine for paging through recorded ECG, auxiliary analog and
//! temperature sessions served by an acquisition server. A session can hold
//! hundreds of thousands of samples per signal, so it is viewed one bounded
//! window at a time.
//!
//! ## Architecture
//!
//! - **History**: window pagination state, fetch sequencing and time labels
//! - **Backend**: the [`backend::DataSource`] trait with HTTP and in-memory
//!   implementations
//! - **Frontend**: the [`frontend::ChartRenderer`] boundary and downsampling
//! - **Config**: TOML configuration for server, window and sampling rates
//!
//! ## Example
//!
//! ```ignore
//! use sensorview::{
//!     backend::HttpDataSource,
//!     config::AppConfig,
//!     frontend::TextRenderer,
//!     history::{HistoryView, LoadKind, Navigation, StepDirection, ViewOptions, WindowFetcher},
//! };
//!
//! let config = AppConfig::load_or_default(None);
//! let source = Arc::new(HttpDataSource::new(&config.server.base_url, config.server.timeout())?);
//! let fetcher = WindowFetcher::new(source);
//! let mut renderer = TextRenderer::new(std::io::stdout());
//!
//! let mut view = HistoryView::new(session, Signal::Ecg, ViewOptions::from(&config));
//! let request = view.reload(LoadKind::UserInitiated);
//! view.load(&fetcher, request, &mut renderer).await;
//!
//! if let Some(request) = view.navigate(Navigation::Step(StepDirection::NextHalf), LoadKind::UserInitiated) {
//!     view.load(&fetcher, request, &mut renderer).await;
//! }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod frontend;
pub mod history;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use backend::{DataSource, HttpDataSource, MemoryDataSource};
pub use config::AppConfig;
pub use error::{Result, SensorViewError};
pub use history::{HistoryView, LoadKind, LoadOutcome, Navigation, WindowFetcher, WindowSize};
pub use session::{Session, SessionId};
pub use types::{HistoryDate, Signal};
