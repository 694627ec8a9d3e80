//! Backend module: where history windows come from
//!
//! The history engine never talks to the network directly. It consumes the
//! [`DataSource`] trait, which has two implementations:
//!
//! - [`HttpDataSource`] - REST client for the acquisition server's history API
//! - [`MemoryDataSource`] - In-memory sessions for tests and offline demos
//!
//! # Window Contract
//!
//! For a request at `position` with `window_size`, a source answers with
//! `returned_count = min(window_size, max(0, total_count - position))`
//! samples starting at `offset = position`. A session that no longer exists
//! answers with an empty window and a total of zero, not an error.
//!
//! # Example
//!
//! ```ignore
//! use sensorview::backend::{DataSource, HttpDataSource};
//! use sensorview::types::HistoryDate;
//!
//! let source = HttpDataSource::new("http://localhost:5002", Duration::from_secs(30))?;
//! for session in source.list_sessions_for_date(HistoryDate::parse("20250307")?).await? {
//!     println!("{} ({} ECG samples)", session.id, session.total_for(Signal::Ecg));
//! }
//! ```

pub mod data_source;
pub mod http;
pub mod memory_source;

pub use data_source::{DataSource, DateEntry, WindowResponse};
pub use http::HttpDataSource;
pub use memory_source::MemoryDataSource;

#[cfg(test)]
pub use data_source::MockDataSource;
