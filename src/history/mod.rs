//! Historical-data windowing engine
//!
//! Browsing a recorded session means paging through a series that can hold
//! hundreds of thousands of samples per signal. The engine requests bounded
//! windows from a [`crate::backend::DataSource`], keeps the slider position
//! consistent with what was actually returned, and labels each window with
//! wall-clock times reconstructed from sample indices.
//!
//! # Data Flow
//!
//! 1. A [`Navigation`] command updates the [`WindowStore`] and yields a
//!    [`WindowRequest`].
//! 2. The [`WindowFetcher`] retrieves and normalizes the [`Window`].
//! 3. The server's total is reconciled into the store.
//! 4. A [`TimeMapper`] turns the window into a [`RangeLabel`].
//! 5. A [`crate::frontend::ChartRenderer`] draws it.
//!
//! # Example
//!
//! ```ignore
//! let mut view = HistoryView::new(session, Signal::Ecg, ViewOptions::from(&config));
//! let fetcher = WindowFetcher::new(source);
//!
//! let request = view.reload(LoadKind::UserInitiated);
//! let outcome = view.load(&fetcher, request, &mut renderer).await;
//! if let Some(notice) = outcome.notice() {
//!     eprintln!("{}", notice);
//! }
//! ```

pub mod fetcher;
pub mod time_mapper;
pub mod view;
pub mod window_store;

pub use fetcher::{Window, WindowFetcher};
pub use time_mapper::{
    format_instant, format_timestamp_ms, mapper_for, FixedRateMapper, LabelPrecision,
    MappingContext, ProratedMapper, RangeLabel, TimeMapper, TimeRange,
};
pub use view::{
    HistoryView, LoadKind, LoadOutcome, Navigation, Notice, RequestToken, ViewOptions,
    WindowRequest,
};
pub use window_store::{StepDirection, WindowSize, WindowStore};
