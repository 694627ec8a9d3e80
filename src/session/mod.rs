//! Recording sessions as listed by the history API
//!
//! A [`Session`] is one acquisition run: it has an identifier derived from
//! its start instant, an optional end instant (absent while the device is
//! still recording) and the number of samples stored per signal. Sessions
//! are immutable once selected; a [`crate::history::HistoryView`] owns the
//! one it is browsing.

pub mod types;

pub use types::{Session, SessionId, SessionStatus};
