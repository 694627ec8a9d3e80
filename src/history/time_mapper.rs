//! Sample index to wall-clock conversion
//!
//! Only sample indices travel over the wire, so display times are
//! reconstructed on the client. Two strategies exist:
//!
//! - [`FixedRateMapper`] - `start + index / rate`, used for ECG and ADC.
//! - [`ProratedMapper`] - for the sparse temperature signal. Once the session
//!   has ended, its window is placed on the session timeline by the fraction
//!   of the reference signal's total it covers, since the low-rate index
//!   alone under-reports the real duration. While the session is still open
//!   there is no better reference than the nominal rate.
//!
//! [`mapper_for`] picks the strategy from a signal's [`SamplingDomain`].

use chrono::{DateTime, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::types::{SamplingDomain, Signal, SignalRates};

/// Spans at least this long are labelled without seconds in `Auto` mode
const AUTO_MINUTES_THRESHOLD: Duration = Duration::from_secs(3600);

/// Everything a mapper needs to place one window on the session timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappingContext {
    /// When the session started
    pub session_start: NaiveDateTime,
    /// When the session ended, if it has
    pub session_end: Option<NaiveDateTime>,
    /// Offset of the first sample in the window
    pub position: usize,
    /// Number of samples actually returned
    pub returned: usize,
    /// Total samples of the reference signal
    pub reference_total: usize,
}

/// Absolute time span covered by a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeRange {
    /// A zero-length range at `instant`
    pub fn instant(instant: NaiveDateTime) -> Self {
        Self {
            start: instant,
            end: instant,
        }
    }

    /// Length of the range
    pub fn span(&self) -> Duration {
        (self.end - self.start).to_std().unwrap_or(Duration::ZERO)
    }

    /// Start as milliseconds since the Unix epoch
    pub fn start_ms(&self) -> i64 {
        self.start.and_utc().timestamp_millis()
    }

    /// End as milliseconds since the Unix epoch
    pub fn end_ms(&self) -> i64 {
        self.end.and_utc().timestamp_millis()
    }

    /// Format both bounds
    pub fn label(&self, precision: LabelPrecision) -> RangeLabel {
        let precision = precision.resolve(self.span());
        RangeLabel {
            start: format_instant(&self.start, precision),
            end: format_instant(&self.end, precision),
        }
    }
}

/// Pre-formatted bounds handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RangeLabel {
    pub start: String,
    pub end: String,
}

impl fmt::Display for RangeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// Resolution of time labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPrecision {
    /// `HH:MM`
    Minutes,
    /// `HH:MM:SS`
    Seconds,
    /// Seconds for spans under an hour, minutes otherwise
    #[default]
    Auto,
}

impl LabelPrecision {
    fn resolve(self, span: Duration) -> LabelPrecision {
        match self {
            LabelPrecision::Auto if span >= AUTO_MINUTES_THRESHOLD => LabelPrecision::Minutes,
            LabelPrecision::Auto => LabelPrecision::Seconds,
            other => other,
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            LabelPrecision::Minutes => "%H:%M",
            LabelPrecision::Seconds | LabelPrecision::Auto => "%H:%M:%S",
        }
    }
}

/// Format a wall-clock instant as `HH:MM` or `HH:MM:SS`
pub fn format_instant(instant: &NaiveDateTime, precision: LabelPrecision) -> String {
    instant.format(precision.pattern()).to_string()
}

/// Format a millisecond Unix timestamp as `HH:MM` or `HH:MM:SS`
///
/// Out-of-range timestamps format as the epoch.
pub fn format_timestamp_ms(ms: i64, precision: LabelPrecision) -> String {
    let instant = DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.naive_utc())
        .unwrap_or_default();
    format_instant(&instant, precision)
}

/// `start` shifted by a (possibly fractional) number of seconds
///
/// Saturates at the bounds of `NaiveDateTime` instead of overflowing.
fn offset_by_secs(start: NaiveDateTime, secs: f64) -> NaiveDateTime {
    if !secs.is_finite() {
        return start;
    }
    // `as` saturates at the i64 bounds
    let millis = (secs * 1000.0).round() as i64;
    TimeDelta::try_milliseconds(millis)
        .and_then(|delta| start.checked_add_signed(delta))
        .unwrap_or(if secs < 0.0 {
            NaiveDateTime::MIN
        } else {
            NaiveDateTime::MAX
        })
}

/// Strategy for placing a window on the session timeline
pub trait TimeMapper: fmt::Debug + Send + Sync {
    /// Absolute time range covered by the window in `ctx`
    fn range(&self, ctx: &MappingContext) -> TimeRange;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Linear mapping for signals sampled at a fixed rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRateMapper {
    rate_hz: f64,
}

impl FixedRateMapper {
    pub fn new(rate_hz: f64) -> Self {
        Self { rate_hz }
    }

    /// Wall-clock time of the sample at `index`
    pub fn instant_at(&self, start: NaiveDateTime, index: usize) -> NaiveDateTime {
        if self.rate_hz <= 0.0 {
            return start;
        }
        offset_by_secs(start, index as f64 / self.rate_hz)
    }
}

impl TimeMapper for FixedRateMapper {
    fn range(&self, ctx: &MappingContext) -> TimeRange {
        TimeRange {
            start: self.instant_at(ctx.session_start, ctx.position),
            end: self.instant_at(ctx.session_start, ctx.position + ctx.returned),
        }
    }

    fn name(&self) -> &'static str {
        "fixed-rate"
    }
}

/// Proportional mapping for a sparse signal against a reference span
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProratedMapper {
    /// Used only while the session has no end time
    fallback: FixedRateMapper,
}

impl ProratedMapper {
    pub fn new(nominal_rate_hz: f64) -> Self {
        Self {
            fallback: FixedRateMapper::new(nominal_rate_hz),
        }
    }
}

impl TimeMapper for ProratedMapper {
    fn range(&self, ctx: &MappingContext) -> TimeRange {
        let Some(end) = ctx.session_end else {
            return self.fallback.range(ctx);
        };

        if ctx.reference_total == 0 {
            return TimeRange::instant(ctx.session_start);
        }

        let duration = (end - ctx.session_start)
            .to_std()
            .unwrap_or(Duration::ZERO)
            .as_secs_f64();
        let reference = ctx.reference_total as f64;
        let progress_ratio = ctx.position as f64 / reference;
        let window_ratio = ctx.returned as f64 / reference;

        // A window never lies outside the session
        let start_ratio = progress_ratio.clamp(0.0, 1.0);
        let end_ratio = (progress_ratio + window_ratio).clamp(start_ratio, 1.0);

        TimeRange {
            start: offset_by_secs(ctx.session_start, start_ratio * duration),
            end: offset_by_secs(ctx.session_start, end_ratio * duration),
        }
    }

    fn name(&self) -> &'static str {
        "prorated"
    }
}

/// Select the mapping strategy for a signal
pub fn mapper_for(signal: Signal, rates: &SignalRates) -> Box<dyn TimeMapper> {
    let rate = rates.rate_for(signal);
    match signal.domain() {
        SamplingDomain::FixedRate => Box::new(FixedRateMapper::new(rate)),
        SamplingDomain::Prorated { .. } => Box::new(ProratedMapper::new(rate)),
    }
}
