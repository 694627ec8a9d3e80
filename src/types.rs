//! Core data types for SensorView
//!
//! This module contains the fundamental identifiers shared by the history
//! engine, the data sources and the configuration layer.
//!
//! # Main Types
//!
//! - [`Signal`] - The fixed set of channels recorded by the device
//! - [`SamplingDomain`] - How a signal's sample index relates to elapsed time
//! - [`SignalRates`] - Nominal sampling rates, overridable from config
//! - [`HistoryDate`] - A validated `YYYYMMDD` recording day
//!
//! # Sampling Domains
//!
//! ECG and the auxiliary ADC are sampled at a fixed rate, so index `i` is
//! simply `i / rate` seconds into the session. The temperature probe is
//! sampled so sparsely that its own index drifts from real time; its
//! position is re-derived against the ECG span instead.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SensorViewError};

/// Default ECG sampling rate in Hz
pub const DEFAULT_ECG_RATE_HZ: f64 = 250.0;

/// Default auxiliary analog sampling rate in Hz
pub const DEFAULT_ADC_RATE_HZ: f64 = 250.0;

/// Default temperature sampling rate in Hz (one sample every two seconds)
pub const DEFAULT_TEMP_RATE_HZ: f64 = 0.5;

/// A named channel recorded by the acquisition device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    /// Single-lead electrocardiogram
    Ecg,
    /// Three-channel auxiliary analog input
    Adc,
    /// Body temperature
    Temp,
}

impl Signal {
    /// All known signals, in display order
    pub const ALL: [Signal; 3] = [Signal::Ecg, Signal::Adc, Signal::Temp];

    /// Wire name used by the history API
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Ecg => "ECG",
            Signal::Adc => "ADC",
            Signal::Temp => "TEMP",
        }
    }

    /// Number of channels carried per sample
    pub fn cardinality(&self) -> usize {
        match self {
            Signal::Ecg | Signal::Temp => 1,
            Signal::Adc => 3,
        }
    }

    /// How this signal's index maps to elapsed time
    pub fn domain(&self) -> SamplingDomain {
        match self {
            Signal::Ecg | Signal::Adc => SamplingDomain::FixedRate,
            Signal::Temp => SamplingDomain::Prorated {
                reference: Signal::Ecg,
            },
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Signal {
    type Err = SensorViewError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ECG" => Ok(Signal::Ecg),
            "ADC" => Ok(Signal::Adc),
            "TEMP" => Ok(Signal::Temp),
            _ => Err(SensorViewError::Validation(format!(
                "unknown signal '{}' (expected ECG, ADC or TEMP)",
                s
            ))),
        }
    }
}

/// Relationship between a signal's sample index and wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingDomain {
    /// Index divided by the nominal rate gives elapsed seconds
    FixedRate,
    /// Position is reproportioned against another signal's total span
    Prorated { reference: Signal },
}

/// Nominal sampling rates per signal, in samples per second
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalRates {
    pub ecg_hz: f64,
    pub adc_hz: f64,
    pub temp_hz: f64,
}

impl Default for SignalRates {
    fn default() -> Self {
        Self {
            ecg_hz: DEFAULT_ECG_RATE_HZ,
            adc_hz: DEFAULT_ADC_RATE_HZ,
            temp_hz: DEFAULT_TEMP_RATE_HZ,
        }
    }
}

impl SignalRates {
    /// Nominal rate for a signal
    pub fn rate_for(&self, signal: Signal) -> f64 {
        match signal {
            Signal::Ecg => self.ecg_hz,
            Signal::Adc => self.adc_hz,
            Signal::Temp => self.temp_hz,
        }
    }

    /// Reject non-positive or non-finite rates
    pub fn validate(&self) -> Result<()> {
        for signal in Signal::ALL {
            let rate = self.rate_for(signal);
            if !rate.is_finite() || rate <= 0.0 {
                return Err(SensorViewError::Config(format!(
                    "sampling rate for {} must be positive, got {}",
                    signal, rate
                )));
            }
        }
        Ok(())
    }
}

/// A recording day in `YYYYMMDD` form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HistoryDate(NaiveDate);

impl HistoryDate {
    /// Parse and validate a `YYYYMMDD` string
    pub fn parse(value: &str) -> Result<Self> {
        if value.len() != 8 {
            return Err(SensorViewError::Validation(format!(
                "date '{}' must be in YYYYMMDD form",
                value
            )));
        }
        NaiveDate::parse_from_str(value, "%Y%m%d")
            .map(HistoryDate)
            .map_err(|e| SensorViewError::Validation(format!("invalid date '{}': {}", value, e)))
    }

    /// The calendar date
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Compact `YYYYMMDD` form used in URLs and session ids
    pub fn compact(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }

    /// Human readable label, e.g. `07 March 2025`
    pub fn label(&self) -> String {
        self.0.format("%d %B %Y").to_string()
    }
}

impl From<NaiveDate> for HistoryDate {
    fn from(date: NaiveDate) -> Self {
        HistoryDate(date)
    }
}

impl fmt::Display for HistoryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.compact())
    }
}

impl FromStr for HistoryDate {
    type Err = SensorViewError;

    fn from_str(s: &str) -> Result<Self> {
        HistoryDate::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_from_str() {
        assert_eq!("ECG".parse::<Signal>().unwrap(), Signal::Ecg);
        assert_eq!("adc".parse::<Signal>().unwrap(), Signal::Adc);
        assert_eq!("Temp".parse::<Signal>().unwrap(), Signal::Temp);
        assert!("PIEZO".parse::<Signal>().is_err());
    }

    #[test]
    fn test_signal_domains() {
        assert_eq!(Signal::Ecg.domain(), SamplingDomain::FixedRate);
        assert_eq!(Signal::Adc.domain(), SamplingDomain::FixedRate);
        assert_eq!(
            Signal::Temp.domain(),
            SamplingDomain::Prorated {
                reference: Signal::Ecg
            }
        );
        assert_eq!(Signal::Adc.cardinality(), 3);
    }

    #[test]
    fn test_signal_serde_uses_wire_names() {
        let json = serde_json::to_string(&Signal::Temp).unwrap();
        assert_eq!(json, "\"TEMP\"");
    }

    #[test]
    fn test_history_date() {
        let date = HistoryDate::parse("20250307").unwrap();
        assert_eq!(date.compact(), "20250307");
        assert_eq!(date.label(), "07 March 2025");

        assert!(HistoryDate::parse("2025037").is_err());
        assert!(HistoryDate::parse("20251307").is_err());
        assert!(HistoryDate::parse("2025-03-07").is_err());
    }

    #[test]
    fn test_rates_validate() {
        assert!(SignalRates::default().validate().is_ok());
        let bad = SignalRates {
            temp_hz: 0.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
