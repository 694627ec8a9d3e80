//! Chart renderer boundary
//!
//! The history engine hands a renderer pre-labelled windows and never raw
//! timestamps: the x axis is the absolute sample index, so a trace keeps its
//! shape regardless of how much wall-clock time it spans.
//!
//! # Main Types
//!
//! - [`ChartRenderer`] - Trait implemented by anything that can draw a window
//! - [`TextRenderer`] - Writes a one-line summary per channel (CLI)
//! - [`RecordingRenderer`] - Keeps every frame it was given (tests)
//! - [`ChannelStatistics`] - Min/max/mean of a channel for summaries

use std::io::Write;

use crate::history::{RangeLabel, Window};

/// Something that can draw a window of samples
pub trait ChartRenderer {
    /// Draw `channels` against `x_indices` with a pre-formatted time range
    fn render(&mut self, channels: &[Vec<f64>], x_indices: &[usize], label: &RangeLabel);
}

/// Decimate a window for display
///
/// Windows longer than `max_points` keep every `len / max_points`-th sample,
/// with x indices staying absolute. `max_points == 0` disables decimation.
pub fn downsample(window: &Window, max_points: usize) -> (Vec<Vec<f64>>, Vec<usize>) {
    let len = window.returned_count;
    if max_points == 0 || len <= max_points {
        return (window.channels.clone(), window.x_indices());
    }

    let step = len / max_points;
    let channels = window
        .channels
        .iter()
        .map(|channel| channel.iter().step_by(step).copied().collect())
        .collect();
    let x_indices = window.index_range().step_by(step).collect();
    (channels, x_indices)
}

/// Summary statistics for one channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub count: usize,
}

impl ChannelStatistics {
    /// Compute statistics, `None` for an empty channel
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let (min, max, sum) = values.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), &v| (min.min(v), max.max(v), sum + v),
        );
        Some(Self {
            min,
            max,
            mean: sum / values.len() as f64,
            count: values.len(),
        })
    }
}

/// Writes a textual summary of each rendered window
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChartRenderer for TextRenderer<W> {
    fn render(&mut self, channels: &[Vec<f64>], x_indices: &[usize], label: &RangeLabel) {
        let first = x_indices.first().copied().unwrap_or(0);
        let last = x_indices.last().copied().unwrap_or(first);
        // Output errors (closed pipe) are not worth failing a render over
        let _ = writeln!(
            self.out,
            "[{}] samples {}..={} ({} points)",
            label,
            first,
            last,
            x_indices.len()
        );
        for (idx, channel) in channels.iter().enumerate() {
            if let Some(stats) = ChannelStatistics::from_values(channel) {
                let _ = writeln!(
                    self.out,
                    "  ch{}: min {:.3} max {:.3} mean {:.3}",
                    idx, stats.min, stats.max, stats.mean
                );
            }
        }
    }
}

/// A frame captured by [`RecordingRenderer`]
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub channels: Vec<Vec<f64>>,
    pub x_indices: Vec<usize>,
    pub label: RangeLabel,
}

/// Renderer that keeps every frame; useful in tests
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<RenderedFrame>,
}

impl RecordingRenderer {
    /// The most recent frame
    pub fn last(&self) -> Option<&RenderedFrame> {
        self.frames.last()
    }
}

impl ChartRenderer for RecordingRenderer {
    fn render(&mut self, channels: &[Vec<f64>], x_indices: &[usize], label: &RangeLabel) {
        self.frames.push(RenderedFrame {
            channels: channels.to_vec(),
            x_indices: x_indices.to_vec(),
            label: label.clone(),
        });
    }
}
