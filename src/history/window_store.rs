//! Pagination state for one session/signal selection
//!
//! The store keeps the authoritative sample count, the requested window size
//! and the offset of the first visible sample. Every mutator clamps its input
//! into range instead of rejecting it, and none of them perform I/O.
//!
//! # Bounds
//!
//! For a resolved window size `w` and total `n`, the position always lies in
//! `[0, max(0, n - w)]`. A window may run past the end of the series; the data
//! source simply returns fewer samples.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SensorViewError};

/// Requested number of samples per fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowSize {
    /// A fixed number of samples (at least one)
    Samples(usize),
    /// The entire series, resolved against the current total
    All,
}

impl WindowSize {
    /// Resolve to a concrete sample count against `total`
    pub fn resolve(&self, total: usize) -> usize {
        match self {
            WindowSize::Samples(n) => (*n).max(1),
            WindowSize::All => total.max(1),
        }
    }

    /// Whether this is the "entire series" sentinel
    pub fn is_all(&self) -> bool {
        matches!(self, WindowSize::All)
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        WindowSize::Samples(1000)
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowSize::Samples(n) => write!(f, "{}", n),
            WindowSize::All => f.write_str("all"),
        }
    }
}

impl FromStr for WindowSize {
    type Err = SensorViewError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(WindowSize::All);
        }
        match s.parse::<usize>() {
            Ok(n) if n > 0 => Ok(WindowSize::Samples(n)),
            _ => Err(SensorViewError::Validation(format!(
                "window size '{}' must be a positive integer or 'all'",
                s
            ))),
        }
    }
}

/// Relative navigation commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    /// Jump to the first sample
    Start,
    /// Move back by half a window
    PreviousHalf,
    /// Move forward by half a window
    NextHalf,
    /// Jump to the last full window
    End,
}

impl FromStr for StepDirection {
    type Err = SensorViewError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "start" => Ok(StepDirection::Start),
            "prev" | "previous" => Ok(StepDirection::PreviousHalf),
            "next" => Ok(StepDirection::NextHalf),
            "end" => Ok(StepDirection::End),
            _ => Err(SensorViewError::Validation(format!(
                "unknown step '{}' (expected start, prev, next or end)",
                s
            ))),
        }
    }
}

/// Window pagination state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowStore {
    /// Last reported number of available samples
    total_count: usize,
    /// Size as requested by the user
    requested: WindowSize,
    /// Offset of the first sample in the current window
    position: usize,
}

impl WindowStore {
    /// Create a store for a series of `total_count` samples
    pub fn new(total_count: usize, window_size: WindowSize) -> Self {
        Self {
            total_count,
            requested: window_size,
            position: 0,
        }
    }

    /// Last reported number of available samples
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Window size as requested
    pub fn requested_size(&self) -> WindowSize {
        self.requested
    }

    /// Window size resolved against the current total
    pub fn window_size(&self) -> usize {
        self.requested.resolve(self.total_count)
    }

    /// Offset of the first sample in the current window
    pub fn position(&self) -> usize {
        self.position
    }

    /// Largest valid position (the slider maximum)
    pub fn max_position(&self) -> usize {
        self.total_count.saturating_sub(self.window_size())
    }

    /// Number of samples the current window should contain
    pub fn expected_count(&self) -> usize {
        self.window_size()
            .min(self.total_count.saturating_sub(self.position))
    }

    /// Half-window step used by relative navigation
    pub fn half_step(&self) -> usize {
        (self.window_size() / 2).max(1)
    }

    /// Whether the window starts at the first sample
    pub fn at_start(&self) -> bool {
        self.position == 0
    }

    /// Whether the window is at the slider maximum
    pub fn at_end(&self) -> bool {
        self.position >= self.max_position()
    }

    /// Set the authoritative total and re-clamp the position
    ///
    /// Returns true if anything changed.
    pub fn set_total(&mut self, total: usize) -> bool {
        let before = self.clone();
        self.total_count = total;
        self.clamp_position();
        if *self != before {
            tracing::debug!(
                "Total count {} -> {}, position {} -> {}",
                before.total_count,
                self.total_count,
                before.position,
                self.position
            );
        }
        *self != before
    }

    /// Change the window size and re-clamp the position
    ///
    /// Returns true if anything changed.
    pub fn set_window_size(&mut self, size: WindowSize) -> bool {
        let before = self.clone();
        self.requested = match size {
            WindowSize::Samples(n) => WindowSize::Samples(n.max(1)),
            WindowSize::All => WindowSize::All,
        };
        self.clamp_position();
        *self != before
    }

    /// Move to an absolute offset, clamped to the valid range
    ///
    /// Returns true if the position changed.
    pub fn jump_to(&mut self, offset: usize) -> bool {
        let target = offset.min(self.max_position());
        let changed = target != self.position;
        self.position = target;
        changed
    }

    /// Move relative to the current window
    ///
    /// Returns true if the position changed.
    pub fn step(&mut self, direction: StepDirection) -> bool {
        let target = match direction {
            StepDirection::Start => 0,
            StepDirection::End => self.max_position(),
            StepDirection::PreviousHalf => self.position.saturating_sub(self.half_step()),
            StepDirection::NextHalf => self.position.saturating_add(self.half_step()),
        };
        self.jump_to(target)
    }

    fn clamp_position(&mut self) {
        self.position = self.position.min(self.max_position());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_size_parse() {
        assert_eq!("all".parse::<WindowSize>().unwrap(), WindowSize::All);
        assert_eq!("500".parse::<WindowSize>().unwrap(), WindowSize::Samples(500));
        assert!("0".parse::<WindowSize>().is_err());
        assert!("-3".parse::<WindowSize>().is_err());
    }

    #[test]
    fn test_jump_clamps() {
        let mut store = WindowStore::new(1000, WindowSize::Samples(100));
        assert!(store.jump_to(450));
        assert_eq!(store.position(), 450);

        store.jump_to(5000);
        assert_eq!(store.position(), 900);
        assert!(store.at_end());
    }

    #[test]
    fn test_jump_to_current_position_is_noop() {
        let mut store = WindowStore::new(1000, WindowSize::Samples(100));
        store.jump_to(300);
        let before = store.clone();

        assert!(!store.jump_to(300));
        assert_eq!(store, before);
    }

    #[test]
    fn test_step_half_window() {
        let mut store = WindowStore::new(1000, WindowSize::Samples(100));
        store.step(StepDirection::NextHalf);
        assert_eq!(store.position(), 50);
        store.step(StepDirection::NextHalf);
        assert_eq!(store.position(), 100);
        store.step(StepDirection::PreviousHalf);
        assert_eq!(store.position(), 50);

        store.step(StepDirection::End);
        assert_eq!(store.position(), 900);
        assert!(!store.step(StepDirection::NextHalf));
        assert_eq!(store.position(), 900);

        store.step(StepDirection::Start);
        assert_eq!(store.position(), 0);
        assert!(!store.step(StepDirection::PreviousHalf));
    }

    #[test]
    fn test_step_with_odd_and_tiny_windows() {
        let mut store = WindowStore::new(10, WindowSize::Samples(5));
        store.step(StepDirection::NextHalf);
        assert_eq!(store.position(), 2);

        let mut store = WindowStore::new(10, WindowSize::Samples(1));
        store.step(StepDirection::NextHalf);
        assert_eq!(store.position(), 1);
    }

    #[test]
    fn test_window_larger_than_total() {
        let mut store = WindowStore::new(30, WindowSize::Samples(100));
        assert_eq!(store.max_position(), 0);
        store.jump_to(10);
        assert_eq!(store.position(), 0);
        assert_eq!(store.expected_count(), 30);
    }

    #[test]
    fn test_show_all_resets_position() {
        let mut store = WindowStore::new(1000, WindowSize::Samples(100));
        store.jump_to(700);

        store.set_window_size(WindowSize::All);
        assert_eq!(store.position(), 0);
        assert_eq!(store.window_size(), 1000);

        let mut store = WindowStore::new(1000, WindowSize::Samples(100));
        store.jump_to(700);
        store.set_window_size(WindowSize::Samples(1000));
        assert_eq!(store.position(), 0);
    }

    #[test]
    fn test_grow_window_pulls_position_back() {
        let mut store = WindowStore::new(1000, WindowSize::Samples(100));
        store.jump_to(850);
        store.set_window_size(WindowSize::Samples(400));
        assert_eq!(store.position(), 600);
    }

    #[test]
    fn test_set_total_reclamps() {
        let mut store = WindowStore::new(1000, WindowSize::Samples(100));
        store.jump_to(900);

        assert!(store.set_total(500));
        assert_eq!(store.position(), 400);

        assert!(store.set_total(0));
        assert_eq!(store.position(), 0);
        assert_eq!(store.expected_count(), 0);
    }

    #[test]
    fn test_set_total_keeps_position_when_growing() {
        let mut store = WindowStore::new(1000, WindowSize::Samples(100));
        store.jump_to(900);
        store.set_total(2000);
        assert_eq!(store.position(), 900);
        assert_eq!(store.max_position(), 1900);
    }

    #[test]
    fn test_all_tracks_total() {
        let mut store = WindowStore::new(1000, WindowSize::All);
        assert_eq!(store.window_size(), 1000);

        store.set_total(800);
        assert_eq!(store.position(), 0);
        assert_eq!(store.window_size(), 800);

        assert!(!store.set_total(800));
    }

    #[test]
    fn test_zero_sample_size_is_clamped() {
        let mut store = WindowStore::new(100, WindowSize::Samples(10));
        store.set_window_size(WindowSize::Samples(0));
        assert_eq!(store.window_size(), 1);
        assert_eq!(store.requested_size(), WindowSize::Samples(1));
    }

    // Property-based tests using proptest
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Jump(usize),
        Step(StepDirection),
        Total(usize),
        Size(WindowSize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..5000).prop_map(Op::Jump),
            prop_oneof![
                Just(StepDirection::Start),
                Just(StepDirection::PreviousHalf),
                Just(StepDirection::NextHalf),
                Just(StepDirection::End),
            ]
            .prop_map(Op::Step),
            (0usize..5000).prop_map(Op::Total),
            prop_oneof![
                (1usize..3000).prop_map(WindowSize::Samples),
                Just(WindowSize::All),
            ]
            .prop_map(Op::Size),
        ]
    }

    proptest! {
        #[test]
        fn test_position_always_in_bounds(
            total in 0usize..5000,
            size in 1usize..3000,
            ops in prop::collection::vec(op_strategy(), 0..60)
        ) {
            let mut store = WindowStore::new(total, WindowSize::Samples(size));
            for op in ops {
                match op {
                    Op::Jump(offset) => { store.jump_to(offset); }
                    Op::Step(dir) => { store.step(dir); }
                    Op::Total(n) => { store.set_total(n); }
                    Op::Size(s) => { store.set_window_size(s); }
                }

                // Property: 0 <= position <= max(0, total - window)
                let bound = store.total_count().saturating_sub(store.window_size());
                prop_assert!(store.position() <= bound,
                    "position {} exceeds bound {}", store.position(), bound);
                prop_assert!(store.window_size() >= 1);
            }
        }

        #[test]
        fn test_jump_to_self_never_changes_state(
            total in 0usize..5000,
            size in 1usize..3000,
            offset in 0usize..5000
        ) {
            let mut store = WindowStore::new(total, WindowSize::Samples(size));
            store.jump_to(offset);
            let before = store.clone();
            let pos = store.position();
            prop_assert!(!store.jump_to(pos));
            prop_assert_eq!(store, before);
        }
    }
}
