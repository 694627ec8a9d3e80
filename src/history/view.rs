//! History view: one session/signal selection being browsed
//!
//! [`HistoryView`] ties the pieces together. Navigation updates the
//! [`WindowStore`] synchronously and yields a [`WindowRequest`] carrying a
//! monotonic [`RequestToken`]. When the fetch resolves, [`HistoryView::complete`]
//! applies it only if it is still the latest request for the current
//! selection; anything older is dropped without touching state. The last
//! issued navigation wins, regardless of the order responses arrive in.
//!
//! # Outcomes
//!
//! - A non-empty window is reconciled, labelled and handed to the renderer.
//! - An empty window keeps the previous window on screen. A "no data" notice
//!   is raised only for user-initiated loads.
//! - A failed fetch leaves the store untouched and raises a failure notice.
//!
//! When the refreshed total moves the position (the series shrank under the
//! window), the served window no longer starts at the slider. The outcome then
//! carries a follow-up request for the clamped position, which
//! [`HistoryView::load`] performs before returning.

use std::fmt;

use crate::config::AppConfig;
use crate::error::Result;
use crate::frontend::plot::{downsample, ChartRenderer};
use crate::session::{Session, SessionId};
use crate::types::{SamplingDomain, Signal, SignalRates};

use super::fetcher::{Window, WindowFetcher};
use super::time_mapper::{mapper_for, LabelPrecision, MappingContext, RangeLabel, TimeMapper, TimeRange};
use super::window_store::{StepDirection, WindowSize, WindowStore};

/// Upper bound on follow-up fetches performed by a single `load`
const MAX_FOLLOW_UPS: usize = 3;

/// Who asked for a load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    /// Explicit user action (navigation, reload button)
    UserInitiated,
    /// Silent periodic refresh
    BackgroundRefresh,
}

/// Monotonic identifier of an issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// A window fetch the caller should perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRequest {
    pub token: RequestToken,
    pub session_id: SessionId,
    pub signal: Signal,
    pub position: usize,
    pub window_size: usize,
    pub kind: LoadKind,
}

/// Navigation commands accepted by the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Absolute offset (slider drag)
    JumpTo(usize),
    /// Relative move
    Step(StepDirection),
    /// Change how many samples are shown
    SetWindowSize(WindowSize),
}

/// One-time message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The source had no samples at the requested position
    NoData,
    /// The fetch failed; the previous window is still shown
    LoadFailed(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoData => f.write_str("No data available for this position"),
            Notice::LoadFailed(reason) => write!(f, "Failed to load data: {}", reason),
        }
    }
}

/// Result of applying a resolved request
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// A new window was rendered
    Rendered {
        label: RangeLabel,
        returned: usize,
        /// The refreshed total moved the slider away from the rendered offset
        repositioned: bool,
        /// Request for the window at the clamped position
        follow_up: Option<WindowRequest>,
    },
    /// Valid request, zero samples; the previous window stays
    NoData {
        notice: Option<Notice>,
        follow_up: Option<WindowRequest>,
    },
    /// Fetch failed; state untouched
    Failed { notice: Notice },
    /// Superseded by a newer request; ignored
    Stale,
}

impl LoadOutcome {
    /// The notice to surface, if any
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            LoadOutcome::NoData { notice, .. } => notice.as_ref(),
            LoadOutcome::Failed { notice } => Some(notice),
            LoadOutcome::Rendered { .. } | LoadOutcome::Stale => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, LoadOutcome::Stale)
    }

    /// Request that brings the rendered window back in line with the store
    pub fn follow_up(&self) -> Option<&WindowRequest> {
        match self {
            LoadOutcome::Rendered { follow_up, .. } | LoadOutcome::NoData { follow_up, .. } => {
                follow_up.as_ref()
            }
            LoadOutcome::Failed { .. } | LoadOutcome::Stale => None,
        }
    }
}

/// Display options for a view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    pub window_size: WindowSize,
    pub label_precision: LabelPrecision,
    /// Decimate windows longer than this before rendering; 0 disables
    pub max_render_points: usize,
    pub rates: SignalRates,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            window_size: WindowSize::default(),
            label_precision: LabelPrecision::default(),
            max_render_points: crate::config::DEFAULT_MAX_RENDER_POINTS,
            rates: SignalRates::default(),
        }
    }
}

impl From<&AppConfig> for ViewOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            window_size: config.history.default_window,
            label_precision: config.history.label_precision,
            max_render_points: config.history.max_render_points,
            rates: config.signals,
        }
    }
}

/// Browsing state for one session and signal
#[derive(Debug)]
pub struct HistoryView {
    session: Session,
    signal: Signal,
    options: ViewOptions,
    store: WindowStore,
    mapper: Box<dyn TimeMapper>,
    /// Last successfully rendered window
    current: Option<Window>,
    current_range: Option<TimeRange>,
    last_issued: u64,
    in_flight: Option<RequestToken>,
}

impl HistoryView {
    /// Start browsing `signal` of `session` from the first sample
    pub fn new(session: Session, signal: Signal, options: ViewOptions) -> Self {
        let store = WindowStore::new(session.total_for(signal), options.window_size);
        let mapper = mapper_for(signal, &options.rates);
        tracing::debug!(
            "Opening {} / {} with {} mapping ({} samples)",
            session.id,
            signal,
            mapper.name(),
            store.total_count()
        );
        Self {
            session,
            signal,
            options,
            store,
            mapper,
            current: None,
            current_range: None,
            last_issued: 0,
            in_flight: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn signal(&self) -> Signal {
        self.signal
    }

    pub fn store(&self) -> &WindowStore {
        &self.store
    }

    pub fn mapper(&self) -> &dyn TimeMapper {
        self.mapper.as_ref()
    }

    /// Last successfully rendered window
    pub fn current_window(&self) -> Option<&Window> {
        self.current.as_ref()
    }

    /// Time range of the last rendered window
    pub fn current_range(&self) -> Option<TimeRange> {
        self.current_range
    }

    /// Label of the last rendered window
    pub fn current_label(&self) -> Option<RangeLabel> {
        self.current_range
            .map(|range| range.label(self.options.label_precision))
    }

    /// Whether a request is outstanding (navigation controls disabled)
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Switch to another signal of the same session
    ///
    /// The store is rebuilt and any outstanding request becomes stale.
    pub fn switch_signal(&mut self, signal: Signal) {
        if signal == self.signal {
            return;
        }
        let requested = self.store.requested_size();
        self.signal = signal;
        self.store = WindowStore::new(self.session.total_for(signal), requested);
        self.mapper = mapper_for(signal, &self.options.rates);
        self.current = None;
        self.current_range = None;
        self.in_flight = None;
        // Burn a token so responses for the old signal can never match
        self.last_issued += 1;
    }

    /// Apply a navigation command
    ///
    /// Returns the request to perform, or `None` when nothing changed and the
    /// window on screen already matches the store.
    pub fn navigate(&mut self, navigation: Navigation, kind: LoadKind) -> Option<WindowRequest> {
        let changed = match navigation {
            Navigation::JumpTo(offset) => self.store.jump_to(offset),
            Navigation::Step(direction) => self.store.step(direction),
            Navigation::SetWindowSize(size) => self.store.set_window_size(size),
        };

        if !changed && self.is_in_sync() {
            tracing::trace!("{:?} left position unchanged, no fetch", navigation);
            return None;
        }

        tracing::debug!(
            "{:?} -> position {} of {}",
            navigation,
            self.store.position(),
            self.store.total_count()
        );
        Some(self.issue(kind))
    }

    /// Whether the rendered window is the one the store points at
    pub fn is_in_sync(&self) -> bool {
        self.current.as_ref().is_some_and(|window| {
            window.offset == self.store.position()
                && window.returned_count == self.store.expected_count()
        })
    }

    /// Request the current window again
    pub fn reload(&mut self, kind: LoadKind) -> WindowRequest {
        self.issue(kind)
    }

    fn issue(&mut self, kind: LoadKind) -> WindowRequest {
        self.last_issued += 1;
        let token = RequestToken(self.last_issued);
        self.in_flight = Some(token);
        WindowRequest {
            token,
            session_id: self.session.id.clone(),
            signal: self.signal,
            position: self.store.position(),
            window_size: self.store.window_size(),
            kind,
        }
    }

    /// Whether a response to `request` may still be applied
    pub fn is_current(&self, request: &WindowRequest) -> bool {
        request.token.0 == self.last_issued
            && request.signal == self.signal
            && request.session_id == self.session.id
            && request.position == self.store.position()
            && request.window_size == self.store.window_size()
    }

    /// Apply a resolved request
    pub fn complete(
        &mut self,
        request: &WindowRequest,
        result: Result<Window>,
        renderer: &mut dyn ChartRenderer,
    ) -> LoadOutcome {
        if !self.is_current(request) {
            tracing::debug!(
                "Discarding stale response #{} (latest #{})",
                request.token.0,
                self.last_issued
            );
            return LoadOutcome::Stale;
        }
        self.in_flight = None;

        let window = match result {
            Ok(window) => window,
            Err(e) => {
                tracing::warn!(
                    "Loading {} / {} at {} failed: {}",
                    self.session.id,
                    self.signal,
                    request.position,
                    e
                );
                return LoadOutcome::Failed {
                    notice: Notice::LoadFailed(e.to_string()),
                };
            }
        };

        let position_before = self.store.position();
        WindowFetcher::reconcile(&window, &mut self.store);
        let repositioned = self.store.position() != position_before;

        // The served window no longer starts at the slider position
        let follow_up = (repositioned && self.store.total_count() > 0).then(|| {
            tracing::debug!(
                "Position clamped {} -> {}, refetching",
                position_before,
                self.store.position()
            );
            self.issue(request.kind)
        });

        if window.is_empty() {
            tracing::info!(
                "No {} data at {} for {} (total {})",
                self.signal,
                request.position,
                self.session.id,
                window.total_count
            );
            let notice = match (request.kind, &follow_up) {
                (LoadKind::UserInitiated, None) => Some(Notice::NoData),
                _ => None,
            };
            return LoadOutcome::NoData { notice, follow_up };
        }

        let range = self.mapper.range(&self.mapping_context(&window));
        let label = range.label(self.options.label_precision);
        let (channels, x_indices) = downsample(&window, self.options.max_render_points);
        renderer.render(&channels, &x_indices, &label);

        tracing::info!(
            "Rendered {} samples of {} at {} ({})",
            window.returned_count,
            self.signal,
            window.offset,
            label
        );

        let returned = window.returned_count;
        self.current = Some(window);
        self.current_range = Some(range);

        LoadOutcome::Rendered {
            label,
            returned,
            repositioned,
            follow_up,
        }
    }

    /// Fetch and apply a request, then any follow-ups it produces
    ///
    /// Returns the outcome of the last request applied. If the series keeps
    /// shrinking past the follow-up limit, that outcome still carries the
    /// pending follow-up for the caller.
    pub async fn load(
        &mut self,
        fetcher: &WindowFetcher,
        request: WindowRequest,
        renderer: &mut dyn ChartRenderer,
    ) -> LoadOutcome {
        let mut outcome = self.fetch_and_complete(fetcher, &request, renderer).await;
        for _ in 0..MAX_FOLLOW_UPS {
            let Some(next) = outcome.follow_up().cloned() else {
                break;
            };
            outcome = self.fetch_and_complete(fetcher, &next, renderer).await;
        }
        outcome
    }

    async fn fetch_and_complete(
        &mut self,
        fetcher: &WindowFetcher,
        request: &WindowRequest,
        renderer: &mut dyn ChartRenderer,
    ) -> LoadOutcome {
        let result = fetcher
            .fetch_window(
                &request.session_id,
                request.signal,
                request.position,
                request.window_size,
            )
            .await;
        self.complete(request, result, renderer)
    }

    fn mapping_context(&self, window: &Window) -> MappingContext {
        let reference_total = match self.signal.domain() {
            SamplingDomain::FixedRate => self.store.total_count(),
            SamplingDomain::Prorated { reference } => self.session.total_for(reference),
        };
        MappingContext {
            session_start: self.session.start,
            session_end: self.session.end,
            position: window.offset,
            returned: window.returned_count,
            reference_total,
        }
    }
}
