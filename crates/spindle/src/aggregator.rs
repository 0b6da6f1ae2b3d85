#![forbid(unsafe_code)]

//! Multi-source progress aggregation.
//!
//! The [`Aggregator`] consumes decoded [`ProgressEvent`]s and keeps one
//! state per live source: whether it finished, its spinner position, the
//! vertical slot it was assigned, the window handle it draws through, and
//! the sticky title of its current cycle. Every accepted event collapses
//! into a single right-aligned line per source, stacked upward from the
//! bottom of the viewport:
//!
//! ```text
//!                          [rust-analyzer] Indexing: ⠹ ( 55%)
//!                                    [prettier] Formatting: ⠙
//!                                          [cargo] Build: DONE!
//! ```
//!
//! State machine per source:
//!
//! ```text
//! UNSEEN -> ACTIVE (begin/report)
//! ACTIVE -> DONE   (end; grace expiry scheduled)
//! DONE   -> ACTIVE (begin/report before expiry; the timer is cancelled)
//! DONE   -> gone   (expiry fires; window destroyed, slot freed)
//! ```
//!
//! Everything runs on the caller's thread. Ingest never blocks, expiry
//! happens inside [`Aggregator::tick`], and a begin or report arriving
//! during the grace window always cancels the pending teardown before any
//! other effect is applied.

use std::collections::hash_map::Entry;

use ahash::AHashMap;
use tracing::{debug, trace, warn};

use spindle_core::label::{self, LabelBody, LabelParts};
use spindle_core::{
    EventError, Phase, ProgressEvent, RawEvent, Slot, SlotPool, SourceId, SpinnerCursor,
};

use crate::config::AggregatorConfig;
use crate::error::IngestError;
use crate::names::NameSource;
use crate::surface::{Surface, SurfaceHandle, SurfaceOp, Viewport};
use crate::timer::{Timer, TimerToken};

/// Ordered record of the surface calls one [`Aggregator::ingest`] or
/// [`Aggregator::tick`] issued.
///
/// The calls have already been applied to the surface by the time the
/// batch is returned; the batch exists so hosts and tests can observe what
/// happened without wrapping the surface. An ingest batch only ever
/// concerns the event's own source; a tick batch may carry teardowns for
/// several sources whose grace delays elapsed together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    ops: Vec<SurfaceOp>,
}

impl Batch {
    fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, op: SurfaceOp) {
        self.ops.push(op);
    }

    #[must_use]
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    #[must_use]
    pub fn into_ops(self) -> Vec<SurfaceOp> {
        self.ops
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Running counters, cheap to copy out for logs and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregatorStats {
    pub events_accepted: u64,
    pub events_rejected: u64,
    pub sources_attached: u64,
    pub reactivations: u64,
    pub surfaces_created: u64,
    pub surface_failures: u64,
    pub timer_fallbacks: u64,
    pub expirations: u64,
}

#[derive(Debug)]
struct SourceState {
    done: bool,
    spinner: SpinnerCursor,
    slot: Slot,
    surface: Option<SurfaceHandle>,
    title: Option<String>,
    expiry: Option<TimerToken>,
    last_width: u16,
}

impl SourceState {
    fn new(slot: Slot) -> Self {
        Self {
            done: false,
            spinner: SpinnerCursor::new(),
            slot,
            surface: None,
            title: None,
            expiry: None,
            last_width: 0,
        }
    }
}

/// Bottom-right placement: slot 0 on the anchor row, higher slots stacked
/// upward, labels flush against the right edge minus the margin.
fn place(viewport: Viewport, config: &AggregatorConfig, slot: Slot, width: u16) -> (u16, u16) {
    let rows_per_slot = config.row_height.max(1);
    let base_row = viewport
        .height
        .saturating_sub(1)
        .saturating_sub(config.margin_bottom);
    let row = base_row.saturating_sub(slot.index().saturating_mul(rows_per_slot));
    let col = viewport
        .width
        .saturating_sub(config.margin_right)
        .saturating_sub(width);
    (row, col)
}

/// The aggregator. Owns its three collaborators and all per-source state.
///
/// See the [module docs](self) for the lifecycle; see
/// [`AggregatorConfig`] for the knobs.
pub struct Aggregator<S: Surface, T: Timer, N: NameSource> {
    surface: S,
    timer: T,
    names: N,
    config: AggregatorConfig,
    viewport: Viewport,
    states: AHashMap<SourceId, SourceState>,
    pending: AHashMap<TimerToken, SourceId>,
    slots: SlotPool,
    stats: AggregatorStats,
}

impl<S: Surface, T: Timer, N: NameSource> Aggregator<S, T, N> {
    pub fn new(surface: S, timer: T, names: N) -> Self {
        Self::with_config(surface, timer, names, AggregatorConfig::default())
    }

    pub fn with_config(surface: S, timer: T, names: N, config: AggregatorConfig) -> Self {
        Self {
            surface,
            timer,
            names,
            config,
            viewport: Viewport::default(),
            states: AHashMap::new(),
            pending: AHashMap::new(),
            slots: SlotPool::new(),
            stats: AggregatorStats::default(),
        }
    }

    /// Applies one decoded event.
    ///
    /// Returns the surface calls issued for it, or the reason the event was
    /// rejected. Rejection never touches state: an unknown or invalid event
    /// cannot create a window, claim a slot, or disturb a live source.
    pub fn ingest(&mut self, event: ProgressEvent) -> Result<Batch, IngestError> {
        if event.source_id.is_empty() {
            self.stats.events_rejected += 1;
            return Err(EventError::EmptySourceId.into());
        }
        let Some(name) = self.names.resolve(&event.source_id) else {
            self.stats.events_rejected += 1;
            debug!(source = %event.source_id, "event from unknown source dropped");
            return Err(IngestError::UnknownSource(event.source_id));
        };
        self.stats.events_accepted += 1;
        trace!(source = %event.source_id, phase = %event.phase, "event accepted");

        let mut batch = Batch::new();
        let mut expire_now = false;

        let state = match self.states.entry(event.source_id.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let slot = self.slots.acquire();
                self.stats.sources_attached += 1;
                debug!(source = %event.source_id, slot = %slot, "source attached");
                entry.insert(SourceState::new(slot))
            }
        };

        // Whatever arrives, a pending teardown is off: either the source is
        // alive again or the end event restarts the grace delay.
        if let Some(token) = state.expiry.take() {
            self.timer.cancel(token);
            self.pending.remove(&token);
        }
        if state.done && !event.phase.is_terminal() {
            state.done = false;
            self.stats.reactivations += 1;
            debug!(source = %event.source_id, "source reactivated inside its grace window");
        }

        match event.phase {
            Phase::Begin => {
                state.spinner.reset();
                if event.title.is_some() {
                    state.title = event.title.clone();
                }
                state.spinner.advance();
            }
            Phase::Report => {
                if event.title.is_some() {
                    state.title = event.title.clone();
                }
                state.spinner.advance();
            }
            Phase::End => {
                state.done = true;
            }
        }

        let body = if state.done {
            LabelBody::Done
        } else {
            LabelBody::Working {
                glyph: state.spinner.glyph(self.config.frames),
                message: event.message.as_deref(),
                percentage: event.percentage,
            }
        };
        let text = label::render(&LabelParts {
            name: &name,
            title: state.title.as_deref(),
            body,
        });

        let width = label::display_width(&text)
            .min(self.viewport.width.saturating_sub(self.config.margin_right));
        let (row, col) = place(self.viewport, &self.config, state.slot, width);
        state.last_width = width;

        match state.surface {
            None => match self.surface.create(width, 1, row, col, self.config.border) {
                Ok(handle) => {
                    state.surface = Some(handle);
                    self.stats.surfaces_created += 1;
                    debug!(source = %event.source_id, %handle, row, col, "surface created");
                    batch.push(SurfaceOp::Create {
                        handle,
                        width,
                        height: 1,
                        row,
                        col,
                        border: self.config.border,
                    });
                    match self.surface.set_text(handle, &text) {
                        Ok(()) => batch.push(SurfaceOp::SetText { handle, text }),
                        Err(err) => {
                            warn!(source = %event.source_id, %handle, error = %err, "set_text failed")
                        }
                    }
                }
                Err(err) => {
                    self.stats.surface_failures += 1;
                    warn!(
                        source = %event.source_id,
                        error = %err,
                        "surface creation failed, retrying on the next event"
                    );
                }
            },
            Some(handle) => {
                match self.surface.reposition(handle, width, row, col) {
                    Ok(()) => batch.push(SurfaceOp::Reposition {
                        handle,
                        width,
                        row,
                        col,
                    }),
                    Err(err) => {
                        warn!(source = %event.source_id, %handle, error = %err, "reposition failed")
                    }
                }
                match self.surface.set_text(handle, &text) {
                    Ok(()) => batch.push(SurfaceOp::SetText { handle, text }),
                    Err(err) => {
                        warn!(source = %event.source_id, %handle, error = %err, "set_text failed")
                    }
                }
            }
        }

        if event.phase.is_terminal() {
            match self.timer.schedule(self.config.grace) {
                Ok(token) => {
                    state.expiry = Some(token);
                    self.pending.insert(token, event.source_id.clone());
                    debug!(source = %event.source_id, %token, grace = ?self.config.grace, "expiry scheduled");
                }
                Err(err) => {
                    self.stats.timer_fallbacks += 1;
                    warn!(
                        source = %event.source_id,
                        error = %err,
                        "timer unavailable, expiring immediately"
                    );
                    expire_now = true;
                }
            }
        }

        if expire_now {
            self.expire(&event.source_id, &mut batch);
        }
        Ok(batch)
    }

    /// Decodes and applies one loosely-typed event.
    pub fn ingest_raw(&mut self, raw: RawEvent) -> Result<Batch, IngestError> {
        match raw.decode() {
            Ok(event) => self.ingest(event),
            Err(err) => {
                self.stats.events_rejected += 1;
                debug!(error = %err, "raw event failed validation");
                Err(err.into())
            }
        }
    }

    /// Tears down every source whose grace delay has elapsed.
    ///
    /// Tokens whose source was reactivated since scheduling are ignored;
    /// [`Timer::cancel`] normally suppresses them before they ever fire,
    /// this is the second line against timers that deliver anyway.
    #[must_use]
    pub fn tick(&mut self) -> Batch {
        let mut batch = Batch::new();
        for token in self.timer.poll() {
            let Some(id) = self.pending.remove(&token) else {
                trace!(%token, "stale timer token ignored");
                continue;
            };
            if self.states.get(&id).and_then(|state| state.expiry) != Some(token) {
                trace!(source = %id, %token, "expiry token no longer current");
                continue;
            }
            self.expire(&id, &mut batch);
        }
        batch
    }

    /// Stores new host dimensions. Live windows reflow lazily, each on its
    /// source's next event; call [`Aggregator::reflow`] to move them now.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            debug!(width = viewport.width, height = viewport.height, "viewport changed");
            self.viewport = viewport;
        }
    }

    /// Repositions every live window against the current viewport.
    ///
    /// Label text keeps its last width; only rows and columns move.
    #[must_use]
    pub fn reflow(&mut self) -> Batch {
        let mut batch = Batch::new();
        let mut windows: Vec<(SourceId, SurfaceHandle, Slot, u16)> = self
            .states
            .iter()
            .filter_map(|(id, state)| {
                state
                    .surface
                    .map(|handle| (id.clone(), handle, state.slot, state.last_width))
            })
            .collect();
        windows.sort_by_key(|window| window.2);
        for (id, handle, slot, width) in windows {
            let width = width.min(self.viewport.width.saturating_sub(self.config.margin_right));
            let (row, col) = place(self.viewport, &self.config, slot, width);
            match self.surface.reposition(handle, width, row, col) {
                Ok(()) => batch.push(SurfaceOp::Reposition {
                    handle,
                    width,
                    row,
                    col,
                }),
                Err(err) => {
                    warn!(source = %id, %handle, error = %err, "reposition failed during reflow")
                }
            }
        }
        batch
    }

    fn expire(&mut self, id: &SourceId, batch: &mut Batch) {
        let Some(state) = self.states.remove(id) else {
            return;
        };
        if let Some(token) = state.expiry {
            self.pending.remove(&token);
        }
        if let Some(handle) = state.surface {
            match self.surface.destroy(handle) {
                Ok(()) => batch.push(SurfaceOp::Destroy { handle }),
                Err(err) => warn!(source = %id, %handle, error = %err, "surface destroy failed"),
            }
        }
        self.slots.release(state.slot);
        self.stats.expirations += 1;
        debug!(source = %id, slot = %state.slot, "source expired");
    }

    /// Number of sources currently holding state (active or in grace).
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.states.is_empty()
    }

    /// The slot a live source occupies.
    #[must_use]
    pub fn slot_of(&self, id: &SourceId) -> Option<Slot> {
        self.states.get(id).map(|state| state.slot)
    }

    /// Whether a live source has ended and is waiting out its grace delay.
    #[must_use]
    pub fn is_done(&self, id: &SourceId) -> Option<bool> {
        self.states.get(id).map(|state| state.done)
    }

    #[must_use]
    pub fn stats(&self) -> AggregatorStats {
        self.stats
    }

    #[must_use]
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    #[must_use]
    pub fn names(&self) -> &N {
        &self.names
    }

    pub fn names_mut(&mut self) -> &mut N {
        &mut self.names
    }
}
