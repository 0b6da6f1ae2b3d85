#![forbid(unsafe_code)]

//! Spindle: multi-source progress aggregation.
//!
//! Background tools report their work as `begin` / `report` / `end` event
//! streams. Spindle consumes those streams from any number of concurrent
//! sources and maintains a live, auto-expiring, one-line-per-source summary,
//! issued as a small command set against whatever display surface the host
//! provides. Finished sources linger for a grace delay (5 s by default) and
//! are torn down by a timer unless fresh events revive them first.
//!
//! The crate is deliberately collaborator-shaped: [`Surface`] draws,
//! [`Timer`] schedules, [`NameSource`] answers who a source is. Hosts
//! implement those three traits; everything in between, slot layout, label
//! text, spinner motion, grace bookkeeping, is handled here and fully
//! deterministic under test doubles.
//!
//! # Example
//!
//! ```
//! use spindle::{Aggregator, BorderStyle, DeadlineTimer, NameTable, ProgressEvent,
//!     Surface, SurfaceError, SurfaceHandle, Viewport};
//!
//! // A surface that accepts every command and mints handles in order.
//! struct NullSurface(u64);
//!
//! impl Surface for NullSurface {
//!     fn create(
//!         &mut self,
//!         _width: u16,
//!         _height: u16,
//!         _row: u16,
//!         _col: u16,
//!         _border: BorderStyle,
//!     ) -> Result<SurfaceHandle, SurfaceError> {
//!         self.0 += 1;
//!         Ok(SurfaceHandle::new(self.0))
//!     }
//!     fn reposition(
//!         &mut self,
//!         _handle: SurfaceHandle,
//!         _width: u16,
//!         _row: u16,
//!         _col: u16,
//!     ) -> Result<(), SurfaceError> {
//!         Ok(())
//!     }
//!     fn set_text(&mut self, _handle: SurfaceHandle, _text: &str) -> Result<(), SurfaceError> {
//!         Ok(())
//!     }
//!     fn destroy(&mut self, _handle: SurfaceHandle) -> Result<(), SurfaceError> {
//!         Ok(())
//!     }
//! }
//!
//! let mut names = NameTable::new();
//! names.insert("lsp1", "rust-analyzer");
//!
//! let mut agg = Aggregator::new(NullSurface(0), DeadlineTimer::new(), names);
//! agg.set_viewport(Viewport::new(120, 40));
//!
//! let batch = agg.ingest(ProgressEvent::begin("lsp1").title("Indexing")).unwrap();
//! assert_eq!(batch.len(), 2); // create + set_text
//! assert_eq!(agg.live_count(), 1);
//! ```
//!
//! For channel-fed hosts, [`Pump`] owns the aggregator on one thread and
//! interleaves ingest with expiry ticks.

pub mod aggregator;
pub mod cancel;
pub mod config;
pub mod error;
pub mod names;
pub mod pump;
pub mod surface;
pub mod timer;

// --- Core re-exports --------------------------------------------------------

pub use spindle_core::{
    DONE_MARKER, DOTS, EventError, LINE, LabelBody, LabelParts, Phase, ProgressEvent, RawEvent,
    Slot, SlotPool, SourceId, SpinnerCursor,
};

// --- Aggregation ------------------------------------------------------------

pub use aggregator::{Aggregator, AggregatorStats, Batch};
pub use config::{AggregatorConfig, DEFAULT_GRACE};

// --- Collaborator boundaries -------------------------------------------------

pub use names::{NameSource, NameTable};
pub use surface::{BorderStyle, Surface, SurfaceHandle, SurfaceOp, Viewport};
pub use timer::{DeadlineTimer, Timer, TimerToken};

// --- Driving & errors ---------------------------------------------------------

pub use cancel::{CancelSource, CancelToken};
pub use error::{Error, IngestError, RecoveryAction, Result, SurfaceError, TimerError};
pub use pump::Pump;
