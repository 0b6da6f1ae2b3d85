#![forbid(unsafe_code)]

//! Test doubles for Spindle's collaborator traits.
//!
//! [`RecordingSurface`] logs every surface call, validates handles like a
//! strict host would, and can be scripted to fail window creation.
//! [`ManualTimer`] replaces wall time with a virtual clock advanced by the
//! test, so grace-expiry scenarios run instantly and deterministically.
//!
//! ```
//! use std::time::Duration;
//! use spindle::{Aggregator, NameTable, ProgressEvent};
//! use spindle_harness::{ManualTimer, RecordingSurface};
//!
//! let mut names = NameTable::new();
//! names.insert("a", "tool");
//! let mut agg = Aggregator::new(RecordingSurface::new(), ManualTimer::new(), names);
//!
//! agg.ingest(ProgressEvent::begin("a")).unwrap();
//! agg.ingest(ProgressEvent::end("a")).unwrap();
//!
//! agg.timer_mut().advance(Duration::from_millis(5000));
//! let batch = agg.tick();
//! assert!(!batch.is_empty());
//! assert!(agg.is_idle());
//! ```

mod manual_timer;
mod recording_surface;

pub use manual_timer::ManualTimer;
pub use recording_surface::RecordingSurface;
