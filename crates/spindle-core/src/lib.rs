#![forbid(unsafe_code)]

//! Core data model for Spindle: progress events, label composition,
//! spinner frames, and display-slot allocation.
//!
//! This crate is pure logic. It never touches clocks, channels, or a
//! display surface; those concerns live behind the collaborator traits in
//! the `spindle` crate. Everything here is deterministic and directly
//! unit-testable.

pub mod error;
pub mod event;
pub mod label;
pub mod slot;
pub mod spinner;

pub use error::EventError;
pub use event::{Phase, ProgressEvent, RawEvent, SourceId};
pub use label::{DONE_MARKER, LabelBody, LabelParts};
pub use slot::{Slot, SlotPool};
pub use spinner::{DOTS, LINE, SpinnerCursor};
