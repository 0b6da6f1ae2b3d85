#![forbid(unsafe_code)]

//! Progress event model.
//!
//! Events arrive from one or more background sources over a long-lived
//! channel. Each event names its source, a lifecycle phase, and an optional
//! display payload. Events are immutable once constructed; all aggregation
//! state lives on the consumer side.
//!
//! Per source, events arrive in emission order. Across sources there is no
//! ordering guarantee at all, which is the whole reason the aggregator
//! exists.

use std::fmt;

use crate::error::EventError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque, stable identifier for one event source.
///
/// Distinct concurrently running sources carry distinct ids. An id may be
/// reused after the source's previous progress cycle has fully expired.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for SourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Lifecycle phase of a progress cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Phase {
    /// A cycle opened. The title, when present, sticks for the cycle.
    Begin,
    /// Work advanced. Message and percentage describe the latest step.
    Report,
    /// The cycle finished. Display lingers until the grace delay expires.
    End,
}

impl Phase {
    /// Parses a loosely-typed phase string, case-insensitively.
    pub fn parse(s: &str) -> Result<Self, EventError> {
        if s.eq_ignore_ascii_case("begin") {
            Ok(Phase::Begin)
        } else if s.eq_ignore_ascii_case("report") {
            Ok(Phase::Report)
        } else if s.eq_ignore_ascii_case("end") {
            Ok(Phase::End)
        } else {
            Err(EventError::UnknownPhase(s.to_owned()))
        }
    }

    /// True for [`Phase::End`].
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::End)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Begin => "begin",
            Phase::Report => "report",
            Phase::End => "end",
        })
    }
}

/// One decoded status message from a source.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProgressEvent {
    pub source_id: SourceId,
    pub phase: Phase,
    /// Sticky for the cycle: later events without a title keep the last one.
    pub title: Option<String>,
    /// Transient: meaningful only for the event that carries it.
    pub message: Option<String>,
    /// Display-only completion percentage in `0..=100`.
    pub percentage: Option<u8>,
}

impl ProgressEvent {
    pub fn new(source_id: impl Into<SourceId>, phase: Phase) -> Self {
        Self {
            source_id: source_id.into(),
            phase,
            title: None,
            message: None,
            percentage: None,
        }
    }

    pub fn begin(source_id: impl Into<SourceId>) -> Self {
        Self::new(source_id, Phase::Begin)
    }

    pub fn report(source_id: impl Into<SourceId>) -> Self {
        Self::new(source_id, Phase::Report)
    }

    pub fn end(source_id: impl Into<SourceId>) -> Self {
        Self::new(source_id, Phase::End)
    }

    /// Sets the sticky cycle title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the transient step message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the completion percentage, clamped to 100.
    #[must_use]
    pub fn percentage(mut self, pct: u8) -> Self {
        self.percentage = Some(pct.min(100));
        self
    }
}

/// Loosely-typed mirror of [`ProgressEvent`] for transports that hand over
/// untyped values.
///
/// [`RawEvent::decode`] is a validation seam, not a protocol codec: it
/// rejects empty source ids and unknown phases, and clamps out-of-range
/// percentages into `0..=100` (the field is display-only, so bad numbers do
/// not merit a hard error).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawEvent {
    pub source_id: String,
    pub phase: String,
    pub title: Option<String>,
    pub message: Option<String>,
    pub percentage: Option<i64>,
}

impl RawEvent {
    pub fn decode(self) -> Result<ProgressEvent, EventError> {
        if self.source_id.is_empty() {
            return Err(EventError::EmptySourceId);
        }
        let phase = Phase::parse(&self.phase)?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percentage = self.percentage.map(|p| p.clamp(0, 100) as u8);
        Ok(ProgressEvent {
            source_id: SourceId::new(self.source_id),
            phase,
            title: self.title,
            message: self.message,
            percentage,
        })
    }
}
