#![forbid(unsafe_code)]

//! Error surface of the aggregator and its collaborators.
//!
//! Every failure in this crate is local and recoverable: a bad event is
//! dropped, a failed window creation is retried on the source's next event,
//! and an unavailable timer degrades to immediate expiry. [`Error`] unifies
//! the domain enums for hosts that funnel everything through one channel,
//! and [`Error::recovery`] states what the aggregator (or a host driver)
//! does about each case.

use std::fmt;

use spindle_core::{EventError, SourceId};

use crate::surface::SurfaceHandle;

/// Why an event was rejected at ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// The name side-channel knows nothing about this source.
    UnknownSource(SourceId),
    /// The event failed validation before touching any state.
    Event(EventError),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::UnknownSource(id) => {
                write!(f, "unknown progress source {:?}", id.as_str())
            }
            IngestError::Event(err) => write!(f, "invalid progress event: {err}"),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::UnknownSource(_) => None,
            IngestError::Event(err) => Some(err),
        }
    }
}

impl From<EventError> for IngestError {
    fn from(err: EventError) -> Self {
        IngestError::Event(err)
    }
}

/// Failure reported by a [`Surface`](crate::surface::Surface) implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The window could not be created. The source's state is kept, so the
    /// next event retries.
    CreateFailed(String),
    /// A handle the surface never minted, or one already destroyed.
    UnknownHandle(SurfaceHandle),
    /// Anything else the backend wants to report.
    Backend(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::CreateFailed(reason) => write!(f, "surface creation failed: {reason}"),
            SurfaceError::UnknownHandle(handle) => write!(f, "no such surface: {handle}"),
            SurfaceError::Backend(reason) => write!(f, "surface backend error: {reason}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// Failure reported by a [`Timer`](crate::timer::Timer) implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// The timer facility could not take the schedule.
    Unavailable(String),
    /// The host's timer table is full.
    Exhausted,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::Unavailable(reason) => write!(f, "timer unavailable: {reason}"),
            TimerError::Exhausted => write!(f, "timer table exhausted"),
        }
    }
}

impl std::error::Error for TimerError {}

/// Unified error for hosts that want a single type at their boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Ingest(IngestError),
    Surface(SurfaceError),
    Timer(TimerError),
}

/// Convenience alias used at host boundaries.
pub type Result<T> = std::result::Result<T, Error>;

/// What happens, or should happen, after each error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Discard the event; no state was touched.
    DropEvent,
    /// Keep the source's state; the next event for it retries the call.
    RetryNextEvent,
    /// Skip this one surface call; the rest of the pipeline proceeds.
    SkipOperation,
    /// Expire the source immediately instead of waiting for the grace delay.
    ExpireNow,
}

impl Error {
    /// The degradation the aggregator applies for this error.
    #[must_use]
    pub fn recovery(&self) -> RecoveryAction {
        match self {
            Error::Ingest(_) => RecoveryAction::DropEvent,
            Error::Surface(SurfaceError::CreateFailed(_)) => RecoveryAction::RetryNextEvent,
            Error::Surface(_) => RecoveryAction::SkipOperation,
            Error::Timer(_) => RecoveryAction::ExpireNow,
        }
    }

    /// Short static tag for structured log fields.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Error::Ingest(IngestError::UnknownSource(_)) => "unknown_source",
            Error::Ingest(IngestError::Event(EventError::EmptySourceId)) => "empty_source_id",
            Error::Ingest(IngestError::Event(EventError::UnknownPhase(_))) => "unknown_phase",
            Error::Surface(SurfaceError::CreateFailed(_)) => "surface_create",
            Error::Surface(SurfaceError::UnknownHandle(_)) => "surface_handle",
            Error::Surface(SurfaceError::Backend(_)) => "surface_backend",
            Error::Timer(_) => "timer",
        }
    }

    /// Always true: no aggregation error poisons the aggregator.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        true
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Ingest(err) => err.fmt(f),
            Error::Surface(err) => err.fmt(f),
            Error::Timer(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Ingest(err) => Some(err),
            Error::Surface(err) => Some(err),
            Error::Timer(err) => Some(err),
        }
    }
}

impl From<IngestError> for Error {
    fn from(err: IngestError) -> Self {
        Error::Ingest(err)
    }
}

impl From<EventError> for Error {
    fn from(err: EventError) -> Self {
        Error::Ingest(IngestError::Event(err))
    }
}

impl From<SurfaceError> for Error {
    fn from(err: SurfaceError) -> Self {
        Error::Surface(err)
    }
}

impl From<TimerError> for Error {
    fn from(err: TimerError) -> Self {
        Error::Timer(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_source_maps_to_drop() {
        let err = Error::from(IngestError::UnknownSource(SourceId::new("ghost")));
        assert_eq!(err.recovery(), RecoveryAction::DropEvent);
        assert_eq!(err.label(), "unknown_source");
    }

    #[test]
    fn create_failure_maps_to_retry() {
        let err = Error::from(SurfaceError::CreateFailed("no window slots".to_owned()));
        assert_eq!(err.recovery(), RecoveryAction::RetryNextEvent);
        assert_eq!(err.label(), "surface_create");
    }

    #[test]
    fn non_create_surface_failures_are_skipped() {
        let err = Error::from(SurfaceError::UnknownHandle(SurfaceHandle::new(9)));
        assert_eq!(err.recovery(), RecoveryAction::SkipOperation);
    }

    #[test]
    fn timer_failure_maps_to_immediate_expiry() {
        let err = Error::from(TimerError::Exhausted);
        assert_eq!(err.recovery(), RecoveryAction::ExpireNow);
        assert_eq!(err.label(), "timer");
    }

    #[test]
    fn every_error_is_recoverable() {
        let samples = [
            Error::from(IngestError::UnknownSource(SourceId::new("x"))),
            Error::from(EventError::EmptySourceId),
            Error::from(SurfaceError::Backend("boom".to_owned())),
            Error::from(TimerError::Unavailable("no loop".to_owned())),
        ];
        assert!(samples.iter().all(Error::is_recoverable));
    }

    #[test]
    fn display_texts_name_the_failure() {
        let err = IngestError::UnknownSource(SourceId::new("lsp9"));
        assert_eq!(err.to_string(), "unknown progress source \"lsp9\"");

        let err = Error::from(EventError::UnknownPhase("stop".to_owned()));
        assert_eq!(err.to_string(), "invalid progress event: unknown progress phase \"stop\"");

        assert_eq!(
            SurfaceError::UnknownHandle(SurfaceHandle::new(2)).to_string(),
            "no such surface: surface#2"
        );
    }

    #[test]
    fn error_chains_expose_the_cause() {
        use std::error::Error as _;
        let err = Error::from(EventError::EmptySourceId);
        let cause = err.source().and_then(|e| e.source());
        assert!(cause.is_some());
    }
}
