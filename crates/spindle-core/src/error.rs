#![forbid(unsafe_code)]

//! Validation errors raised while turning loose input into typed events.

use std::fmt;

/// Why a raw event could not become a [`ProgressEvent`](crate::event::ProgressEvent).
///
/// Both variants mean the event is dropped before any aggregation state is
/// touched; neither is fatal to the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// The source id carried no characters.
    EmptySourceId,
    /// The phase string named no known lifecycle phase.
    UnknownPhase(String),
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::EmptySourceId => write!(f, "event source id is empty"),
            EventError::UnknownPhase(got) => write!(f, "unknown progress phase {got:?}"),
        }
    }
}

impl std::error::Error for EventError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_phase() {
        let err = EventError::UnknownPhase("finished".to_owned());
        assert_eq!(err.to_string(), "unknown progress phase \"finished\"");
    }

    #[test]
    fn display_for_empty_source_id() {
        assert_eq!(
            EventError::EmptySourceId.to_string(),
            "event source id is empty"
        );
    }

    #[test]
    fn implements_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(EventError::EmptySourceId);
        assert!(err.source().is_none());
    }
}
