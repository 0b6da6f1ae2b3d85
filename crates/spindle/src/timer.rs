#![forbid(unsafe_code)]

//! The expiry-timer collaborator boundary.
//!
//! Timers here are poll-driven: scheduling hands back a token, and the
//! owner of the aggregator pumps [`Timer::poll`] (through
//! [`Aggregator::tick`](crate::Aggregator::tick)) to collect tokens whose
//! delay has elapsed. Nothing fires from another thread, which keeps the
//! whole pipeline single-threaded and deterministic under test.

use std::fmt;
use std::time::Duration;

use web_time::Instant;

use crate::error::TimerError;

/// Opaque identifier for one scheduled expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// One-shot delay scheduling.
///
/// `cancel` must suppress a token even when its deadline already passed but
/// the token has not been polled yet; reactivation depends on that.
pub trait Timer {
    /// Schedules a one-shot expiry after `delay`.
    fn schedule(&mut self, delay: Duration) -> Result<TimerToken, TimerError>;

    /// Cancels a pending expiry. Unknown tokens are ignored.
    fn cancel(&mut self, token: TimerToken);

    /// Drains every token whose delay has elapsed, oldest deadline first.
    fn poll(&mut self) -> Vec<TimerToken>;
}

/// Monotonic-clock timer backed by [`web_time::Instant`].
///
/// Deadlines are checked at poll time, so expiry resolution equals the
/// caller's tick cadence. That is the intended contract: the grace delay is
/// a floor, not an exact firing instant.
#[derive(Debug, Default)]
pub struct DeadlineTimer {
    next_token: u64,
    entries: Vec<(TimerToken, Instant)>,
}

impl DeadlineTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scheduled, not-yet-fired expiries.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.entries.len()
    }
}

impl Timer for DeadlineTimer {
    fn schedule(&mut self, delay: Duration) -> Result<TimerToken, TimerError> {
        let Some(deadline) = Instant::now().checked_add(delay) else {
            return Err(TimerError::Unavailable(format!(
                "delay {delay:?} overflows the monotonic clock"
            )));
        };
        let token = TimerToken::new(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        self.entries.push((token, deadline));
        Ok(token)
    }

    fn cancel(&mut self, token: TimerToken) {
        self.entries.retain(|entry| entry.0 != token);
    }

    fn poll(&mut self) -> Vec<TimerToken> {
        let now = Instant::now();
        let mut due: Vec<(TimerToken, Instant)> = Vec::new();
        self.entries.retain(|entry| {
            if entry.1 <= now {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|entry| entry.1);
        due.into_iter().map(|entry| entry.0).collect()
    }
}
