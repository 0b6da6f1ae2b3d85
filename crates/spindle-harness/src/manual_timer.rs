#![forbid(unsafe_code)]

//! A timer on a virtual clock.

use std::time::Duration;

use spindle::{Timer, TimerError, TimerToken};

/// Timer whose clock only moves when the test calls
/// [`advance`](ManualTimer::advance).
///
/// Schedule failures can be injected with
/// [`fail_next_schedules`](ManualTimer::fail_next_schedules) to exercise
/// the immediate-expiry fallback.
#[derive(Debug, Default)]
pub struct ManualTimer {
    now: Duration,
    next_token: u64,
    entries: Vec<(TimerToken, Duration)>,
    fail_schedules: u32,
}

impl ManualTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the virtual clock forward. Nothing fires until the next poll.
    pub fn advance(&mut self, delta: Duration) {
        self.now += delta;
    }

    /// The virtual clock's position.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Makes the next `count` schedule calls fail.
    pub fn fail_next_schedules(&mut self, count: u32) {
        self.fail_schedules = count;
    }

    /// Number of scheduled, not-yet-fired expiries.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.entries.len()
    }
}

impl Timer for ManualTimer {
    fn schedule(&mut self, delay: Duration) -> Result<TimerToken, TimerError> {
        if self.fail_schedules > 0 {
            self.fail_schedules -= 1;
            return Err(TimerError::Unavailable("injected failure".to_owned()));
        }
        let Some(deadline) = self.now.checked_add(delay) else {
            return Err(TimerError::Unavailable(format!(
                "delay {delay:?} overflows the virtual clock"
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
        let now = self.now;
        let mut due: Vec<(TimerToken, Duration)> = Vec::new();
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_exactly_at_the_deadline() {
        let mut timer = ManualTimer::new();
        let token = timer.schedule(Duration::from_millis(5000)).unwrap();
        timer.advance(Duration::from_millis(4999));
        assert!(timer.poll().is_empty());
        timer.advance(Duration::from_millis(1));
        assert_eq!(timer.poll(), vec![token]);
        assert_eq!(timer.pending(), 0);
    }

    #[test]
    fn cancelled_entries_never_fire() {
        let mut timer = ManualTimer::new();
        let token = timer.schedule(Duration::from_millis(10)).unwrap();
        timer.cancel(token);
        timer.advance(Duration::from_millis(100));
        assert!(timer.poll().is_empty());
    }

    #[test]
    fn cancel_after_deadline_but_before_poll_suppresses() {
        let mut timer = ManualTimer::new();
        let token = timer.schedule(Duration::from_millis(10)).unwrap();
        timer.advance(Duration::from_millis(100));
        timer.cancel(token);
        assert!(timer.poll().is_empty());
    }

    #[test]
    fn due_tokens_drain_oldest_deadline_first() {
        let mut timer = ManualTimer::new();
        let late = timer.schedule(Duration::from_millis(20)).unwrap();
        let early = timer.schedule(Duration::from_millis(10)).unwrap();
        timer.advance(Duration::from_millis(30));
        assert_eq!(timer.poll(), vec![early, late]);
    }

    #[test]
    fn injected_schedule_failures_are_consumed_in_order() {
        let mut timer = ManualTimer::new();
        timer.fail_next_schedules(2);
        assert!(timer.schedule(Duration::ZERO).is_err());
        assert!(timer.schedule(Duration::ZERO).is_err());
        assert!(timer.schedule(Duration::ZERO).is_ok());
    }

    #[test]
    fn delays_past_the_clock_range_error_instead_of_panicking() {
        let mut timer = ManualTimer::new();
        timer.advance(Duration::from_millis(1));
        let err = timer.schedule(Duration::MAX).unwrap_err();
        assert!(matches!(err, TimerError::Unavailable(_)));
        assert_eq!(timer.pending(), 0);
    }
}
