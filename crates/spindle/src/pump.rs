#![forbid(unsafe_code)]

//! Channel-driven loop around an [`Aggregator`].
//!
//! Transports deliver decoded events through a plain [`mpsc`] channel; the
//! pump owns the aggregator on one thread, ingesting as events arrive and
//! ticking at a steady cadence so grace expiries fire even while the
//! channel is quiet. This keeps every aggregator mutation on a single
//! thread without any locking.
//!
//! The loop ends when the channel disconnects or a [`CancelToken`] trips,
//! and hands the aggregator back so the host can inspect or reuse it.

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use tracing::debug;

use spindle_core::ProgressEvent;

use crate::aggregator::Aggregator;
use crate::cancel::CancelToken;
use crate::error::Error;
use crate::names::NameSource;
use crate::surface::Surface;
use crate::timer::Timer;

const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Owns an aggregator and the receiving end of an event channel.
pub struct Pump<S: Surface, T: Timer, N: NameSource> {
    aggregator: Aggregator<S, T, N>,
    events: Receiver<ProgressEvent>,
    tick_interval: Duration,
    cancel: Option<CancelToken>,
}

impl<S: Surface, T: Timer, N: NameSource> Pump<S, T, N> {
    pub fn new(aggregator: Aggregator<S, T, N>, events: Receiver<ProgressEvent>) -> Self {
        Self {
            aggregator,
            events,
            tick_interval: DEFAULT_TICK_INTERVAL,
            cancel: None,
        }
    }

    /// How long the loop waits for an event before forcing a tick.
    ///
    /// This bounds both expiry resolution and cancellation latency.
    /// Defaults to 100 ms.
    #[must_use]
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Installs a cooperative stop flag checked once per loop turn.
    #[must_use]
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Runs until the channel disconnects or the cancel token trips, then
    /// returns the aggregator.
    ///
    /// Rejected events are logged and dropped; they are local failures and
    /// never end the loop. Emitted batches are discarded here because the
    /// surface already applied them.
    pub fn run(mut self) -> Aggregator<S, T, N> {
        debug!(tick = ?self.tick_interval, "pump started");
        loop {
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                debug!("pump cancelled");
                break;
            }
            match self.events.recv_timeout(self.tick_interval) {
                Ok(event) => {
                    let source = event.source_id.clone();
                    if let Err(err) = self.aggregator.ingest(event) {
                        let err = Error::from(err);
                        debug!(
                            source = %source,
                            error = %err,
                            kind = err.label(),
                            action = ?err.recovery(),
                            "event dropped"
                        );
                    }
                    // Bursts must not starve expiries.
                    let _ = self.aggregator.tick();
                }
                Err(RecvTimeoutError::Timeout) => {
                    let _ = self.aggregator.tick();
                }
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("event channel disconnected");
                    break;
                }
            }
        }
        debug!("pump stopped");
        self.aggregator
    }
}
