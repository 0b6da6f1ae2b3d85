#![forbid(unsafe_code)]

//! Cooperative shutdown flag for driver loops.
//!
//! The [`Pump`](crate::pump::Pump) polls its token once per loop turn, so
//! cancellation latency is bounded by the tick interval. Tokens are cheap
//! to clone and safe to hand to any thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Owning side of the flag.
#[derive(Debug, Default)]
pub struct CancelSource {
    flag: Arc<AtomicBool>,
}

impl CancelSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out a token observing this source.
    #[must_use]
    pub fn token(&self) -> CancelToken {
        CancelToken {
            flag: Arc::clone(&self.flag),
        }
    }

    /// Trips the flag. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Observing side of the flag.
#[derive(Debug, Clone)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
