//! Cooperative cancellation for the blocking session flow.
//!
//! Sessions sleep in short slices so a Ctrl-C handler flipping the flag is
//! observed within [`PAUSE_SLICE`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{HarnessError, Result};

/// Longest uninterrupted sleep.
pub const PAUSE_SLICE: Duration = Duration::from_millis(100);

/// Shared cancel flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Safe to call from a signal handler thread.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// `Err(Interrupted)` once cancelled.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(HarnessError::Interrupted)
        } else {
            Ok(())
        }
    }

    /// Block for `duration`, returning early with `Interrupted` on cancel.
    ///
    /// A duration too long to put a deadline on sleeps until cancelled.
    pub fn pause(&self, duration: Duration) -> Result<()> {
        let deadline = Instant::now().checked_add(duration);
        loop {
            self.check()?;
            let slice = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Ok(());
                    }
                    (deadline - now).min(PAUSE_SLICE)
                }
                None => PAUSE_SLICE,
            };
            std::thread::sleep(slice);
        }
    }
}
