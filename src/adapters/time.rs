//! Wall-clock sleeper.
//!
//! Implements [`Sleeper`] with `std::thread::sleep`, cut into short
//! slices so a stop request is noticed within one slice.

use std::thread;
use std::time::{Duration, Instant};

use crate::app::ports::Sleeper;
use crate::error::{Error, Result};
use crate::shutdown::StopSignal;

/// Longest uninterrupted stretch of a wait.
pub const DEFAULT_SLICE: Duration = Duration::from_millis(20);

pub struct ThreadSleeper {
    stop: StopSignal,
    slice: Duration,
}

impl ThreadSleeper {
    pub fn new(stop: StopSignal) -> Self {
        Self::with_slice(stop, DEFAULT_SLICE)
    }

    pub fn with_slice(stop: StopSignal, slice: Duration) -> Self {
        Self {
            stop,
            slice: slice.max(Duration::from_millis(1)),
        }
    }
}

impl Sleeper for ThreadSleeper {
    /// A `duration` too long to represent as a deadline waits until a stop
    /// is requested.
    fn sleep(&mut self, duration: Duration) -> Result<()> {
        let deadline = Instant::now().checked_add(duration);
        loop {
            if self.stop.is_requested() {
                return Err(Error::Interrupted);
            }
            let remaining = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Ok(());
                    }
                    deadline - now
                }
                None => self.slice,
            };
            thread::sleep(remaining.min(self.slice));
        }
    }
}
