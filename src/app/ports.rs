//! Port traits: the boundary between sequencing logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ HardwareOutputSession / patterns
//! ```
//!
//! [`OutputHal`] is the only way the crate touches pins, and [`Sleeper`]
//! the only way it waits.  Both are injected, so every pattern and the
//! session lifecycle run on the host against the simulated board and a
//! fake clock.

use core::fmt;
use core::time::Duration;

use crate::channel::{ChannelMode, DutyCycle, Level};
use crate::error::Result;

// ───────────────────────────────────────────────────────────────
// Output HAL (driven adapter: domain → pins)
// ───────────────────────────────────────────────────────────────

/// Narrow pin-level driver interface.
///
/// Implementations own whatever handle the platform needs; the session
/// guarantees `release_all` is the last call it makes.
pub trait OutputHal {
    /// Claim `id` and configure it as an output for `mode`.
    fn configure_output(&mut self, id: u8, mode: ChannelMode) -> core::result::Result<(), HalError>;

    /// Drive a configured pin high or low.
    fn write_digital(&mut self, id: u8, level: Level) -> core::result::Result<(), HalError>;

    /// Start PWM on `id` at `frequency_hz` with 0 % duty.
    fn start_pwm(&mut self, id: u8, frequency_hz: u32) -> core::result::Result<(), HalError>;

    /// Change the duty of a running PWM output.
    fn write_duty(&mut self, id: u8, duty: DutyCycle) -> core::result::Result<(), HalError>;

    /// Stop PWM on `id`, leaving the pin driven low.
    fn stop_pwm(&mut self, id: u8) -> core::result::Result<(), HalError>;

    /// Release every pin claimed through this handle.
    fn release_all(&mut self) -> core::result::Result<(), HalError>;
}

// ───────────────────────────────────────────────────────────────
// Sleeper (driven adapter: domain → clock)
// ───────────────────────────────────────────────────────────────

/// Blocking timed wait that can be cut short by a stop request.
pub trait Sleeper {
    /// Wait for `duration`.  Returns [`Error::Interrupted`] as soon as a
    /// stop has been requested.
    ///
    /// [`Error::Interrupted`]: crate::error::Error::Interrupted
    fn sleep(&mut self, duration: Duration) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`OutputHal`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HalError {
    /// Pin is already claimed by another owner.
    Busy,
    /// Pin does not exist or is reserved on this board.
    Unavailable,
    /// Any other driver failure, with the driver's message.
    Io(String),
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => write!(f, "pin already in use"),
            Self::Unavailable => write!(f, "pin not available"),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}
