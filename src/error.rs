//! Unified error type for GPIO output sessions and the demo programs.
//!
//! A single `Error` enum that every layer funnels into, so the top-level
//! run scope can decide in one place whether a failure is a clean stop
//! ([`Error::Interrupted`]) or a real fault.

use core::fmt;

use crate::app::ports::HalError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A channel could not be claimed or configured when the session opened.
    /// `channel` is `None` when the HAL itself could not be brought up.
    HardwareInit {
        channel: Option<u8>,
        cause: InitFailure,
    },
    /// Operation not valid for the channel's configured mode.
    ChannelMode {
        channel: u8,
        violation: ModeViolation,
    },
    /// A write to an open channel failed. `channel` is `None` for
    /// board-wide operations such as releasing all pins.
    HardwareWrite {
        channel: Option<u8>,
        cause: HalError,
    },
    /// The channel id is not owned by this session.
    UnknownChannel(u8),
    /// Write attempted after `close()`.
    SessionClosed,
    /// Duty cycle outside [0, 100] percent (or NaN).
    DutyOutOfRange(f32),
    /// PWM frequency of zero.
    InvalidFrequency,
    /// Configuration is invalid.
    Config(&'static str),
    /// The user asked the program to stop.
    Interrupted,
}

impl Error {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HardwareInit {
                channel: Some(ch),
                cause,
            } => write!(f, "hardware init: GPIO {ch}: {cause}"),
            Self::HardwareInit {
                channel: None,
                cause,
            } => write!(f, "hardware init: {cause}"),
            Self::ChannelMode { channel, violation } => {
                write!(f, "channel mode: GPIO {channel}: {violation}")
            }
            Self::HardwareWrite {
                channel: Some(ch),
                cause,
            } => write!(f, "hardware write: GPIO {ch}: {cause}"),
            Self::HardwareWrite {
                channel: None,
                cause,
            } => write!(f, "hardware write: {cause}"),
            Self::UnknownChannel(ch) => write!(f, "GPIO {ch} is not owned by this session"),
            Self::SessionClosed => write!(f, "session is closed"),
            Self::DutyOutOfRange(d) => write!(f, "duty cycle {d}% outside 0-100%"),
            Self::InvalidFrequency => write!(f, "PWM frequency must be non-zero"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Interrupted => write!(f, "interrupted by user"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Init failures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitFailure {
    /// The same pin appears twice in the channel set.
    DuplicateChannel,
    /// More channels than the board has GPIOs.
    TooManyChannels,
    /// The HAL refused to claim or configure the pin.
    Hal(HalError),
}

impl fmt::Display for InitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateChannel => write!(f, "duplicate channel"),
            Self::TooManyChannels => write!(f, "too many channels"),
            Self::Hal(e) => write!(f, "{e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Mode violations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeViolation {
    /// Digital write on a PWM channel.
    NotDigital,
    /// PWM operation on a digital channel.
    NotPwm,
    /// Duty write before `start_pwm`.
    PwmNotRunning,
    /// `start_pwm` on a channel whose PWM is already running.
    PwmAlreadyRunning,
    /// `start_pwm` at a frequency other than the one the channel was
    /// opened with.
    FrequencyMismatch { configured: u32, requested: u32 },
}

impl fmt::Display for ModeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotDigital => write!(f, "not a digital output"),
            Self::NotPwm => write!(f, "not a PWM output"),
            Self::PwmNotRunning => write!(f, "PWM not started"),
            Self::PwmAlreadyRunning => write!(f, "PWM already running"),
            Self::FrequencyMismatch {
                configured,
                requested,
            } => write!(f, "PWM configured at {configured} Hz, started at {requested} Hz"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, Error>;
