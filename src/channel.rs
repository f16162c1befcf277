//! Output channel value types.
//!
//! A [`Channel`] names one physical pin and how the session drives it.
//! [`DutyCycle`] is the only bounded value: out-of-range percentages are
//! rejected, never clamped.

use crate::error::{Error, Result};

/// Digital output level.
pub use embedded_hal::digital::PinState as Level;

/// How a channel is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    DigitalOut,
    PwmOut { frequency_hz: u32 },
}

/// One owned output pin (BCM numbering).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    id: u8,
    mode: ChannelMode,
}

impl Channel {
    pub const fn digital(id: u8) -> Self {
        Self {
            id,
            mode: ChannelMode::DigitalOut,
        }
    }

    pub const fn pwm(id: u8, frequency_hz: u32) -> Self {
        Self {
            id,
            mode: ChannelMode::PwmOut { frequency_hz },
        }
    }

    pub const fn id(&self) -> u8 {
        self.id
    }

    pub const fn mode(&self) -> ChannelMode {
        self.mode
    }

    pub const fn is_pwm(&self) -> bool {
        matches!(self.mode, ChannelMode::PwmOut { .. })
    }

    /// Nominal PWM frequency, `None` for digital channels.
    pub const fn pwm_frequency_hz(&self) -> Option<u32> {
        match self.mode {
            ChannelMode::PwmOut { frequency_hz } => Some(frequency_hz),
            ChannelMode::DigitalOut => None,
        }
    }
}

/// PWM duty cycle in percent, always within [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct DutyCycle(f32);

impl DutyCycle {
    pub const ZERO: Self = Self(0.0);
    pub const FULL: Self = Self(100.0);

    /// Validate a percentage. NaN and anything outside [0, 100] is an error.
    pub fn new(percent: f32) -> Result<Self> {
        if (0.0..=100.0).contains(&percent) {
            Ok(Self(percent))
        } else {
            Err(Error::DutyOutOfRange(percent))
        }
    }

    pub const fn percent(self) -> f32 {
        self.0
    }

    /// Duty as a 0.0–1.0 ratio, the form most PWM drivers take.
    pub fn ratio(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl TryFrom<f32> for DutyCycle {
    type Error = Error;

    fn try_from(percent: f32) -> Result<Self> {
        Self::new(percent)
    }
}
