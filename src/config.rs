//! Run configuration for the two demo programs.
//!
//! Values are compiled in (see [`crate::pins`]); there are no config files
//! or environment overrides.  Each config is passed explicitly into the
//! code that opens a session, so nothing reads process-wide pin lists.

use core::time::Duration;

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::error::{Error, Result};
use crate::pins;

/// Most LEDs a demo bank can drive.
pub const MAX_LEDS: usize = 16;

/// LED pattern demo parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedDemoConfig {
    /// LED pins in display order.
    pub led_pins: Vec<u8, MAX_LEDS>,
    /// Software-PWM frequency for the breathing effect.
    pub pwm_frequency_hz: u32,

    // --- Blink all ---
    pub blink_times: u32,
    pub blink_delay_ms: u64,

    // --- Chase ---
    pub chase_cycles: u32,
    pub chase_delay_ms: u64,

    // --- Wave ---
    pub wave_cycles: u32,
    pub wave_delay_ms: u64,

    // --- Binary counter ---
    /// Counts shown are `0..counter_max`.
    pub counter_max: u32,
    pub counter_delay_ms: u64,

    // --- Random blink ---
    pub random_blink_ms: u64,
    pub random_frame_ms: u64,

    // --- Breathing ---
    pub breathing_cycles: u32,
    pub breathing_step_ms: u64,
    /// Duty increment per fade step (percent).
    pub breathing_duty_step: u8,

    // --- Pauses ---
    /// Pause after each pattern.
    pub pattern_pause_ms: u64,
    /// Extra pause before the demo repeats.
    pub cycle_pause_ms: u64,
}

impl Default for LedDemoConfig {
    fn default() -> Self {
        Self {
            led_pins: pins::LED_GPIOS.into_iter().collect(),
            pwm_frequency_hz: pins::LED_PWM_FREQ_HZ,

            blink_times: 3,
            blink_delay_ms: 500,

            chase_cycles: 2,
            chase_delay_ms: 150,

            wave_cycles: 2,
            wave_delay_ms: 100,

            counter_max: 8,
            counter_delay_ms: 800,

            random_blink_ms: 3_000,
            random_frame_ms: 300,

            breathing_cycles: 2,
            breathing_step_ms: 30,
            breathing_duty_step: 2,

            pattern_pause_ms: 1_000,
            cycle_pause_ms: 2_000,
        }
    }
}

impl LedDemoConfig {
    pub fn validate(&self) -> Result<()> {
        validate_pins(&self.led_pins)?;
        if self.pwm_frequency_hz == 0 {
            return Err(Error::Config("LED PWM frequency must be non-zero"));
        }
        if self.breathing_duty_step == 0 || self.breathing_duty_step > 100 {
            return Err(Error::Config("breathing duty step must be 1-100"));
        }
        if self.random_frame_ms == 0 {
            return Err(Error::Config("random blink frame must be non-zero"));
        }
        Ok(())
    }

    /// LED pins as digital outputs.
    pub fn digital_channels(&self) -> Vec<Channel, MAX_LEDS> {
        self.led_pins.iter().map(|&id| Channel::digital(id)).collect()
    }

    /// LED pins as PWM outputs, for the breathing effect.
    pub fn pwm_channels(&self) -> Vec<Channel, MAX_LEDS> {
        self.led_pins
            .iter()
            .map(|&id| Channel::pwm(id, self.pwm_frequency_hz))
            .collect()
    }

    pub fn pattern_pause(&self) -> Duration {
        Duration::from_millis(self.pattern_pause_ms)
    }

    pub fn cycle_pause(&self) -> Duration {
        Duration::from_millis(self.cycle_pause_ms)
    }
}

/// L298N wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorPins {
    pub ena: u8,
    pub in1: u8,
    pub in2: u8,
    pub in3: u8,
    pub in4: u8,
    pub enb: u8,
}

impl Default for MotorPins {
    fn default() -> Self {
        Self {
            ena: pins::MOTOR_ENA_GPIO,
            in1: pins::MOTOR_IN1_GPIO,
            in2: pins::MOTOR_IN2_GPIO,
            in3: pins::MOTOR_IN3_GPIO,
            in4: pins::MOTOR_IN4_GPIO,
            enb: pins::MOTOR_ENB_GPIO,
        }
    }
}

impl MotorPins {
    pub fn all(&self) -> [u8; 6] {
        [self.ena, self.in1, self.in2, self.in3, self.in4, self.enb]
    }
}

/// Motor forward-test parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorTestConfig {
    pub pins: MotorPins,
    /// Enable-pin PWM frequency.
    pub pwm_frequency_hz: u32,
    /// Forward speed as PWM duty (0-100%).
    pub speed_percent: u8,
    /// Wait granularity while holding the motors on.
    pub hold_interval_ms: u64,
}

impl Default for MotorTestConfig {
    fn default() -> Self {
        Self {
            pins: MotorPins::default(),
            pwm_frequency_hz: pins::MOTOR_PWM_FREQ_HZ,
            // Very slow: enough to see which way each wheel turns.
            speed_percent: 15,
            hold_interval_ms: 1_000,
        }
    }
}

impl MotorTestConfig {
    pub fn validate(&self) -> Result<()> {
        validate_pins(&self.pins.all())?;
        if self.pwm_frequency_hz == 0 {
            return Err(Error::Config("motor PWM frequency must be non-zero"));
        }
        if self.speed_percent > 100 {
            return Err(Error::Config("motor speed must be 0-100%"));
        }
        if self.hold_interval_ms == 0 {
            return Err(Error::Config("hold interval must be non-zero"));
        }
        Ok(())
    }

    pub fn hold_interval(&self) -> Duration {
        Duration::from_millis(self.hold_interval_ms)
    }
}

fn validate_pins(ids: &[u8]) -> Result<()> {
    if ids.is_empty() {
        return Err(Error::Config("at least one pin is required"));
    }
    for (i, id) in ids.iter().enumerate() {
        if *id > pins::BCM_GPIO_MAX {
            return Err(Error::Config("pin outside BCM GPIO 0-27"));
        }
        if ids[..i].contains(id) {
            return Err(Error::Config("pin assigned twice"));
        }
    }
    Ok(())
}
