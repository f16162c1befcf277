//! Dual DC motor driver (L298N H-bridge).
//!
//! Each motor has two direction inputs and one enable pin; speed is the
//! PWM duty on the enable pin.  The driver holds no pins itself: every
//! write goes through the session that owns [`DualMotorDriver::channels`].

use log::info;

use crate::app::ports::OutputHal;
use crate::channel::{Channel, DutyCycle, Level};
use crate::config::MotorPins;
use crate::error::Result;
use crate::session::HardwareOutputSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorState {
    Stopped,
    Running { speed: u8, direction: Direction },
}

pub struct DualMotorDriver {
    pins: MotorPins,
    pwm_frequency_hz: u32,
    state: MotorState,
}

impl DualMotorDriver {
    pub fn new(pins: MotorPins, pwm_frequency_hz: u32) -> Self {
        Self {
            pins,
            pwm_frequency_hz,
            state: MotorState::Stopped,
        }
    }

    /// Channel set to open the session with: enables as PWM, inputs digital.
    pub fn channels(&self) -> [Channel; 6] {
        let p = self.pins;
        [
            Channel::pwm(p.ena, self.pwm_frequency_hz),
            Channel::digital(p.in1),
            Channel::digital(p.in2),
            Channel::digital(p.in3),
            Channel::digital(p.in4),
            Channel::pwm(p.enb, self.pwm_frequency_hz),
        ]
    }

    /// Start PWM on both enables at 0 %.
    pub fn arm<H: OutputHal>(&mut self, s: &mut HardwareOutputSession<H>) -> Result<()> {
        s.start_pwm(self.pins.ena, self.pwm_frequency_hz)?;
        s.start_pwm(self.pins.enb, self.pwm_frequency_hz)?;
        Ok(())
    }

    /// Set both motors' direction, then their speed.  Speed 0 stops.
    ///
    /// The speed is validated before any pin is touched, so a rejected
    /// speed leaves the bridge as it was.
    pub fn drive<H: OutputHal>(
        &mut self,
        s: &mut HardwareOutputSession<H>,
        direction: Direction,
        speed: u8,
    ) -> Result<()> {
        let duty = DutyCycle::new(f32::from(speed))?;
        if duty.is_zero() {
            return self.stop(s);
        }

        let (a, b) = match direction {
            Direction::Forward => (Level::High, Level::Low),
            Direction::Reverse => (Level::Low, Level::High),
        };
        s.set_digital(self.pins.in1, a)?;
        s.set_digital(self.pins.in2, b)?;
        s.set_digital(self.pins.in3, a)?;
        s.set_digital(self.pins.in4, b)?;
        self.set_speed(s, duty)?;

        info!("Moving {:?} at {}% speed", direction, speed);
        self.state = MotorState::Running { speed, direction };
        Ok(())
    }

    pub fn forward<H: OutputHal>(
        &mut self,
        s: &mut HardwareOutputSession<H>,
        speed: u8,
    ) -> Result<()> {
        self.drive(s, Direction::Forward, speed)
    }

    /// Cut both enables to 0 %.  Direction inputs are left as they are.
    pub fn stop<H: OutputHal>(&mut self, s: &mut HardwareOutputSession<H>) -> Result<()> {
        info!("STOPPING motors");
        self.set_speed(s, DutyCycle::ZERO)?;
        self.state = MotorState::Stopped;
        Ok(())
    }

    fn set_speed<H: OutputHal>(
        &self,
        s: &mut HardwareOutputSession<H>,
        duty: DutyCycle,
    ) -> Result<()> {
        s.set_duty(self.pins.ena, duty.percent())?;
        s.set_duty(self.pins.enb, duty.percent())
    }

    pub fn state(&self) -> MotorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.state, MotorState::Stopped)
    }
}
