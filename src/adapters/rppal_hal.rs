//! Raspberry Pi GPIO through `rppal`.
//!
//! Pins are claimed as `OutputPin`s driven low on claim.  PWM is rppal's
//! software PWM on the same pin (any GPIO, not only the hardware PWM
//! channels), matching how the LED and L298N enable pins are wired.
//! Dropping a claimed pin restores its previous mode.

use std::collections::BTreeMap;

use log::{debug, info};
use rppal::gpio::{self, Gpio, OutputPin};

use crate::app::ports::{HalError, OutputHal};
use crate::channel::{ChannelMode, DutyCycle, Level};
use crate::error::{Error, InitFailure};

struct ClaimedPin {
    pin: OutputPin,
    /// Frequency of the running software PWM.
    pwm_hz: Option<f64>,
}

pub struct RppalHal {
    gpio: Gpio,
    pins: BTreeMap<u8, ClaimedPin>,
}

impl RppalHal {
    pub fn new() -> Result<Self, Error> {
        let gpio = Gpio::new().map_err(|e| Error::HardwareInit {
            channel: None,
            cause: InitFailure::Hal(map_err(e)),
        })?;
        info!("rppal: GPIO peripheral opened");
        Ok(Self {
            gpio,
            pins: BTreeMap::new(),
        })
    }

    fn claimed(&mut self, id: u8) -> Result<&mut ClaimedPin, HalError> {
        self.pins
            .get_mut(&id)
            .ok_or_else(|| HalError::Io(format!("GPIO {id} not configured")))
    }
}

impl OutputHal for RppalHal {
    fn configure_output(&mut self, id: u8, mode: ChannelMode) -> Result<(), HalError> {
        if self.pins.contains_key(&id) {
            return Err(HalError::Busy);
        }
        let mut pin = self.gpio.get(id).map_err(map_err)?.into_output_low();
        pin.set_reset_on_drop(true);
        debug!("rppal: GPIO {} claimed as {:?}", id, mode);
        self.pins.insert(id, ClaimedPin { pin, pwm_hz: None });
        Ok(())
    }

    fn write_digital(&mut self, id: u8, level: Level) -> Result<(), HalError> {
        let claimed = self.claimed(id)?;
        claimed.pin.write(match level {
            Level::High => gpio::Level::High,
            Level::Low => gpio::Level::Low,
        });
        Ok(())
    }

    fn start_pwm(&mut self, id: u8, frequency_hz: u32) -> Result<(), HalError> {
        let claimed = self.claimed(id)?;
        let hz = f64::from(frequency_hz);
        claimed.pin.set_pwm_frequency(hz, 0.0).map_err(map_err)?;
        claimed.pwm_hz = Some(hz);
        Ok(())
    }

    fn write_duty(&mut self, id: u8, duty: DutyCycle) -> Result<(), HalError> {
        let claimed = self.claimed(id)?;
        let hz = claimed
            .pwm_hz
            .ok_or_else(|| HalError::Io(format!("PWM not running on GPIO {id}")))?;
        claimed
            .pin
            .set_pwm_frequency(hz, duty.ratio())
            .map_err(map_err)
    }

    fn stop_pwm(&mut self, id: u8) -> Result<(), HalError> {
        let claimed = self.claimed(id)?;
        claimed.pin.clear_pwm().map_err(map_err)?;
        claimed.pin.set_low();
        claimed.pwm_hz = None;
        Ok(())
    }

    fn release_all(&mut self) -> Result<(), HalError> {
        let mut first = None;
        for (id, mut claimed) in std::mem::take(&mut self.pins) {
            if claimed.pwm_hz.is_some() {
                if let Err(e) = claimed.pin.clear_pwm() {
                    first.get_or_insert(map_err(e));
                }
            }
            claimed.pin.set_low();
            debug!("rppal: GPIO {} released", id);
        }
        first.map_or(Ok(()), Err)
    }
}

fn map_err(e: gpio::Error) -> HalError {
    match e {
        gpio::Error::PinUsed(_) => HalError::Busy,
        gpio::Error::PinNotAvailable(_) => HalError::Unavailable,
        other => HalError::Io(other.to_string()),
    }
}
