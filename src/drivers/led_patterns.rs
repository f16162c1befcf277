//! LED pattern sequences over a bank of output channels.
//!
//! Every pattern is plain sequencing: writes through the session, waits
//! through the [`Sleeper`].  A wait that returns [`Error::Interrupted`]
//! ends the pattern immediately and the error propagates to whoever owns
//! the session.
//!
//! | Pattern        | Effect                                          |
//! |----------------|-------------------------------------------------|
//! | blink_all      | All LEDs on/off together                        |
//! | chase          | One LED lit at a time, running along the bank   |
//! | wave           | Fill on in order, drain off in reverse          |
//! | binary_counter | First three LEDs count in binary                |
//! | random_blink   | Random non-empty subset lit per frame           |
//! | breathing      | PWM fade in/out on every LED                    |
//!
//! [`Error::Interrupted`]: crate::error::Error::Interrupted

use core::time::Duration;

use log::{debug, info};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::app::ports::{OutputHal, Sleeper};
use crate::channel::Level;
use crate::error::Result;
use crate::session::HardwareOutputSession;

/// LEDs used by the binary counter, least significant bit first.
pub const COUNTER_BITS: usize = 3;

/// Ordered set of LED pins inside an open session.
#[derive(Debug, Clone, Copy)]
pub struct LedBank<'a> {
    pins: &'a [u8],
}

impl<'a> LedBank<'a> {
    pub fn new(pins: &'a [u8]) -> Self {
        Self { pins }
    }

    pub fn all_on<H: OutputHal>(&self, s: &mut HardwareOutputSession<H>) -> Result<()> {
        self.fill(s, Level::High)
    }

    pub fn all_off<H: OutputHal>(&self, s: &mut HardwareOutputSession<H>) -> Result<()> {
        self.fill(s, Level::Low)
    }

    fn fill<H: OutputHal>(&self, s: &mut HardwareOutputSession<H>, level: Level) -> Result<()> {
        for &id in self.pins {
            s.set_digital(id, level)?;
        }
        Ok(())
    }

    /// Blink every LED together `times` times.
    pub fn blink_all<H: OutputHal>(
        &self,
        s: &mut HardwareOutputSession<H>,
        times: u32,
        delay: Duration,
        sleeper: &mut impl Sleeper,
    ) -> Result<()> {
        info!("Blinking all LEDs {} times", times);
        for _ in 0..times {
            self.all_on(s)?;
            sleeper.sleep(delay)?;
            self.all_off(s)?;
            sleeper.sleep(delay)?;
        }
        Ok(())
    }

    /// Running light: exactly one LED lit, stepping along the bank.
    pub fn chase<H: OutputHal>(
        &self,
        s: &mut HardwareOutputSession<H>,
        cycles: u32,
        delay: Duration,
        sleeper: &mut impl Sleeper,
    ) -> Result<()> {
        info!("Running chase pattern {} times", cycles);
        for _ in 0..cycles {
            for &id in self.pins {
                self.all_off(s)?;
                s.set_digital(id, Level::High)?;
                sleeper.sleep(delay)?;
            }
        }
        Ok(())
    }

    /// Turn LEDs on in order, then off in reverse order.
    pub fn wave<H: OutputHal>(
        &self,
        s: &mut HardwareOutputSession<H>,
        cycles: u32,
        delay: Duration,
        sleeper: &mut impl Sleeper,
    ) -> Result<()> {
        info!("Running wave pattern {} times", cycles);
        for _ in 0..cycles {
            for &id in self.pins {
                s.set_digital(id, Level::High)?;
                sleeper.sleep(delay)?;
            }
            for &id in self.pins.iter().rev() {
                s.set_digital(id, Level::Low)?;
                sleeper.sleep(delay)?;
            }
        }
        Ok(())
    }

    /// Show `0..max_count` in binary on the first [`COUNTER_BITS`] LEDs.
    pub fn binary_counter<H: OutputHal>(
        &self,
        s: &mut HardwareOutputSession<H>,
        max_count: u32,
        delay: Duration,
        sleeper: &mut impl Sleeper,
    ) -> Result<()> {
        info!("Binary counter from 0 to {}", max_count.saturating_sub(1));
        let bits = &self.pins[..self.pins.len().min(COUNTER_BITS)];
        for count in 0..max_count {
            self.all_off(s)?;
            for (&id, level) in bits.iter().zip(counter_levels(count, bits.len())) {
                if level == Level::High {
                    s.set_digital(id, Level::High)?;
                }
            }
            info!("Count: {}, Binary: {}", count, binary_label(count, COUNTER_BITS));
            sleeper.sleep(delay)?;
        }
        Ok(())
    }

    /// Light a random non-empty subset every `frame` until `duration` has
    /// been covered.
    pub fn random_blink<H: OutputHal>(
        &self,
        s: &mut HardwareOutputSession<H>,
        duration: Duration,
        frame: Duration,
        rng: &mut impl Rng,
        sleeper: &mut impl Sleeper,
    ) -> Result<()> {
        info!("Random blinking for {:.1} seconds", duration.as_secs_f32());
        if self.pins.is_empty() {
            return Ok(());
        }
        for _ in 0..frame_count(duration, frame) {
            self.all_off(s)?;
            let n = rng.gen_range(1..=self.pins.len());
            for &id in self.pins.choose_multiple(rng, n) {
                s.set_digital(id, Level::High)?;
            }
            sleeper.sleep(frame)?;
        }
        Ok(())
    }

    /// Fade every LED in and out `cycles` times.
    ///
    /// The session must own the bank as PWM channels.  PWM is stopped on
    /// every LED before returning, also when a wait is interrupted.
    pub fn breathing<H: OutputHal>(
        &self,
        s: &mut HardwareOutputSession<H>,
        cycles: u32,
        frequency_hz: u32,
        duty_step: u8,
        step_delay: Duration,
        sleeper: &mut impl Sleeper,
    ) -> Result<()> {
        info!("Breathing effect {} times", cycles);
        for &id in self.pins {
            s.start_pwm(id, frequency_hz)?;
        }

        let faded = self.fade(s, cycles, duty_step, step_delay, sleeper);

        let mut stopped = Ok(());
        for &id in self.pins {
            if let Err(e) = s.stop_pwm(id) {
                stopped = stopped.and(Err(e));
            }
        }
        faded.and(stopped)
    }

    fn fade<H: OutputHal>(
        &self,
        s: &mut HardwareOutputSession<H>,
        cycles: u32,
        duty_step: u8,
        step_delay: Duration,
        sleeper: &mut impl Sleeper,
    ) -> Result<()> {
        for cycle in 0..cycles {
            debug!("breathing cycle {}", cycle + 1);
            for duty in fade_steps(duty_step) {
                for &id in self.pins {
                    s.set_duty(id, f32::from(duty))?;
                }
                sleeper.sleep(step_delay)?;
            }
        }
        Ok(())
    }
}

/// Level of each counter LED for `count`, least significant bit first.
pub fn counter_levels(count: u32, bits: usize) -> impl Iterator<Item = Level> {
    (0..bits).map(move |i| Level::from(i < 32 && count & (1 << i) != 0))
}

/// `count` in binary, zero-padded to at least `width` digits.
pub fn binary_label(count: u32, width: usize) -> String {
    format!("{:0width$b}", count, width = width)
}

/// Duty sequence for one breath: 0 up to 100, then 100 down to 0.
pub fn fade_steps(step: u8) -> impl Iterator<Item = u8> {
    let step = usize::from(step.max(1));
    (0..=100u8)
        .step_by(step)
        .chain((0..=100u8).rev().step_by(step))
}

/// Frames needed to cover `duration`, at least one for a non-zero duration.
fn frame_count(duration: Duration, frame: Duration) -> u128 {
    let frame_ms = frame.as_millis().max(1);
    duration.as_millis().div_ceil(frame_ms)
}
