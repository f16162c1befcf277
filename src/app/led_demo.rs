//! LED demo orchestration.
//!
//! One demo cycle is two scoped sessions over the same pins: a digital
//! session for the on/off patterns, then a PWM session for the breathing
//! fade.  Each session is closed before the next one claims the pins.

use core::time::Duration;

use log::info;
use rand::Rng;

use crate::app::ports::{OutputHal, Sleeper};
use crate::config::LedDemoConfig;
use crate::drivers::led_patterns::LedBank;
use crate::error::Result;
use crate::session::HardwareOutputSession;

/// Run one full demo cycle.  `open_hal` is called once per session.
pub fn run_cycle<H, F, S, R>(
    open_hal: &mut F,
    config: &LedDemoConfig,
    sleeper: &mut S,
    rng: &mut R,
) -> Result<()>
where
    H: OutputHal,
    F: FnMut() -> Result<H>,
    S: Sleeper,
    R: Rng,
{
    let bank = LedBank::new(&config.led_pins);
    let pause = config.pattern_pause();

    HardwareOutputSession::scoped(open_hal()?, &config.digital_channels(), |s| {
        bank.blink_all(s, config.blink_times, ms(config.blink_delay_ms), sleeper)?;
        sleeper.sleep(pause)?;

        bank.chase(s, config.chase_cycles, ms(config.chase_delay_ms), sleeper)?;
        sleeper.sleep(pause)?;

        bank.wave(s, config.wave_cycles, ms(config.wave_delay_ms), sleeper)?;
        sleeper.sleep(pause)?;

        bank.binary_counter(s, config.counter_max, ms(config.counter_delay_ms), sleeper)?;
        sleeper.sleep(pause)?;

        bank.random_blink(
            s,
            ms(config.random_blink_ms),
            ms(config.random_frame_ms),
            rng,
            sleeper,
        )?;
        sleeper.sleep(pause)
    })?;

    HardwareOutputSession::scoped(open_hal()?, &config.pwm_channels(), |s| {
        bank.breathing(
            s,
            config.breathing_cycles,
            config.pwm_frequency_hz,
            config.breathing_duty_step,
            ms(config.breathing_step_ms),
            sleeper,
        )
    })?;

    sleeper.sleep(pause)
}

/// Repeat demo cycles until a wait is interrupted or a write fails.
/// Only ever returns an error.
pub fn run<H, F, S, R>(
    mut open_hal: F,
    config: &LedDemoConfig,
    sleeper: &mut S,
    rng: &mut R,
) -> Result<()>
where
    H: OutputHal,
    F: FnMut() -> Result<H>,
    S: Sleeper,
    R: Rng,
{
    loop {
        info!("{}", "=".repeat(40));
        run_cycle(&mut open_hal, config, sleeper, rng)?;
        info!("Repeating demo... (Ctrl+C to exit)");
        sleeper.sleep(config.cycle_pause())?;
    }
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
