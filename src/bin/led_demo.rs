//! LED pattern demo.
//!
//! Cycles the LED bank through blink, chase, wave, binary counter, random
//! blink and breathing patterns until Ctrl+C.  Every LED is off and every
//! pin released before the process exits.

use anyhow::Result;
use log::{error, info};

use rpi_outputs::adapters::{self, time::ThreadSleeper};
use rpi_outputs::app::led_demo;
use rpi_outputs::config::LedDemoConfig;
use rpi_outputs::{diagnostics, shutdown};

fn main() -> Result<()> {
    diagnostics::init_logging();
    diagnostics::install_panic_handler();

    let config = LedDemoConfig::default();
    config.validate()?;
    let stop = shutdown::install_handler()?;

    info!("Raspberry Pi LED Demo v{}", env!("CARGO_PKG_VERSION"));
    info!("Using GPIO pins: {:?}", config.led_pins);
    info!("Wire LEDs with resistors between GPIO pins and GND");
    info!("config: {}", serde_json::to_string(&config)?);
    info!("Press Ctrl+C to exit");

    let mut sleeper = ThreadSleeper::new(stop);
    let mut rng = rand::thread_rng();

    match led_demo::run(adapters::platform_hal, &config, &mut sleeper, &mut rng) {
        Err(e) if !e.is_interrupted() => {
            error!("LED demo failed: {}", e);
            Err(e.into())
        }
        _ => {
            info!("Exiting LED demo...");
            info!("GPIO cleaned up. Goodbye!");
            Ok(())
        }
    }
}
