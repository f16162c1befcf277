//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter      | Implements | Connects to                        |
//! |--------------|------------|------------------------------------|
//! | `rppal_hal`  | OutputHal  | Raspberry Pi GPIO (feature `rpi`)  |
//! | `sim`        | OutputHal  | In-memory simulated board          |
//! | `time`       | Sleeper    | `std::thread::sleep` + stop signal |

#[cfg(feature = "rpi")]
pub mod rppal_hal;
pub mod sim;
pub mod time;

use crate::error::Error;

/// HAL for the board the binary was built for.
#[cfg(feature = "rpi")]
pub fn platform_hal() -> Result<rppal_hal::RppalHal, Error> {
    rppal_hal::RppalHal::new()
}

/// HAL for the board the binary was built for.  Without the `rpi`
/// feature every call gets a handle onto one process-wide simulated board.
#[cfg(not(feature = "rpi"))]
pub fn platform_hal() -> Result<sim::SimHal, Error> {
    thread_local! {
        static BOARD: sim::SimBoard = {
            log::warn!("built without `rpi`: driving a simulated board");
            sim::SimBoard::new()
        };
    }
    Ok(BOARD.with(sim::SimBoard::hal))
}
