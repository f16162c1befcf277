//! Application layer: port traits and the two demo programs' run loops.
//!
//! Nothing here touches hardware directly.  Pins are reached through
//! [`ports::OutputHal`] inside a [`HardwareOutputSession`], and time
//! through [`ports::Sleeper`], so both programs run unchanged against
//! the simulated board.
//!
//! [`HardwareOutputSession`]: crate::session::HardwareOutputSession

pub mod led_demo;
pub mod ports;
