//! Fail-safe GPIO output sessions for Raspberry Pi demos.
//!
//! The core is [`session::HardwareOutputSession`]: it owns a set of output
//! pins and drives every one of them low, with PWM stopped, before releasing
//! them on any exit path.  The LED pattern demo and the L298N motor test are
//! thin sequences of writes and waits on top of it.
//!
//! All pin access goes through [`app::ports::OutputHal`]; the real
//! implementation (`rppal`) is behind the `rpi` feature, and the simulated
//! board in [`adapters::sim`] runs everything on the host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod channel;
pub mod config;
pub mod diagnostics;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod session;
pub mod shutdown;

pub use channel::{Channel, ChannelMode, DutyCycle, Level};
pub use error::{Error, Result};
pub use session::{HardwareOutputSession, SessionState};
