//! Output drivers: LED patterns and the L298N motor pair.

pub mod led_patterns;
pub mod motor;
