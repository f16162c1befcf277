//! GPIO pin assignments (BCM numbering).
//!
//! Single source of truth for the default wiring.  The configs in
//! [`crate::config`] start from these values.

// ---------------------------------------------------------------------------
// LED demo
// ---------------------------------------------------------------------------

/// LEDs with series resistors between each GPIO and GND.  The first three
/// are the bits of the binary counter, least significant first.
pub const LED_GPIOS: [u8; 6] = [17, 27, 22, 23, 18, 10];

/// Software-PWM frequency for the breathing effect.
pub const LED_PWM_FREQ_HZ: u32 = 100;

// ---------------------------------------------------------------------------
// L298N dual H-bridge
// ---------------------------------------------------------------------------

/// Motor A enable (PWM). Physical pin 12.
pub const MOTOR_ENA_GPIO: u8 = 18;
/// Motor A input 1. Physical pin 11.
pub const MOTOR_IN1_GPIO: u8 = 17;
/// Motor A input 2. Physical pin 13.
pub const MOTOR_IN2_GPIO: u8 = 27;
/// Motor B input 3. Physical pin 15.
pub const MOTOR_IN3_GPIO: u8 = 22;
/// Motor B input 4. Physical pin 16.
pub const MOTOR_IN4_GPIO: u8 = 23;
/// Motor B enable (PWM). Physical pin 19.
pub const MOTOR_ENB_GPIO: u8 = 10;

/// Enable-pin PWM frequency.
pub const MOTOR_PWM_FREQ_HZ: u32 = 1_000;

// ---------------------------------------------------------------------------
// Header limits
// ---------------------------------------------------------------------------

/// Highest BCM GPIO on the 40-pin header.
pub const BCM_GPIO_MAX: u8 = 27;
