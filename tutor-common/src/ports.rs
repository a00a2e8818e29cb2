//! Hardware capability traits
//!
//! The session and assessment code never touch hardware directly; they are
//! handed explicit port objects implementing these traits. The real device
//! backs them with a PWM servo, an ADC microphone, and an I2C character LCD;
//! the bench build backs them with simulations.
//!
//! All three ports are infallible by design: a faulty servo or microphone
//! manifests as wrong physical behavior, not as a catchable error.

use std::time::Duration;

/// Mechanical strummer.
pub trait ActuatorPort {
    /// Move to the strike position, hold briefly, return to rest.
    /// Blocks for the full strum motion.
    fn strum(&mut self);
}

/// Trigger-intensity sensor (microphone ADC).
pub trait SensorPort {
    /// Instantaneous reading, comparable against the configured trigger
    /// threshold. 16-bit ADC range.
    fn read(&mut self) -> u16;
}

/// Two-line character display.
pub trait DisplayPort {
    /// Clear, render one or two lines, and block for `hold`.
    fn show(&mut self, line1: &str, line2: Option<&str>, hold: Duration);
}
