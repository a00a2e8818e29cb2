//! Simulated bench hardware
//!
//! Port implementations for running the tutor off-device: the strummer and
//! LCD become log lines, the microphone becomes a stdin listener (press
//! Enter to "tap"). The real device implements the same traits against its
//! PWM servo, ADC, and I2C display drivers.

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use tutor_common::config::StrummerConfig;
use tutor_common::ports::{ActuatorPort, DisplayPort, SensorPort};

/// Log-only servo stand-in. Honors the configured angles and hold time so
/// demo playback has the same cadence as the real strummer.
pub struct BenchStrummer {
    strum_angle: f32,
    rest_angle: f32,
    hold: Duration,
}

impl BenchStrummer {
    pub fn from_config(config: &StrummerConfig) -> Self {
        Self {
            strum_angle: config.strum_angle,
            rest_angle: config.rest_angle,
            hold: Duration::from_millis(config.hold_ms),
        }
    }
}

impl ActuatorPort for BenchStrummer {
    fn strum(&mut self) {
        debug!("strum: {}deg", self.strum_angle);
        std::thread::sleep(self.hold);
        debug!("rest: {}deg", self.rest_angle);
    }
}

/// Stdin-driven trigger sensor: each line of input registers one full-scale
/// spike, consumed by the next poll. Idle polls read zero.
pub struct KeySensor {
    level: Arc<AtomicU16>,
}

impl KeySensor {
    /// Start the background stdin reader and return the sensor.
    pub fn spawn() -> Self {
        let level = Arc::new(AtomicU16::new(0));
        let writer = Arc::clone(&level);
        std::thread::spawn(move || {
            let mut line = String::new();
            loop {
                line.clear();
                match std::io::stdin().read_line(&mut line) {
                    Ok(0) | Err(_) => break, // stdin closed
                    Ok(_) => writer.store(u16::MAX, Ordering::Release),
                }
            }
        });
        Self { level }
    }
}

impl SensorPort for KeySensor {
    fn read(&mut self) -> u16 {
        // One spike per keypress: reading consumes it
        self.level.swap(0, Ordering::AcqRel)
    }
}

/// Console stand-in for the two-line LCD. Blocks for the hold time like
/// the real display driver does.
#[derive(Default)]
pub struct ConsoleDisplay;

impl DisplayPort for ConsoleDisplay {
    fn show(&mut self, line1: &str, line2: Option<&str>, hold: Duration) {
        match line2 {
            Some(line2) => info!("[LCD] {} / {}", line1, line2),
            None => info!("[LCD] {}", line1),
        }
        std::thread::sleep(hold);
    }
}
