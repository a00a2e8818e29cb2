//! Device configuration
//!
//! All tunables live in one TOML file, every field with a built-in default
//! matching the shipped device. A missing or partial file degrades
//! gracefully: warn and continue with defaults, never terminate.
//!
//! Priority order:
//! 1. Command-line arguments (handled by the binary)
//! 2. TOML configuration file
//! 3. Built-in defaults (code constants below)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Complete device configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DeviceConfig {
    #[serde(default)]
    pub strummer: StrummerConfig,

    #[serde(default)]
    pub sensor: SensorConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Servo strummer tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct StrummerConfig {
    /// Servo strike position (degrees)
    #[serde(default = "default_strum_angle")]
    pub strum_angle: f32,

    /// Servo rest position (degrees)
    #[serde(default = "default_rest_angle")]
    pub rest_angle: f32,

    /// How long to hold each strum (ms)
    #[serde(default = "default_strum_hold_ms")]
    pub hold_ms: u64,
}

/// Trigger sensor tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorConfig {
    /// ADC level above which a reading counts as a hit
    #[serde(default = "default_trigger_threshold")]
    pub trigger_threshold: u16,

    /// Minimum gap between two accepted hits (ms)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

/// Level progression and assessment tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Displayed score (percent) required to pass a level
    #[serde(default = "default_pass_score")]
    pub pass_score: u32,

    /// Slow-down multiplier applied to every base pattern
    #[serde(default = "default_tempo_scale")]
    pub tempo_scale: u32,

    /// Breathing room after the final hit before scoring (ms)
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Base beat-interval patterns (seconds), one level each
    #[serde(default = "crate::pattern::default_base_patterns")]
    pub base_patterns: Vec<Vec<f64>>,
}

/// Networked-variant settings. Disabled by default; when enabled, server
/// discovery must succeed before the session starts.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Where the discovery probe is sent. Normally the limited broadcast
    /// address; tests point it at a loopback responder.
    #[serde(default = "default_broadcast_addr")]
    pub broadcast_addr: String,

    /// UDP port the companion server listens on for probes
    #[serde(default = "default_discovery_port")]
    pub discovery_port: u16,

    /// How long to wait for a discovery reply (ms)
    #[serde(default = "default_discovery_timeout_ms")]
    pub discovery_timeout_ms: u64,

    /// HTTP port of the telemetry endpoint
    #[serde(default = "default_data_port")]
    pub data_port: u16,

    /// Path of the telemetry endpoint
    #[serde(default = "default_data_path")]
    pub data_path: String,
}

fn default_strum_angle() -> f32 {
    80.0
}

fn default_rest_angle() -> f32 {
    0.0
}

fn default_strum_hold_ms() -> u64 {
    120
}

fn default_trigger_threshold() -> u16 {
    33_500
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_pass_score() -> u32 {
    60
}

fn default_tempo_scale() -> u32 {
    4
}

fn default_settle_ms() -> u64 {
    2000
}

fn default_broadcast_addr() -> String {
    "255.255.255.255".to_string()
}

fn default_discovery_port() -> u16 {
    crate::api::DEFAULT_DISCOVERY_PORT
}

fn default_discovery_timeout_ms() -> u64 {
    5000
}

fn default_data_port() -> u16 {
    crate::api::DEFAULT_DATA_PORT
}

fn default_data_path() -> String {
    crate::api::DEFAULT_DATA_PATH.to_string()
}

impl Default for StrummerConfig {
    fn default() -> Self {
        Self {
            strum_angle: default_strum_angle(),
            rest_angle: default_rest_angle(),
            hold_ms: default_strum_hold_ms(),
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            trigger_threshold: default_trigger_threshold(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pass_score: default_pass_score(),
            tempo_scale: default_tempo_scale(),
            settle_ms: default_settle_ms(),
            base_patterns: crate::pattern::default_base_patterns(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            broadcast_addr: default_broadcast_addr(),
            discovery_port: default_discovery_port(),
            discovery_timeout_ms: default_discovery_timeout_ms(),
            data_port: default_data_port(),
            data_path: default_data_path(),
        }
    }
}

impl DeviceConfig {
    /// Load from a TOML file, falling back to defaults if the file is
    /// missing. A file that exists but does not parse is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let config = match std::fs::read_to_string(path) {
            Ok(text) => toml::from_str::<DeviceConfig>(&text)
                .map_err(|e| Error::Config(format!("failed to parse {:?}: {}", path, e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Config file {:?} not found, using built-in defaults", path);
                DeviceConfig::default()
            }
            Err(e) => {
                return Err(Error::Config(format!("failed to read {:?}: {}", path, e)));
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the assessment math cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.session.tempo_scale == 0 {
            return Err(Error::Config("session.tempo_scale must be >= 1".into()));
        }
        if self.session.base_patterns.is_empty() {
            return Err(Error::Config("session.base_patterns must not be empty".into()));
        }
        for (i, pattern) in self.session.base_patterns.iter().enumerate() {
            if pattern.is_empty() {
                return Err(Error::Config(format!(
                    "session.base_patterns[{}] has no intervals",
                    i
                )));
            }
            if pattern.iter().any(|v| !v.is_finite() || *v <= 0.0) {
                return Err(Error::Config(format!(
                    "session.base_patterns[{}] contains a non-positive interval",
                    i
                )));
            }
        }
        if self.telemetry.enabled && self.telemetry.broadcast_addr.is_empty() {
            return Err(Error::Config("telemetry.broadcast_addr must not be empty".into()));
        }
        Ok(())
    }

    pub fn strum_hold(&self) -> Duration {
        Duration::from_millis(self.strummer.hold_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.sensor.debounce_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.session.settle_ms)
    }

    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_millis(self.telemetry.discovery_timeout_ms)
    }
}
