//! # Rhythm Tutor Common Library
//!
//! Shared code for the rhythm tutor device binaries:
//! - Error types
//! - Beat-interval patterns and the level catalog
//! - Interval scoring
//! - Hardware port traits (actuator, sensor, display)
//! - Device configuration loading
//! - Wire-protocol types for discovery and telemetry

pub mod api;
pub mod config;
pub mod error;
pub mod pattern;
pub mod ports;
pub mod scoring;

pub use error::{Error, Result};
pub use pattern::{Catalog, Level, Pattern};
