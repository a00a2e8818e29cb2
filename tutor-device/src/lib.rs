//! # Rhythm Tutor Device
//!
//! Device-side logic for the rhythm tutor:
//! - Rhythm assessment engine (debounced capture loop)
//! - Session/level state machine
//! - Companion-server discovery (UDP broadcast)
//! - Per-attempt telemetry transport (HTTP POST)
//! - Simulated bench hardware for running off-device

pub mod discovery;
pub mod engine;
pub mod session;
pub mod sim;
pub mod telemetry;
