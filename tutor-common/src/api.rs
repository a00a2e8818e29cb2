//! Wire-protocol types and constants
//!
//! Two exchanges with the companion server:
//!
//! 1. **Discovery**: the device broadcasts [`DISCOVERY_MAGIC`] over UDP to
//!    port [`DEFAULT_DISCOVERY_PORT`]; the first reply datagram's source
//!    address is taken as the server, payload content ignored.
//! 2. **Telemetry**: one HTTP POST per attempt to
//!    `http://<server>:5000/data` with a [`TelemetryPayload`] JSON body.

use serde::{Deserialize, Serialize};

/// Fixed probe payload the server listens for.
pub const DISCOVERY_MAGIC: &[u8] = b"PICO_DISCOVER";

/// UDP port the discovery probe is broadcast to.
pub const DEFAULT_DISCOVERY_PORT: u16 = 5005;

/// HTTP port of the telemetry endpoint on the discovered server.
pub const DEFAULT_DATA_PORT: u16 = 5000;

/// Path of the telemetry endpoint.
pub const DEFAULT_DATA_PATH: &str = "/data";

/// Per-attempt telemetry body.
///
/// `mic_data` is the dense log of raw sensor polls from one assessment
/// window, appended once per loop iteration. Sample spacing follows the
/// poll rate, not a fixed clock; consumers must not assume uniform timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryPayload {
    pub level: u32,
    pub attempt: u32,
    pub mic_data: Vec<u16>,
}
