//! Companion-server discovery
//!
//! One-shot exchange at startup: broadcast the fixed magic probe over UDP,
//! take the source address of the first reply datagram as the server. The
//! reply payload is not inspected. No reply within the timeout is fatal for
//! the networked variant: the session never starts without an endpoint.

use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;
use tokio::net::UdpSocket;
use tracing::{debug, info};
use tutor_common::api::DISCOVERY_MAGIC;
use tutor_common::config::TelemetryConfig;

/// Discovery errors
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("socket error: {0}")]
    Socket(#[from] std::io::Error),

    #[error("no reply within {0:?}")]
    Timeout(Duration),
}

/// Broadcast the probe and wait for a single reply.
///
/// Resolved at most once per process run; the caller hands the address to
/// the telemetry client constructor and nothing else retains it.
pub async fn discover(config: &TelemetryConfig) -> Result<IpAddr, DiscoveryError> {
    let timeout = Duration::from_millis(config.discovery_timeout_ms);

    let socket = UdpSocket::bind(("0.0.0.0", 0)).await?;
    socket.set_broadcast(true)?;

    let target = (config.broadcast_addr.as_str(), config.discovery_port);
    socket.send_to(DISCOVERY_MAGIC, target).await?;
    debug!(
        "Discovery probe sent to {}:{}, waiting up to {:?}",
        config.broadcast_addr, config.discovery_port, timeout
    );

    let mut buf = [0u8; 256];
    match tokio::time::timeout(timeout, socket.recv_from(&mut buf)).await {
        Ok(Ok((len, peer))) => {
            // Any reply counts; the payload is informational only
            debug!("Discovery reply ({} bytes) from {}", len, peer);
            info!("Discovered server at {}", peer.ip());
            Ok(peer.ip())
        }
        Ok(Err(e)) => Err(DiscoveryError::Socket(e)),
        Err(_) => Err(DiscoveryError::Timeout(timeout)),
    }
}

/// Telemetry endpoint for a discovered host.
pub fn endpoint_url(host: IpAddr, port: u16, path: &str) -> String {
    format!("http://{}:{}{}", host, port, path)
}
