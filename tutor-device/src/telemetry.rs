//! Telemetry transport
//!
//! One JSON POST per attempt to the endpoint resolved by discovery. No
//! retry, no acknowledgment processing beyond logging the response body.
//! The session treats every failure here as log-and-continue.

use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use tutor_common::api::TelemetryPayload;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Telemetry transport errors
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server returned {0}")]
    Status(reqwest::StatusCode),
}

/// HTTP client bound to the discovered endpoint.
pub struct TelemetryClient {
    client: reqwest::Client,
    endpoint: String,
}

impl TelemetryClient {
    pub fn new(endpoint: String) -> Result<Self, TelemetryError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post one attempt's raw sample log.
    pub async fn send(
        &self,
        level: u32,
        attempt: u32,
        samples: &[u16],
    ) -> Result<(), TelemetryError> {
        let payload = TelemetryPayload {
            level,
            attempt,
            mic_data: samples.to_vec(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TelemetryError::Status(status));
        }

        let body = response.text().await.unwrap_or_default();
        debug!("Telemetry response: {}", body);
        Ok(())
    }
}
