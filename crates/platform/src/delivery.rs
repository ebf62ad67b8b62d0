//! CloudEvent delivery to the platform ingestion endpoint.
//!
//! A single attempt is made; there is no retry.

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

use crate::client::{error_message, read_body, PlatformClient, CONTENT_TYPE_CLOUDEVENTS_JSON};
use crate::exchange::AccessToken;

/// Event ingestion endpoint, relative to the platform base URL.
pub const EXTERNAL_EVENTS_PATH: &str = "v3/external-events";

/// Errors from event delivery.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// Network-level failure (connect, DNS, TLS, timeout).
    #[error("error sending CloudEvent to platform - {0}")]
    Request(#[from] reqwest::Error),

    /// The platform answered with a status other than 200/202.
    #[error("error sending CloudEvent to platform - {status} : {message}")]
    Status { status: StatusCode, message: String },
}

/// Statuses the ingestion endpoint uses to acknowledge an event.
pub fn is_accepted(status: StatusCode) -> bool {
    status == StatusCode::OK || status == StatusCode::ACCEPTED
}

impl PlatformClient {
    /// POST an encoded CloudEvent to `{base_url}/v3/external-events`.
    pub async fn deliver(&self, event: Vec<u8>, token: &AccessToken) -> Result<(), DeliveryError> {
        let url = self.endpoint(EXTERNAL_EVENTS_PATH);

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, CONTENT_TYPE_CLOUDEVENTS_JSON)
            .bearer_auth(token.secret())
            .body(event)
            .send()
            .await?;

        let status = response.status();
        let body = read_body(response).await;

        if !is_accepted(status) {
            tracing::error!(url = %url, %status, "Platform rejected CloudEvent");
            return Err(DeliveryError::Status {
                status,
                message: error_message(&body),
            });
        }

        tracing::debug!(url = %url, %status, "CloudEvent accepted");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
