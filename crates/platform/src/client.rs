//! Shared HTTP plumbing for platform calls.

use std::time::Duration;

use serde::Deserialize;

/// Media type the platform expects on every POST.
pub const CONTENT_TYPE_CLOUDEVENTS_JSON: &str = "application/cloudevents+json";

/// HTTP client bound to one platform base URL.
///
/// One instance is built per run and dropped with it; nothing is cached
/// across runs.
pub struct PlatformClient {
    pub(crate) client: reqwest::Client,
    base_url: String,
}

/// Error body returned by the platform on non-success responses.
#[derive(Debug, Default, Deserialize)]
pub struct PlatformErrorBody {
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Vec<serde_json::Value>,
}

impl PlatformClient {
    /// Create a client whose every request is bounded by `timeout`.
    ///
    /// * `base_url` - Platform API root, e.g. `https://api.example.com`.
    ///   A trailing `/` is ignored.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL without trailing slash. Also the token audience.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Read the response body as text, tolerating read failures.
pub(crate) async fn read_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string())
}

/// Pick the human-readable message out of a platform error body.
///
/// Falls back to the raw body when it is not a `{code, message, details}`
/// object or carries no message.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<PlatformErrorBody>(body) {
        Ok(PlatformErrorBody {
            message: Some(message),
            ..
        }) if !message.is_empty() => message,
        _ => body.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
