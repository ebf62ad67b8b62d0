//! Identity-token fetch from the CI provider's OIDC issuer.
//!
//! The issuer URL and its bearer secret come from the runner environment
//! and are captured once in an [`IdentityTokenSource`].

use std::fmt;

use reqwest::StatusCode;

use artifact_notify_core::env::{ACTIONS_ID_TOKEN_REQUEST_TOKEN, ACTIONS_ID_TOKEN_REQUEST_URL};

use crate::client::{read_body, PlatformClient};

/// Errors from the identity-token request.
#[derive(Debug, thiserror::Error)]
pub enum OidcError {
    /// The runner did not expose the issuer URL or secret.
    #[error("{key} is not set in the environment")]
    NotConfigured { key: &'static str },

    /// The request could not be sent or its body could not be read.
    #[error("OIDC token request could not be completed: {0}")]
    Request(#[from] reqwest::Error),

    /// The issuer answered with anything other than `200 OK`.
    #[error("OIDC token request failed: {status}")]
    RequestFailed { status: StatusCode },

    #[error("failed to decode OIDC token response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("OIDC token value is empty")]
    EmptyValue,

    #[error("OIDC token response has an invalid token type")]
    InvalidTokenType,
}

/// Where to request identity tokens from.
#[derive(Clone)]
pub struct IdentityTokenSource {
    request_url: Option<String>,
    request_token: Option<String>,
}

impl IdentityTokenSource {
    pub fn new(request_url: impl Into<String>, request_token: impl Into<String>) -> Self {
        Self {
            request_url: Some(request_url.into()),
            request_token: Some(request_token.into()),
        }
    }

    /// Capture `ACTIONS_ID_TOKEN_REQUEST_URL` / `ACTIONS_ID_TOKEN_REQUEST_TOKEN`.
    ///
    /// Absence is only reported when a token is actually requested.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            request_url: var(ACTIONS_ID_TOKEN_REQUEST_URL),
            request_token: var(ACTIONS_ID_TOKEN_REQUEST_TOKEN),
        }
    }
}

impl fmt::Debug for IdentityTokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityTokenSource")
            .field("request_url", &self.request_url)
            .field("request_token", &self.request_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Short-lived token proving the pipeline run's identity.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityToken(String);

impl IdentityToken {
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdentityToken(***)")
    }
}

impl PlatformClient {
    /// Request an identity token scoped to this platform.
    ///
    /// Sends `GET {issuer}?audience={base_url}` with the runner's bearer
    /// secret and expects `200` with `{"value": "<token>"}`.
    pub async fn fetch_identity_token(
        &self,
        source: &IdentityTokenSource,
    ) -> Result<IdentityToken, OidcError> {
        let url = source.request_url.as_deref().ok_or(OidcError::NotConfigured {
            key: ACTIONS_ID_TOKEN_REQUEST_URL,
        })?;
        let secret = source
            .request_token
            .as_deref()
            .ok_or(OidcError::NotConfigured {
                key: ACTIONS_ID_TOKEN_REQUEST_TOKEN,
            })?;

        tracing::debug!(url, audience = self.base_url(), "Requesting OIDC identity token");

        let response = self
            .client
            .get(url)
            .query(&[("audience", self.base_url())])
            .bearer_auth(secret)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = read_body(response).await;
            tracing::warn!(%status, body = %body, "OIDC token request rejected");
            return Err(OidcError::RequestFailed { status });
        }

        let bytes = response.bytes().await?;
        parse_identity_token(&bytes)
    }
}

/// Extract the token from an issuer response body.
///
/// A missing, `null` or empty `value` is treated as empty; any other
/// non-string value is an invalid token type.
fn parse_identity_token(body: &[u8]) -> Result<IdentityToken, OidcError> {
    let json: serde_json::Value = serde_json::from_slice(body).map_err(OidcError::Decode)?;

    match json.get("value") {
        Some(serde_json::Value::String(value)) if !value.is_empty() => {
            Ok(IdentityToken(value.clone()))
        }
        Some(serde_json::Value::String(_)) | Some(serde_json::Value::Null) | None => {
            Err(OidcError::EmptyValue)
        }
        Some(_) => Err(OidcError::InvalidTokenType),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
