//! Token exchange: CI identity token -> platform access token.

use std::fmt;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Serialize;

use artifact_notify_core::event::PROVIDER_GITHUB;

use crate::client::{error_message, read_body, PlatformClient, CONTENT_TYPE_CLOUDEVENTS_JSON};
use crate::oidc::{IdentityToken, IdentityTokenSource, OidcError};

/// Token-exchange endpoint, relative to the platform base URL.
pub const TOKEN_EXCHANGE_PATH: &str = "token-exchange/external-oidc-id-token";

/// Errors from the token-exchange call.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("error sending token exchange request - {0}")]
    Request(#[from] reqwest::Error),

    /// The platform rejected the exchange.
    #[error("error during token exchange - {status} : {message}")]
    Status { status: StatusCode, message: String },

    #[error("failed to parse token exchange response: {0}")]
    InvalidResponse(#[source] serde_json::Error),

    #[error("accessToken missing or invalid in response")]
    MissingAccessToken,
}

/// Either hop of the authentication handshake failed.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("failed to create oidc token - {0}")]
    Oidc(#[from] OidcError),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}

/// Platform-issued bearer token. Lives only for the current run.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

#[derive(Debug, Serialize)]
struct TokenExchangeRequest<'a> {
    token: &'a str,
    provider: &'a str,
    audience: &'a str,
}

impl PlatformClient {
    /// Run the full handshake: fetch an identity token, then exchange it.
    pub async fn exchange_token(
        &self,
        source: &IdentityTokenSource,
    ) -> Result<AccessToken, AuthError> {
        let identity = self.fetch_identity_token(source).await?;
        Ok(self.exchange_identity_token(&identity).await?)
    }

    /// Exchange an identity token for a platform access token.
    ///
    /// Sends `POST {base_url}/token-exchange/external-oidc-id-token` with
    /// `{token, provider, audience}`. Only `200` with a non-empty
    /// `accessToken` string counts as success.
    pub async fn exchange_identity_token(
        &self,
        identity: &IdentityToken,
    ) -> Result<AccessToken, ExchangeError> {
        let url = self.endpoint(TOKEN_EXCHANGE_PATH);
        let body = TokenExchangeRequest {
            token: identity.secret(),
            provider: PROVIDER_GITHUB,
            audience: self.base_url(),
        };

        tracing::debug!(url = %url, "Exchanging identity token");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, CONTENT_TYPE_CLOUDEVENTS_JSON)
            .bearer_auth(identity.secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let text = read_body(response).await;
            return Err(ExchangeError::Status {
                status,
                message: error_message(&text),
            });
        }

        let text = response.text().await?;
        let token = parse_access_token(&text)?;
        tracing::info!(url = %url, "Token exchange succeeded");
        Ok(token)
    }
}

fn parse_access_token(body: &str) -> Result<AccessToken, ExchangeError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(ExchangeError::InvalidResponse)?;

    match json.get("accessToken").and_then(serde_json::Value::as_str) {
        Some(token) if !token.is_empty() => Ok(AccessToken(token.to_string())),
        _ => Err(ExchangeError::MissingAccessToken),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
