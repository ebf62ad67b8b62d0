//! HTTP client for the build-tracking platform.
//!
//! [`PlatformClient`] wraps a single [`reqwest::Client`] and implements the
//! three calls a run makes, in order:
//!
//! 1. [`oidc`] - fetch an identity token from the CI provider's issuer.
//! 2. [`exchange`] - trade it for a platform [`AccessToken`].
//! 3. [`delivery`] - POST the CloudEvent to the ingestion endpoint.

pub mod client;
pub mod delivery;
pub mod exchange;
pub mod oidc;

pub use reqwest;

pub use client::{PlatformClient, PlatformErrorBody};
pub use delivery::DeliveryError;
pub use exchange::{AccessToken, AuthError, ExchangeError};
pub use oidc::{IdentityToken, IdentityTokenSource, OidcError};
