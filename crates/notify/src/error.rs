use artifact_notify_core::{ConfigError, SerializationError};
use artifact_notify_platform::{reqwest, AuthError, DeliveryError};

/// Any failure that ends a run. Nothing is retried; the first error wins.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("unknown arguments: {0:?}")]
    UnknownArguments(Vec<String>),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// Identity-token fetch or token exchange failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("run cancelled before the CloudEvent was delivered")]
    Cancelled,
}
