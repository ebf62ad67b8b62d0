/// A required configuration value was absent or empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} is not set in the environment")]
    Missing { key: &'static str },
}

impl ConfigError {
    /// Name of the environment variable that failed validation.
    pub fn key(&self) -> &'static str {
        match self {
            ConfigError::Missing { key } => key,
        }
    }
}

/// The event payload could not be encoded as JSON.
#[derive(Debug, thiserror::Error)]
#[error("failed to encode CloudEvent: {0}")]
pub struct SerializationError(#[from] pub serde_json::Error);
