//! Core types for the build-artifact notifier.
//!
//! This crate holds everything that does not touch the network:
//!
//! - [`Config`] - the immutable run configuration, validated once from the
//!   CI environment.
//! - [`env`] - names of every environment variable the tool consumes.
//! - [`event`] - the CloudEvents envelope and its artifact/provider payload.
//! - [`error`] - configuration and serialization errors.

pub mod config;
pub mod env;
pub mod error;
pub mod event;

pub use config::Config;
pub use error::{ConfigError, SerializationError};
pub use event::{build_event, ArtifactInfo, CloudEvent, Output, ProviderInfo};
