//! CloudEvents envelope announcing a published build artifact.
//!
//! [`build_event`] turns a validated [`Config`] into a [`CloudEvent`]
//! whose `data` carries an [`Output`] (artifact + provider info). The
//! envelope is serialized once, in CloudEvents JSON structured mode, by
//! [`CloudEvent::to_json`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::SerializationError;

/// CloudEvents specification version.
pub const SPEC_VERSION: &str = "1.0";

/// Event type announcing a published build artifact.
pub const BUILD_ARTIFACT_EVENT_TYPE: &str = "io.cloudbees.build.artifact.published";

/// Content type of the `data` attribute.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Source prefix used when no CI server URL is configured.
pub const DEFAULT_PROVIDER_ORIGIN: &str = "https://github.com/";

/// Provider identifier carried in [`ProviderInfo`].
pub const PROVIDER_GITHUB: &str = "GITHUB";

/// Artifact operation reported for every event.
pub const OPERATION_PUBLISHED: &str = "PUBLISHED";

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactInfo {
    pub artifact_name: String,
    pub artifact_url: String,
    pub artifact_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_digest: Option<String>,
    pub artifact_operation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub run_id: String,
    pub run_attempt: String,
    pub run_number: String,
    pub job_name: String,
    pub provider: String,
}

/// The event's `data` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub provider_info: ProviderInfo,
    pub artifact_info: ArtifactInfo,
}

impl Output {
    /// Derive the payload from the run configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            provider_info: ProviderInfo {
                run_id: config.run_id.clone(),
                run_attempt: config.run_attempt.clone(),
                run_number: config.run_number.clone(),
                job_name: config.job_name.clone(),
                provider: PROVIDER_GITHUB.to_string(),
            },
            artifact_info: ArtifactInfo {
                artifact_name: config.artifact_name.clone(),
                artifact_url: config.artifact_url.clone(),
                artifact_version: config.artifact_version.clone(),
                artifact_type: config.artifact_type.clone(),
                artifact_digest: config.artifact_digest.clone(),
                artifact_operation: OPERATION_PUBLISHED.to_string(),
                artifact_label: config.artifact_label.clone(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// A CloudEvents 1.0 envelope in JSON structured mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudEvent {
    pub specversion: String,
    pub id: String,
    pub source: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub subject: String,
    pub time: DateTime<Utc>,
    pub datacontenttype: String,
    pub data: serde_json::Value,
}

impl CloudEvent {
    /// Encode the envelope for transmission.
    pub fn to_json(&self) -> Result<Vec<u8>, SerializationError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Build the artifact-published event for this run.
///
/// Every call yields a fresh `id` and `time`; all other attributes are a
/// pure function of `config`.
pub fn build_event(config: &Config) -> Result<CloudEvent, SerializationError> {
    let data = serde_json::to_value(Output::from_config(config))?;

    Ok(CloudEvent {
        specversion: SPEC_VERSION.to_string(),
        id: Uuid::new_v4().to_string(),
        source: source(config),
        event_type: BUILD_ARTIFACT_EVENT_TYPE.to_string(),
        subject: subject(config),
        time: Utc::now(),
        datacontenttype: CONTENT_TYPE_JSON.to_string(),
        data,
    })
}

/// `workflow_ref|run_id|run_attempt|run_number`
pub fn subject(config: &Config) -> String {
    format!(
        "{}|{}|{}|{}",
        config.workflow_ref, config.run_id, config.run_attempt, config.run_number
    )
}

/// Repository URL on the CI server, falling back to the default provider
/// origin when no server URL is configured.
pub fn source(config: &Config) -> String {
    match &config.server_url {
        Some(server) => format!("{server}/{}", config.repository),
        None => format!("{DEFAULT_PROVIDER_ORIGIN}{}", config.repository),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
