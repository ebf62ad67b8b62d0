use std::time::Duration;

use crate::env;
use crate::error::ConfigError;

/// Per-request HTTP timeout used when `PLATFORM_REQUEST_TIMEOUT_SECS` is
/// absent or unusable.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a single notifier run, loaded from the CI environment.
///
/// Built once at the process boundary and passed by reference to every
/// component. Optional values are `None` when the variable is absent or
/// empty, and are then omitted from the serialized event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub run_id: String,
    pub run_attempt: String,
    pub run_number: String,
    /// `owner/name` of the repository that produced the artifact.
    pub repository: String,
    pub workflow_ref: String,
    pub job_name: String,
    pub artifact_name: String,
    pub artifact_url: String,
    pub artifact_version: String,
    /// Platform API base URL, exactly as configured.
    pub api_url: String,
    pub artifact_type: Option<String>,
    pub artifact_digest: Option<String>,
    /// Comma-separated tags, passed through unchanged.
    pub artifact_label: Option<String>,
    /// CI server origin, e.g. `https://github.example.com`.
    pub server_url: Option<String>,
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Required variables are checked in [`env::REQUIRED`] order and the
    /// first missing one is reported. A variable set to the empty string
    /// counts as missing.
    ///
    /// | Env Var                         | Required | Default |
    /// |---------------------------------|----------|---------|
    /// | `GITHUB_RUN_ID`                 | yes      | --      |
    /// | `GITHUB_RUN_ATTEMPT`            | yes      | --      |
    /// | `CLOUDBEES_API_URL`             | yes      | --      |
    /// | `ARTIFACT_NAME`                 | yes      | --      |
    /// | `ARTIFACT_URL`                  | yes      | --      |
    /// | `ARTIFACT_VERSION`              | yes      | --      |
    /// | `GITHUB_RUN_NUMBER`             | yes      | --      |
    /// | `GITHUB_REPOSITORY`             | yes      | --      |
    /// | `GITHUB_WORKFLOW_REF`           | yes      | --      |
    /// | `GITHUB_JOB_NAME`               | yes      | --      |
    /// | `ARTIFACT_TYPE`                 | no       | omitted |
    /// | `ARTIFACT_DIGEST`               | no       | omitted |
    /// | `ARTIFACT_LABEL`                | no       | omitted |
    /// | `GITHUB_SERVER_URL`             | no       | `https://github.com/` |
    /// | `PLATFORM_REQUEST_TIMEOUT_SECS` | no       | `30`    |
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let required = |key: &'static str| optional(key).ok_or(ConfigError::Missing { key });

        let run_id = required(env::GITHUB_RUN_ID)?;
        let run_attempt = required(env::GITHUB_RUN_ATTEMPT)?;
        let api_url = required(env::CLOUDBEES_API_URL)?;
        let artifact_name = required(env::ARTIFACT_NAME)?;
        let artifact_url = required(env::ARTIFACT_URL)?;
        let artifact_version = required(env::ARTIFACT_VERSION)?;
        let run_number = required(env::GITHUB_RUN_NUMBER)?;
        let repository = required(env::GITHUB_REPOSITORY)?;
        let workflow_ref = required(env::GITHUB_WORKFLOW_REF)?;
        let job_name = required(env::GITHUB_JOB_NAME)?;

        let request_timeout = optional(env::PLATFORM_REQUEST_TIMEOUT_SECS)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        Ok(Self {
            run_id,
            run_attempt,
            run_number,
            repository,
            workflow_ref,
            job_name,
            artifact_name,
            artifact_url,
            artifact_version,
            api_url,
            artifact_type: optional(env::ARTIFACT_TYPE),
            artifact_digest: optional(env::ARTIFACT_DIGEST),
            artifact_label: optional(env::ARTIFACT_LABEL),
            server_url: optional(env::GITHUB_SERVER_URL),
            request_timeout,
        })
    }

    /// Platform base URL with any trailing `/` removed.
    ///
    /// Used both for joining endpoint paths and as the token audience.
    pub fn platform_base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
