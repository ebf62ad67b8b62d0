//! Environment variable names read by the notifier.
//!
//! [`REQUIRED`] lists the mandatory variables in the order they are
//! validated; the first one missing is the one reported.

pub const GITHUB_RUN_ID: &str = "GITHUB_RUN_ID";
pub const GITHUB_RUN_ATTEMPT: &str = "GITHUB_RUN_ATTEMPT";
pub const GITHUB_RUN_NUMBER: &str = "GITHUB_RUN_NUMBER";
pub const GITHUB_REPOSITORY: &str = "GITHUB_REPOSITORY";
pub const GITHUB_WORKFLOW_REF: &str = "GITHUB_WORKFLOW_REF";
pub const GITHUB_JOB_NAME: &str = "GITHUB_JOB_NAME";
pub const GITHUB_SERVER_URL: &str = "GITHUB_SERVER_URL";

pub const CLOUDBEES_API_URL: &str = "CLOUDBEES_API_URL";

pub const ARTIFACT_NAME: &str = "ARTIFACT_NAME";
pub const ARTIFACT_URL: &str = "ARTIFACT_URL";
pub const ARTIFACT_VERSION: &str = "ARTIFACT_VERSION";
pub const ARTIFACT_TYPE: &str = "ARTIFACT_TYPE";
pub const ARTIFACT_DIGEST: &str = "ARTIFACT_DIGEST";
pub const ARTIFACT_LABEL: &str = "ARTIFACT_LABEL";

/// URL of the CI provider's identity-token issuer.
pub const ACTIONS_ID_TOKEN_REQUEST_URL: &str = "ACTIONS_ID_TOKEN_REQUEST_URL";
/// Bearer secret presented to the identity-token issuer.
pub const ACTIONS_ID_TOKEN_REQUEST_TOKEN: &str = "ACTIONS_ID_TOKEN_REQUEST_TOKEN";

/// Per-request HTTP timeout in seconds.
pub const PLATFORM_REQUEST_TIMEOUT_SECS: &str = "PLATFORM_REQUEST_TIMEOUT_SECS";

/// Required variables in validation order.
pub const REQUIRED: [&str; 10] = [
    GITHUB_RUN_ID,
    GITHUB_RUN_ATTEMPT,
    CLOUDBEES_API_URL,
    ARTIFACT_NAME,
    ARTIFACT_URL,
    ARTIFACT_VERSION,
    GITHUB_RUN_NUMBER,
    GITHUB_REPOSITORY,
    GITHUB_WORKFLOW_REF,
    GITHUB_JOB_NAME,
];
