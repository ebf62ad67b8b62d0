//! Publish build-artifact metadata to the build-tracking platform.
//!
//! [`run`] is the whole job: build the CloudEvent, authenticate through
//! the OIDC token exchange, deliver the event. Each step short-circuits
//! on failure and every network call is raced against a
//! [`CancellationToken`].

pub mod error;

use std::future::Future;

use tokio_util::sync::CancellationToken;

use artifact_notify_core::{build_event, Config};
use artifact_notify_platform::{IdentityTokenSource, PlatformClient};

pub use error::PublishError;

/// Reject positional arguments; the tool is configured by environment only.
pub fn reject_arguments<I>(args: I) -> Result<(), PublishError>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    if args.is_empty() {
        Ok(())
    } else {
        Err(PublishError::UnknownArguments(args))
    }
}

/// Load configuration from the process environment and run.
pub async fn run_from_env(cancel: &CancellationToken) -> Result<(), PublishError> {
    run_with_lookup(
        |key| std::env::var(key).ok(),
        &IdentityTokenSource::from_env(),
        cancel,
    )
    .await
}

/// Validate configuration through `lookup`, then run.
pub async fn run_with_lookup<F>(
    lookup: F,
    identity: &IdentityTokenSource,
    cancel: &CancellationToken,
) -> Result<(), PublishError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = Config::from_lookup(lookup)?;
    run(&config, identity, cancel).await
}

/// Build, authenticate and deliver one artifact-published event.
///
/// The access token obtained in the exchange is held only for the
/// duration of this call.
pub async fn run(
    config: &Config,
    identity: &IdentityTokenSource,
    cancel: &CancellationToken,
) -> Result<(), PublishError> {
    let event = build_event(config)?;
    tracing::info!(
        event_id = %event.id,
        subject = %event.subject,
        source = %event.source,
        "Prepared CloudEvent"
    );
    if tracing::enabled!(tracing::Level::DEBUG) {
        if let Ok(pretty) = serde_json::to_string_pretty(&event) {
            tracing::debug!(event = %pretty, "CloudEvent payload");
        }
    }
    let body = event.to_json()?;

    let client = PlatformClient::new(config.platform_base_url(), config.request_timeout)
        .map_err(PublishError::HttpClient)?;

    let token = until_cancelled(cancel, client.exchange_token(identity)).await??;
    until_cancelled(cancel, client.deliver(body, &token)).await??;

    tracing::info!(event_id = %event.id, "CloudEvent sent successfully");
    Ok(())
}

/// Drive `fut` to completion unless `cancel` fires first, in which case
/// the future (and any in-flight request) is dropped.
async fn until_cancelled<F>(cancel: &CancellationToken, fut: F) -> Result<F::Output, PublishError>
where
    F: Future,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::warn!("Run cancelled");
            Err(PublishError::Cancelled)
        }
        out = fut => Ok(out),
    }
}
