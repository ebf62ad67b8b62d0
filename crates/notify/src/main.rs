//! `gha-register-build-artifact` -- CI step that announces a published
//! build artifact to the build-tracking platform.
//!
//! Takes no arguments. All input comes from the environment; see
//! [`artifact_notify_core::Config::from_lookup`] for the full table. The
//! OIDC issuer is read from `ACTIONS_ID_TOKEN_REQUEST_URL` and
//! `ACTIONS_ID_TOKEN_REQUEST_TOKEN`.
//!
//! Exits `0` once the platform has accepted the event, `1` otherwise.
//! Ctrl-C / SIGTERM cancels any in-flight request.

use std::process::ExitCode;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "gha_register_build_artifact=info,artifact_notify=info,artifact_notify_platform=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = artifact_notify::reject_arguments(std::env::args().skip(1)) {
        tracing::error!(error = %e, "Invalid invocation");
        return ExitCode::FAILURE;
    }

    let cancel = CancellationToken::new();
    let signal_handle = tokio::spawn(cancel_on_signal(cancel.clone()));

    let result = artifact_notify::run_from_env(&cancel).await;
    signal_handle.abort();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Failed to publish build artifact");
            ExitCode::FAILURE
        }
    }
}

/// Cancel the run on SIGINT (Ctrl-C) or, on Unix, SIGTERM.
///
/// If a handler cannot be installed that signal is simply not observed.
async fn cancel_on_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::warn!("Interrupt received, cancelling run");
    cancel.cancel();
}
