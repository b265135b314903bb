// src/engine/signals.rs

//! Termination signals → supervisor shutdown.

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::SupervisorHandle;

/// Install handlers for SIGINT, SIGTERM and SIGHUP (Ctrl-C elsewhere) and
/// spawn a task that asks the supervisor to shut down on the first one.
///
/// Installing the handlers happens before returning, so a failure is a
/// startup error.
#[cfg(unix)]
pub fn spawn_signal_listener(supervisor: SupervisorHandle) -> Result<JoinHandle<()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    Ok(tokio::spawn(async move {
        let name = tokio::select! {
            _ = sigint.recv() => "SIGINT",
            _ = sigterm.recv() => "SIGTERM",
            _ = sighup.recv() => "SIGHUP",
        };
        info!(signal = name, "termination signal received; shutting down");
        request_shutdown(&supervisor).await;
    }))
}

#[cfg(not(unix))]
pub fn spawn_signal_listener(supervisor: SupervisorHandle) -> Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            return;
        }
        info!("Ctrl+C received; shutting down");
        request_shutdown(&supervisor).await;
    }))
}

async fn request_shutdown(supervisor: &SupervisorHandle) {
    if !supervisor.shutdown().await {
        debug!("supervisor already stopped");
    }
}
