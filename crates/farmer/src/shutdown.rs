//! Termination signals that stop the periodic task.

/// Resolves with the name of the first termination signal the process
/// receives.
#[cfg(unix)]
pub async fn requested() -> &'static str {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    let mut interrupt = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
    tokio::select! {
        _ = terminate.recv() => "SIGTERM",
        _ = interrupt.recv() => "SIGINT",
    }
}

#[cfg(not(unix))]
pub async fn requested() -> &'static str {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(?err, "no CTRL+C handler, shutdown only by killing the process");
        std::future::pending::<()>().await;
    }
    "CTRL+C"
}
