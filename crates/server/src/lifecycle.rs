//! Termination signals and the panic hook that share one shutdown path.

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Resolve on SIGINT (Ctrl+C) or SIGTERM.
///
/// If a handler cannot be installed the failure is logged and that signal
/// is never observed; the other one still works.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}

/// Cancel `token` when a termination signal arrives.
pub fn cancel_on_signal(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            () = shutdown_signal() => token.cancel(),
            () = token.cancelled() => {}
        }
    })
}

/// Log any panic and start a graceful shutdown.
///
/// Handler panics are also turned into 500 responses by the router; this
/// hook makes the process drain and exit afterwards instead of running on in
/// an unknown state.
pub fn install_panic_hook(token: CancellationToken) {
    std::panic::set_hook(Box::new(move |panic| {
        let location = panic
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        error!(panic = %panic, %location, "panic, shutting down");
        token.cancel();
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn panic_hook_cancels_token() {
        let token = CancellationToken::new();
        let previous = std::panic::take_hook();
        install_panic_hook(token.clone());

        let result = std::thread::spawn(|| panic!("boom")).join();
        std::panic::set_hook(previous);

        assert!(result.is_err());
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn signal_task_stops_when_token_is_cancelled() {
        let token = CancellationToken::new();
        let handle = cancel_on_signal(token.clone());
        token.cancel();
        handle.await.unwrap();
    }
}
