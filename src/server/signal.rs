// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Signal handler state
pub struct SignalHandler {
    /// Fired once when shutdown is requested
    pub shutdown: Arc<Notify>,
    /// Whether shutdown has been requested
    pub shutdown_requested: AtomicBool,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new(Notify::new()),
            shutdown_requested: AtomicBool::new(false),
        }
    }

    /// Request shutdown; later calls are no-ops
    ///
    /// `notify_one` stores a permit, so a server loop that is not yet waiting
    /// still sees the request.
    pub fn request_shutdown(&self, reason: &str) {
        if !self.shutdown_requested.swap(true, Ordering::SeqCst) {
            logger::log_info(&format!("[Signal] {reason} received, shutting down"));
            self.shutdown.notify_one();
        }
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Start signal handlers (Unix)
///
/// Spawns a background task waiting for SIGTERM or SIGINT. If the handlers
/// cannot be registered, falls back to Ctrl+C only.
#[cfg(unix)]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let registered = signal(SignalKind::terminate())
            .and_then(|term| signal(SignalKind::interrupt()).map(|int| (term, int)));

        match registered {
            Ok((mut sigterm, mut sigint)) => {
                logger::log_debug(&format!(
                    "[Signal] SIGTERM/SIGINT handlers registered, pid {}",
                    std::process::id()
                ));
                tokio::select! {
                    _ = sigterm.recv() => handler.request_shutdown("SIGTERM"),
                    _ = sigint.recv() => handler.request_shutdown("SIGINT"),
                }
            }
            Err(e) => {
                logger::log_error(&format!("Failed to register signal handlers: {e}"));
                if tokio::signal::ctrl_c().await.is_ok() {
                    handler.request_shutdown("Ctrl+C");
                }
            }
        }
    });
}

/// Non-unix fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handler.request_shutdown("Ctrl+C");
        }
    });
}
