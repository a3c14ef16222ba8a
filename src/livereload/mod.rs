//! Live-reload side channel
//!
//! A filesystem watcher plus a WebSocket hub speaking the LiveReload
//! protocol on its well-known port. The main server never depends on this
//! channel existing or succeeding: the watcher publishes through the
//! [`ReloadNotifier`] seam, and the whole channel sits behind the
//! `livereload` cargo feature.

use std::path::Path;

/// Receives file-change notifications from the watcher
pub trait ReloadNotifier: Send + Sync {
    fn notify(&self, path: &Path);
}

/// Notifier used when no side channel is running
pub struct NoopNotifier;

impl ReloadNotifier for NoopNotifier {
    fn notify(&self, _path: &Path) {}
}

/// A single file-change event pushed to connected clients
#[derive(Debug, Clone)]
pub struct ReloadEvent {
    pub path: String,
}

#[cfg(feature = "livereload")]
mod watcher;
#[cfg(feature = "livereload")]
mod ws;

#[cfg(feature = "livereload")]
pub use watcher::spawn_watcher;

/// Notifier publishing into the hub's broadcast channel
#[cfg(feature = "livereload")]
pub struct BroadcastNotifier {
    tx: tokio::sync::broadcast::Sender<ReloadEvent>,
}

#[cfg(feature = "livereload")]
impl ReloadNotifier for BroadcastNotifier {
    fn notify(&self, path: &Path) {
        // No receivers just means no client is connected yet
        let _ = self.tx.send(ReloadEvent {
            path: path.display().to_string(),
        });
    }
}

/// Run the watcher and WebSocket hub until the process exits
///
/// The caller logs errors from here; they never affect the main server.
#[cfg(feature = "livereload")]
pub async fn run(
    cfg: crate::config::LiveReloadConfig,
    watch_root: String,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (tx, _) = tokio::sync::broadcast::channel(64);
    let notifier = std::sync::Arc::new(BroadcastNotifier { tx: tx.clone() });
    // The debouncer stops watching when dropped; hold it for the hub's lifetime
    let _debouncer = spawn_watcher(Path::new(&watch_root), cfg.debounce_ms, notifier)?;
    ws::serve(cfg.port, tx).await
}
