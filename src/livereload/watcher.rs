//! Filesystem watcher feeding the live-reload hub

use crate::livereload::ReloadNotifier;
use crate::logger;
use notify::{RecommendedWatcher, RecursiveMode, Watcher as _};
use notify_debouncer_full::{new_debouncer, DebounceEventResult, Debouncer, FileIdMap};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Start watching `root` recursively, forwarding changed paths to `notifier`
///
/// The returned debouncer stops watching when dropped.
pub fn spawn_watcher(
    root: &Path,
    debounce_ms: u64,
    notifier: Arc<dyn ReloadNotifier>,
) -> notify::Result<Debouncer<RecommendedWatcher, FileIdMap>> {
    let mut debouncer = new_debouncer(
        Duration::from_millis(debounce_ms),
        None,
        move |result: DebounceEventResult| match result {
            Ok(events) => {
                for event in &events {
                    for path in &event.paths {
                        notifier.notify(path);
                    }
                }
            }
            Err(errors) => {
                for error in &errors {
                    logger::log_warning(&format!("[LiveReload] Watch error: {error}"));
                }
            }
        },
    )?;

    debouncer.watcher().watch(root, RecursiveMode::Recursive)?;
    debouncer.cache().add_root(root, RecursiveMode::Recursive);
    Ok(debouncer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::livereload::NoopNotifier;

    #[test]
    fn test_watching_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let debouncer = spawn_watcher(dir.path(), 50, Arc::new(NoopNotifier));
        assert!(debouncer.is_ok());
    }

    #[test]
    fn test_watching_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        assert!(spawn_watcher(&missing, 50, Arc::new(NoopNotifier)).is_err());
    }
}
