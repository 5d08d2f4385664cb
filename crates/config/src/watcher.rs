use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Watches the config file and sends a notification whenever it is written.
///
/// The parent directory is watched rather than the file itself so that
/// editors which save by rename, and files created after start-up, are seen.
///
/// # Example
/// ```no_run
/// # async fn demo() {
/// let (_watcher, mut rx) = scope_config::ConfigWatcher::spawn("/home/user/.config/livescope/livescope.toml");
/// while rx.recv().await.is_some() {
///     println!("config changed, reloading");
/// }
/// # }
/// ```
pub struct ConfigWatcher {
    task: JoinHandle<()>,
}

impl ConfigWatcher {
    /// Spawn a filesystem watcher for `path` on the current Tokio runtime.
    pub fn spawn(path: impl AsRef<Path>) -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        let path = path.as_ref().to_path_buf();

        let task = tokio::spawn(watch_loop(path, tx));

        (Self { task }, rx)
    }
}

impl Drop for ConfigWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn watch_loop(path: PathBuf, tx: mpsc::Sender<()>) {
    let Some(dir) = path.parent().map(Path::to_path_buf) else {
        error!("Config path '{}' has no parent directory", path.display());
        return;
    };

    let (sync_tx, mut sync_rx) = mpsc::channel::<notify::Result<Event>>(16);

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = sync_tx.blocking_send(res);
        },
        Config::default().with_poll_interval(Duration::from_secs(2)),
    ) {
        Ok(w) => w,
        Err(e) => {
            error!("Failed to create filesystem watcher: {e}");
            return;
        }
    };

    if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
        warn!("Not watching '{}': {e}", dir.display());
        return;
    }

    info!("Watching config file: {}", path.display());

    while let Some(event) = sync_rx.recv().await {
        match event {
            Ok(e) if is_relevant(&e, &path) => {
                debug!(kind = ?e.kind, "config file changed");
                // A full channel already carries a pending reload.
                if let Err(mpsc::error::TrySendError::Closed(())) = tx.try_send(()) {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Watcher error: {e}"),
        }
    }
}

fn is_relevant(event: &Event, path: &Path) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event.paths.iter().any(|p| p.file_name() == path.file_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn only_writes_to_the_config_file_count() {
        let cfg = Path::new("/tmp/livescope/livescope.toml");

        assert!(is_relevant(
            &event(EventKind::Modify(ModifyKind::Any), "/tmp/livescope/livescope.toml"),
            cfg
        ));
        assert!(is_relevant(
            &event(EventKind::Create(CreateKind::File), "/tmp/livescope/livescope.toml"),
            cfg
        ));
        assert!(!is_relevant(
            &event(EventKind::Modify(ModifyKind::Any), "/tmp/livescope/other.toml"),
            cfg
        ));
        assert!(!is_relevant(
            &event(EventKind::Access(notify::event::AccessKind::Any), "/tmp/livescope/livescope.toml"),
            cfg
        ));
    }

    #[tokio::test]
    async fn dropping_the_watcher_closes_the_channel() {
        let path = std::env::temp_dir().join("livescope-watcher-test/livescope.toml");
        let (watcher, mut rx) = ConfigWatcher::spawn(&path);
        drop(watcher);

        let closed = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await;
        assert_eq!(closed, Ok(None));
    }
}
