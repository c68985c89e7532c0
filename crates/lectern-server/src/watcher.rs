//! File watching for live reload.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

use lectern_config::CONFIG_FILE;

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A markdown page was created or changed
    Page(PathBuf),

    /// The project file changed
    Config(PathBuf),

    /// Any other file was created or changed (layout, styles, logo)
    Asset(PathBuf),

    /// A file was removed
    Removed(PathBuf),
}

impl WatchEvent {
    pub fn path(&self) -> &Path {
        match self {
            Self::Page(p) | Self::Config(p) | Self::Asset(p) | Self::Removed(p) => p,
        }
    }
}

/// File watcher for detecting changes.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Watch `paths` recursively, skipping anything under `ignore`.
    ///
    /// Returns the watcher and a channel to receive events.
    pub fn new(
        paths: &[PathBuf],
        ignore: Vec<PathBuf>,
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        for path in paths {
            if path.exists() {
                watcher
                    .watch(path, RecursiveMode::Recursive)
                    .map_err(std::io::Error::other)?;
            }
        }

        std::thread::spawn(move || {
            let mut last_event_time: Option<Instant> = None;
            let debounce_duration = Duration::from_millis(100);

            while let Ok(event) = sync_rx.recv() {
                for path in event.paths {
                    if ignore.iter().any(|dir| path.starts_with(dir)) {
                        continue;
                    }

                    let Some(watch_event) = classify_event(&path, &event.kind) else {
                        continue;
                    };

                    // Debounce rapid events
                    let now = Instant::now();
                    if last_event_time.is_some_and(|t| now.duration_since(t) < debounce_duration) {
                        continue;
                    }
                    last_event_time = Some(now);

                    if async_tx.blocking_send(watch_event).is_err() {
                        return;
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Classify a notify event into a WatchEvent.
fn classify_event(path: &Path, kind: &notify::EventKind) -> Option<WatchEvent> {
    use notify::EventKind;

    let path = path.to_path_buf();

    match kind {
        EventKind::Remove(_) => Some(WatchEvent::Removed(path)),
        EventKind::Create(_) | EventKind::Modify(_) => {
            if path.file_name().and_then(|n| n.to_str()) == Some(CONFIG_FILE) {
                Some(WatchEvent::Config(path))
            } else if path.extension().and_then(|e| e.to_str()) == Some("md") {
                Some(WatchEvent::Page(path))
            } else {
                Some(WatchEvent::Asset(path))
            }
        }
        _ => None,
    }
}
