//! Project configuration watching.
//!
//! Watches the directory holding `.wordcount.toml` and forwards changes to
//! that one file over a channel. Editors usually save by writing a temp
//! file and renaming it, so the parent directory is watched rather than the
//! file itself.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

/// Events from the file watcher
#[derive(Debug)]
pub enum WatchEvent {
    ConfigChanged(PathBuf),
    WatcherError(notify::Error),
}

/// Keeps the underlying watcher alive; dropping it stops watching
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
}

impl ConfigWatcher {
    /// Start watching `config_path`. Returns the watcher and the receiving
    /// end of its event channel.
    pub fn start(config_path: &Path) -> Result<(Self, mpsc::UnboundedReceiver<WatchEvent>)> {
        let (tx, rx) = mpsc::unbounded_channel();
        let file_name = config_path.file_name().map(|name| name.to_os_string());

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if let EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) =
                        event.kind
                    {
                        for path in event.paths {
                            if path.file_name().map(|name| name.to_os_string()) == file_name {
                                let _ = tx.send(WatchEvent::ConfigChanged(path));
                            }
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatchEvent::WatcherError(e));
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(1)),
        )?;

        let dir = watch_dir(config_path);
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch config directory: {}", dir.display()))?;
        log::debug!("watching {} for config changes", dir.display());

        Ok((Self { _watcher: watcher }, rx))
    }
}

fn watch_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
