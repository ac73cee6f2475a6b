//! Edit detection for the watched note file.
//!
//! Uses the notify crate for cross-platform file system events. Editors
//! save in bursts (truncate, write, rename), so raw events are coalesced
//! behind a short quiet window before a change is reported.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, trace};

/// Default coalescing window for bursts of file-system events.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Watches a single note file and reports edits once they settle.
pub struct NoteWatcher {
    _watcher: RecommendedWatcher,
    events: Receiver<notify::Result<Event>>,
    note_path: PathBuf,
    note_name: Option<OsString>,
    debounce: Duration,
    dirty_since: Option<Instant>,
}

impl NoteWatcher {
    /// Watch `path` for modifications.
    ///
    /// The parent directory is watched rather than the file itself: many
    /// editors replace the file on save, which would drop a direct watch.
    ///
    /// # Errors
    /// Returns an error if the watcher cannot be created or the directory
    /// cannot be watched.
    pub fn new(path: impl AsRef<Path>, debounce: Duration) -> notify::Result<Self> {
        // OS backends report absolute canonical paths; store the same form
        // so relevance checks compare like with like.
        let note_path = path
            .as_ref()
            .canonicalize()
            .unwrap_or_else(|_| path.as_ref().to_path_buf());
        let note_name = note_path.file_name().map(OsString::from);
        let root = watch_root(&note_path);

        let (tx, events) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |event| {
            let _ = tx.send(event);
        })?;
        watcher.watch(&root, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            events,
            note_path,
            note_name,
            debounce,
            dirty_since: None,
        })
    }

    /// The canonical path of the watched note.
    pub fn note_path(&self) -> &Path {
        &self.note_path
    }

    /// Drain queued events; returns true once a settled edit is ready.
    pub fn poll_change_ready(&mut self) -> bool {
        while let Ok(event) = self.events.try_recv() {
            match event {
                Ok(event) if self.concerns_note(&event) => {
                    self.dirty_since = Some(Instant::now());
                }
                Ok(event) => {
                    trace!(kind = ?event.kind, paths = ?event.paths, "event for unrelated path");
                }
                Err(err) => {
                    debug!("watch error: {err}");
                }
            }
        }

        match self.dirty_since {
            Some(since) if since.elapsed() >= self.debounce => {
                self.dirty_since = None;
                true
            }
            _ => false,
        }
    }

    // Some backends report the directory, some the canonical file path, and
    // some a differently-prefixed path to the same file name.
    fn concerns_note(&self, event: &Event) -> bool {
        event.paths.iter().any(|path| {
            path == &self.note_path
                || path.as_path() == watch_root(&self.note_path)
                || self
                    .note_name
                    .as_ref()
                    .is_some_and(|name| path.file_name().is_some_and(|f| f == name))
        })
    }
}

fn watch_root(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
