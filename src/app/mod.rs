//! Preview session wiring.
//!
//! [`App`] connects the pieces for one note file: the watcher supplies
//! change events, the renderer runs synchronously on each change, the
//! markup goes to the display target (stdout or a file), and the changed
//! text is forwarded to the autosaver.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::warn;

use crate::autosave::Autosaver;
use crate::render::render;
use crate::watcher::{self, NoteWatcher};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A preview session over a single note file.
pub struct App {
    file_path: PathBuf,
    watch: bool,
    out: Option<PathBuf>,
    autosaver: Option<Autosaver>,
}

impl App {
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            watch: false,
            out: None,
            autosaver: None,
        }
    }

    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    pub fn with_out(mut self, out: Option<PathBuf>) -> Self {
        self.out = out;
        self
    }

    pub fn with_autosaver(mut self, autosaver: Option<Autosaver>) -> Self {
        self.autosaver = autosaver;
        self
    }

    /// Run the session: render once, then (in watch mode) keep re-rendering
    /// and autosaving on each settled edit until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns an error if the note cannot be read at startup, the preview
    /// target cannot be written, or the file watcher cannot be created.
    /// Read failures on later change ticks are logged and skipped.
    pub async fn run(&mut self) -> Result<()> {
        let text = fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))?;

        // The content on disk is the baseline: opening a note must not
        // trigger a save of text the user never edited.
        if let Some(saver) = self.autosaver.take() {
            self.autosaver = Some(saver.with_snapshot(text.clone()));
        }

        self.emit(&render(&text))?;
        if !self.watch {
            return Ok(());
        }

        let mut note_watcher = NoteWatcher::new(&self.file_path, watcher::DEFAULT_DEBOUNCE)
            .context("Failed to start file watcher")?;
        let mut poll = tokio::time::interval(POLL_INTERVAL);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => break,
                _ = poll.tick() => {
                    if !note_watcher.poll_change_ready() {
                        continue;
                    }
                    match fs::read_to_string(note_watcher.note_path()) {
                        Ok(text) => {
                            self.emit(&render(&text))?;
                            if let Some(saver) = &mut self.autosaver {
                                saver.note_changed(text);
                            }
                        }
                        Err(err) => warn!("skipping unreadable note: {err}"),
                    }
                }
            }
        }

        if let Some(saver) = &mut self.autosaver {
            saver.shutdown();
        }
        Ok(())
    }

    fn emit(&self, markup: &str) -> Result<()> {
        match &self.out {
            Some(path) => fs::write(path, markup)
                .with_context(|| format!("Failed to write preview {}", path.display())),
            None => {
                println!("{markup}");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_one_shot_render_writes_preview_file() {
        let dir = tempdir().unwrap();
        let note = dir.path().join("note.md");
        let preview = dir.path().join("preview.html");
        std::fs::write(&note, "# Title\n* a\n* b").unwrap();

        let mut app = App::new(note).with_out(Some(preview.clone()));
        app.run().await.unwrap();

        let markup = std::fs::read_to_string(&preview).unwrap();
        assert_eq!(
            markup,
            "<h1>Title</h1><br><ul><li>a</li><br><li>b</li></ul>"
        );
    }

    #[tokio::test]
    async fn test_missing_note_is_a_startup_error() {
        let dir = tempdir().unwrap();
        let mut app = App::new(dir.path().join("absent.md"));
        let err = app.run().await.unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
