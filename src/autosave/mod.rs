//! Change-debounced background persistence.
//!
//! An [`Autosaver`] observes "text changed" events and, after a quiet
//! interval with no further changes, posts the note content to a save
//! endpoint. The request carries the `X-Auto-Save` marker header so the
//! endpoint can tell a background save from an explicit user save.
//!
//! Persistence is best-effort: a failed save is logged and the content is
//! retried only by a future change + quiet-interval cycle. Nothing here
//! blocks the editing experience.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Header that marks a request as a background save.
pub const AUTOSAVE_HEADER: &str = "X-Auto-Save";

/// Default quiet interval between the last change and the save attempt.
pub const DEFAULT_QUIET_INTERVAL: Duration = Duration::from_millis(4000);

const SAVE_TIMEOUT: Duration = Duration::from_secs(30);

/// A save attempt that did not confirm.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("endpoint rejected save with status {0}")]
    Rejected(StatusCode),
}

/// Machine-readable body an endpoint may return for a confirmed save.
///
/// The body is optional: a confirmed save with an absent or unparseable
/// body yields the default receipt.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveReceipt {
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub id: Option<i64>,
}

impl Default for SaveReceipt {
    fn default() -> Self {
        Self {
            status: default_status(),
            id: None,
        }
    }
}

fn default_status() -> String {
    "ok".to_string()
}

/// Debounced persister for a single note.
///
/// Each change event re-arms the quiet-interval timer (cancel, then
/// reschedule), so at most one timer is pending at any moment. When the
/// interval elapses without further changes and the text differs from the
/// last confirmed-saved snapshot, one save request is issued. The snapshot
/// advances only on confirmation, and only to the text that was sent.
pub struct Autosaver {
    inner: Arc<Inner>,
    pending: Option<JoinHandle<()>>,
}

struct Inner {
    client: reqwest::Client,
    endpoint: String,
    title: String,
    quiet_interval: Duration,
    last_saved: Mutex<String>,
}

impl Autosaver {
    /// Create a persister targeting `endpoint`.
    ///
    /// The snapshot starts empty, so the first quiet interval after any
    /// change produces a save. Use [`Self::with_snapshot`] when the current
    /// content is already known to be persisted.
    pub fn new(
        endpoint: impl Into<String>,
        title: impl Into<String>,
        quiet_interval: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                client: reqwest::Client::new(),
                endpoint: endpoint.into(),
                title: title.into(),
                quiet_interval,
                last_saved: Mutex::new(String::new()),
            }),
            pending: None,
        }
    }

    /// Seed the last-confirmed-saved snapshot.
    pub fn with_snapshot(self, text: impl Into<String>) -> Self {
        *self
            .inner
            .last_saved
            .lock()
            .expect("snapshot lock poisoned") = text.into();
        self
    }

    /// Record a text change and (re)arm the quiet-interval timer.
    ///
    /// A pending timer is aborted and replaced; an in-flight save request
    /// is never canceled.
    pub fn note_changed(&mut self, text: String) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        let inner = Arc::clone(&self.inner);
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.quiet_interval).await;
            let unchanged =
                *inner.last_saved.lock().expect("snapshot lock poisoned") == text;
            if unchanged {
                debug!("quiet interval elapsed with no unsaved changes");
                return;
            }
            // Past the quiet interval the save is detached: aborting a
            // newer timer must not reach a request already in flight.
            tokio::spawn(async move {
                match inner.persist(&text).await {
                    Ok(receipt) => {
                        *inner.last_saved.lock().expect("snapshot lock poisoned") = text;
                        debug!(status = %receipt.status, "background save confirmed");
                    }
                    Err(err) => {
                        warn!("background save failed: {err}");
                    }
                }
            });
        }));
    }

    /// Abort a pending quiet-interval timer, if any.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// True while a quiet-interval timer is armed.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// The last text value confirmed by the endpoint.
    pub fn last_saved(&self) -> String {
        self.inner
            .last_saved
            .lock()
            .expect("snapshot lock poisoned")
            .clone()
    }
}

impl Drop for Autosaver {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Inner {
    async fn persist(&self, text: &str) -> Result<SaveReceipt, SaveError> {
        let form = [("title", self.title.as_str()), ("content", text)];
        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTOSAVE_HEADER, "1")
            .timeout(SAVE_TIMEOUT)
            .form(&form)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SaveError::Rejected(status));
        }
        // The endpoint may reply with a JSON receipt; anything else still
        // counts as a confirmed save.
        Ok(response
            .json::<SaveReceipt>()
            .await
            .unwrap_or_default())
    }
}
