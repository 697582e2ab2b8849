//! One editing session over one stored layout.
//!
//! The session owns the canvas engine for a [`LayoutTarget`] and tracks how
//! the in-memory document relates to the backend copy. Loading never fails:
//! if the backend is unreachable or returns garbage, the session falls back
//! to the local cache and then to an empty canvas. Saving never touches the
//! document: a failed save leaves every edit in place and records a
//! [`SaveStatus::Failed`] the screen can show next to a retry button.
//!
//! Saves are split in two so the screen stays interactive while the request
//! is in flight: [`EditorSession::begin_save`] snapshots the layout into a
//! [`SaveTicket`], and [`EditorSession::finish_save`] records the outcome.
//! Edits made in between keep the session dirty after the save lands.

use canvas::codec::CodecError;
use canvas::doc::CanvasDocument;
use canvas::engine::{Action, EngineCore};
use serde_json::Value;

use crate::cache::LayoutCache;
use crate::error::StoreError;
use crate::format::LayoutFormat;
use crate::store::{LayoutStore, LayoutTarget};

/// Where the document shown after [`EditorSession::load`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Remote,
    /// The backend failed; this is the last copy seen locally.
    Cache,
    /// Nothing could be loaded; the canvas starts empty.
    Empty,
}

/// Relationship between the in-memory document and the backend copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    /// Nothing to save.
    Clean,
    /// Edited since the last successful save.
    Dirty,
    /// A save is in flight.
    Saving,
    /// The last save failed; edits are still in memory.
    Failed(String),
}

/// Snapshot of the layout taken when a save starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveTicket {
    seq: u64,
    revision: u64,
    /// Encoded layout to send to the backend.
    pub layout: Value,
}

pub struct EditorSession<F: LayoutFormat, S> {
    target: LayoutTarget,
    store: S,
    cache: Option<LayoutCache>,
    engine: EngineCore<F::Payload>,
    extra: F::Extra,
    status: SaveStatus,
    /// Bumped on every document change.
    revision: u64,
    saved_revision: u64,
    next_ticket: u64,
    in_flight: Option<u64>,
}

impl<F: LayoutFormat, S: LayoutStore> EditorSession<F, S> {
    /// A session with an empty canvas. Call [`EditorSession::load`] to fill it.
    pub fn new(target: LayoutTarget, store: S) -> Self {
        Self {
            target,
            store,
            cache: None,
            engine: EngineCore::new(),
            extra: F::Extra::default(),
            status: SaveStatus::Clean,
            revision: 0,
            saved_revision: 0,
            next_ticket: 0,
            in_flight: None,
        }
    }

    /// Keep a last-known-good copy of the layout in `cache`.
    #[must_use]
    pub fn with_cache(mut self, cache: LayoutCache) -> Self {
        self.cache = Some(cache);
        self
    }

    // --- Loading ---

    /// Replace the document with the stored layout.
    ///
    /// Tries the backend, then the local cache, then settles for an empty
    /// canvas. Any gesture, selection or pending save outcome is dropped.
    pub async fn load(&mut self) -> LoadSource {
        let (doc, extra, source) = match self.fetch_remote().await {
            Ok((doc, extra)) => (doc, extra, LoadSource::Remote),
            Err(e) => {
                tracing::warn!(layout = %self.target, error = %e, "layout fetch failed; trying local cache");
                match self.read_cache().await {
                    Some((doc, extra)) => (doc, extra, LoadSource::Cache),
                    None => (CanvasDocument::new(), F::Extra::default(), LoadSource::Empty),
                }
            }
        };

        tracing::info!(layout = %self.target, format = F::NAME, items = doc.len(), ?source, "layout loaded");
        self.engine.load_document(doc);
        self.extra = extra;
        self.status = SaveStatus::Clean;
        self.revision = 0;
        self.saved_revision = 0;
        self.in_flight = None;
        source
    }

    async fn fetch_remote(&self) -> Result<(CanvasDocument<F::Payload>, F::Extra), StoreError> {
        let stored = self.store.fetch(&self.target).await?;
        let (doc, extra) = F::decode(&stored)?;
        self.write_cache(&stored).await;
        Ok((doc, extra))
    }

    async fn read_cache(&self) -> Option<(CanvasDocument<F::Payload>, F::Extra)> {
        let cache = self.cache.as_ref()?;
        let stored = match cache.read(&self.target).await {
            Ok(Some(stored)) => stored,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(layout = %self.target, error = %e, "layout cache unreadable");
                return None;
            }
        };
        match F::decode(&stored) {
            Ok(loaded) => Some(loaded),
            Err(e) => {
                tracing::warn!(layout = %self.target, error = %e, "cached layout undecodable");
                None
            }
        }
    }

    async fn write_cache(&self, layout: &Value) {
        let Some(cache) = &self.cache else {
            return;
        };
        if let Err(e) = cache.write(&self.target, layout).await {
            tracing::warn!(layout = %self.target, error = %e, "layout cache write failed");
        }
    }

    // --- Editing ---

    /// Run an engine operation, marking the session dirty if it changed the document.
    pub fn apply(&mut self, edit: impl FnOnce(&mut EngineCore<F::Payload>) -> Vec<Action>) -> Vec<Action> {
        let actions = edit(&mut self.engine);
        self.record(&actions);
        actions
    }

    /// Like [`EditorSession::apply`], for fallible operations such as `add_item`.
    ///
    /// # Errors
    ///
    /// Passes through the operation's error; nothing is recorded in that case.
    pub fn try_apply<E>(
        &mut self,
        edit: impl FnOnce(&mut EngineCore<F::Payload>) -> Result<Vec<Action>, E>,
    ) -> Result<Vec<Action>, E> {
        let actions = edit(&mut self.engine)?;
        self.record(&actions);
        Ok(actions)
    }

    /// Replace the content stored alongside the items (org-chart edges).
    pub fn set_extra(&mut self, extra: F::Extra) {
        if extra != self.extra {
            self.extra = extra;
            self.mark_dirty();
        }
    }

    fn record(&mut self, actions: &[Action]) {
        if actions.iter().any(Action::mutates_document) {
            self.mark_dirty();
        }
    }

    fn mark_dirty(&mut self) {
        self.revision += 1;
        if self.status == SaveStatus::Clean {
            self.status = SaveStatus::Dirty;
        }
    }

    // --- Saving ---

    /// Snapshot the layout for saving and enter [`SaveStatus::Saving`].
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] (and records [`SaveStatus::Failed`]) if the
    /// document cannot be encoded.
    pub fn begin_save(&mut self) -> Result<SaveTicket, CodecError> {
        let layout = match F::encode(self.engine.document(), &self.extra) {
            Ok(layout) => layout,
            Err(e) => {
                self.status = SaveStatus::Failed(e.to_string());
                return Err(e);
            }
        };
        self.next_ticket += 1;
        self.in_flight = Some(self.next_ticket);
        self.status = SaveStatus::Saving;
        Ok(SaveTicket { seq: self.next_ticket, revision: self.revision, layout })
    }

    /// Record the outcome of the save started by `ticket`.
    ///
    /// Outcomes of superseded saves (a newer save started, or the document
    /// was reloaded) are ignored; returns whether this one was recorded.
    pub fn finish_save(&mut self, ticket: &SaveTicket, result: Result<(), &StoreError>) -> bool {
        if self.in_flight != Some(ticket.seq) {
            tracing::debug!(layout = %self.target, ticket = ticket.seq, "ignoring superseded save outcome");
            return false;
        }
        self.in_flight = None;
        match result {
            Ok(()) => {
                self.saved_revision = ticket.revision;
                self.status = if self.revision == ticket.revision { SaveStatus::Clean } else { SaveStatus::Dirty };
                tracing::info!(layout = %self.target, revision = ticket.revision, "layout saved");
            }
            Err(e) => {
                tracing::warn!(layout = %self.target, error = %e, "layout save failed; edits kept in memory");
                self.status = SaveStatus::Failed(e.to_string());
            }
        }
        true
    }

    /// Encode, send and record a save in one step.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] that failed the save. The document is
    /// untouched either way.
    pub async fn save(&mut self) -> Result<(), StoreError> {
        let ticket = self.begin_save()?;
        let result = self.store.store(&self.target, &ticket.layout).await;
        if result.is_ok() {
            self.write_cache(&ticket.layout).await;
        }
        self.finish_save(&ticket, result.as_ref().map(|_| ()));
        result
    }

    // --- Queries ---

    #[must_use]
    pub fn target(&self) -> &LayoutTarget {
        &self.target
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn engine(&self) -> &EngineCore<F::Payload> {
        &self.engine
    }

    #[must_use]
    pub fn document(&self) -> &CanvasDocument<F::Payload> {
        self.engine.document()
    }

    #[must_use]
    pub fn extra(&self) -> &F::Extra {
        &self.extra
    }

    #[must_use]
    pub fn status(&self) -> &SaveStatus {
        &self.status
    }

    /// Whether the document differs from the last successful save or load.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.revision != self.saved_revision
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
