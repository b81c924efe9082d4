//! The persistence bridge: loading, saving, and draft-caching form
//! configurations against an external store.
//!
//! The primary store is a collaborator behind [`FormStore`]; the bridge only
//! knows its save/load contract and treats the store as authoritative for
//! canonical records (ids included). The draft cache is bridge-local and
//! exists so a crash between saves loses nothing.

mod draft;
mod record;

pub use draft::{DRAFT_KEY, DraftEntry, DraftStore, FileDraftStore, MemoryDraftStore};
pub use record::{
    FormMode, FormRecord, FormRecordStats, SubmissionRecord, SubmissionStatus,
};

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{PersistenceError, StoreError};
use crate::id::IdGenerator;
use crate::model::FormConfig;

/// Drafts written longer ago than this are ignored at initialization.
pub const DEFAULT_DRAFT_STALENESS_MS: i64 = 24 * 60 * 60 * 1000;

/// The primary store collaborator.
///
/// `create` and `update` return the canonical persisted record; the bridge
/// adopts it wholesale, so a store that rewrites ids or timestamps stays the
/// single source of truth.
#[async_trait]
pub trait FormStore: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<FormRecord, StoreError>;
    async fn create(&self, record: FormRecord) -> Result<FormRecord, StoreError>;
    async fn update(&self, id: &str, record: FormRecord) -> Result<FormRecord, StoreError>;
}

/// How a [`PersistenceBridge::save`] call resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new record was created in the primary store.
    Created,
    /// The existing record was updated.
    Updated,
    /// Another save was already in flight; this request was folded into it.
    Coalesced,
}

/// Single-slot save scheduling: at most one save in flight and at most one
/// queued behind it. Requests arriving while busy collapse into the queued
/// slot, so a burst of edits resolves to one trailing save.
#[derive(Debug, Default)]
pub struct SaveQueue {
    in_flight: bool,
    pending: bool,
}

impl SaveQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a save. `true` means the caller runs it now; `false` means
    /// it was queued behind the one in flight.
    pub fn begin(&mut self) -> bool {
        if self.in_flight {
            self.pending = true;
            false
        } else {
            self.in_flight = true;
            true
        }
    }

    /// Marks the in-flight save done. `true` means a queued request exists
    /// and the caller must run again (the slot stays held).
    pub fn finish(&mut self) -> bool {
        if self.pending {
            self.pending = false;
            true
        } else {
            self.in_flight = false;
            false
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}

/// Owns the in-memory configuration's relationship with storage: hydration,
/// dirty tracking, draft write-through, and create-vs-update dispatch.
pub struct PersistenceBridge<S: FormStore, D: DraftStore> {
    store: S,
    drafts: D,
    ids: IdGenerator,
    user_id: String,
    config: FormConfig,
    record: Option<FormRecord>,
    dirty: bool,
    persisted: bool,
    staleness_ms: i64,
    queue: SaveQueue,
}

impl<S: FormStore, D: DraftStore> PersistenceBridge<S, D> {
    pub fn new(store: S, drafts: D, user_id: impl Into<String>) -> Self {
        let mut ids = IdGenerator::new();
        let config = FormConfig::empty(&mut ids);
        Self {
            store,
            drafts,
            ids,
            user_id: user_id.into(),
            config,
            record: None,
            dirty: false,
            persisted: false,
            staleness_ms: DEFAULT_DRAFT_STALENESS_MS,
            queue: SaveQueue::new(),
        }
    }

    pub fn with_staleness_ms(mut self, staleness_ms: i64) -> Self {
        self.staleness_ms = staleness_ms;
        self
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Hydrates from a fresh local draft when one exists, otherwise starts a
    /// new default form and writes it through to the draft cache.
    pub fn initialize(&mut self) -> Result<(), PersistenceError> {
        if let Some(entry) = self.drafts.get()? {
            let age = Utc::now().timestamp_millis() - entry.timestamp;
            if age <= self.staleness_ms {
                log::debug!("hydrating form '{}' from local draft", entry.config.id);
                self.config = entry.config;
                self.persisted = !entry.is_new;
                self.record = None;
                self.dirty = true;
                return Ok(());
            }
            log::debug!("ignoring draft older than {}ms", self.staleness_ms);
        }

        self.config = FormConfig::empty(&mut self.ids);
        self.record = None;
        self.persisted = false;
        self.dirty = true;
        self.write_draft()
    }

    /// Replaces the in-memory model with the stored record `id`.
    pub async fn load(&mut self, id: &str) -> Result<(), PersistenceError> {
        let record = self.store.fetch(id).await.map_err(|e| match e {
            StoreError::NotFound(id) => PersistenceError::NotFound(id),
            other => PersistenceError::Store(other),
        })?;
        log::debug!("loaded form '{}'", record.id);
        self.config = record.to_config();
        self.record = Some(record);
        self.persisted = true;
        self.dirty = false;
        Ok(())
    }

    /// Registers a mutation: adopts the new configuration, marks it unsaved,
    /// and writes it through to the draft cache immediately.
    pub fn touch(&mut self, config: &FormConfig) -> Result<(), PersistenceError> {
        self.config = config.clone();
        self.dirty = true;
        self.write_draft()
    }

    /// Persists the configuration: a create for a never-persisted form, an
    /// update otherwise. On success the store's canonical record replaces
    /// the in-memory state and the draft is cleared; on failure the draft
    /// survives as the fallback copy.
    ///
    /// Calls arriving while a save is in flight coalesce into one trailing
    /// save instead of racing on the same identity.
    pub async fn save(&mut self) -> Result<SaveOutcome, PersistenceError> {
        if !self.queue.begin() {
            return Ok(SaveOutcome::Coalesced);
        }
        loop {
            let result = self.save_once().await;
            let rerun = self.queue.finish();
            if !rerun {
                return result;
            }
        }
    }

    async fn save_once(&mut self) -> Result<SaveOutcome, PersistenceError> {
        let snapshot_id = self.config.id.clone();
        let mut record = match &self.record {
            Some(existing) => existing.clone(),
            None => FormRecord::from_config(&self.config, self.user_id.clone()),
        };
        record.merge_config(&self.config);

        let result = if self.persisted {
            self.store
                .update(&snapshot_id, record)
                .await
                .map(|canonical| (canonical, SaveOutcome::Updated))
        } else {
            self.store
                .create(record)
                .await
                .map(|canonical| (canonical, SaveOutcome::Created))
        };

        match result {
            Ok((canonical, outcome)) => {
                if self.config.id != snapshot_id {
                    // The model was replaced while the request was in
                    // flight; the response belongs to the old identity.
                    log::warn!(
                        "discarding stale save response for form '{}'",
                        snapshot_id
                    );
                    return Err(PersistenceError::Conflict);
                }
                log::debug!("saved form as '{}'", canonical.id);
                self.config = canonical.to_config();
                self.record = Some(canonical);
                self.persisted = true;
                self.dirty = false;
                self.drafts.clear()?;
                Ok(outcome)
            }
            Err(error) => {
                log::warn!("save failed, keeping local draft: {}", error);
                Err(PersistenceError::Store(error))
            }
        }
    }

    fn write_draft(&mut self) -> Result<(), PersistenceError> {
        let entry = DraftEntry {
            config: self.config.clone(),
            timestamp: Utc::now().timestamp_millis(),
            is_new: !self.persisted,
        };
        self.drafts.put(&entry)?;
        Ok(())
    }
}
