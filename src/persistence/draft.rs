//! The bridge-local draft cache.
//!
//! A draft is a point-in-time copy of the in-memory configuration, written
//! through on every mutation so a crash or reload loses nothing. It is read
//! exactly once, at initialization, and cleared by a successful save.

use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::DraftError;
use crate::model::FormConfig;

/// The fixed key drafts live under.
pub const DRAFT_KEY: &str = "form-builder-draft";

/// One cached draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftEntry {
    pub config: FormConfig,
    /// Write time, epoch milliseconds; stale drafts are ignored.
    pub timestamp: i64,
    /// Whether the cached form has never been persisted to the primary
    /// store.
    pub is_new: bool,
}

/// Process-local key-value store holding at most one draft.
pub trait DraftStore {
    fn put(&mut self, entry: &DraftEntry) -> Result<(), DraftError>;
    fn get(&self) -> Result<Option<DraftEntry>, DraftError>;
    fn clear(&mut self) -> Result<(), DraftError>;
}

/// In-memory draft store; the default, and what tests use.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    entry: Option<DraftEntry>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DraftStore for MemoryDraftStore {
    fn put(&mut self, entry: &DraftEntry) -> Result<(), DraftError> {
        self.entry = Some(entry.clone());
        Ok(())
    }

    fn get(&self) -> Result<Option<DraftEntry>, DraftError> {
        Ok(self.entry.clone())
    }

    fn clear(&mut self) -> Result<(), DraftError> {
        self.entry = None;
        Ok(())
    }
}

/// Draft store backed by a JSON file, for drafts that must survive the
/// process. JSON keeps the cached draft in the same shape the model already
/// serializes to, and readable when debugging a recovery.
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    /// Stores the draft under `dir`, named by [`DRAFT_KEY`].
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let mut path = dir.into();
        path.push(format!("{}.json", DRAFT_KEY));
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl DraftStore for FileDraftStore {
    fn put(&mut self, entry: &DraftEntry) -> Result<(), DraftError> {
        let bytes =
            serde_json::to_vec(entry).map_err(|e| DraftError::Codec(e.to_string()))?;
        let mut file = fs::File::create(&self.path)?;
        file.write_all(&bytes)?;
        Ok(())
    }

    fn get(&self) -> Result<Option<DraftEntry>, DraftError> {
        let mut file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        let entry =
            serde_json::from_slice(&bytes).map_err(|e| DraftError::Codec(e.to_string()))?;
        Ok(Some(entry))
    }

    fn clear(&mut self) -> Result<(), DraftError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
