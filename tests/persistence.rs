//! Tests for the persistence bridge, draft cache, and save coalescing.
mod common;
use common::*;
use yoshiki::error::{PersistenceError, StoreError};
use yoshiki::persistence::{FileDraftStore, SaveQueue};
use yoshiki::prelude::*;

fn bridge() -> PersistenceBridge<MemoryStore, MemoryDraftStore> {
    PersistenceBridge::new(MemoryStore::new(), MemoryDraftStore::new(), "user_1")
}

#[test]
fn initialize_creates_a_default_form_and_draft() {
    let mut bridge = bridge();
    bridge.initialize().unwrap();

    assert_eq!(bridge.config().steps.len(), 1);
    assert!(bridge.config().steps[0].fields.is_empty());
    assert!(bridge.has_unsaved_changes());
    assert!(!bridge.is_persisted());
}

#[test]
fn initialize_hydrates_a_fresh_draft() {
    let mut drafts = MemoryDraftStore::new();
    let mut builder = FormBuilder::new();
    builder
        .add_field(FieldDraft::new(FieldType::Text, "kept", "Kept"), None)
        .unwrap();
    drafts
        .put(&DraftEntry {
            config: builder.config().clone(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            is_new: true,
        })
        .unwrap();

    let mut bridge = PersistenceBridge::new(MemoryStore::new(), drafts, "user_1");
    bridge.initialize().unwrap();

    assert_eq!(bridge.config().steps[0].fields[0].name, "kept");
    assert!(bridge.has_unsaved_changes());
}

#[test]
fn initialize_ignores_a_stale_draft() {
    let mut drafts = MemoryDraftStore::new();
    let mut builder = FormBuilder::new();
    builder
        .add_field(FieldDraft::new(FieldType::Text, "stale", "Stale"), None)
        .unwrap();
    drafts
        .put(&DraftEntry {
            config: builder.config().clone(),
            timestamp: chrono::Utc::now().timestamp_millis() - 10_000,
            is_new: true,
        })
        .unwrap();

    let mut bridge =
        PersistenceBridge::new(MemoryStore::new(), drafts, "user_1").with_staleness_ms(1_000);
    bridge.initialize().unwrap();

    assert!(bridge.config().steps[0].fields.is_empty());
}

#[tokio::test]
async fn save_creates_then_adopts_the_canonical_id() {
    let mut bridge = bridge();
    bridge.initialize().unwrap();
    let local_id = bridge.config().id.clone();
    assert!(local_id.starts_with("form_"));

    let outcome = bridge.save().await.unwrap();
    assert_eq!(outcome, SaveOutcome::Created);
    // The store is authoritative for the final id.
    assert_eq!(bridge.config().id, "db_1");
    assert!(bridge.is_persisted());
    assert!(!bridge.has_unsaved_changes());
}

#[tokio::test]
async fn second_save_updates_under_the_same_identity() {
    let mut bridge = bridge();
    bridge.initialize().unwrap();
    bridge.save().await.unwrap();

    let mut config = bridge.config().clone();
    config.title = "Renamed".to_string();
    bridge.touch(&config).unwrap();
    assert!(bridge.has_unsaved_changes());

    let outcome = bridge.save().await.unwrap();
    assert_eq!(outcome, SaveOutcome::Updated);
    assert_eq!(bridge.config().id, "db_1");
    assert_eq!(bridge.config().title, "Renamed");
    assert!(!bridge.has_unsaved_changes());
}

#[tokio::test]
async fn failed_save_keeps_the_draft_and_surfaces_the_error() {
    let store = MemoryStore::new();
    *store.fail_next.lock().unwrap() =
        Some(StoreError::Unavailable("maintenance window".to_string()));

    let mut bridge = PersistenceBridge::new(store, MemoryDraftStore::new(), "user_1");
    bridge.initialize().unwrap();

    let result = bridge.save().await;
    assert!(matches!(result, Err(PersistenceError::Store(_))));
    assert!(bridge.has_unsaved_changes());
    assert!(!bridge.is_persisted());

    // The store recovered; the next save goes through.
    assert_eq!(bridge.save().await.unwrap(), SaveOutcome::Created);
}

#[tokio::test]
async fn load_replaces_the_model_and_marks_clean() {
    let mut bridge = bridge();
    bridge.initialize().unwrap();
    bridge.save().await.unwrap();
    let saved_id = bridge.config().id.clone();

    // Local edits after the save...
    let mut config = bridge.config().clone();
    config.title = "Scratch".to_string();
    bridge.touch(&config).unwrap();

    // ...are discarded by a reload of the stored record.
    bridge.load(&saved_id).await.unwrap();
    assert_ne!(bridge.config().title, "Scratch");
    assert!(!bridge.has_unsaved_changes());
}

#[tokio::test]
async fn load_of_unknown_id_reports_not_found() {
    let mut bridge = bridge();
    bridge.initialize().unwrap();
    let result = bridge.load("db_404").await;
    assert!(matches!(result, Err(PersistenceError::NotFound(id)) if id == "db_404"));
}

#[test]
fn save_queue_runs_the_first_and_coalesces_the_rest() {
    let mut queue = SaveQueue::new();
    assert!(queue.begin());
    assert!(queue.is_in_flight());

    // Three requests during the in-flight save fold into one rerun.
    assert!(!queue.begin());
    assert!(!queue.begin());
    assert!(!queue.begin());

    assert!(queue.finish());
    assert!(queue.is_in_flight());
    assert!(!queue.finish());
    assert!(!queue.is_in_flight());
}

#[test]
fn file_draft_store_round_trips() {
    let dir = std::env::temp_dir().join(format!("yoshiki-draft-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let mut store = FileDraftStore::new(&dir);

    assert!(store.get().unwrap().is_none());

    let mut builder = FormBuilder::new();
    builder
        .add_field(FieldDraft::new(FieldType::Text, "persisted", "Persisted"), None)
        .unwrap();
    let entry = DraftEntry {
        config: builder.config().clone(),
        timestamp: 1_700_000_000_000,
        is_new: true,
    };
    store.put(&entry).unwrap();

    let loaded = store.get().unwrap().unwrap();
    assert_eq!(loaded, entry);

    store.clear().unwrap();
    assert!(store.get().unwrap().is_none());
    std::fs::remove_dir_all(&dir).unwrap();
}
