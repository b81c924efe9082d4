//! Common test utilities for building form configurations and collaborator
//! doubles.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use ahash::AHashMap;
use async_trait::async_trait;
use yoshiki::error::{GatewayError, StoreError};
use yoshiki::persistence::{FormRecord, FormStore};
use yoshiki::prelude::*;

/// A builder holding one step with a text field and a number field.
#[allow(dead_code)]
pub fn sample_builder() -> FormBuilder {
    let mut builder = FormBuilder::new();
    builder
        .add_field(FieldDraft::new(FieldType::Text, "first_name", "First name"), None)
        .unwrap();
    builder
        .add_field(FieldDraft::new(FieldType::Number, "age", "Age"), None)
        .unwrap();
    builder
}

#[allow(dead_code)]
pub fn text_draft(name: &str) -> FieldDraft {
    FieldDraft::new(FieldType::Text, name, name)
}

#[allow(dead_code)]
pub fn required_text(name: &str) -> FieldDraft {
    FieldDraft::new(FieldType::Text, name, name).with_validation(FieldValidation::required())
}

/// The id of the `index`-th field of the `step`-th step.
#[allow(dead_code)]
pub fn field_id(builder: &FormBuilder, step: usize, index: usize) -> String {
    builder.config().steps[step].fields[index].id.clone()
}

/// Orders of a step's fields, in storage order.
#[allow(dead_code)]
pub fn orders(builder: &FormBuilder, step: usize) -> Vec<u32> {
    builder.config().steps[step]
        .fields
        .iter()
        .map(|f| f.order)
        .collect()
}

/// A gateway double that answers from a script and counts dispatches.
#[allow(dead_code)]
pub struct MockGateway {
    responses: Mutex<Vec<Result<GatewayResponse, GatewayError>>>,
    pub calls: AtomicUsize,
    pub last_request: Mutex<Option<GatewayRequest>>,
}

#[allow(dead_code)]
impl MockGateway {
    pub fn new(responses: Vec<Result<GatewayResponse, GatewayError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn succeeding() -> Self {
        Self::new(vec![Ok(GatewayResponse::ok())])
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpGateway for MockGateway {
    async fn dispatch(&self, request: GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);
        self.responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Ok(GatewayResponse::ok()))
    }
}

/// An in-memory primary store that assigns canonical `db_n` ids on create,
/// the way a real backend replaces locally-minted ids.
#[allow(dead_code)]
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<AHashMap<String, FormRecord>>,
    next_id: AtomicUsize,
    pub fail_next: Mutex<Option<StoreError>>,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn take_failure(&self) -> Option<StoreError> {
        self.fail_next.lock().unwrap().take()
    }
}

#[async_trait]
impl FormStore for MemoryStore {
    async fn fetch(&self, id: &str) -> Result<FormRecord, StoreError> {
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        self.records
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create(&self, mut record: FormRecord) -> Result<FormRecord, StoreError> {
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        record.id = format!("db_{}", n);
        self.records
            .lock()
            .unwrap()
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn update(&self, id: &str, record: FormRecord) -> Result<FormRecord, StoreError> {
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        let mut records = self.records.lock().unwrap();
        if !records.contains_key(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        records.insert(id.to_string(), record.clone());
        Ok(record)
    }
}
