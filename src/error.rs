use thiserror::Error;

use crate::model::{FieldType, TypeAttributes};

/// Errors raised when constructing model values that violate type rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("attributes '{kind}' are not valid for a '{field_type}' field")]
    AttributeMismatch {
        field_type: FieldType,
        kind: &'static str,
    },
}

impl ModelError {
    pub(crate) fn attribute_mismatch(field_type: FieldType, attributes: &TypeAttributes) -> Self {
        ModelError::AttributeMismatch {
            field_type,
            kind: attributes.kind(),
        }
    }
}

/// Errors raised by the structural mutation operations of the [`FormBuilder`].
///
/// Every operation reports what kept it from applying instead of silently
/// doing nothing, so callers can tell "already correct" apart from "dangling
/// reference".
///
/// [`FormBuilder`]: crate::builder::FormBuilder
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    #[error("step '{0}' was not found in the form")]
    StepNotFound(String),

    #[error("field '{0}' was not found in any step")]
    FieldNotFound(String),

    #[error("a form cannot have more than {0} steps")]
    StepLimitReached(usize),

    #[error("the last remaining step cannot be deleted")]
    LastStep,

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Errors raised when importing a form configuration from external JSON.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration is structurally invalid: {}", problems.join("; "))]
    Shape { problems: Vec<String> },
}

/// Errors surfaced by the external HTTP gateway collaborator.
///
/// `Http` carries the status class the protocol interprets; everything the
/// transport cannot attribute to a response collapses into `Transport`.
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("request rejected"))]
    Http {
        status: u16,
        message: Option<String>,
        payload: Option<serde_json::Value>,
    },

    #[error("transport error: {0}")]
    Transport(String),
}

/// Errors raised by the step verification session itself.
///
/// Gateway failures are not errors at this level; they resolve into a
/// [`VerificationOutcome`](crate::verification::VerificationOutcome).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("a verification attempt is already running for this session")]
    AlreadyRunning,

    #[error("step '{0}' was not found in the form")]
    StepNotFound(String),
}

/// Errors reported by a [`FormStore`](crate::persistence::FormStore)
/// implementation.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("record '{0}' was not found")]
    NotFound(String),

    #[error("the store rejected the record: {0}")]
    Rejected(String),

    #[error("the store is unavailable: {0}")]
    Unavailable(String),
}

/// Errors reported by a [`DraftStore`](crate::persistence::DraftStore)
/// implementation.
#[derive(Error, Debug)]
pub enum DraftError {
    #[error("could not access the draft cache: {0}")]
    Io(#[from] std::io::Error),

    #[error("the cached draft could not be decoded: {0}")]
    Codec(String),
}

/// Errors propagated to the caller by the persistence bridge.
///
/// These are the only failures in the crate that are meant to be *thrown*:
/// the caller decides whether to retry, back off, or fall back to the local
/// draft.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("form '{0}' was not found")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("the form changed while a save was in flight; the stale response was discarded")]
    Conflict,
}
