//! Prelude module for convenient imports
//!
//! Re-exports the types and functions most callers need, so one import
//! covers building, evaluating, validating, verifying, and persisting a
//! form.
//!
//! # Example
//!
//! ```rust
//! use yoshiki::prelude::*;
//!
//! let mut builder = FormBuilder::new();
//! let field = builder
//!     .add_field(FieldDraft::new(FieldType::Text, "nickname", "Nickname"), None)
//!     .map(|f| f.id.clone());
//! assert!(field.is_ok());
//! ```

// Building
pub use crate::builder::{FieldPatch, FieldRow, FormBuilder, pack_rows};
pub use crate::id::IdGenerator;
pub use crate::registry::{FieldCategory, FieldTemplate, TemplateRegistry};

// Model
pub use crate::model::{
    ConditionalLogic, FieldDraft, FieldOption, FieldType, FieldValidation, FieldWidth,
    FormConfig, FormField, FormStep, StepVerification, TypeAttributes, Value, ValueMap,
};

// Conditional evaluation
pub use crate::condition::{FieldState, field_state, is_visible};

// Validation
pub use crate::validation::{
    ValidationReport, form_completion, step_completion, validate_field, validate_form,
};

// Verification
pub use crate::verification::{
    GatewayRequest, GatewayResponse, HttpGateway, VerificationOutcome, VerificationSession,
    VerificationStatus,
};

// Persistence
pub use crate::persistence::{
    DraftEntry, DraftStore, FormRecord, FormStore, MemoryDraftStore, PersistenceBridge,
    SaveOutcome,
};

// Error types
pub use crate::error::{
    BuilderError, GatewayError, ImportError, PersistenceError, StoreError, VerificationError,
};
