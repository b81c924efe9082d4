//! # Yoshiki - Dynamic Form Configuration Engine
//!
//! **Yoshiki** models a multi-step form as a tree of steps and fields,
//! mutates it through an invariant-preserving builder, evaluates conditional
//! field visibility, validates submitted values, and optionally gates step
//! progression on an external HTTP check. Rendering, routing, and the
//! concrete storage backend stay outside: the crate talks to them through
//! the [`HttpGateway`](verification::HttpGateway) and
//! [`FormStore`](persistence::FormStore) collaborator traits.
//!
//! ## Core Workflow
//!
//! 1.  **Build**: create a [`FormBuilder`](builder::FormBuilder) and shape
//!     the form through its operations; steps and fields stay correctly
//!     ordered and back-referenced no matter the call sequence.
//! 2.  **Evaluate**: resolve each field's conditional state against the
//!     current values with [`condition::field_state`].
//! 3.  **Validate**: check submitted values with
//!     [`validation::validate_form`]; hidden fields are exempt.
//! 4.  **Verify**: before leaving a step with an external check, run it
//!     through a [`VerificationSession`](verification::VerificationSession).
//! 5.  **Persist**: hand the configuration to a
//!     [`PersistenceBridge`](persistence::PersistenceBridge) for draft
//!     caching and store round-trips.
//!
//! ## Quick Start
//!
//! ```rust
//! use yoshiki::prelude::*;
//! use yoshiki::model::{ConditionalRule, LogicAction, RuleOperator};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut builder = FormBuilder::new();
//!
//!     // A country selector, and an email field only shown for one answer.
//!     let country = builder
//!         .add_field(
//!             FieldDraft::new(FieldType::Select, "country", "Country")
//!                 .with_options(vec![
//!                     FieldOption::new("France", "fr"),
//!                     FieldOption::new("Other", "other"),
//!                 ]),
//!             None,
//!         )?
//!         .id
//!         .clone();
//!
//!     builder.add_field(
//!         FieldDraft::new(FieldType::Email, "contact", "Contact email")
//!             .with_validation(FieldValidation::email())
//!             .with_logic(ConditionalLogic::single(
//!                 LogicAction::Show,
//!                 ConditionalRule {
//!                     target_field_id: country.clone(),
//!                     operator: RuleOperator::Equals,
//!                     value: Value::from("fr"),
//!                 },
//!             )),
//!         None,
//!     )?;
//!
//!     // The email field only participates in validation when visible.
//!     let mut values = ValueMap::new();
//!     values.insert(country, Value::from("other"));
//!     let report = validate_form(builder.config(), &values);
//!     assert!(report.is_valid());
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod condition;
pub mod error;
pub mod id;
pub mod model;
pub mod persistence;
pub mod prelude;
pub mod registry;
pub mod validation;
pub mod verification;
