//! The form configuration model: form → steps → fields.
//!
//! The form exclusively owns its steps and each step its fields; a field
//! back-references its step by id only. All structural mutation goes through
//! [`FormBuilder`](crate::builder::FormBuilder), which keeps the ordering and
//! back-reference invariants intact.

pub mod convert;
mod field;
mod form;
mod logic;
mod step;
mod validation;
mod value;

pub use field::*;
pub use form::*;
pub use logic::*;
pub use step::*;
pub use validation::*;
pub use value::*;
