//! Conditional field behavior: pure evaluation of a field's logic block
//! against the current form values (keyed by field id).
//!
//! `show`/`hide` resolve to visibility. `require` and `disable` do not touch
//! visibility; they resolve to overrides that the validation engine and the
//! rendering layer consume. Fields without logic, or with disabled logic,
//! get the default state.

mod rules;

pub use rules::{evaluate_rule, rules_match};

use crate::model::{FormField, LogicAction, ValueMap};

/// The resolved conditional state of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldState {
    pub visible: bool,
    /// `Some(true)` forces the field to be required regardless of its
    /// validation rules; `None` defers to them.
    pub required_override: Option<bool>,
    /// `Some(true)` disables the field in the rendering layer.
    pub disabled_override: Option<bool>,
}

impl Default for FieldState {
    fn default() -> Self {
        Self {
            visible: true,
            required_override: None,
            disabled_override: None,
        }
    }
}

/// Resolves a field's conditional state against the current values.
pub fn field_state(field: &FormField, values: &ValueMap) -> FieldState {
    let Some(logic) = &field.conditional_logic else {
        return FieldState::default();
    };
    if !logic.enabled || logic.rules.is_empty() {
        return FieldState::default();
    }

    let matched = rules_match(logic, values);
    match logic.action {
        LogicAction::Show => FieldState {
            visible: matched,
            ..FieldState::default()
        },
        LogicAction::Hide => FieldState {
            visible: !matched,
            ..FieldState::default()
        },
        LogicAction::Require => FieldState {
            required_override: matched.then_some(true),
            ..FieldState::default()
        },
        LogicAction::Disable => FieldState {
            disabled_override: matched.then_some(true),
            ..FieldState::default()
        },
    }
}

/// Visibility alone, for callers that only render.
pub fn is_visible(field: &FormField, values: &ValueMap) -> bool {
    field_state(field, values).visible
}
