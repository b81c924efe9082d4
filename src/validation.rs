//! Per-field and per-form validation of submitted values.
//!
//! Validation never throws: failures come back as message lists keyed by
//! field id. Form-level validation consults the conditional evaluator, so
//! hidden fields are exempt and `require`-action overrides are honored.

use std::sync::OnceLock;

use ahash::AHashMap;
use regex::Regex;

use crate::condition::field_state;
use crate::model::{FieldValidation, FormConfig, FormField, FormStep, Value, ValueMap};

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

/// The outcome of validating a whole form.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Failed fields, by id. Fields without errors do not appear.
    pub errors: AHashMap<String, Vec<String>>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors_for(&self, field_id: &str) -> &[String] {
        self.errors.get(field_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Validates one value against one field's rules.
///
/// `None` stands for a value the user never provided. Fields without rules
/// accept anything; optional-and-empty is always valid.
pub fn validate_field(field: &FormField, value: Option<&Value>) -> Vec<String> {
    validate_with(field, value, field.is_required())
}

fn validate_with(field: &FormField, value: Option<&Value>, required: bool) -> Vec<String> {
    let mut errors = Vec::new();
    let rules = field.validation.clone().unwrap_or_default();
    if field.validation.is_none() && !required {
        return errors;
    }

    let missing = value.is_none_or(Value::is_empty);
    if required && missing {
        errors.push("This field is required".to_string());
    }
    if missing {
        // Optional and empty: nothing further to check.
        return errors;
    }
    let value = value.unwrap_or(&Value::Null);

    if let Value::Text(text) = value {
        check_text(text, &rules, &mut errors);
    }
    if let Some(number) = value.as_number() {
        check_bounds(number, &rules, &mut errors);
    }

    errors
}

fn check_text(text: &str, rules: &FieldValidation, errors: &mut Vec<String>) {
    let length = text.chars().count() as u32;
    if let Some(min) = rules.min_length {
        if length < min {
            errors.push(format!("At least {} characters required", min));
        }
    }
    if let Some(max) = rules.max_length {
        if length > max {
            errors.push(format!("At most {} characters allowed", max));
        }
    }
    if rules.email && !email_regex().is_match(text) {
        errors.push("Invalid email format".to_string());
    }
    if let Some(pattern) = &rules.pattern {
        match Regex::new(pattern) {
            Ok(re) => {
                if !re.is_match(text) {
                    errors.push("Invalid format".to_string());
                }
            }
            Err(err) => {
                log::warn!("unusable validation pattern '{}': {}", pattern, err);
                errors.push("Invalid validation pattern".to_string());
            }
        }
    }
}

fn check_bounds(number: f64, rules: &FieldValidation, errors: &mut Vec<String>) {
    if let Some(min) = rules.min {
        if number < min {
            errors.push(format!("Minimum value: {}", min));
        }
    }
    if let Some(max) = rules.max {
        if number > max {
            errors.push(format!("Maximum value: {}", max));
        }
    }
}

/// Validates every currently-visible field of the form.
///
/// `values` is keyed by field id. Hidden fields are exempt from all checks;
/// a matching `require` action makes a field required even when its own
/// rules do not.
pub fn validate_form(config: &FormConfig, values: &ValueMap) -> ValidationReport {
    let mut report = ValidationReport::default();

    for step in &config.steps {
        for field in &step.fields {
            let state = field_state(field, values);
            if !state.visible {
                continue;
            }
            let required = state.required_override.unwrap_or(field.is_required());
            let errors = validate_with(field, values.get(&field.id), required);
            if !errors.is_empty() {
                report.errors.insert(field.id.clone(), errors);
            }
        }
    }

    report
}

/// Percentage of required fields across the form holding a value, rounded
/// to the nearest integer. A form without required fields is 100% complete.
pub fn form_completion(config: &FormConfig, values: &ValueMap) -> u8 {
    completion(config.all_fields(), values)
}

/// Like [`form_completion`], restricted to one step.
pub fn step_completion(step: &FormStep, values: &ValueMap) -> u8 {
    completion(step.fields.iter(), values)
}

fn completion<'a>(fields: impl Iterator<Item = &'a FormField>, values: &ValueMap) -> u8 {
    let required: Vec<&FormField> = fields.filter(|f| f.is_required()).collect();
    if required.is_empty() {
        return 100;
    }
    let filled = required
        .iter()
        .filter(|f| values.get(&f.id).is_some_and(|v| !v.is_blank()))
        .count();
    ((filled as f64 / required.len() as f64) * 100.0).round() as u8
}
