use ahash::AHashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{FieldType, FormField, FormStep};
use crate::id::IdGenerator;

/// A form never holds more steps than this; `add_step` refuses beyond it.
pub const MAX_STEPS: usize = 10;

/// Arrangement of fields on a rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FormLayout {
    #[default]
    Vertical,
    Horizontal,
}

/// Vertical rhythm of a rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FormSpacing {
    Compact,
    #[default]
    Normal,
    Relaxed,
}

/// The in-memory form configuration tree: form → steps → fields.
///
/// Invariants maintained by the builder: between one and [`MAX_STEPS`] steps,
/// step and field `order` values contiguous from zero, and every field's
/// `step_id` matching its owning step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfig {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub layout: FormLayout,
    #[serde(default)]
    pub spacing: FormSpacing,
    pub steps: Vec<FormStep>,
}

impl FormConfig {
    /// A fresh form: default title, one empty step, no fields.
    pub fn empty(ids: &mut IdGenerator) -> Self {
        let first = FormStep::new(ids.step_id(), "Step 1", 0);
        Self {
            id: ids.form_id(),
            title: "New form".to_string(),
            description: None,
            layout: FormLayout::default(),
            spacing: FormSpacing::default(),
            steps: vec![first],
        }
    }

    pub fn find_step(&self, step_id: &str) -> Option<&FormStep> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    pub fn find_step_mut(&mut self, step_id: &str) -> Option<&mut FormStep> {
        self.steps.iter_mut().find(|s| s.id == step_id)
    }

    pub fn find_field(&self, field_id: &str) -> Option<&FormField> {
        self.steps.iter().find_map(|s| s.find_field(field_id))
    }

    pub fn find_field_mut(&mut self, field_id: &str) -> Option<&mut FormField> {
        self.steps.iter_mut().find_map(|s| s.find_field_mut(field_id))
    }

    /// The step owning `field_id`.
    pub fn step_of_field(&self, field_id: &str) -> Option<&FormStep> {
        self.steps.iter().find(|s| s.find_field(field_id).is_some())
    }

    /// All fields across all steps, in step order then field order.
    pub fn all_fields(&self) -> impl Iterator<Item = &FormField> {
        self.steps.iter().flat_map(|s| s.fields.iter())
    }

    /// Field id → data-binding name, for resolving verification mappings.
    pub fn field_name_index(&self) -> AHashMap<String, String> {
        self.all_fields()
            .map(|f| (f.id.clone(), f.name.clone()))
            .collect()
    }

    /// Whether any field across the form already uses `name` as its
    /// data-binding key.
    pub fn name_in_use(&self, name: &str) -> bool {
        self.all_fields().any(|f| f.name == name)
    }

    pub fn stats(&self) -> FormStats {
        let total_fields = self.all_fields().count();
        let required_fields = self.all_fields().filter(|f| f.is_required()).count();
        let field_types: AHashMap<FieldType, usize> = self
            .all_fields()
            .counts_by(|f| f.field_type)
            .into_iter()
            .collect();
        let verified_steps = self
            .steps
            .iter()
            .filter(|s| s.verification.as_ref().is_some_and(|v| v.is_active()))
            .count();
        let avg_fields_per_step = if total_fields > 0 {
            (total_fields as f64 / self.steps.len() as f64).round() as usize
        } else {
            0
        };
        FormStats {
            total_steps: self.steps.len(),
            total_fields,
            required_fields,
            optional_fields: total_fields - required_fields,
            field_types,
            verified_steps,
            avg_fields_per_step,
        }
    }
}

/// Aggregate counts over a configuration, for dashboards and previews.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormStats {
    pub total_steps: usize,
    pub total_fields: usize,
    pub required_fields: usize,
    pub optional_fields: usize,
    pub field_types: AHashMap<FieldType, usize>,
    pub verified_steps: usize,
    pub avg_fields_per_step: usize,
}
