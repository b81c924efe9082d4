//! Structural mutation of the configuration model.
//!
//! Every add/update/delete/duplicate/reorder goes through [`FormBuilder`],
//! which re-establishes the ordering invariants (contiguous `order` values,
//! consistent `step_id` back-references) after each operation. Operations
//! return explicit errors for dangling references and structural limits so
//! callers can tell the difference; a UI that prefers silent retries can
//! ignore them.

mod layout;

pub use layout::{FieldRow, pack_rows};

use crate::error::{BuilderError, ModelError};
use crate::id::IdGenerator;
use crate::model::{
    ConditionalLogic, FieldDraft, FieldOption, FieldValidation, FieldWidth, FormConfig,
    FormField, FormStep, MAX_STEPS, OptionSource, StepVerification, TypeAttributes, Value,
};

/// The mutation engine over a [`FormConfig`].
///
/// Owns the configuration, the id generator, the active step index, and the
/// current field selection, i.e. the ambient state a builder UI needs.
pub struct FormBuilder {
    config: FormConfig,
    ids: IdGenerator,
    active_step: usize,
    selected_field: Option<String>,
}

impl FormBuilder {
    /// Starts from a fresh default form: one empty step, nothing selected.
    pub fn new() -> Self {
        let mut ids = IdGenerator::new();
        let config = FormConfig::empty(&mut ids);
        Self {
            config,
            ids,
            active_step: 0,
            selected_field: None,
        }
    }

    /// Wraps an existing configuration, e.g. one hydrated from storage.
    pub fn with_config(config: FormConfig) -> Self {
        Self {
            config,
            ids: IdGenerator::new(),
            active_step: 0,
            selected_field: None,
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn into_config(self) -> FormConfig {
        self.config
    }

    pub fn active_step(&self) -> &FormStep {
        // The 1..=MAX_STEPS invariant guarantees the index is in bounds.
        &self.config.steps[self.active_step]
    }

    pub fn active_step_index(&self) -> usize {
        self.active_step
    }

    pub fn set_active_step(&mut self, index: usize) {
        self.active_step = index.min(self.config.steps.len() - 1);
    }

    pub fn selected_field(&self) -> Option<&str> {
        self.selected_field.as_deref()
    }

    pub fn select_field(&mut self, field_id: Option<String>) {
        self.selected_field = field_id;
    }

    /// Replaces the whole configuration, e.g. on import or load.
    pub fn replace(&mut self, config: FormConfig) {
        self.config = config;
        self.active_step = 0;
        self.selected_field = None;
    }

    /// Discards the configuration for a fresh default form.
    pub fn reset(&mut self) {
        self.config = FormConfig::empty(&mut self.ids);
        self.active_step = 0;
        self.selected_field = None;
    }

    // --- Step operations ---

    /// Appends a step with the next order index and makes it active.
    pub fn add_step(&mut self) -> Result<&FormStep, BuilderError> {
        if self.config.steps.len() >= MAX_STEPS {
            return Err(BuilderError::StepLimitReached(MAX_STEPS));
        }
        let order = self.config.steps.len() as u32;
        let title = format!("Step {}", order + 1);
        let step = FormStep::new(self.ids.step_id(), title, order);
        self.config.steps.push(step);
        self.active_step = self.config.steps.len() - 1;
        Ok(&self.config.steps[self.active_step])
    }

    /// Removes a step and renumbers the rest. The last remaining step can
    /// never be deleted.
    pub fn delete_step(&mut self, step_id: &str) -> Result<(), BuilderError> {
        let index = self.step_index(step_id)?;
        if self.config.steps.len() == 1 {
            return Err(BuilderError::LastStep);
        }
        self.config.steps.remove(index);
        renumber_steps(&mut self.config.steps);
        if self.active_step >= self.config.steps.len() {
            self.active_step = self.config.steps.len() - 1;
        }
        Ok(())
    }

    pub fn update_step_title(
        &mut self,
        step_id: &str,
        title: impl Into<String>,
        description: Option<String>,
    ) -> Result<(), BuilderError> {
        let step = self
            .config
            .find_step_mut(step_id)
            .ok_or_else(|| BuilderError::StepNotFound(step_id.to_string()))?;
        step.title = title.into();
        if let Some(text) = description {
            step.description = if text.is_empty() { None } else { Some(text) };
        }
        Ok(())
    }

    /// Sets or clears a step's external verification configuration.
    pub fn update_step_verification(
        &mut self,
        step_id: &str,
        verification: Option<StepVerification>,
    ) -> Result<(), BuilderError> {
        let step = self
            .config
            .find_step_mut(step_id)
            .ok_or_else(|| BuilderError::StepNotFound(step_id.to_string()))?;
        step.verification = verification;
        Ok(())
    }

    /// Clones a step with fresh ids directly after the source and makes the
    /// clone active.
    pub fn duplicate_step(&mut self, step_id: &str) -> Result<String, BuilderError> {
        if self.config.steps.len() >= MAX_STEPS {
            return Err(BuilderError::StepLimitReached(MAX_STEPS));
        }
        let index = self.step_index(step_id)?;

        let mut clone = self.config.steps[index].clone();
        clone.id = self.ids.step_id();
        clone.title = format!("{} (copy)", clone.title);
        for field in &mut clone.fields {
            field.id = self.ids.field_id();
            field.step_id = clone.id.clone();
        }
        let clone_id = clone.id.clone();

        self.config.steps.insert(index + 1, clone);
        renumber_steps(&mut self.config.steps);
        self.active_step = index + 1;
        Ok(clone_id)
    }

    // --- Field operations ---

    /// Creates a field on the active step from a draft and selects it.
    ///
    /// Without `position` the field lands at the end of the step; with it,
    /// the field is spliced in and every following field shifts by one.
    pub fn add_field(
        &mut self,
        draft: FieldDraft,
        position: Option<usize>,
    ) -> Result<&FormField, BuilderError> {
        let id = self.ids.field_id();
        let step = &mut self.config.steps[self.active_step];
        let index = position.unwrap_or(step.fields.len()).min(step.fields.len());

        let field = FormField::from_draft(draft, id.clone(), step.id.clone(), index as u32)?;
        step.fields.insert(index, field);
        renumber_fields(&mut step.fields);

        self.selected_field = Some(id);
        Ok(&self.config.steps[self.active_step].fields[index])
    }

    /// Merges a patch into a field. A changed `order` re-sorts and renumbers
    /// the owning step's fields.
    pub fn update_field(
        &mut self,
        field_id: &str,
        patch: FieldPatch,
    ) -> Result<(), BuilderError> {
        let order_changed = patch.order.is_some();
        let step_id = {
            let field = self
                .config
                .find_field_mut(field_id)
                .ok_or_else(|| BuilderError::FieldNotFound(field_id.to_string()))?;
            patch.apply(field)?;
            field.step_id.clone()
        };
        if order_changed {
            self.reorder_fields(&step_id)?;
        }
        Ok(())
    }

    /// Removes a field, renumbers its step, and drops the selection if the
    /// deleted field was selected.
    pub fn delete_field(&mut self, field_id: &str) -> Result<(), BuilderError> {
        let step = self
            .config
            .steps
            .iter_mut()
            .find(|s| s.find_field(field_id).is_some())
            .ok_or_else(|| BuilderError::FieldNotFound(field_id.to_string()))?;

        step.fields.retain(|f| f.id != field_id);
        renumber_fields(&mut step.fields);

        if self.selected_field.as_deref() == Some(field_id) {
            self.selected_field = None;
        }
        Ok(())
    }

    /// Clones a field directly after its source with a fresh id, a
    /// "(copy)" label suffix, and a name no other field uses.
    pub fn duplicate_field(&mut self, field_id: &str) -> Result<String, BuilderError> {
        let source = self
            .config
            .find_field(field_id)
            .ok_or_else(|| BuilderError::FieldNotFound(field_id.to_string()))?;

        let mut clone = source.clone();
        clone.id = self.ids.field_id();
        clone.label = format!("{} (copy)", clone.label);
        clone.name = self.disambiguate_name(&clone.name);
        let clone_id = clone.id.clone();
        let step_id = clone.step_id.clone();

        let step = self
            .config
            .find_step_mut(&step_id)
            .ok_or_else(|| BuilderError::StepNotFound(step_id.clone()))?;
        let index = step
            .fields
            .iter()
            .position(|f| f.id == field_id)
            .unwrap_or(step.fields.len());
        step.fields.insert(index + 1, clone);
        renumber_fields(&mut step.fields);

        self.selected_field = Some(clone_id.clone());
        Ok(clone_id)
    }

    /// Normalizes a step's field ordering: stable sort by the current
    /// `order`, then reassign 0..n-1. Idempotent.
    pub fn reorder_fields(&mut self, step_id: &str) -> Result<(), BuilderError> {
        let step = self
            .config
            .find_step_mut(step_id)
            .ok_or_else(|| BuilderError::StepNotFound(step_id.to_string()))?;
        step.fields.sort_by_key(|f| f.order);
        renumber_fields(&mut step.fields);
        Ok(())
    }

    /// Packs a step's fields into visual rows by accumulated width.
    /// Layout-only; nothing is persisted.
    pub fn organize_fields_by_width(
        &self,
        step_id: &str,
    ) -> Result<Vec<FieldRow>, BuilderError> {
        let step = self
            .config
            .find_step(step_id)
            .ok_or_else(|| BuilderError::StepNotFound(step_id.to_string()))?;
        Ok(pack_rows(&step.fields))
    }

    fn step_index(&self, step_id: &str) -> Result<usize, BuilderError> {
        self.config
            .steps
            .iter()
            .position(|s| s.id == step_id)
            .ok_or_else(|| BuilderError::StepNotFound(step_id.to_string()))
    }

    /// `name` if free, otherwise `name_copy`, `name_copy2`, ...
    fn disambiguate_name(&self, name: &str) -> String {
        let base = format!("{}_copy", name);
        if !self.config.name_in_use(&base) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}{}", base, n);
            if !self.config.name_in_use(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

impl Default for FormBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A partial field update. `None` leaves the field's value untouched; the
/// doubly-wrapped options distinguish "clear it" from "leave it".
#[derive(Debug, Clone, Default)]
pub struct FieldPatch {
    pub name: Option<String>,
    pub label: Option<String>,
    pub placeholder: Option<Option<String>>,
    pub help_text: Option<Option<String>>,
    pub default_value: Option<Option<Value>>,
    pub width: Option<FieldWidth>,
    pub order: Option<u32>,
    pub disabled: Option<bool>,
    pub readonly: Option<bool>,
    pub options: Option<Vec<FieldOption>>,
    pub validation: Option<Option<FieldValidation>>,
    pub conditional_logic: Option<Option<ConditionalLogic>>,
    pub option_source: Option<Option<OptionSource>>,
    pub attributes: Option<TypeAttributes>,
}

impl FieldPatch {
    fn apply(self, field: &mut FormField) -> Result<(), ModelError> {
        if let Some(attributes) = &self.attributes {
            if !attributes.compatible_with(field.field_type) {
                return Err(ModelError::attribute_mismatch(field.field_type, attributes));
            }
        }
        if let Some(name) = self.name {
            field.name = name;
        }
        if let Some(label) = self.label {
            field.label = label;
        }
        if let Some(placeholder) = self.placeholder {
            field.placeholder = placeholder;
        }
        if let Some(help_text) = self.help_text {
            field.help_text = help_text;
        }
        if let Some(default_value) = self.default_value {
            field.default_value = default_value;
        }
        if let Some(width) = self.width {
            field.width = width;
        }
        if let Some(order) = self.order {
            field.order = order;
        }
        if let Some(disabled) = self.disabled {
            field.disabled = disabled;
        }
        if let Some(readonly) = self.readonly {
            field.readonly = readonly;
        }
        if let Some(options) = self.options {
            field.options = options;
        }
        if let Some(validation) = self.validation {
            field.validation = validation;
        }
        if let Some(conditional_logic) = self.conditional_logic {
            field.conditional_logic = conditional_logic;
        }
        if let Some(option_source) = self.option_source {
            field.option_source = option_source;
        }
        if let Some(attributes) = self.attributes {
            field.attributes = attributes;
        }
        Ok(())
    }
}

fn renumber_fields(fields: &mut [FormField]) {
    for (index, field) in fields.iter_mut().enumerate() {
        field.order = index as u32;
    }
}

fn renumber_steps(steps: &mut [FormStep]) {
    for (index, step) in steps.iter_mut().enumerate() {
        step.order = index as u32;
    }
}
