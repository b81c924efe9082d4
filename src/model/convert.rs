//! Import and export of form configurations as external JSON.
//!
//! Exported JSON is the canonical model shape. Import goes through lenient
//! wire structs: missing ids are minted fresh, missing orders fall back to
//! position, widths default, and step back-references are repaired, so a
//! hand-edited or foreign export still hydrates into a consistent tree.

use serde::Deserialize;

use super::{
    ConditionalLogic, FieldOption, FieldType, FieldValidation, FieldWidth, FormConfig, FormField,
    FormLayout, FormSpacing, FormStep, OptionSource, StepVerification, TypeAttributes, Value,
};
use crate::error::ImportError;
use crate::id::IdGenerator;

/// Serializes a configuration as pretty-printed JSON for export.
///
/// Optional empties are dropped by the model's serde attributes, so the
/// export is already "clean".
pub fn to_export_json(config: &FormConfig) -> Result<String, ImportError> {
    serde_json::to_string_pretty(config).map_err(ImportError::Json)
}

/// Parses external JSON into a consistent [`FormConfig`].
pub fn from_import_json(json: &str, ids: &mut IdGenerator) -> Result<FormConfig, ImportError> {
    let import: ImportForm = serde_json::from_str(json)?;
    let config = hydrate(import, ids);
    let problems = validate_shape(&config);
    if problems.is_empty() {
        Ok(config)
    } else {
        Err(ImportError::Shape { problems })
    }
}

/// Structural problems that make a configuration unusable, phrased for
/// display. An empty list means the shape is valid.
pub fn validate_shape(config: &FormConfig) -> Vec<String> {
    let mut problems = Vec::new();

    if config.title.trim().is_empty() {
        problems.push("the form title is required".to_string());
    }
    if config.title.len() > 255 {
        problems.push("the form title cannot exceed 255 characters".to_string());
    }
    if config.steps.is_empty() {
        problems.push("at least one step is required".to_string());
    }
    if config.steps.len() > super::MAX_STEPS {
        problems.push(format!(
            "a form cannot have more than {} steps",
            super::MAX_STEPS
        ));
    }

    for (index, step) in config.steps.iter().enumerate() {
        if step.title.trim().is_empty() {
            problems.push(format!("step {} must have a title", index + 1));
        }
        for (field_index, field) in step.fields.iter().enumerate() {
            let context = format!("step {}, field {}", index + 1, field_index + 1);
            if field.name.trim().is_empty() {
                problems.push(format!("{}: the field name is required", context));
            }
            if field.label.trim().is_empty() {
                problems.push(format!("{}: the field label is required", context));
            }
            if !field.attributes.compatible_with(field.field_type) {
                problems.push(format!(
                    "{}: '{}' attributes do not match the '{}' type",
                    context,
                    field.attributes.kind(),
                    field.field_type
                ));
            }
        }
    }

    problems
}

fn hydrate(import: ImportForm, ids: &mut IdGenerator) -> FormConfig {
    let steps = import
        .steps
        .into_iter()
        .enumerate()
        .map(|(index, step)| hydrate_step(step, index, ids))
        .collect();

    FormConfig {
        id: if import.id.is_empty() {
            ids.form_id()
        } else {
            import.id
        },
        title: import.title,
        description: none_if_empty(import.description),
        layout: import.layout,
        spacing: import.spacing,
        steps,
    }
}

fn hydrate_step(step: ImportStep, index: usize, ids: &mut IdGenerator) -> FormStep {
    let id = ids.step_id();
    let fields = step
        .fields
        .into_iter()
        .enumerate()
        .map(|(field_index, field)| hydrate_field(field, &id, field_index, ids))
        .collect();

    FormStep {
        id,
        title: if step.title.is_empty() {
            format!("Step {}", index + 1)
        } else {
            step.title
        },
        description: none_if_empty(step.description),
        order: index as u32,
        fields,
        verification: step.verification,
    }
}

fn hydrate_field(field: ImportField, step_id: &str, index: usize, ids: &mut IdGenerator) -> FormField {
    let attributes = fold_attributes(&field);
    FormField {
        id: ids.field_id(),
        name: field.name,
        field_type: field.field_type,
        label: field.label,
        placeholder: none_if_empty(field.placeholder),
        help_text: none_if_empty(field.help_text),
        default_value: field.default_value,
        width: field.width.unwrap_or_default(),
        order: index as u32,
        step_id: step_id.to_string(),
        disabled: field.disabled,
        readonly: field.readonly,
        options: field.options,
        validation: field.validation,
        conditional_logic: field.conditional_logic,
        option_source: field.option_source,
        attributes,
    }
}

/// Folds the original flat attribute columns into the typed variant matching
/// the field type; attributes for a different type are dropped.
fn fold_attributes(field: &ImportField) -> TypeAttributes {
    if let Some(attributes) = &field.attributes {
        if attributes.compatible_with(field.field_type) {
            return attributes.clone();
        }
        log::warn!(
            "import: dropping '{}' attributes from '{}' field '{}'",
            attributes.kind(),
            field.field_type,
            field.name
        );
        return TypeAttributes::None;
    }

    match field.field_type {
        t if t.is_numeric() => {
            if field.min.is_some() || field.max.is_some() || field.step.is_some() {
                TypeAttributes::Numeric {
                    min: field.min,
                    max: field.max,
                    step: field.step,
                }
            } else {
                TypeAttributes::None
            }
        }
        FieldType::Textarea => match field.rows {
            Some(rows) => TypeAttributes::Textarea { rows: Some(rows) },
            None => TypeAttributes::None,
        },
        FieldType::File => {
            if field.accept.is_some() || field.multiple {
                TypeAttributes::File {
                    accept: field.accept.clone(),
                    multiple: field.multiple,
                }
            } else {
                TypeAttributes::None
            }
        }
        FieldType::Select | FieldType::Multiselect if field.multiple => {
            TypeAttributes::Select { multiple: true }
        }
        _ => TypeAttributes::None,
    }
}

fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Lenient wire shape of an exported or hand-written form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportForm {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    layout: FormLayout,
    #[serde(default)]
    spacing: FormSpacing,
    #[serde(default)]
    steps: Vec<ImportStep>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportStep {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    fields: Vec<ImportField>,
    #[serde(default, alias = "apiConfig")]
    verification: Option<StepVerification>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportField {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    field_type: FieldType,
    #[serde(default)]
    label: String,
    #[serde(default)]
    placeholder: Option<String>,
    #[serde(default)]
    help_text: Option<String>,
    #[serde(default)]
    default_value: Option<Value>,
    #[serde(default)]
    width: Option<FieldWidth>,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    readonly: bool,
    #[serde(default)]
    options: Vec<FieldOption>,
    #[serde(default)]
    validation: Option<FieldValidation>,
    #[serde(default)]
    conditional_logic: Option<ConditionalLogic>,
    #[serde(default, alias = "apiConfig")]
    option_source: Option<OptionSource>,
    /// Typed attributes, when the source already uses the tagged shape.
    #[serde(default)]
    attributes: Option<TypeAttributes>,
    // Flat attribute columns from the legacy wire shape.
    #[serde(default)]
    min: Option<f64>,
    #[serde(default)]
    max: Option<f64>,
    #[serde(default)]
    step: Option<f64>,
    #[serde(default)]
    rows: Option<u32>,
    #[serde(default)]
    accept: Option<String>,
    #[serde(default)]
    multiple: bool,
}
