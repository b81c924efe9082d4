use std::fmt;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use super::{ConditionalLogic, FieldValidation, Value};

fn ahashmap_is_empty<K, V>(m: &AHashMap<K, V>) -> bool {
    m.is_empty()
}
use crate::error::ModelError;

/// The closed set of input types a field can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Password,
    Number,
    Tel,
    Url,
    Textarea,
    Select,
    Multiselect,
    Radio,
    Checkbox,
    Date,
    #[serde(rename = "datetime-local")]
    DatetimeLocal,
    File,
    Switch,
    Range,
}

impl FieldType {
    /// Selection types that carry an option list.
    pub fn has_options(&self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::Multiselect | FieldType::Radio | FieldType::Checkbox
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Number | FieldType::Range)
    }

    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            FieldType::Text
                | FieldType::Email
                | FieldType::Password
                | FieldType::Tel
                | FieldType::Url
                | FieldType::Textarea
        )
    }

    /// The wire name, as it appears in persisted JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Password => "password",
            FieldType::Number => "number",
            FieldType::Tel => "tel",
            FieldType::Url => "url",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::Multiselect => "multiselect",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Date => "date",
            FieldType::DatetimeLocal => "datetime-local",
            FieldType::File => "file",
            FieldType::Switch => "switch",
            FieldType::Range => "range",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fractional horizontal space a field occupies in a row-based layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldWidth {
    #[default]
    Full,
    Half,
    Third,
    Quarter,
}

impl FieldWidth {
    pub fn fraction(&self) -> f64 {
        match self {
            FieldWidth::Full => 1.0,
            FieldWidth::Half => 0.5,
            FieldWidth::Third => 0.33,
            FieldWidth::Quarter => 0.25,
        }
    }
}

/// One choice of a selection field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: Value,
    #[serde(default)]
    pub disabled: bool,
}

impl FieldOption {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            disabled: false,
        }
    }
}

/// Type-specific field attributes.
///
/// Tagged by kind so a field can only carry the attributes meaningful to its
/// type; the pairing is checked when the field is constructed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeAttributes {
    #[default]
    None,
    /// For `number` and `range` fields. These are input-widget hints;
    /// authoritative bounds live in [`FieldValidation`].
    Numeric {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<f64>,
    },
    /// For `textarea` fields.
    Textarea {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rows: Option<u32>,
    },
    /// For `file` fields.
    File {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accept: Option<String>,
        #[serde(default)]
        multiple: bool,
    },
    /// For `select`/`multiselect` fields.
    Select {
        #[serde(default)]
        multiple: bool,
    },
}

impl TypeAttributes {
    pub fn kind(&self) -> &'static str {
        match self {
            TypeAttributes::None => "none",
            TypeAttributes::Numeric { .. } => "numeric",
            TypeAttributes::Textarea { .. } => "textarea",
            TypeAttributes::File { .. } => "file",
            TypeAttributes::Select { .. } => "select",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, TypeAttributes::None)
    }

    /// Whether these attributes may be attached to a field of `field_type`.
    pub fn compatible_with(&self, field_type: FieldType) -> bool {
        match self {
            TypeAttributes::None => true,
            TypeAttributes::Numeric { .. } => field_type.is_numeric(),
            TypeAttributes::Textarea { .. } => field_type == FieldType::Textarea,
            TypeAttributes::File { .. } => field_type == FieldType::File,
            TypeAttributes::Select { .. } => {
                matches!(field_type, FieldType::Select | FieldType::Multiselect)
            }
        }
    }
}

/// API-backed option source for selection fields.
///
/// The model carries and persists this configuration; fetching the options
/// is the rendering layer's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionSource {
    pub method: String,
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "ahashmap_is_empty")]
    pub headers: AHashMap<String, String>,
    #[serde(default, skip_serializing_if = "ahashmap_is_empty")]
    pub params: AHashMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_time: Option<u64>,
}

/// One input element of a form.
///
/// `name` is the data-binding key used in submission data and verification
/// payloads; `id` is the structural identity. `step_id` back-references the
/// owning step and is kept consistent by the builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub width: FieldWidth,
    pub order: u32,
    pub step_id: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_logic: Option<ConditionalLogic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_source: Option<OptionSource>,
    #[serde(default, skip_serializing_if = "TypeAttributes::is_none")]
    pub attributes: TypeAttributes,
}

impl FormField {
    /// Builds a field from a draft, checking that the draft's attributes
    /// match the field type.
    pub fn from_draft(
        draft: FieldDraft,
        id: String,
        step_id: String,
        order: u32,
    ) -> Result<Self, ModelError> {
        if !draft.attributes.compatible_with(draft.field_type) {
            return Err(ModelError::attribute_mismatch(
                draft.field_type,
                &draft.attributes,
            ));
        }
        Ok(Self {
            id,
            name: draft.name,
            field_type: draft.field_type,
            label: draft.label,
            placeholder: draft.placeholder,
            help_text: draft.help_text,
            default_value: draft.default_value,
            width: draft.width.unwrap_or_default(),
            order,
            step_id,
            disabled: draft.disabled,
            readonly: draft.readonly,
            options: draft.options,
            validation: draft.validation,
            conditional_logic: draft.conditional_logic,
            option_source: draft.option_source,
            attributes: draft.attributes,
        })
    }

    pub fn is_required(&self) -> bool {
        self.validation.as_ref().is_some_and(|v| v.required)
    }

    /// Formats a runtime value for display according to the field type.
    pub fn format_value(&self, value: &Value) -> String {
        match self.field_type {
            FieldType::Checkbox | FieldType::Multiselect => match value {
                Value::List(items) => {
                    let parts: Vec<String> = items.iter().map(Value::to_string).collect();
                    parts.join(", ")
                }
                other => other.to_string(),
            },
            FieldType::Switch => {
                if value.is_empty() {
                    "off".to_string()
                } else {
                    "on".to_string()
                }
            }
            _ => match value {
                Value::Null => String::new(),
                other => other.to_string(),
            },
        }
    }
}

/// Everything a caller provides to create a field; id, owning step, and
/// order are assigned by the builder.
#[derive(Debug, Clone)]
pub struct FieldDraft {
    pub field_type: FieldType,
    pub name: String,
    pub label: String,
    pub placeholder: Option<String>,
    pub help_text: Option<String>,
    pub default_value: Option<Value>,
    pub width: Option<FieldWidth>,
    pub disabled: bool,
    pub readonly: bool,
    pub options: Vec<FieldOption>,
    pub validation: Option<FieldValidation>,
    pub conditional_logic: Option<ConditionalLogic>,
    pub option_source: Option<OptionSource>,
    pub attributes: TypeAttributes,
}

impl FieldDraft {
    pub fn new(
        field_type: FieldType,
        name: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            field_type,
            name: name.into(),
            label: label.into(),
            placeholder: None,
            help_text: None,
            default_value: None,
            width: None,
            disabled: false,
            readonly: false,
            options: Vec::new(),
            validation: None,
            conditional_logic: None,
            option_source: None,
            attributes: TypeAttributes::None,
        }
    }

    pub fn with_width(mut self, width: FieldWidth) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_validation(mut self, validation: FieldValidation) -> Self {
        self.validation = Some(validation);
        self
    }

    pub fn with_logic(mut self, logic: ConditionalLogic) -> Self {
        self.conditional_logic = Some(logic);
        self
    }

    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_attributes(mut self, attributes: TypeAttributes) -> Self {
        self.attributes = attributes;
        self
    }
}
