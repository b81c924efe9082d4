use std::fmt;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use super::{FormField, Value};

fn ahashmap_is_empty<K, V>(m: &AHashMap<K, V>) -> bool {
    m.is_empty()
}

/// HTTP method of a step verification call.
///
/// `GET` sends the assembled parameters as URL query parameters; `POST`
/// sends them as a JSON body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerifyMethod {
    Get,
    #[default]
    Post,
}

impl VerifyMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerifyMethod::Get => "GET",
            VerifyMethod::Post => "POST",
        }
    }
}

impl fmt::Display for VerifyMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Routes one field's current value into an outgoing request parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub field_id: String,
    pub parameter_name: String,
    /// Display label for the builder UI; not sent on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_label: Option<String>,
}

impl FieldMapping {
    pub fn new(field_id: impl Into<String>, parameter_name: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            parameter_name: parameter_name.into(),
            field_label: None,
        }
    }
}

/// External verification of a step, run before allowing progression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepVerification {
    pub enabled: bool,
    pub endpoint: String,
    #[serde(default)]
    pub method: VerifyMethod,
    #[serde(default, skip_serializing_if = "ahashmap_is_empty")]
    pub headers: AHashMap<String, String>,
    #[serde(default, skip_serializing_if = "ahashmap_is_empty")]
    pub static_params: AHashMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_mappings: Vec<FieldMapping>,
    /// When true, a failed check blocks progression to the next step.
    /// When false, a failure surfaces its message but lets the user through.
    #[serde(default)]
    pub validation_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl StepVerification {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            enabled: true,
            endpoint: endpoint.into(),
            method: VerifyMethod::default(),
            headers: AHashMap::new(),
            static_params: AHashMap::new(),
            field_mappings: Vec::new(),
            validation_required: false,
            success_message: None,
            error_message: None,
        }
    }

    /// Whether this configuration actually triggers a network call.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.endpoint.is_empty()
    }
}

/// An ordered page of a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormStep {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub order: u32,
    #[serde(default)]
    pub fields: Vec<FormField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<StepVerification>,
}

impl FormStep {
    pub fn new(id: String, title: impl Into<String>, order: u32) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            order,
            fields: Vec::new(),
            verification: None,
        }
    }

    pub fn find_field(&self, field_id: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.id == field_id)
    }

    pub fn find_field_mut(&mut self, field_id: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.id == field_id)
    }
}
