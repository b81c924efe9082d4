use serde::{Deserialize, Serialize};

/// Declarative validation rules attached to a field.
///
/// Every rule is optional; an absent rule imposes no constraint. `pattern`
/// holds a regular expression source string compiled at validation time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(default)]
    pub email: bool,
}

impl FieldValidation {
    /// Rules that only mark a field required, the most common case.
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    /// Rules for an email field.
    pub fn email() -> Self {
        Self {
            email: true,
            ..Self::default()
        }
    }
}
