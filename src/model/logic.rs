use serde::{Deserialize, Serialize};

use super::Value;

/// What a matching rule set does to its field.
///
/// `Show` and `Hide` drive visibility; `Require` and `Disable` are resolved
/// into overrides by the evaluator and consumed by the validation and
/// rendering layers respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicAction {
    Show,
    Hide,
    Require,
    Disable,
}

/// How individual rule results combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicOperator {
    And,
    Or,
}

/// Comparison applied to the target field's current value.
///
/// The enumeration is closed: an operator string outside this set fails at
/// deserialization instead of silently matching everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    Empty,
    NotEmpty,
    GreaterThan,
    LessThan,
}

/// One condition against another field's current value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalRule {
    pub target_field_id: String,
    pub operator: RuleOperator,
    #[serde(default)]
    pub value: Value,
}

/// Conditional behavior of a field, driven by other fields' values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalLogic {
    pub enabled: bool,
    pub action: LogicAction,
    pub logical_operator: LogicOperator,
    #[serde(default)]
    pub rules: Vec<ConditionalRule>,
}

impl ConditionalLogic {
    /// A single-rule logic block, the shape the builder UI creates.
    pub fn single(action: LogicAction, rule: ConditionalRule) -> Self {
        Self {
            enabled: true,
            action,
            logical_operator: LogicOperator::And,
            rules: vec![rule],
        }
    }
}
