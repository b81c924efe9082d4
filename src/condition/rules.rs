use crate::model::{ConditionalLogic, ConditionalRule, LogicOperator, RuleOperator, Value, ValueMap};

/// Evaluates one rule against the target field's current value.
///
/// A missing target value is treated as null. Numeric comparisons coerce
/// both sides; a side that does not coerce fails the comparison, so a
/// non-numeric value never satisfies `greater_than` or `less_than`.
pub fn evaluate_rule(rule: &ConditionalRule, values: &ValueMap) -> bool {
    let target = values.get(&rule.target_field_id).unwrap_or(&Value::Null);

    match rule.operator {
        RuleOperator::Equals => *target == rule.value,
        RuleOperator::NotEquals => *target != rule.value,
        RuleOperator::Contains => target
            .coerce_string()
            .contains(&rule.value.coerce_string()),
        // The negation of `contains`, which also holds for an empty target.
        RuleOperator::NotContains => !target
            .coerce_string()
            .contains(&rule.value.coerce_string()),
        RuleOperator::Empty => target.is_empty(),
        RuleOperator::NotEmpty => !target.is_empty(),
        RuleOperator::GreaterThan => match (target.as_number(), rule.value.as_number()) {
            (Some(a), Some(b)) => a > b,
            _ => false,
        },
        RuleOperator::LessThan => match (target.as_number(), rule.value.as_number()) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        },
    }
}

/// Whether a logic block's rule set currently matches.
///
/// Disabled logic and an empty rule list both match vacuously.
pub fn rules_match(logic: &ConditionalLogic, values: &ValueMap) -> bool {
    if !logic.enabled || logic.rules.is_empty() {
        return true;
    }
    match logic.logical_operator {
        LogicOperator::And => logic.rules.iter().all(|rule| evaluate_rule(rule, values)),
        LogicOperator::Or => logic.rules.iter().any(|rule| evaluate_rule(rule, values)),
    }
}
