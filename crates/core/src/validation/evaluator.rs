//! Rule evaluator — pure logic, no database access.

use serde_json::{Map, Value};
use validator::ValidateEmail;

use super::rules::{FieldRule, FieldViolation, RuleKind, ValidationMode};

/// Rule type reported for payload keys that no rule table knows about.
pub const RULE_WHITELIST: &str = "whitelist";

/// Evaluate every rule in `rules` against a single payload object.
///
/// In [`ValidationMode::Update`] a field that is absent from `data` is
/// skipped entirely, so only the fields being changed are checked. In
/// [`ValidationMode::Create`] absence only matters to `Required` rules.
pub fn evaluate_rules(
    rules: &[FieldRule],
    data: &Map<String, Value>,
    mode: ValidationMode,
) -> Vec<FieldViolation> {
    rules
        .iter()
        .filter_map(|rule| {
            let value = data.get(rule.field);
            if value.is_none() && mode == ValidationMode::Update {
                return None;
            }
            evaluate_single_rule(rule, value)
        })
        .collect()
}

/// Report every key of `data` that is not listed in `allowed`.
pub fn unknown_fields(data: &Map<String, Value>, allowed: &[&str]) -> Vec<FieldViolation> {
    data.keys()
        .filter(|key| !allowed.contains(&key.as_str()))
        .map(|key| FieldViolation {
            field: key.clone(),
            rule_type: RULE_WHITELIST.to_string(),
            message: format!("property {key} should not exist"),
            value: None,
        })
        .collect()
}

fn evaluate_single_rule(rule: &FieldRule, value: Option<&Value>) -> Option<FieldViolation> {
    let passed = match rule.kind {
        RuleKind::Required => check_required(value),
        RuleKind::Email => check_email(value),
        RuleKind::String => check_string(value),
        RuleKind::Boolean => check_boolean(value),
        RuleKind::MaxLength(max) => check_max_length(value, max),
    };

    if passed {
        None
    } else {
        Some(FieldViolation {
            field: rule.field.to_string(),
            rule_type: rule.kind.name().to_string(),
            message: rule.message.to_string(),
            value: value.cloned(),
        })
    }
}

fn check_required(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn check_email(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true, // presence is the job of `Required`
        Some(Value::String(s)) => s.as_str().validate_email() && has_tld(s),
        Some(_) => false,
    }
}

/// `validator` accepts bare hosts such as `user@localhost`; require a dotted
/// domain with a non-empty last label.
fn has_tld(email: &str) -> bool {
    email
        .rsplit_once('@')
        .and_then(|(_, domain)| domain.rsplit_once('.'))
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

fn check_string(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null) | Some(Value::String(_)))
}

fn check_boolean(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Bool(_)))
}

fn check_max_length(value: Option<&Value>, max: usize) -> bool {
    match value.and_then(Value::as_str) {
        Some(s) => s.chars().count() <= max,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn rule(kind: RuleKind) -> FieldRule {
        FieldRule::new("test_field", kind, "test_field failed")
    }

    #[test]
    fn required_passes_with_value() {
        let d = data(&[("test_field", json!("hello"))]);
        let violations = evaluate_rules(&[rule(RuleKind::Required)], &d, ValidationMode::Create);
        assert!(violations.is_empty());
    }

    #[test]
    fn required_fails_missing_field_on_create() {
        let violations =
            evaluate_rules(&[rule(RuleKind::Required)], &Map::new(), ValidationMode::Create);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule_type, "required");
        assert_eq!(violations[0].message, "test_field failed");
    }

    #[test]
    fn required_skipped_for_missing_field_on_update() {
        let violations =
            evaluate_rules(&[rule(RuleKind::Required)], &Map::new(), ValidationMode::Update);
        assert!(violations.is_empty());
    }

    #[test]
    fn required_fails_present_empty_string_on_update() {
        let d = data(&[("test_field", json!(""))]);
        let violations = evaluate_rules(&[rule(RuleKind::Required)], &d, ValidationMode::Update);
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn required_fails_null_value() {
        let d = data(&[("test_field", Value::Null)]);
        let violations = evaluate_rules(&[rule(RuleKind::Required)], &d, ValidationMode::Create);
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn email_accepts_basic_address() {
        let d = data(&[("test_field", json!("a@b.com"))]);
        let violations = evaluate_rules(&[rule(RuleKind::Email)], &d, ValidationMode::Create);
        assert!(violations.is_empty());
    }

    #[test]
    fn email_rejects_malformed_address() {
        let d = data(&[("test_field", json!("not-an-email"))]);
        let violations = evaluate_rules(&[rule(RuleKind::Email)], &d, ValidationMode::Create);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].value, Some(json!("not-an-email")));
    }

    #[test]
    fn email_rejects_non_string() {
        let d = data(&[("test_field", json!(42))]);
        let violations = evaluate_rules(&[rule(RuleKind::Email)], &d, ValidationMode::Create);
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn string_accepts_null() {
        let d = data(&[("test_field", Value::Null)]);
        let violations = evaluate_rules(&[rule(RuleKind::String)], &d, ValidationMode::Update);
        assert!(violations.is_empty());
    }

    #[test]
    fn string_rejects_number() {
        let d = data(&[("test_field", json!(42))]);
        let violations = evaluate_rules(&[rule(RuleKind::String)], &d, ValidationMode::Create);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule_type, "type_string");
    }

    #[test]
    fn boolean_rejects_null_and_strings() {
        for value in [Value::Null, json!("true")] {
            let d = data(&[("test_field", value)]);
            let violations =
                evaluate_rules(&[rule(RuleKind::Boolean)], &d, ValidationMode::Create);
            assert_eq!(violations.len(), 1);
        }
    }

    #[test]
    fn max_length_counts_characters_not_bytes() {
        let d = data(&[("test_field", json!("ééé"))]);
        let violations =
            evaluate_rules(&[rule(RuleKind::MaxLength(3))], &d, ValidationMode::Create);
        assert!(violations.is_empty());
    }

    #[test]
    fn max_length_fails_over_limit() {
        let d = data(&[("test_field", json!("hello"))]);
        let violations =
            evaluate_rules(&[rule(RuleKind::MaxLength(3))], &d, ValidationMode::Create);
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn every_failing_rule_is_reported() {
        let rules = [rule(RuleKind::String), rule(RuleKind::MaxLength(3))];
        let d = data(&[("test_field", json!(12345))]);
        let violations = evaluate_rules(&rules, &d, ValidationMode::Create);
        // MaxLength ignores non-strings; only the type check fails.
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn unknown_fields_are_reported_by_name() {
        let d = data(&[("known", json!(1)), ("extra", json!(2))]);
        let violations = unknown_fields(&d, &["known"]);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "extra");
        assert_eq!(violations[0].rule_type, RULE_WHITELIST);
        assert_eq!(violations[0].message, "property extra should not exist");
    }
}
