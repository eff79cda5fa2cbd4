//! Template substitution, dotted-path value access, and the condition
//! operator set — §4.1 of the runtime's component design.

use crate::node::ConditionOperator;
use regex::Regex;
use std::collections::HashMap;

/// Replace every `{{name}}` occurrence in `template` with the string form of
/// `vars[name]`. A token whose name is absent from `vars`, or bound to
/// `null`, is left intact rather than substituted — callers can tell a
/// missed substitution from an intentional empty string.
///
/// Only flat names are recognised here; dotted-path evaluation is reserved
/// for [`resolve`], used by Condition's `variable` field and Escalate's
/// `context` values.
pub fn interpolate(template: &str, vars: &HashMap<String, serde_json::Value>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    loop {
        let Some(start) = rest.find("{{") else {
            out.push_str(rest);
            break;
        };
        let Some(end_rel) = rest[start + 2..].find("}}") else {
            out.push_str(rest);
            break;
        };
        let end = start + 2 + end_rel;
        let name = rest[start + 2..end].trim();

        out.push_str(&rest[..start]);
        match vars.get(name) {
            Some(serde_json::Value::Null) | None => out.push_str(&rest[start..end + 2]),
            Some(value) => out.push_str(&value_to_string(value)),
        }
        rest = &rest[end + 2..];
    }
    out
}

/// Render a JSON value the way `interpolate` substitutes it: strings are
/// unquoted, everything else is its compact JSON form.
fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Walk `vars` along a dotted path (`"a.b.c"`). A missing intermediate or
/// leaf yields `None`, distinct from an explicit JSON `null` (`Some(Value::Null)`).
pub fn resolve<'a>(
    vars: &'a HashMap<String, serde_json::Value>,
    path: &str,
) -> Option<&'a serde_json::Value> {
    let mut parts = path.split('.');
    let first = parts.next()?;
    let mut current = vars.get(first)?;
    for part in parts {
        current = current.get(part)?;
    }
    Some(current)
}

/// Evaluate a single condition operator against a resolved left-hand value
/// (`None` means absent, distinct from `Some(Value::Null)`) and a literal
/// right-hand value.
pub fn evaluate_operator(
    operator: ConditionOperator,
    left: Option<&serde_json::Value>,
    right: &serde_json::Value,
) -> bool {
    match operator {
        ConditionOperator::Equals => values_equal(left, right),
        ConditionOperator::NotEquals => !values_equal(left, right),
        ConditionOperator::GreaterThan => {
            ordered_compare(left, right).is_some_and(|o| o == std::cmp::Ordering::Greater)
        }
        ConditionOperator::LessThan => {
            ordered_compare(left, right).is_some_and(|o| o == std::cmp::Ordering::Less)
        }
        ConditionOperator::GreaterThanOrEqual => {
            ordered_compare(left, right).is_some_and(|o| o != std::cmp::Ordering::Less)
        }
        ConditionOperator::LessThanOrEqual => {
            ordered_compare(left, right).is_some_and(|o| o != std::cmp::Ordering::Greater)
        }
        ConditionOperator::Contains => as_string(left).contains(&as_string(Some(right))),
        ConditionOperator::StartsWith => as_string(left).starts_with(&as_string(Some(right))),
        ConditionOperator::EndsWith => as_string(left).ends_with(&as_string(Some(right))),
        ConditionOperator::MatchesRegex => {
            let pattern = as_string(Some(right));
            match Regex::new(&pattern) {
                Ok(re) => re.is_match(&as_string(left)),
                Err(_) => false,
            }
        }
        ConditionOperator::IsEmpty => match left {
            None => true,
            Some(serde_json::Value::Null) => true,
            Some(serde_json::Value::String(s)) => s.is_empty(),
            Some(_) => false,
        },
    }
}

/// Equality with a string-form fallback: direct JSON equality first, then
/// string-form equality (so `"3"` and `3` compare equal).
fn values_equal(left: Option<&serde_json::Value>, right: &serde_json::Value) -> bool {
    match left {
        Some(l) if l == right => true,
        Some(l) => as_string(Some(l)) == as_string(Some(right)),
        None => matches!(right, serde_json::Value::Null),
    }
}

/// Ordered comparison: both sides must parse as numbers, otherwise the rule
/// does not match (returns `None`).
fn ordered_compare(
    left: Option<&serde_json::Value>,
    right: &serde_json::Value,
) -> Option<std::cmp::Ordering> {
    let l = as_f64(left)?;
    let r = as_f64(Some(right))?;
    l.partial_cmp(&r)
}

fn as_f64(value: Option<&serde_json::Value>) -> Option<f64> {
    match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.parse::<f64>().ok(),
        _ => None,
    }
}

/// Render a value in the string form used by `contains`/`starts_with`/
/// `ends_with`/`matches_regex`. Absent and null both render as `""`.
fn as_string(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(pairs: &[(&str, serde_json::Value)]) -> HashMap<String, serde_json::Value> {
        pairs.iter().cloned().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn interpolates_known_names() {
        let v = vars(&[("name", json!("Ada"))]);
        assert_eq!(interpolate("Hi {{name}}!", &v), "Hi Ada!");
    }

    #[test]
    fn interpolate_leaves_unknown_tokens() {
        let v = vars(&[("name", json!("Ada"))]);
        assert_eq!(interpolate("Hi {{other}}!", &v), "Hi {{other}}!");
    }

    #[test]
    fn interpolate_leaves_null_bound_tokens() {
        let v = vars(&[("name", serde_json::Value::Null)]);
        assert_eq!(interpolate("Hi {{name}}!", &v), "Hi {{name}}!");
    }

    #[test]
    fn resolve_distinguishes_absent_from_null() {
        let v = vars(&[("a", json!({"b": null}))]);
        assert_eq!(resolve(&v, "a.b"), Some(&serde_json::Value::Null));
        assert_eq!(resolve(&v, "a.c"), None);
        assert_eq!(resolve(&v, "missing.c"), None);
    }

    #[test]
    fn equals_falls_back_to_string_form() {
        assert!(evaluate_operator(
            ConditionOperator::Equals,
            Some(&json!("3")),
            &json!(3)
        ));
    }

    #[test]
    fn ordered_comparison_requires_numeric_both_sides() {
        assert!(!evaluate_operator(
            ConditionOperator::GreaterThan,
            Some(&json!("abc")),
            &json!(1)
        ));
        assert!(evaluate_operator(
            ConditionOperator::GreaterThan,
            Some(&json!(5)),
            &json!(1)
        ));
    }

    #[test]
    fn is_empty_matches_absent_null_and_empty_string() {
        assert!(evaluate_operator(ConditionOperator::IsEmpty, None, &json!(null)));
        assert!(evaluate_operator(
            ConditionOperator::IsEmpty,
            Some(&serde_json::Value::Null),
            &json!(null)
        ));
        assert!(evaluate_operator(
            ConditionOperator::IsEmpty,
            Some(&json!("")),
            &json!(null)
        ));
        assert!(!evaluate_operator(
            ConditionOperator::IsEmpty,
            Some(&json!("x")),
            &json!(null)
        ));
    }

    #[test]
    fn invalid_regex_never_matches() {
        assert!(!evaluate_operator(
            ConditionOperator::MatchesRegex,
            Some(&json!("abc")),
            &json!("(unclosed")
        ));
    }
}
