//! Collect-Input validation — §4.4.3. Pure, side-effect-free so the handler
//! can call it once per attempt without touching services or session state.

use flow_core::{ValidationConfig, ValidationKind};

/// Validate raw collected input against a node's validation policy.
///
/// `None` (no validation configured) always passes. `Date` and `Custom`
/// pass through unconditionally — the core has no calendar or
/// authoring-defined validator of its own to apply.
pub fn validate_input(validation: Option<&ValidationConfig>, raw: &str) -> bool {
    let Some(v) = validation else {
        return true;
    };
    match v.kind {
        ValidationKind::Text => {
            let len = raw.chars().count() as f64;
            v.min.is_none_or(|min| len >= min) && v.max.is_none_or(|max| len <= max)
        }
        ValidationKind::Number => match raw.parse::<f64>() {
            Ok(n) => v.min.is_none_or(|min| n >= min) && v.max.is_none_or(|max| n <= max),
            Err(_) => false,
        },
        ValidationKind::Email => EMAIL_PATTERN.is_match(raw),
        ValidationKind::Phone => PHONE_PATTERN.is_match(raw),
        ValidationKind::Regex => match &v.pattern {
            None => true,
            Some(pattern) if pattern.is_empty() => true,
            Some(pattern) => regex::Regex::new(pattern).is_ok_and(|re| re.is_match(raw)),
        },
        ValidationKind::Date | ValidationKind::Custom => true,
    }
}

static EMAIL_PATTERN: std::sync::LazyLock<regex::Regex> = std::sync::LazyLock::new(|| {
    regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static pattern is valid")
});

static PHONE_PATTERN: std::sync::LazyLock<regex::Regex> = std::sync::LazyLock::new(|| {
    regex::Regex::new(r"^[\d\s\-+()]{10,}$").expect("static pattern is valid")
});
