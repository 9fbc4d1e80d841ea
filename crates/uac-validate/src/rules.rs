//! Built-in rules.

use std::sync::LazyLock;

use regex::Regex;

use crate::rule::{FieldValue, Rule};

pub const DEFAULT_REQUIRED_MESSAGE: &str = "This field is required";
pub const DEFAULT_EMAIL_MESSAGE: &str = "Invalid email address";

/// Something, an `@`, something, a dot, something; no whitespace anywhere.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Fails on a missing or null value and on whitespace-only text.
pub fn required<K: 'static, V: FieldValue + 'static>() -> Rule<K, V> {
    required_message(DEFAULT_REQUIRED_MESSAGE)
}

/// [`required`] with a custom message.
pub fn required_message<K: 'static, V: FieldValue + 'static>(
    message: impl Into<String>,
) -> Rule<K, V> {
    let message = message.into();
    Rule::new(move |value: Option<&V>, _| {
        let filled = value
            .and_then(FieldValue::as_text)
            .is_some_and(|text| !text.trim().is_empty());
        (!filled).then(|| message.clone())
    })
}

/// Fails on text that does not look like an email address.
///
/// Missing, null and empty values pass; combine with [`required`] to reject
/// them. The value is trimmed before matching.
pub fn email<K: 'static, V: FieldValue + 'static>() -> Rule<K, V> {
    email_message(DEFAULT_EMAIL_MESSAGE)
}

/// [`email`] with a custom message.
pub fn email_message<K: 'static, V: FieldValue + 'static>(message: impl Into<String>) -> Rule<K, V> {
    let message = message.into();
    Rule::new(move |value: Option<&V>, _| {
        let text = value.and_then(FieldValue::as_text)?;
        if text.is_empty() || EMAIL_PATTERN.is_match(text.trim()) {
            None
        } else {
            Some(message.clone())
        }
    })
}
