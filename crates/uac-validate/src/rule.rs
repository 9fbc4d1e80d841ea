//! Rules, schemas and the value abstraction they inspect.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Field name to value mapping of a form.
pub type Values<K, V> = BTreeMap<K, V>;

// =============================================================================
// FieldValue
// =============================================================================

/// A form value as seen by rules.
///
/// Rules only need to know whether a value is present and what it reads as
/// text; everything else about `V` stays opaque.
pub trait FieldValue {
    /// Textual form of the value, or `None` when the value is null.
    ///
    /// Non-text scalars render the way they would be displayed
    /// (`42`, `false`).
    fn as_text(&self) -> Option<Cow<'_, str>>;
}

impl FieldValue for String {
    fn as_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }
}

impl FieldValue for &str {
    fn as_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }
}

impl FieldValue for bool {
    fn as_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Owned(self.to_string()))
    }
}

impl FieldValue for i64 {
    fn as_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Owned(self.to_string()))
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn as_text(&self) -> Option<Cow<'_, str>> {
        self.as_ref().and_then(FieldValue::as_text)
    }
}

impl FieldValue for serde_json::Value {
    fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            serde_json::Value::Null => None,
            serde_json::Value::String(text) => Some(Cow::Borrowed(text)),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

// =============================================================================
// Rule
// =============================================================================

type Check<K, V> = dyn Fn(Option<&V>, &Values<K, V>) -> Option<String>;

/// A single validation check.
///
/// A rule receives the field's value (`None` when the field has no entry)
/// and the whole value map, and returns an error message or `None` when the
/// value passes. Rules are pure; the engine decides what to do with the
/// result.
pub struct Rule<K, V> {
    check: Rc<Check<K, V>>,
}

impl<K, V> Rule<K, V> {
    /// Wrap a check function.
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(Option<&V>, &Values<K, V>) -> Option<String> + 'static,
    {
        Self {
            check: Rc::new(check),
        }
    }

    /// Run the check.
    pub fn check(&self, value: Option<&V>, values: &Values<K, V>) -> Option<String> {
        (self.check)(value, values)
    }
}

impl<K, V> Clone for Rule<K, V> {
    fn clone(&self) -> Self {
        Self {
            check: Rc::clone(&self.check),
        }
    }
}

impl<K, V> fmt::Debug for Rule<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Rule(..)")
    }
}

// =============================================================================
// Schema
// =============================================================================

/// Ordered rule chains keyed by field.
///
/// Fields without an entry, or with an empty chain, are always valid.
pub struct Schema<K, V> {
    fields: BTreeMap<K, Vec<Rule<K, V>>>,
}

impl<K: Ord, V> Schema<K, V> {
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Builder form of [`Schema::insert`].
    #[must_use]
    pub fn field(mut self, key: K, rules: Vec<Rule<K, V>>) -> Self {
        self.insert(key, rules);
        self
    }

    /// Set the rule chain for `key`, replacing any previous one.
    pub fn insert(&mut self, key: K, rules: Vec<Rule<K, V>>) {
        self.fields.insert(key, rules);
    }

    /// Rule chain for `key`; empty when the field has none.
    pub fn rules(&self, key: &K) -> &[Rule<K, V>] {
        self.fields.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Fields that have an entry in the schema.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.fields.keys()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Ord, V> Default for Schema<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V> Clone for Schema<K, V> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
        }
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Schema<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.fields.iter().map(|(key, rules)| (key, rules.len())))
            .finish()
    }
}
