//! Form state with rule evaluation and touched tracking.

use std::collections::{BTreeMap, BTreeSet};

use crate::rule::{Schema, Values};

/// Message stored when a rule fails without saying why.
const FALLBACK_MESSAGE: &str = "Invalid value";

/// Values, errors and touched flags of one form.
///
/// Writing a value never validates it; callers decide when to run
/// [`validate_field`](Self::validate_field) or
/// [`validate_all`](Self::validate_all).
#[derive(Debug, Clone)]
pub struct ValidationEngine<K, V> {
    schema: Schema<K, V>,
    initial: Values<K, V>,
    values: Values<K, V>,
    errors: BTreeMap<K, String>,
    touched: BTreeSet<K>,
}

impl<K: Ord + Clone, V: Clone> ValidationEngine<K, V> {
    /// Engine starting from `initial` with no errors and nothing touched.
    pub fn new(initial: Values<K, V>, schema: Schema<K, V>) -> Self {
        Self {
            schema,
            values: initial.clone(),
            initial,
            errors: BTreeMap::new(),
            touched: BTreeSet::new(),
        }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Set one field's value. Errors and touched flags are left alone.
    pub fn set_field(&mut self, key: K, value: V) {
        self.values.insert(key, value);
    }

    /// Replace the whole value map. Errors and touched flags are left alone.
    pub fn set_values(&mut self, next: Values<K, V>) {
        self.values = next;
    }

    /// Mark `key` as touched.
    pub fn touch_field(&mut self, key: &K) {
        self.touched.insert(key.clone());
    }

    /// Mark every field that has a value or a schema entry as touched.
    pub fn touch_all(&mut self) {
        self.touched
            .extend(self.values.keys().chain(self.schema.keys()).cloned());
    }

    /// Back to a clean form.
    ///
    /// Values become `next` when given, otherwise the values the engine was
    /// created with. Errors and touched flags are cleared. `next` does not
    /// replace the initial values for later resets.
    pub fn reset(&mut self, next: Option<Values<K, V>>) {
        self.values = next.unwrap_or_else(|| self.initial.clone());
        self.errors.clear();
        self.touched.clear();
        tracing::trace!(fields = self.values.len(), "form reset");
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Run `key`'s rule chain and record the outcome.
    ///
    /// Rules run in declaration order and stop at the first failure, whose
    /// message becomes the field's error. A field without rules is valid.
    /// Returns whether the field passed.
    pub fn validate_field(&mut self, key: &K) -> bool {
        let value = self.values.get(key);
        let failure = self
            .schema
            .rules(key)
            .iter()
            .find_map(|rule| rule.check(value, &self.values));

        match failure {
            Some(message) => {
                let message = if message.is_empty() {
                    FALLBACK_MESSAGE.to_string()
                } else {
                    message
                };
                self.errors.insert(key.clone(), message);
                false
            }
            None => {
                self.errors.remove(key);
                true
            }
        }
    }

    /// Validate every field in the schema.
    ///
    /// All fields are evaluated even after one fails, so the error map is
    /// complete afterwards. Touched flags are not changed.
    pub fn validate_all(&mut self) -> bool {
        let keys: Vec<K> = self.schema.keys().cloned().collect();
        let mut valid = true;
        for key in &keys {
            valid &= self.validate_field(key);
        }
        tracing::debug!(
            fields = keys.len(),
            errors = self.errors.len(),
            valid,
            "validated form"
        );
        valid
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn values(&self) -> &Values<K, V> {
        &self.values
    }

    pub fn value(&self, key: &K) -> Option<&V> {
        self.values.get(key)
    }

    pub fn errors(&self) -> &BTreeMap<K, String> {
        &self.errors
    }

    pub fn error(&self, key: &K) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    pub fn touched(&self) -> &BTreeSet<K> {
        &self.touched
    }

    pub fn is_touched(&self, key: &K) -> bool {
        self.touched.contains(key)
    }

    /// The field's error, but only once the field has been touched.
    pub fn visible_error(&self, key: &K) -> Option<&str> {
        if self.is_touched(key) {
            self.error(key)
        } else {
            None
        }
    }

    /// Whether the last validation left no errors.
    ///
    /// Fields that were never validated count as valid.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn schema(&self) -> &Schema<K, V> {
        &self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;
    use crate::rules::{email, required};

    type Engine = ValidationEngine<&'static str, String>;

    fn engine(email_value: &str) -> Engine {
        let initial = Values::from([
            ("name", "Ann".to_string()),
            ("email", email_value.to_string()),
        ]);
        let schema = Schema::new()
            .field("name", vec![required()])
            .field("email", vec![required(), email()]);
        ValidationEngine::new(initial, schema)
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let mut form = engine("");
        assert!(!form.validate_field(&"email"));
        assert_eq!(form.error(&"email"), Some(crate::DEFAULT_REQUIRED_MESSAGE));

        form.set_field("email", "nope".into());
        assert!(!form.validate_field(&"email"));
        assert_eq!(form.error(&"email"), Some(crate::DEFAULT_EMAIL_MESSAGE));

        form.set_field("email", "ann@example.com".into());
        assert!(form.validate_field(&"email"));
        assert_eq!(form.error(&"email"), None);
    }

    #[test]
    fn test_set_field_does_not_validate() {
        let mut form = engine("ann@example.com");
        form.set_field("email", String::new());
        assert!(form.errors().is_empty());
        assert!(form.touched().is_empty());
    }

    #[test]
    fn test_field_without_rules_is_valid() {
        let mut form = engine("ann@example.com");
        assert!(form.validate_field(&"nickname"));
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_empty_message_is_replaced() {
        let schema = Schema::new().field("x", vec![Rule::new(|_, _| Some(String::new()))]);
        let mut form: Engine = ValidationEngine::new(Values::new(), schema);
        assert!(!form.validate_field(&"x"));
        assert_eq!(form.error(&"x"), Some(FALLBACK_MESSAGE));
    }

    #[test]
    fn test_visible_error_requires_touch() {
        let mut form = engine("bad");
        form.validate_all();
        assert_eq!(form.visible_error(&"email"), None);
        form.touch_field(&"email");
        assert_eq!(form.visible_error(&"email"), Some(crate::DEFAULT_EMAIL_MESSAGE));
    }
}
