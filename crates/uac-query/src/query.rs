//! Raw and normalized query representations.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

// =============================================================================
// RAW QUERY
// =============================================================================

/// A query value as delivered by the location store.
///
/// Routers hand out values as scalars, as sequences (repeated keys) or as
/// nulls (a key present without a usable value).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// Present but without a value.
    Null,
    /// A single string.
    Text(String),
    /// A repeated key; elements may be null.
    List(Vec<Option<String>>),
}

impl RawValue {
    /// Collapse to a scalar string.
    ///
    /// A list yields its first element when that element is a string.
    /// Everything else collapses to the empty string, which is treated as
    /// absent by [`normalize_query`].
    pub fn as_scalar(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::List(items) => match items.first() {
                Some(Some(first)) => first,
                _ => "",
            },
            Self::Null => "",
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// The un-normalized key/value mapping read from a location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuery {
    entries: BTreeMap<String, RawValue>,
}

impl RawQuery {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` query string.
    ///
    /// A leading `?` is ignored. Repeated keys become [`RawValue::List`].
    pub fn from_query_string(input: &str) -> Self {
        let input = input.strip_prefix('?').unwrap_or(input);
        let mut query = Self::new();
        for (key, value) in url::form_urlencoded::parse(input.as_bytes()) {
            let value = value.into_owned();
            match query.entries.entry(key.into_owned()) {
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(RawValue::Text(value));
                }
                btree_map::Entry::Occupied(mut slot) => {
                    let merged = match slot.get_mut() {
                        RawValue::List(items) => {
                            items.push(Some(value));
                            continue;
                        }
                        RawValue::Text(first) => {
                            RawValue::List(vec![Some(std::mem::take(first)), Some(value)])
                        }
                        RawValue::Null => RawValue::List(vec![None, Some(value)]),
                    };
                    slot.insert(merged);
                }
            }
        }
        query
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.entries.get(key)
    }

    /// Scalar value for `key`, empty when absent or unusable.
    pub fn scalar(&self, key: &str) -> &str {
        self.get(key).map_or("", RawValue::as_scalar)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the query has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over keys and raw values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl From<&QueryState> for RawQuery {
    fn from(state: &QueryState) -> Self {
        Self {
            entries: state
                .iter()
                .map(|(key, value)| (key.to_string(), RawValue::Text(value.to_string())))
                .collect(),
        }
    }
}

impl From<QueryState> for RawQuery {
    fn from(state: QueryState) -> Self {
        Self {
            entries: state
                .entries
                .into_iter()
                .map(|(key, value)| (key, RawValue::Text(value)))
                .collect(),
        }
    }
}

// =============================================================================
// QUERY STATE
// =============================================================================

/// Sparse mapping of query keys to single string values.
///
/// This is the canonical form written to a location: only keys carrying a
/// non-default value are present. Equality is key/value set equality and
/// does not depend on insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryState {
    entries: BTreeMap<String, String>,
}

impl QueryState {
    /// Create an empty query state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key is present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over keys and values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Copy with empty values removed.
    #[must_use]
    pub fn normalized(&self) -> Self {
        self.iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    /// Encode as an `application/x-www-form-urlencoded` string (no `?`).
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl FromIterator<(String, String)> for QueryState {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for QueryState {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }
}

/// Normalize a raw query into its canonical sparse form.
///
/// Every value is collapsed to a scalar (see [`RawValue::as_scalar`]) and
/// keys whose scalar is empty are dropped.
pub fn normalize_query(query: &RawQuery) -> QueryState {
    query
        .iter()
        .map(|(key, value)| (key, value.as_scalar()))
        .filter(|(_, value)| !value.is_empty())
        .collect()
}
