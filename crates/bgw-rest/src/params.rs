//! Request parameter set.
//!
//! [`ParamSet`] is the one collection every request is built from. Keys are
//! kept in a `BTreeMap`, so iteration is always in byte-wise ascending key
//! order. That makes the query string and the signature independent of the
//! order in which a caller inserted its fields.
//!
//! The `*_opt` helpers implement the caller-side omission rule: an optional
//! argument holding its type's zero value (empty string, `0`, `0.0`,
//! `false`) is not sent at all.

use std::collections::BTreeMap;

use serde::Serialize;

/// Free-form extra fields a caller wants spliced into a request.
pub type Extras = BTreeMap<String, String>;

/// String-keyed, string-valued request parameters with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParamSet(BTreeMap<String, String>);

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field unconditionally, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Set a string field unless it is empty.
    pub fn insert_str_opt(&mut self, key: &str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.0.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Set an integer field unless it is zero.
    pub fn insert_int_opt(&mut self, key: &str, value: i64) -> &mut Self {
        if value != 0 {
            self.0.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Set a decimal field unless it is zero.
    ///
    /// Uses the shortest representation that round-trips (`0.1`, `50000`).
    pub fn insert_float_opt(&mut self, key: &str, value: f64) -> &mut Self {
        if value != 0.0 {
            self.0.insert(key.to_string(), format_decimal(value));
        }
        self
    }

    /// Set a boolean field to `"true"` unless it is `false`.
    pub fn insert_bool_opt(&mut self, key: &str, value: bool) -> &mut Self {
        if value {
            self.0.insert(key.to_string(), "true".to_string());
        }
        self
    }

    /// Merge caller-supplied extras after every typed field has been set.
    ///
    /// Keys listed in `protected` (the method's required fields) keep their
    /// typed value; any other key from `extras` is set or overridden.
    pub fn merge_extras(&mut self, extras: Option<&Extras>, protected: &[&str]) -> &mut Self {
        if let Some(extras) = extras {
            for (k, v) in extras {
                if protected.contains(&k.as_str()) {
                    continue;
                }
                self.0.insert(k.clone(), v.clone());
            }
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Percent-encoded `k=v&k=v` query string, keys ascending.
    pub fn to_query_string(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// JSON object body with every value as a string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }
}

impl<K, V> FromIterator<(K, V)> for ParamSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for ParamSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Format a decimal the way the exchange expects it in a string field.
pub fn format_decimal(value: f64) -> String {
    value.to_string()
}
