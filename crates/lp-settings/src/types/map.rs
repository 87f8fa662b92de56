//! String-keyed, string-valued settings map.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SettingsError};

/// Plugin configuration: setting key to string value.
///
/// Booleans and numbers are stored in their string form, the way the plugin
/// keeps them in local storage. Iteration is in ascending key order, which
/// makes encoding deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsMap {
    entries: BTreeMap<String, String>,
}

impl SettingsMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object whose values are all strings.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, on a non-object document, or on any
    /// non-string value.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::try_from(value)
    }

    /// JSON object view of the map.
    pub fn to_json_value(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                .collect(),
        )
    }

    /// Insert a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Overlay `other` onto this map; entries from `other` win.
    pub fn merge(&mut self, other: SettingsMap) {
        self.entries.extend(other.entries);
    }

    /// Boolean setting: `"true"` is true, any other stored value is false.
    ///
    /// Returns `default` when the key is absent.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).map_or(default, |value| value == "true")
    }

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.insert(key, if value { "true" } else { "false" });
    }

    /// Numeric setting parsed from its string form.
    ///
    /// Returns `None` when the key is absent or the value does not parse.
    pub fn get_number<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|value| value.trim().parse().ok())
    }

    pub fn set_number<T: ToString>(&mut self, key: impl Into<String>, value: T) {
        self.insert(key, value.to_string());
    }
}

impl TryFrom<Value> for SettingsMap {
    type Error = SettingsError;

    fn try_from(value: Value) -> Result<Self> {
        let Value::Object(object) = value else {
            return Err(SettingsError::NotAnObject {
                found: json_kind(&value),
            });
        };

        let mut entries = BTreeMap::new();
        for (key, value) in object {
            match value {
                Value::String(text) => {
                    entries.insert(key, text);
                }
                other => return Err(SettingsError::non_string_value(key, json_kind(&other))),
            }
        }
        Ok(Self { entries })
    }
}

impl TryFrom<&Value> for SettingsMap {
    type Error = SettingsError;

    fn try_from(value: &Value) -> Result<Self> {
        Self::try_from(value.clone())
    }
}

impl<K, V> FromIterator<(K, V)> for SettingsMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<K, V> Extend<(K, V)> for SettingsMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.entries.extend(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
    }
}

impl IntoIterator for SettingsMap {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
