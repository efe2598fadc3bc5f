use super::schema::{FieldName, EXAMPLE_VALUES};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Raw UI values keyed by field; every field is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    raw: BTreeMap<FieldName, String>,
}

impl Default for FormValues {
    fn default() -> Self {
        Self::new()
    }
}

impl FormValues {
    pub fn new() -> Self {
        let raw = FieldName::ordered()
            .into_iter()
            .map(|name| (name, String::new()))
            .collect();
        Self { raw }
    }

    pub fn example() -> Self {
        let mut values = Self::new();
        for (name, value) in EXAMPLE_VALUES {
            values.set(name, value);
        }
        values
    }

    pub fn get(&self, name: FieldName) -> &str {
        self.raw.get(&name).map(String::as_str).unwrap_or_default()
    }

    pub fn set(&mut self, name: FieldName, value: impl Into<String>) {
        self.raw.insert(name, value.into());
    }

    pub fn clear(&mut self) {
        for value in self.raw.values_mut() {
            value.clear();
        }
    }

    /// Parsed numeric view of a field; `None` when empty or malformed.
    pub fn parsed(&self, name: FieldName) -> Option<f64> {
        parse_number(self.get(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> + '_ {
        self.raw.iter().map(|(name, value)| (*name, value.as_str()))
    }

    /// Fields holding a non-empty value, in field order.
    pub fn non_empty(&self) -> impl Iterator<Item = (FieldName, &str)> + '_ {
        self.iter().filter(|(_, value)| !value.is_empty())
    }

    pub fn is_blank(&self) -> bool {
        self.raw.values().all(|value| value.trim().is_empty())
    }

    /// Overlay every field present in `other` that carries a value.
    pub fn merge_non_empty(&mut self, other: &FormValues) {
        for (name, value) in other.non_empty() {
            self.set(name, value);
        }
    }
}

/// Strict dot-decimal parsing; rejects trailing garbage and non-finite values.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

impl Serialize for FormValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.raw.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name.as_str(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FormValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FormValuesVisitor)
    }
}

struct FormValuesVisitor;

impl<'de> Visitor<'de> for FormValuesVisitor {
    type Value = FormValues;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of field names to string values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut values = FormValues::new();
        while let Some(key) = access.next_key::<String>()? {
            let value = access.next_value::<serde_json::Value>()?;
            let Ok(name) = key.parse::<FieldName>() else {
                continue;
            };
            match value {
                serde_json::Value::String(text) => values.set(name, text),
                serde_json::Value::Number(number) => values.set(name, number.to_string()),
                serde_json::Value::Null => {}
                other => {
                    return Err(serde::de::Error::custom(format!(
                        "field '{name}' must be a string, got {other}"
                    )))
                }
            }
        }
        Ok(values)
    }
}
