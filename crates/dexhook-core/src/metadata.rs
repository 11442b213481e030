//! # Upload Metadata
//!
//! The flat key/value map a client attaches to an upload. The upload server
//! hands it to each hook as one serialized JSON argument; it is parsed once
//! and never mutated afterwards.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::MetadataParseError;

/// Immutable upload metadata.
///
/// Keys are kept sorted so that reports embedding the metadata serialize
/// identically on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    /// Parse the hook's metadata argument.
    ///
    /// Strings are kept verbatim. Numbers and booleans become their JSON
    /// text (`1.0`, `true`). `null`, arrays and nested objects are rejected.
    pub fn from_json(raw: &str) -> Result<Self, MetadataParseError> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Object(map) = value else {
            return Err(MetadataParseError::NotAnObject {
                kind: json_kind(&value),
            });
        };

        let mut fields = BTreeMap::new();
        for (key, value) in map {
            let flat = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(MetadataParseError::UnsupportedValue {
                        field: key,
                        kind: json_kind(&other),
                    })
                }
            };
            fields.insert(key, flat);
        }
        Ok(Self(fields))
    }

    /// Look up a field value.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether the field is present (with any value, including empty).
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Metadata
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_string_fields() {
        let md = Metadata::from_json(r#"{"meta_destination_id":"ndlp","filename":"x.jpg"}"#)
            .unwrap();
        assert_eq!(md.get("meta_destination_id"), Some("ndlp"));
        assert_eq!(md.get("filename"), Some("x.jpg"));
        assert_eq!(md.len(), 2);
    }

    #[test]
    fn flattens_numbers_and_booleans() {
        let md = Metadata::from_json(r#"{"version": 2.0, "count": 3, "flag": true}"#).unwrap();
        assert_eq!(md.get("version"), Some("2.0"));
        assert_eq!(md.get("count"), Some("3"));
        assert_eq!(md.get("flag"), Some("true"));
    }

    #[test]
    fn empty_object_is_empty_metadata() {
        let md = Metadata::from_json("{}").unwrap();
        assert!(md.is_empty());
    }

    #[test]
    fn rejects_non_object() {
        let err = Metadata::from_json("[1,2]").unwrap_err();
        assert!(matches!(err, MetadataParseError::NotAnObject { kind: "array" }));
    }

    #[test]
    fn rejects_nested_values() {
        let err = Metadata::from_json(r#"{"a": {"b": 1}}"#).unwrap_err();
        match err {
            MetadataParseError::UnsupportedValue { field, kind } => {
                assert_eq!(field, "a");
                assert_eq!(kind, "object");
            }
            other => panic!("expected UnsupportedValue, got {other}"),
        }
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            Metadata::from_json("not json"),
            Err(MetadataParseError::Json(_))
        ));
    }

    #[test]
    fn serializes_with_sorted_keys() {
        let md: Metadata = [("z", "1"), ("a", "2")].into_iter().collect();
        assert_eq!(serde_json::to_string(&md).unwrap(), r#"{"a":"2","z":"1"}"#);
    }

    #[test]
    fn contains_sees_empty_values() {
        let md: Metadata = [("filename", "")].into_iter().collect();
        assert!(md.contains("filename"));
        assert!(!md.contains("original_filename"));
    }
}
