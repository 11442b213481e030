//! # Upload-Config Documents
//!
//! Two document shapes are in circulation:
//!
//! ```json
//! {"metadata_config": {"version": "1.0", "fields": [ ... ]}, "copy_config": { ... }}
//! ```
//!
//! and the legacy array of versioned definitions:
//!
//! ```json
//! [{"schema_version": "1.0", "fields": [ ... ]}, {"schema_version": "1.1", "fields": [ ... ]}]
//! ```
//!
//! Keys other than the ones modelled here are ignored. Legacy rules may
//! spell `field_name` as `fieldname` and `required` as the strings
//! `"true"`/`"false"`.

use dexhook_core::SchemaVersion;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::SchemaFetchCause;

/// One metadata field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    #[serde(alias = "fieldname")]
    pub field_name: String,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub required: bool,
    /// Empty or absent means any value is accepted.
    #[serde(default)]
    pub allowed_values: Option<Vec<String>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

impl FieldRule {
    /// The allow-list, if it constrains anything.
    pub fn allowed(&self) -> Option<&[String]> {
        self.allowed_values
            .as_deref()
            .filter(|values| !values.is_empty())
    }
}

/// An ordered list of field rules, optionally tagged with its version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataDefinition {
    #[serde(default, alias = "schema_version")]
    pub version: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldRule>,
}

impl MetadataDefinition {
    pub fn schema_version(&self) -> Option<SchemaVersion> {
        self.version
            .as_deref()
            .and_then(|v| SchemaVersion::parse(v).ok())
    }
}

/// A decoded upload-config document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadConfig {
    /// `{"metadata_config": ...}`: exactly one definition.
    Single(MetadataDefinition),
    /// Legacy array of versioned definitions.
    Versioned(Vec<MetadataDefinition>),
}

#[derive(Deserialize)]
struct CurrentShape {
    metadata_config: MetadataDefinition,
}

impl UploadConfig {
    /// Decode either document shape.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(bytes)?;
        if value.is_array() {
            Ok(Self::Versioned(serde_json::from_value(value)?))
        } else {
            let current: CurrentShape = serde_json::from_value(value)?;
            Ok(Self::Single(current.metadata_config))
        }
    }

    /// Pick the definition to validate against.
    ///
    /// A single-definition document always yields its definition. For the
    /// versioned shape, `requested` (the metadata's `schema_version`) must
    /// match one definition numerically; without a request the oldest
    /// definition is used.
    pub fn select(&self, requested: Option<&str>) -> Result<&MetadataDefinition, SchemaFetchCause> {
        let definitions = match self {
            Self::Single(definition) => return Ok(definition),
            Self::Versioned(definitions) => definitions,
        };

        if let Some(requested) = requested {
            let wanted = SchemaVersion::parse(requested).ok();
            return definitions
                .iter()
                .find(|d| wanted.is_some() && d.schema_version() == wanted)
                .ok_or_else(|| SchemaFetchCause::VersionUnavailable {
                    requested: requested.to_string(),
                    available: definitions
                        .iter()
                        .filter_map(|d| d.version.clone())
                        .collect(),
                });
        }

        definitions
            .iter()
            .filter_map(|d| d.schema_version().map(|v| (v, d)))
            .min_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, d)| d)
            .or_else(|| definitions.first())
            .ok_or(SchemaFetchCause::NoDefinitions)
    }
}

fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(false),
        Some(Flag::Bool(b)) => Ok(b),
        Some(Flag::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected boolean or \"true\"/\"false\" for 'required', got \"{other}\""
            ))),
        },
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
