//! # Error Types
//!
//! Errors raised while interpreting upload metadata before any schema is
//! fetched. Each variant carries the offending values so that callers can
//! build reports without parsing messages.

use thiserror::Error;

/// The metadata argument could not be turned into a [`crate::Metadata`].
#[derive(Error, Debug)]
pub enum MetadataParseError {
    /// Not valid JSON at all.
    #[error("metadata is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON, but not an object.
    #[error("metadata must be a JSON object, got {kind}")]
    NotAnObject {
        /// JSON type name of the top-level value.
        kind: &'static str,
    },

    /// A field holds a value that has no flat string form.
    #[error("metadata field '{field}' must be a string, number or boolean, got {kind}")]
    UnsupportedValue {
        /// Offending field name.
        field: String,
        /// JSON type name of the value.
        kind: &'static str,
    },
}

/// A dotted version string could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionParseError {
    /// Input was empty or whitespace.
    #[error("version string is empty")]
    Empty,

    /// A dot-separated component is not a base-10 integer.
    #[error("version '{version}' has non-numeric component '{component}'")]
    NonNumeric {
        /// The full input.
        version: String,
        /// The component that failed to parse (trimmed).
        component: String,
    },
}

/// Resolving the metadata version and use-case ids failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The declared `version` is not one of the supported metadata versions.
    #[error("Unsupported metadata version: {version}")]
    UnsupportedVersion {
        /// Version string exactly as declared.
        version: String,
    },

    /// One or more id fields required by the resolved version are absent.
    #[error("Missing one or more required metadata fields: {}", ResolveError::format_fields(.fields))]
    MissingFields {
        /// Absent field names, in rule order.
        fields: Vec<String>,
    },
}

impl ResolveError {
    /// `['a', 'b']`
    pub fn format_fields(fields: &[String]) -> String {
        let quoted: Vec<String> = fields.iter().map(|f| format!("'{f}'")).collect();
        format!("[{}]", quoted.join(", "))
    }
}
