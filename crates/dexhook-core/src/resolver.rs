//! # Metadata Version Resolution
//!
//! An upload declares its metadata version in the optional `version` field.
//! The version decides which pair of fields names the upload's use case:
//!
//! | Version | Use case field | Use case category field |
//! |---------|----------------|-------------------------|
//! | `1.0`   | `meta_destination_id` | `meta_ext_event` |
//! | `2.0`   | `data_stream_id` | `data_stream_route` |
//!
//! Absent `version` means `1.0`, the oldest supported version. Declared
//! versions are matched numerically, so `"2"` and `"2.00"` both resolve to
//! `2.0`. The id values are returned verbatim; nothing here interprets them.

use std::fmt;

use serde::Serialize;

use crate::error::ResolveError;
use crate::metadata::Metadata;
use crate::version::SchemaVersion;

/// Metadata field holding the declared version.
pub const VERSION_FIELD: &str = "version";

/// A supported metadata version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MetadataVersion {
    #[serde(rename = "1.0")]
    V1,
    #[serde(rename = "2.0")]
    V2,
}

impl MetadataVersion {
    /// Every supported version, oldest first.
    pub const SUPPORTED: [MetadataVersion; 2] = [MetadataVersion::V1, MetadataVersion::V2];

    /// Canonical version string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "1.0",
            Self::V2 => "2.0",
        }
    }

    /// Field names of the `(use_case, use_case_category)` pair.
    pub fn id_fields(self) -> [&'static str; 2] {
        match self {
            Self::V1 => ["meta_destination_id", "meta_ext_event"],
            Self::V2 => ["data_stream_id", "data_stream_route"],
        }
    }

    /// Major component, used to pick the schema folder (`v1/`, `v2/`).
    pub fn major(self) -> u64 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
        }
    }

    /// Match a declared version string against the supported set.
    pub fn parse(declared: &str) -> Result<Self, ResolveError> {
        let unsupported = || ResolveError::UnsupportedVersion {
            version: declared.to_string(),
        };
        let wanted = SchemaVersion::parse(declared).map_err(|_| unsupported())?;
        Self::SUPPORTED
            .into_iter()
            .find(|v| SchemaVersion::parse(v.as_str()).is_ok_and(|s| s == wanted))
            .ok_or_else(unsupported)
    }

    /// Read the version declared in `metadata`, defaulting to the oldest.
    pub fn from_metadata(metadata: &Metadata) -> Result<Self, ResolveError> {
        match metadata.get(VERSION_FIELD) {
            Some(declared) => Self::parse(declared),
            None => Ok(Self::SUPPORTED[0]),
        }
    }
}

impl fmt::Display for MetadataVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedUpload {
    pub version: MetadataVersion,
    /// Formerly "destination id".
    pub use_case: String,
    /// Formerly "event type".
    pub use_case_category: String,
}

/// Resolve the metadata version and use-case ids of an upload.
///
/// Fails with [`ResolveError::UnsupportedVersion`] before looking at any
/// other field, and with [`ResolveError::MissingFields`] naming every absent
/// id field.
pub fn resolve(metadata: &Metadata) -> Result<ResolvedUpload, ResolveError> {
    let version = MetadataVersion::from_metadata(metadata)?;
    let [use_case_field, category_field] = version.id_fields();

    let missing: Vec<String> = version
        .id_fields()
        .into_iter()
        .filter(|f| !metadata.contains(f))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(ResolveError::MissingFields { fields: missing });
    }

    match (metadata.get(use_case_field), metadata.get(category_field)) {
        (Some(use_case), Some(category)) => Ok(ResolvedUpload {
            version,
            use_case: use_case.to_string(),
            use_case_category: category.to_string(),
        }),
        _ => Err(ResolveError::MissingFields {
            fields: vec![use_case_field.to_string(), category_field.to_string()],
        }),
    }
}
