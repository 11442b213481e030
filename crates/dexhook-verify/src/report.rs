//! The JSON report attached to the `metadata-verify` span when metadata is
//! rejected.

use dexhook_core::{resolve, Metadata, VERSION_FIELD};
use dexhook_schema::extract_filename;
use serde::Serialize;

use crate::error::VerifyError;

/// Value of `schema_name` in every verification report.
pub const REPORT_SCHEMA_NAME: &str = "dex-metadata-verify";

/// Body of `POST /api/report/json/uploadId/{upload_id}` for a rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataVerifyReport {
    /// Resolved metadata version; the declared string if resolution failed.
    pub schema_version: Option<String>,
    pub schema_name: String,
    pub filename: Option<String>,
    pub metadata: Metadata,
    pub issues: Vec<String>,
}

impl MetadataVerifyReport {
    pub fn new(metadata: &Metadata, error: &VerifyError) -> Self {
        let schema_version = match resolve(metadata) {
            Ok(resolved) => Some(resolved.version.as_str().to_string()),
            Err(_) => metadata.get(VERSION_FIELD).map(str::to_string),
        };

        Self {
            schema_version,
            schema_name: REPORT_SCHEMA_NAME.to_string(),
            filename: extract_filename(metadata).ok().map(str::to_string),
            metadata: metadata.clone(),
            issues: error.issue_messages(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dexhook_core::ValidationIssue;
    use serde_json::json;

    fn md(pairs: &[(&str, &str)]) -> Metadata {
        pairs.iter().copied().collect()
    }

    #[test]
    fn report_for_validation_failure() {
        let metadata = md(&[
            ("meta_destination_id", "ndlp"),
            ("meta_ext_event", "ri"),
            ("original_filename", "a/b.csv"),
        ]);
        let error = VerifyError::ValidationFailed {
            issues: vec![ValidationIssue::InvalidFilename {
                filename: "a/b.csv".into(),
                characters: vec!['/'],
            }],
        };

        let report = MetadataVerifyReport::new(&metadata, &error);
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "schema_version": "1.0",
                "schema_name": "dex-metadata-verify",
                "filename": "a/b.csv",
                "metadata": {
                    "meta_destination_id": "ndlp",
                    "meta_ext_event": "ri",
                    "original_filename": "a/b.csv",
                },
                "issues": ["Filename 'a/b.csv' contains invalid characters: '/'"],
            })
        );
    }

    #[test]
    fn unsupported_version_keeps_declared_string() {
        let metadata = md(&[("version", "9.9")]);
        let error = VerifyError::UnsupportedVersion {
            version: "9.9".into(),
        };
        let report = MetadataVerifyReport::new(&metadata, &error);
        assert_eq!(report.schema_version.as_deref(), Some("9.9"));
        assert_eq!(report.filename, None);
        assert_eq!(report.issues, vec!["Unsupported metadata version: 9.9".to_string()]);
    }

    #[test]
    fn undeclared_version_with_missing_ids_is_null() {
        let metadata = Metadata::default();
        let error = VerifyError::MissingFields {
            fields: vec!["meta_destination_id".into(), "meta_ext_event".into()],
        };
        let value = serde_json::to_value(MetadataVerifyReport::new(&metadata, &error)).unwrap();
        assert_eq!(value["schema_version"], serde_json::Value::Null);
        assert_eq!(value["filename"], serde_json::Value::Null);
    }
}
