//! Error types for the hook flows.
//!
//! [`VerifyError`] is the tagged outcome of a rejected verification; callers
//! branch on the variant. Status-service failures are never folded into it.

use dexhook_core::{ResolveError, ValidationIssue};
use dexhook_schema::SchemaStoreError;
use dexhook_status_client::StatusApiError;
use thiserror::Error;

/// Why metadata was rejected.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The declared metadata version is not supported.
    #[error("Unsupported metadata version: {version}")]
    UnsupportedVersion { version: String },

    /// Id fields required by the metadata version are absent.
    #[error("Missing one or more required metadata fields: {}", ResolveError::format_fields(.fields))]
    MissingFields { fields: Vec<String> },

    /// No usable upload-config document for the upload's use case.
    #[error(transparent)]
    SchemaNotFound(#[from] SchemaStoreError),

    /// The metadata broke one or more rules. Every issue is listed.
    #[error("{}", join_issues(.issues))]
    ValidationFailed { issues: Vec<ValidationIssue> },
}

impl VerifyError {
    /// Issue lines for the status report.
    pub fn issue_messages(&self) -> Vec<String> {
        match self {
            Self::ValidationFailed { issues } => issues.iter().map(ToString::to_string).collect(),
            other => vec![other.to_string()],
        }
    }
}

impl From<ResolveError> for VerifyError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::UnsupportedVersion { version } => Self::UnsupportedVersion { version },
            ResolveError::MissingFields { fields } => Self::MissingFields { fields },
        }
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure of the post-create or post-finish flow.
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Status(#[from] StatusApiError),
}
