//! # Validation Issues
//!
//! One issue per failed metadata constraint. Issues render to the
//! human-readable lines that end up in the processing-status report.

use std::fmt;

use serde::Serialize;

/// A single failed metadata constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// A field the schema marks as required is absent.
    MissingRequired { field: String, description: String },

    /// A field is present but its value is outside the allow-list.
    NotAllowed {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    /// None of the recognised filename fields is present.
    NoFilename { candidates: Vec<String> },

    /// The filename contains forbidden characters.
    InvalidFilename {
        filename: String,
        /// Deduplicated and sorted.
        characters: Vec<char>,
    },
}

impl ValidationIssue {
    /// Name of the metadata field the issue is about, if there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingRequired { field, .. } | Self::NotAllowed { field, .. } => Some(field),
            Self::NoFilename { .. } | Self::InvalidFilename { .. } => None,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequired { field, description } => {
                write!(
                    f,
                    "Missing required metadata '{field}', description = '{description}'"
                )
            }
            Self::NotAllowed {
                field,
                value,
                allowed,
            } => {
                let quoted: Vec<String> = allowed.iter().map(|a| format!("\"{a}\"")).collect();
                write!(
                    f,
                    "{field} = {value} is not one of the allowed values: [{}]",
                    quoted.join(", ")
                )
            }
            Self::NoFilename { candidates } => {
                write!(f, "No filename provided; expected one of: {}", candidates.join(", "))
            }
            Self::InvalidFilename {
                filename,
                characters,
            } => {
                let listed: Vec<String> = characters.iter().map(|c| format!("'{c}'")).collect();
                write!(
                    f,
                    "Filename '{filename}' contains invalid characters: {}",
                    listed.join(", ")
                )
            }
        }
    }
}
