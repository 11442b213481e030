//! # Metadata Validation
//!
//! Checks upload metadata against a [`MetadataDefinition`]. Every rule is
//! evaluated; issues come back in the order the rules appear in the
//! document, so the same input always yields the same list.
//!
//! Filename handling is separate from the field rules: the upload's name can
//! arrive under several field names, and some characters are never allowed.

use std::collections::BTreeSet;

use dexhook_core::{Metadata, ValidationIssue};
use thiserror::Error;

use crate::document::MetadataDefinition;

/// Fields that may carry the filename, highest priority first.
pub const FILENAME_FIELDS: [&str; 3] = ["filename", "original_filename", "meta_ext_filename"];

/// Characters that may not appear in a filename.
pub const INVALID_FILENAME_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Evaluate every field rule. An empty result means the metadata is valid.
pub fn validate(metadata: &Metadata, definition: &MetadataDefinition) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for rule in &definition.fields {
        match metadata.get(&rule.field_name) {
            None if rule.required => issues.push(ValidationIssue::MissingRequired {
                field: rule.field_name.clone(),
                description: rule.description.clone(),
            }),
            None => {}
            Some(value) => {
                if let Some(allowed) = rule.allowed() {
                    if !allowed.iter().any(|a| a == value) {
                        issues.push(ValidationIssue::NotAllowed {
                            field: rule.field_name.clone(),
                            value: value.to_string(),
                            allowed: allowed.to_vec(),
                        });
                    }
                }
            }
        }
    }

    issues
}

/// Filename problems.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilenameError {
    #[error("No filename provided; expected one of: {}", FILENAME_FIELDS.join(", "))]
    NoFilename,

    #[error("Filename '{filename}' contains invalid characters: {}", quote_chars(.characters))]
    InvalidFilename {
        filename: String,
        /// Deduplicated and sorted.
        characters: Vec<char>,
    },
}

impl From<FilenameError> for ValidationIssue {
    fn from(err: FilenameError) -> Self {
        match err {
            FilenameError::NoFilename => ValidationIssue::NoFilename {
                candidates: FILENAME_FIELDS.iter().map(|f| f.to_string()).collect(),
            },
            FilenameError::InvalidFilename {
                filename,
                characters,
            } => ValidationIssue::InvalidFilename {
                filename,
                characters,
            },
        }
    }
}

fn quote_chars(chars: &[char]) -> String {
    chars
        .iter()
        .map(|c| format!("'{c}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The upload's filename: the first of [`FILENAME_FIELDS`] that is present.
pub fn extract_filename(metadata: &Metadata) -> Result<&str, FilenameError> {
    FILENAME_FIELDS
        .iter()
        .find_map(|field| metadata.get(field))
        .ok_or(FilenameError::NoFilename)
}

/// Reject filenames containing any of [`INVALID_FILENAME_CHARS`].
pub fn verify_filename(name: &str) -> Result<(), FilenameError> {
    let found: BTreeSet<char> = name
        .chars()
        .filter(|c| INVALID_FILENAME_CHARS.contains(c))
        .collect();

    if found.is_empty() {
        Ok(())
    } else {
        Err(FilenameError::InvalidFilename {
            filename: name.to_string(),
            characters: found.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::FieldRule;

    fn md(pairs: &[(&str, &str)]) -> Metadata {
        pairs.iter().copied().collect()
    }

    fn rule(name: &str, required: bool, allowed: Option<&[&str]>, description: &str) -> FieldRule {
        FieldRule {
            field_name: name.into(),
            required,
            allowed_values: allowed.map(|a| a.iter().map(|s| s.to_string()).collect()),
            description: description.into(),
        }
    }

    fn definition(fields: Vec<FieldRule>) -> MetadataDefinition {
        MetadataDefinition {
            version: Some("1.0".into()),
            fields,
        }
    }

    #[test]
    fn no_required_fields_and_empty_metadata_is_valid() {
        let def = definition(vec![
            rule("a", false, None, ""),
            rule("b", false, Some(&["x"][..]), ""),
        ]);
        assert!(validate(&Metadata::default(), &def).is_empty());
    }

    #[test]
    fn missing_required_field_quotes_description() {
        let def = definition(vec![rule(
            "filename",
            true,
            None,
            "The name of the file submitted.",
        )]);
        let issues = validate(&Metadata::default(), &def);
        assert_eq!(issues.len(), 1);
        let text = issues[0].to_string();
        assert!(text.contains("Missing required metadata 'filename'"), "{text}");
        assert!(text.contains("The name of the file submitted."), "{text}");
    }

    #[test]
    fn present_required_field_passes() {
        let def = definition(vec![rule("filename", true, None, "")]);
        assert!(validate(&md(&[("filename", "x.jpg")]), &def).is_empty());
    }

    #[test]
    fn value_outside_allow_list_is_reported() {
        let def = definition(vec![rule("meta_ext_source", false, Some(&["IZGW", "CELR"][..]), "")]);
        let issues = validate(&md(&[("meta_ext_source", "XYZ")]), &def);
        assert_eq!(
            issues,
            vec![ValidationIssue::NotAllowed {
                field: "meta_ext_source".into(),
                value: "XYZ".into(),
                allowed: vec!["IZGW".into(), "CELR".into()],
            }]
        );
    }

    #[test]
    fn empty_allow_list_accepts_anything() {
        let def = definition(vec![rule("a", true, Some(&[][..]), "")]);
        assert!(validate(&md(&[("a", "whatever")]), &def).is_empty());
    }

    #[test]
    fn all_issues_are_collected_in_document_order() {
        let def = definition(vec![
            rule("z_first", true, None, "first"),
            rule("a_second", false, Some(&["ok"][..]), ""),
            rule("m_third", true, None, "third"),
        ]);
        let issues = validate(&md(&[("a_second", "bad")]), &def);
        let fields: Vec<_> = issues.iter().filter_map(|i| i.field()).collect();
        assert_eq!(fields, vec!["z_first", "a_second", "m_third"]);
    }

    #[test]
    fn filename_priority_order() {
        assert_eq!(extract_filename(&md(&[("filename", "test")])), Ok("test"));
        assert_eq!(
            extract_filename(&md(&[("original_filename", "test")])),
            Ok("test")
        );
        assert_eq!(
            extract_filename(&md(&[("meta_ext_filename", "test")])),
            Ok("test")
        );
        assert_eq!(
            extract_filename(&md(&[
                ("meta_ext_filename", "third"),
                ("original_filename", "second"),
                ("filename", "first"),
            ])),
            Ok("first")
        );
    }

    #[test]
    fn missing_filename_is_an_error() {
        let err = extract_filename(&Metadata::default()).unwrap_err();
        assert_eq!(err, FilenameError::NoFilename);
        assert!(err.to_string().contains("No filename provided"));
    }

    #[test]
    fn plain_filename_is_accepted() {
        assert!(verify_filename("plain_name").is_ok());
        assert!(verify_filename("report 2024-01.csv").is_ok());
    }

    #[test]
    fn slash_is_rejected() {
        let err = verify_filename("a/b").unwrap_err();
        assert_eq!(
            err,
            FilenameError::InvalidFilename {
                filename: "a/b".into(),
                characters: vec!['/'],
            }
        );
    }

    #[test]
    fn invalid_characters_are_listed_once_and_sorted() {
        let err = verify_filename("x?y/z?w:*").unwrap_err();
        let FilenameError::InvalidFilename { characters, .. } = &err else {
            panic!("expected InvalidFilename, got {err}");
        };
        assert_eq!(characters, &vec!['*', '/', ':', '?']);
        let text = err.to_string();
        assert_eq!(text.matches("'?'").count(), 1, "{text}");
    }

    #[test]
    fn filename_error_converts_to_issue() {
        let issue: ValidationIssue = verify_filename("a|b").unwrap_err().into();
        assert_eq!(
            issue,
            ValidationIssue::InvalidFilename {
                filename: "a|b".into(),
                characters: vec!['|'],
            }
        );
    }
}
