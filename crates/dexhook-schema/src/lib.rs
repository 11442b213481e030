//! # dexhook-schema — Upload-Config Schemas & Metadata Validation
//!
//! Each use case publishes an upload-config document in a blob container,
//! keyed `v{major}/{use_case}-{use_case_category}.json`. The document's
//! `metadata_config` lists the field rules an upload's metadata must meet.
//!
//! ## Modules
//!
//! - [`document`] — typed decoding of upload-config documents, including
//!   the legacy multi-version array shape.
//! - [`store`] — the [`SchemaStore`] trait and its directory and HTTP blob
//!   backends. One fetch attempt per call; no caching.
//! - [`validate`] — required-field and allow-list checks, plus filename
//!   extraction and forbidden-character checks.
//!
//! ## Crate Policy
//!
//! - Depends only on `dexhook-core` internally.
//! - A missing document and an unparsable one are different causes; both
//!   surface as [`SchemaStoreError::SchemaNotFound`] with the cause chained.

pub mod document;
pub mod error;
pub mod store;
pub mod validate;

pub use document::{FieldRule, MetadataDefinition, UploadConfig};
pub use error::{SchemaFetchCause, SchemaStoreError};
pub use store::{DirectorySchemaStore, HttpSchemaStore, SchemaKey, SchemaStore};
pub use validate::{
    extract_filename, validate, verify_filename, FilenameError, FILENAME_FIELDS,
    INVALID_FILENAME_CHARS,
};
