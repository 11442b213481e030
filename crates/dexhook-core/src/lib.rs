//! # dexhook-core — Foundational Types for the Upload Hook Layer
//!
//! Every other `dexhook-*` crate depends on this one; it depends on nothing
//! internal. It holds the pieces that are shared between metadata
//! validation and status reporting:
//!
//! - [`Metadata`] — the immutable key/value map supplied with an upload.
//! - [`SchemaVersion`] — dotted numeric versions compared component-wise.
//! - [`MetadataVersion`] and [`resolve`] — which id-pair fields apply to a
//!   declared metadata version, and the resolved use case for the upload.
//! - [`ValidationIssue`] — one failed metadata constraint.
//! - [`UploadTraceContext`] — the trace/span handles for one upload.
//!
//! ## Crate Policy
//!
//! - No I/O. Everything here is pure and synchronous.
//! - No `.unwrap()` outside tests.

pub mod error;
pub mod issue;
pub mod metadata;
pub mod resolver;
pub mod trace;
pub mod version;

pub use error::{MetadataParseError, ResolveError, VersionParseError};
pub use issue::ValidationIssue;
pub use metadata::Metadata;
pub use resolver::{resolve, MetadataVersion, ResolvedUpload, VERSION_FIELD};
pub use trace::{TraceSpan, UploadTraceContext};
pub use version::SchemaVersion;
