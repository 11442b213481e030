//! # dexhook-verify — Upload Hook Flows
//!
//! Composes version resolution, schema lookup, metadata validation and
//! status reporting into the three flows the upload server invokes:
//!
//! - **pre-create**: [`ValidationOrchestrator::verify`] accepts or rejects
//!   an upload's metadata. Rejections are reported to the status service
//!   under a `metadata-verify` span before the error is returned.
//! - **post-create**: [`post_create`] opens the upload's trace and starts
//!   its `dex-upload` span.
//! - **post-finish**: [`post_finish`] stops the `dex-upload` span.
//!
//! Reporting never changes the outcome of verification. If the status
//! service is down the rejection still reaches the caller unchanged.

pub mod error;
pub mod lifecycle;
pub mod orchestrator;
pub mod report;

pub use error::{LifecycleError, VerifyError};
pub use lifecycle::{post_create, post_finish, UPLOAD_STAGE};
pub use orchestrator::{ValidationOrchestrator, NOT_PROVIDED, SCHEMA_VERSION_FIELD, VERIFY_STAGE};
pub use report::{MetadataVerifyReport, REPORT_SCHEMA_NAME};

/// A fresh upload id for hooks that run before the upload server has
/// assigned one.
pub fn generate_upload_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
