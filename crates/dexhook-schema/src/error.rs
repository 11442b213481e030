//! Schema store error types.

use thiserror::Error;

/// Errors from fetching or selecting an upload-config document.
#[derive(Error, Debug)]
pub enum SchemaStoreError {
    /// No usable document for the key. The cause says why.
    #[error("upload config '{key}' not found: {cause}")]
    SchemaNotFound {
        key: String,
        #[source]
        cause: SchemaFetchCause,
    },

    /// The HTTP client for the blob store could not be built.
    #[error("failed to build upload config client: {0}")]
    ClientInit(#[source] reqwest::Error),

    /// The configured base URL cannot carry a document path.
    #[error("invalid upload config base URL '{0}'")]
    InvalidBaseUrl(String),
}

impl SchemaStoreError {
    pub fn not_found(key: impl ToString, cause: impl Into<SchemaFetchCause>) -> Self {
        Self::SchemaNotFound {
            key: key.to_string(),
            cause: cause.into(),
        }
    }
}

/// Why a document could not be used.
#[derive(Error, Debug)]
pub enum SchemaFetchCause {
    #[error("no document stored at this key")]
    Absent,

    #[error("document is not a valid upload config: {0}")]
    Unparsable(#[from] serde_json::Error),

    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store returned HTTP {0}")]
    Status(u16),

    #[error("requested schema version {requested} not available. Available schema versions: {available:?}")]
    VersionUnavailable {
        requested: String,
        available: Vec<String>,
    },

    #[error("document defines no schema versions")]
    NoDefinitions,
}
