//! # Schema Store
//!
//! Read-only access to upload-config documents. The document for an upload
//! lives at `v{major}/{use_case}-{use_case_category}.json`.
//!
//! Each call makes exactly one attempt. Transient failures of the backing
//! store are its own business; they surface here as
//! [`SchemaStoreError::SchemaNotFound`] with the cause attached.

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dexhook_core::ResolvedUpload;
use url::Url;

use crate::document::UploadConfig;
use crate::error::{SchemaFetchCause, SchemaStoreError};

/// Identifies one upload-config document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaKey {
    pub use_case: String,
    pub use_case_category: String,
    pub version_major: u64,
}

impl SchemaKey {
    pub fn new(
        use_case: impl Into<String>,
        use_case_category: impl Into<String>,
        version_major: u64,
    ) -> Self {
        Self {
            use_case: use_case.into(),
            use_case_category: use_case_category.into(),
            version_major,
        }
    }

    /// Key for an upload whose version and ids have been resolved.
    pub fn for_upload(resolved: &ResolvedUpload) -> Self {
        Self::new(
            resolved.use_case.clone(),
            resolved.use_case_category.clone(),
            resolved.version.major(),
        )
    }

    /// `["v{major}", "{use_case}-{use_case_category}.json"]`
    pub fn segments(&self) -> [String; 2] {
        [
            format!("v{}", self.version_major),
            format!("{}-{}.json", self.use_case, self.use_case_category),
        ]
    }

    /// `v{major}/{use_case}-{use_case_category}.json`
    pub fn path(&self) -> String {
        self.segments().join("/")
    }
}

impl fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// A source of upload-config documents.
pub trait SchemaStore {
    /// Fetch and decode the document for `key`.
    fn fetch(
        &self,
        key: &SchemaKey,
    ) -> impl Future<Output = Result<UploadConfig, SchemaStoreError>> + Send;
}

// -- Local directory ----------------------------------------------------------

/// Documents laid out on disk under a root directory.
#[derive(Debug, Clone)]
pub struct DirectorySchemaStore {
    root: PathBuf,
}

impl DirectorySchemaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SchemaStore for DirectorySchemaStore {
    async fn fetch(&self, key: &SchemaKey) -> Result<UploadConfig, SchemaStoreError> {
        let [folder, file] = key.segments();
        // Ids are client-supplied; never let them walk out of the root.
        if file.contains(['/', '\\']) {
            return Err(SchemaStoreError::not_found(key, SchemaFetchCause::Absent));
        }
        let path = self.root.join(folder).join(file);
        tracing::debug!(key = %key, path = %path.display(), "reading upload config");

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SchemaStoreError::not_found(key, SchemaFetchCause::Absent))
            }
            Err(e) => return Err(SchemaStoreError::not_found(key, e)),
        };

        UploadConfig::from_slice(&bytes).map_err(|e| SchemaStoreError::not_found(key, e))
    }
}

// -- Blob container over HTTP -------------------------------------------------

/// Documents served by a blob container at `{base_url}/{key}`.
#[derive(Debug, Clone)]
pub struct HttpSchemaStore {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpSchemaStore {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, SchemaStoreError> {
        if base_url.cannot_be_a_base() {
            return Err(SchemaStoreError::InvalidBaseUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SchemaStoreError::ClientInit)?;
        Ok(Self { http, base_url })
    }

    fn document_url(&self, key: &SchemaKey) -> Result<Url, SchemaStoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SchemaStoreError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(key.segments());
        Ok(url)
    }
}

impl SchemaStore for HttpSchemaStore {
    async fn fetch(&self, key: &SchemaKey) -> Result<UploadConfig, SchemaStoreError> {
        let url = self.document_url(key)?;
        tracing::debug!(key = %key, url = %url, "downloading upload config");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| SchemaStoreError::not_found(key, e))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SchemaStoreError::not_found(key, SchemaFetchCause::Absent));
        }
        if !status.is_success() {
            return Err(SchemaStoreError::not_found(
                key,
                SchemaFetchCause::Status(status.as_u16()),
            ));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| SchemaStoreError::not_found(key, e))?;
        UploadConfig::from_slice(&bytes).map_err(|e| SchemaStoreError::not_found(key, e))
    }
}
