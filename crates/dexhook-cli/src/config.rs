//! Hook configuration from the environment.
//!
//! | Variable | Used by |
//! |----------|---------|
//! | `UPLOAD_CONFIG_DIR` / `UPLOAD_CONFIG_URL` | pre-create schema lookup |
//! | `PS_API_URL`, `PS_API_MAX_RETRIES`, `PS_API_RETRY_DELAY_SECS`, `PS_API_TIMEOUT_SECS` | status reporting |
//!
//! Variables are read through a lookup function so tests do not touch the
//! process environment.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use dexhook_schema::{
    DirectorySchemaStore, HttpSchemaStore, SchemaKey, SchemaStore, SchemaStoreError, UploadConfig,
};
use dexhook_status_client::{ConfigError, StatusApiConfig, StatusClient};
use url::Url;

pub const UPLOAD_CONFIG_DIR: &str = "UPLOAD_CONFIG_DIR";
pub const UPLOAD_CONFIG_URL: &str = "UPLOAD_CONFIG_URL";

const SCHEMA_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where upload-config documents are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    Directory(PathBuf),
    Http(Url),
}

impl SchemaSource {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// The directory wins when both variables are set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let set = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(dir) = set(UPLOAD_CONFIG_DIR) {
            return Ok(Self::Directory(PathBuf::from(dir)));
        }
        if let Some(raw) = set(UPLOAD_CONFIG_URL) {
            let url = Url::parse(raw.trim())
                .with_context(|| format!("invalid URL in {UPLOAD_CONFIG_URL}: {raw}"))?;
            return Ok(Self::Http(url));
        }
        bail!("one of {UPLOAD_CONFIG_DIR} or {UPLOAD_CONFIG_URL} must be set")
    }

    pub fn into_store(self) -> Result<ConfiguredStore> {
        Ok(match self {
            Self::Directory(root) => ConfiguredStore::Directory(DirectorySchemaStore::new(root)),
            Self::Http(base_url) => ConfiguredStore::Http(
                HttpSchemaStore::new(base_url, SCHEMA_FETCH_TIMEOUT)
                    .context("cannot build upload-config HTTP client")?,
            ),
        })
    }
}

/// The schema store selected by [`SchemaSource`].
#[derive(Debug)]
pub enum ConfiguredStore {
    Directory(DirectorySchemaStore),
    Http(HttpSchemaStore),
}

impl SchemaStore for ConfiguredStore {
    async fn fetch(&self, key: &SchemaKey) -> Result<UploadConfig, SchemaStoreError> {
        match self {
            Self::Directory(store) => store.fetch(key).await,
            Self::Http(store) => store.fetch(key).await,
        }
    }
}

/// Status client for hooks that only report on failure. `None` when
/// `PS_API_URL` is unset; any other configuration problem is an error.
pub fn optional_status_client() -> Result<Option<StatusClient>> {
    match StatusApiConfig::from_env() {
        Ok(config) => Ok(Some(StatusClient::new(config)?)),
        Err(ConfigError::MissingUrl) => {
            tracing::warn!("PS_API_URL not set; status reporting disabled");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Status client for hooks whose whole job is status tracing.
pub fn required_status_client() -> Result<StatusClient> {
    let config = StatusApiConfig::from_env().context("status API configuration")?;
    Ok(StatusClient::new(config)?)
}
