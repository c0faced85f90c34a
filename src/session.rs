use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::JobError;
use crate::model::analysis::Software;
use crate::model::{File, FileSource, VersionCatalog};
use crate::platform::{IdResponse, Transport, TransportError, VersionEntry};

/// A transport paired with the version catalog it fills.
///
/// Jobs borrow a session for every platform call. [`Session::new`] shares the
/// process-wide catalog; [`Session::with_catalog`] gives tests a private one.
pub struct Session<T> {
    transport: T,
    catalog: Arc<VersionCatalog>,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T) -> Self {
        Self::with_catalog(transport, VersionCatalog::global())
    }

    pub fn with_catalog(transport: T, catalog: Arc<VersionCatalog>) -> Self {
        Self { transport, catalog }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn catalog(&self) -> &VersionCatalog {
        &self.catalog
    }

    /// Ordered version catalog of `S`.
    pub async fn versions<S: Software>(&self) -> Result<Arc<[VersionEntry]>, JobError> {
        self.versions_for(S::CODE).await
    }

    /// Ordered version catalog of the software with platform code `software`.
    pub async fn versions_for(&self, software: &str) -> Result<Arc<[VersionEntry]>, JobError> {
        self.catalog.versions(&self.transport, software).await
    }

    /// Map a human-readable version label of `S` to its platform code.
    pub async fn get_version_code<S: Software>(&self, label: &str) -> Result<String, JobError> {
        self.catalog
            .code_for_label(&self.transport, S::CODE, label)
            .await
    }

    pub(crate) async fn resolve_version(
        &self,
        software: &str,
        requested: &str,
    ) -> Result<String, JobError> {
        self.catalog
            .resolve(&self.transport, software, requested)
            .await
    }

    /// Upload a local file and record its new id. Already-resolved files are
    /// returned as-is without a network call.
    pub async fn upload(&self, file: &File) -> Result<String, JobError> {
        let path = match file.source() {
            FileSource::Remote { id, .. } => return Ok(id),
            FileSource::Local(path) => path,
        };
        let body = self.transport.upload_file(&path).await?;
        let IdResponse { id } = decode("files/contents/", body)?;
        if id.is_empty() {
            return Err(TransportError::unexpected("files/contents/", "empty file id").into());
        }
        debug!(file = %path.display(), id = %id, "uploaded input file");
        file.mark_uploaded(id.clone());
        Ok(id)
    }

    /// One page of the core types available to the account.
    pub async fn list_core_types(&self, page: u32) -> Result<Value, JobError> {
        Ok(self
            .transport
            .get_json(&format!("coretypes/?page={page}"))
            .await?)
    }

    /// One page of the software (analyses) available to the account.
    pub async fn list_software(&self, page: u32) -> Result<Value, JobError> {
        Ok(self
            .transport
            .get_json(&format!("analyses/?page={page}"))
            .await?)
    }
}

/// Decode a response body into `R`, naming the endpoint on failure.
pub(crate) fn decode<R: serde::de::DeserializeOwned>(
    endpoint: &str,
    body: Value,
) -> Result<R, TransportError> {
    serde_json::from_value(body).map_err(|e| TransportError::unexpected(endpoint, e.to_string()))
}
