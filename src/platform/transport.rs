use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use super::error::TransportError;

/// Authenticated request/response capability used by the job model.
///
/// Endpoints are relative to the platform base URL (e.g. `jobs/`). Bodies and
/// responses are raw JSON; decoding into typed responses happens in the
/// caller. Implementations own retries, timeouts and connection reuse.
#[async_trait]
pub trait Transport: Send + Sync {
    /// `GET` an endpoint and return its JSON body.
    async fn get_json(&self, endpoint: &str) -> Result<Value, TransportError>;

    /// `POST` an optional JSON body and return the JSON response.
    /// An empty response body comes back as `Value::Null`.
    async fn post_json(&self, endpoint: &str, body: Option<&Value>)
    -> Result<Value, TransportError>;

    /// Upload a local file and return the platform's response, which carries
    /// the new file id.
    async fn upload_file(&self, path: &Path) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn get_json(&self, endpoint: &str) -> Result<Value, TransportError> {
        (**self).get_json(endpoint).await
    }

    async fn post_json(
        &self,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        (**self).post_json(endpoint, body).await
    }

    async fn upload_file(&self, path: &Path) -> Result<Value, TransportError> {
        (**self).upload_file(path).await
    }
}
