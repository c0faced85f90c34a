use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;

use super::error::TransportError;
use super::transport::Transport;
use crate::config::RescaleConfig;

pub const API_URL: &str = "https://platform.rescale.com/api/v2/";

/// `reqwest`-backed [`Transport`] for the Rescale REST API.
pub struct RescaleClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl RescaleClient {
    pub fn new(api_key: String) -> Result<Self, TransportError> {
        Self::with_base_url(api_key, API_URL.to_string())
    }

    /// Create a client pointing at a custom base URL (useful for testing).
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, TransportError> {
        Self::build(api_key, base_url, Duration::from_secs(10), Duration::from_secs(60))
    }

    pub fn from_config(config: &RescaleConfig) -> Result<Self, TransportError> {
        Self::build(
            config.api_key.clone(),
            config.base_url.clone(),
            Duration::from_secs(config.connect_timeout_secs),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn build(
        api_key: String,
        base_url: String,
        connect_timeout: Duration,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            api_key,
            client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        join_url(&self.base_url, endpoint)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("Authorization", format!("Token {}", self.api_key))
    }
}

fn join_url(base: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// Turn a response into JSON, mapping non-2xx statuses to
/// [`TransportError::Api`]. Empty bodies become `Value::Null`.
async fn read_json(endpoint: &str, response: Response) -> Result<Value, TransportError> {
    let status = response.status();

    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(TransportError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body = response.bytes().await?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&body).map_err(|e| TransportError::unexpected(endpoint, e.to_string()))
}

#[async_trait]
impl Transport for RescaleClient {
    async fn get_json(&self, endpoint: &str) -> Result<Value, TransportError> {
        debug!(endpoint, "GET");
        let response = self
            .authorized(self.client.get(self.url(endpoint)))
            .send()
            .await?;
        read_json(endpoint, response).await
    }

    async fn post_json(
        &self,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        debug!(endpoint, "POST");
        let mut req = self.authorized(self.client.post(self.url(endpoint)));
        if let Some(body) = body {
            req = req.json(body);
        }
        let response = req.send().await?;
        read_json(endpoint, response).await
    }

    async fn upload_file(&self, path: &Path) -> Result<Value, TransportError> {
        const ENDPOINT: &str = "files/contents/";

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| TransportError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        debug!(endpoint = ENDPOINT, file = %path.display(), size = bytes.len(), "upload");

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));
        let response = self
            .authorized(self.client.post(self.url(ENDPOINT)))
            .multipart(form)
            .send()
            .await?;
        read_json(ENDPOINT, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_handles_slashes() {
        assert_eq!(
            join_url("https://platform.rescale.com/api/v2/", "jobs/"),
            "https://platform.rescale.com/api/v2/jobs/"
        );
        assert_eq!(
            join_url("http://127.0.0.1:9000", "/jobs/abc/submit/"),
            "http://127.0.0.1:9000/jobs/abc/submit/"
        );
    }

    #[test]
    fn default_base_url() {
        let client = RescaleClient::new("key".into()).unwrap();
        assert_eq!(client.base_url(), API_URL);
    }

    #[test]
    fn from_config_uses_configured_url() {
        let config = RescaleConfig {
            base_url: "https://eu.rescale.com/api/v2/".into(),
            ..RescaleConfig::default()
        };
        let client = RescaleClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "https://eu.rescale.com/api/v2/");
    }
}
