//! Recording in-memory transport shared by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::platform::{Transport, TransportError};

#[derive(Default)]
pub struct MockTransport {
    gets: Mutex<HashMap<String, VecDeque<Value>>>,
    posts: Mutex<HashMap<String, Result<Value, u16>>>,
    upload_ids: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<String>>,
    bodies: Mutex<Vec<(String, Value)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a GET response. The last queued response repeats.
    pub fn with_get(self, endpoint: &str, body: Value) -> Self {
        self.gets
            .lock()
            .unwrap()
            .entry(endpoint.to_string())
            .or_default()
            .push_back(body);
        self
    }

    pub fn with_post(self, endpoint: &str, body: Value) -> Self {
        self.posts
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), Ok(body));
        self
    }

    /// Make a POST fail with the given HTTP status.
    pub fn with_post_error(self, endpoint: &str, status: u16) -> Self {
        self.posts
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), Err(status));
        self
    }

    pub fn with_upload_id(self, id: &str) -> Self {
        self.upload_ids.lock().unwrap().push_back(id.to_string());
        self
    }

    /// Add the standard create/submit responses for job `id`.
    pub fn accepting_job(self, id: &str) -> Self {
        self.with_post("jobs/", json!({ "id": id }))
            .with_post(&format!("jobs/{id}/submit/"), Value::Null)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn body_of(&self, endpoint: &str) -> Option<Value> {
        self.bodies
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(e, _)| e == endpoint)
            .map(|(_, b)| b.clone())
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn not_found(endpoint: &str) -> TransportError {
    TransportError::Api {
        status: 404,
        message: format!("no mock response for {endpoint}"),
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get_json(&self, endpoint: &str) -> Result<Value, TransportError> {
        self.record(format!("GET {endpoint}"));
        let mut gets = self.gets.lock().unwrap();
        let queue = gets.get_mut(endpoint).ok_or_else(|| not_found(endpoint))?;
        let body = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        body.ok_or_else(|| not_found(endpoint))
    }

    async fn post_json(
        &self,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        self.record(format!("POST {endpoint}"));
        if let Some(body) = body {
            self.bodies
                .lock()
                .unwrap()
                .push((endpoint.to_string(), body.clone()));
        }
        match self.posts.lock().unwrap().get(endpoint) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(status)) => Err(TransportError::Api {
                status: *status,
                message: "mock failure".into(),
            }),
            None => Err(not_found(endpoint)),
        }
    }

    async fn upload_file(&self, path: &Path) -> Result<Value, TransportError> {
        self.record(format!("UPLOAD {}", path.display()));
        let id = self
            .upload_ids
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| not_found("files/contents/"))?;
        Ok(json!({ "id": id }))
    }
}

/// A small Abaqus catalog in the platform's `{label, code}` shape.
pub fn abaqus_versions() -> Value {
    json!([
        {"label": "2024 HF4 (FlexNet Licensing)", "code": "2024-hf4"},
        {"label": "2023 HF9 (FlexNet Licensing)", "code": "2023-hf9"},
        {"label": "2023 HF4 (FlexNet Licensing)", "code": "2023-hf4"},
        {"label": "2022.HF9 (FlexNet Licensing)", "code": "2022-2328"},
        {"label": "2022.HF5 (FlexNet Licensing)", "code": "2022-2241"},
        {"label": "2022 Golden (FlexNet Licensing)", "code": "2022-golden"},
        {"label": "6.14-5", "code": "6.14.5-pcmpi"}
    ])
}
