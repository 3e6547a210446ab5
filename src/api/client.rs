use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};

use super::models::ApiRequest;
use super::response::error_message;
use super::transport::Transport;
use crate::error::{Result, TaskdeskError};

/// Client for the task service. The default header map is shared process-wide
/// state: the session writes it, every request snapshots it at dispatch.
pub struct ApiClient {
    base_url: String,
    default_headers: RwLock<HeaderMap>,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            default_headers: RwLock::new(headers),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn bearer_header(token: &str) -> Result<HeaderValue> {
        HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| TaskdeskError::Other(format!("Invalid authorization header: {}", e)))
    }

    pub fn set_authorization(&self, value: HeaderValue) {
        self.default_headers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(AUTHORIZATION, value);
    }

    pub fn clear_authorization(&self) {
        self.default_headers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(AUTHORIZATION);
    }

    pub fn default_headers(&self) -> HeaderMap {
        self.default_headers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return the decoded body of a 2xx response.
    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let request = ApiRequest {
            method,
            url: self.url(path),
            headers: self.default_headers(),
            body,
        };
        tracing::debug!(method = %request.method, url = %request.url, "sending request");

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            let message = error_message(&response.body);
            tracing::debug!(status = response.status, %message, "request failed");
            return Err(TaskdeskError::Api {
                status: response.status,
                message,
            });
        }

        Ok(response.body)
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: Option<Value>) -> Result<Value> {
        self.request(Method::POST, path, body).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<Value> {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.request(Method::DELETE, path, None).await
    }
}
