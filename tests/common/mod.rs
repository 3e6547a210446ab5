//! Scripted in-memory transport for exercising stores without a server.

#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use taskdesk::api::{ApiRequest, ApiResponse, Transport};
use taskdesk::error::{Result, TaskdeskError};

#[derive(Debug, Clone)]
pub enum MockReply {
    Json {
        status: u16,
        body: Value,
        delay: Option<Duration>,
    },
    /// The connection fails before any response arrives.
    Unreachable,
}

impl MockReply {
    pub fn ok(body: Value) -> Self {
        MockReply::Json {
            status: 200,
            body,
            delay: None,
        }
    }

    pub fn status(status: u16, body: Value) -> Self {
        MockReply::Json {
            status,
            body,
            delay: None,
        }
    }

    pub fn delayed(self, by: Duration) -> Self {
        match self {
            MockReply::Json { status, body, .. } => MockReply::Json {
                status,
                body,
                delay: Some(by),
            },
            other => other,
        }
    }
}

/// Replies are queued per method and path. The last queued reply for a route
/// keeps answering once the ones before it are used up.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<MockReply>>>,
    sent: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, method: Method, path: &str, reply: MockReply) -> &Self {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    /// Drop every queued reply for a route so the next `on` replaces it.
    pub fn reset(&self, method: Method, path: &str) -> &Self {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(method, path.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests().pop()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && path_of(&r.url) == path)
            .count()
    }

    fn next_reply(&self, method: &Method, path: &str) -> Option<MockReply> {
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        let queue = routes.get_mut(&(method.clone(), path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let path = path_of(&request.url).to_string();
        let method = request.method.clone();
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        match self.next_reply(&method, &path) {
            Some(MockReply::Json {
                status,
                body,
                delay,
            }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(ApiResponse { status, body })
            }
            Some(MockReply::Unreachable) => Err(TaskdeskError::Other(format!(
                "connection refused: {} {}",
                method, path
            ))),
            None => Ok(ApiResponse {
                status: 404,
                body: json!({ "error": format!("no route for {} {}", method, path) }),
            }),
        }
    }
}

/// Path component of an absolute URL, e.g. `/tasks/3`.
pub fn path_of(url: &str) -> &str {
    let without_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    match without_scheme.find('/') {
        Some(idx) => &without_scheme[idx..],
        None => "/",
    }
}
