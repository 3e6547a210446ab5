use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::Value;

use crate::models::RecordId;

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// How a list endpoint wraps its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListShape {
    /// `{"data": [...]}`; a missing or null `data` reads as an empty list.
    Enveloped,
    /// A bare JSON array. An enveloped body is accepted as well.
    Bare,
}

/// Server-owned collections and the endpoints behind them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    TaskTypes,
    Users,
    Groups,
    Tasks,
    Notifications,
}

impl Collection {
    pub fn path(&self) -> &'static str {
        match self {
            Collection::TaskTypes => "/task-types",
            Collection::Users => "/users",
            Collection::Groups => "/groups",
            Collection::Tasks => "/tasks",
            Collection::Notifications => "/notifications",
        }
    }

    pub fn item_path(&self, id: RecordId) -> String {
        format!("{}/{}", self.path(), id)
    }

    pub fn list_shape(&self) -> ListShape {
        match self {
            Collection::Notifications => ListShape::Bare,
            _ => ListShape::Enveloped,
        }
    }

    /// Singular label, e.g. "Task type".
    pub fn label(&self) -> &'static str {
        match self {
            Collection::TaskTypes => "Task type",
            Collection::Users => "User",
            Collection::Groups => "Group",
            Collection::Tasks => "Task",
            Collection::Notifications => "Notification",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            Collection::TaskTypes => "task types",
            Collection::Users => "users",
            Collection::Groups => "groups",
            Collection::Tasks => "tasks",
            Collection::Notifications => "notifications",
        }
    }
}
