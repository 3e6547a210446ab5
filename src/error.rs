use std::fmt;

use crate::api::Collection;

/// What a failed write was trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    Delete,
    MarkRead,
}

impl Mutation {
    fn as_noun(&self) -> &'static str {
        match self {
            Mutation::Create => "creation",
            Mutation::Update => "update",
            Mutation::Delete => "deletion",
            Mutation::MarkRead => "mark-as-read",
        }
    }
}

#[derive(Debug)]
pub enum TaskdeskError {
    Api {
        status: u16,
        message: String,
    },
    NetworkError(reqwest::Error),
    MalformedResponse(String),
    MutationFailed {
        collection: Collection,
        action: Mutation,
        source: Box<TaskdeskError>,
    },
    StorageError(String),
    ConfigError(String),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    YamlError(serde_yaml::Error),
    Other(String),
}

impl TaskdeskError {
    pub fn mutation(collection: Collection, action: Mutation, source: TaskdeskError) -> Self {
        TaskdeskError::MutationFailed {
            collection,
            action,
            source: Box::new(source),
        }
    }

    /// HTTP status reported by the server, looking through mutation wrappers.
    pub fn status(&self) -> Option<u16> {
        match self {
            TaskdeskError::Api { status, .. } => Some(*status),
            TaskdeskError::MutationFailed { source, .. } => source.status(),
            _ => None,
        }
    }
}

impl fmt::Display for TaskdeskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskdeskError::Api { status, message } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            TaskdeskError::NetworkError(e) => write!(f, "Network error: {}", e),
            TaskdeskError::MalformedResponse(msg) => write!(f, "Unexpected response: {}", msg),
            TaskdeskError::MutationFailed {
                collection,
                action,
                source,
            } => write!(
                f,
                "{} {} failed on the server: {}",
                collection.label(),
                action.as_noun(),
                source
            ),
            TaskdeskError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            TaskdeskError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            TaskdeskError::IoError(e) => write!(f, "IO error: {}", e),
            TaskdeskError::JsonError(e) => write!(f, "JSON error: {}", e),
            TaskdeskError::YamlError(e) => write!(f, "YAML error: {}", e),
            TaskdeskError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for TaskdeskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TaskdeskError::NetworkError(e) => Some(e),
            TaskdeskError::MutationFailed { source, .. } => Some(source.as_ref()),
            TaskdeskError::IoError(e) => Some(e),
            TaskdeskError::JsonError(e) => Some(e),
            TaskdeskError::YamlError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TaskdeskError {
    fn from(err: reqwest::Error) -> Self {
        TaskdeskError::NetworkError(err)
    }
}

impl From<std::io::Error> for TaskdeskError {
    fn from(err: std::io::Error) -> Self {
        TaskdeskError::IoError(err)
    }
}

impl From<serde_json::Error> for TaskdeskError {
    fn from(err: serde_json::Error) -> Self {
        TaskdeskError::JsonError(err)
    }
}

impl From<serde_yaml::Error> for TaskdeskError {
    fn from(err: serde_yaml::Error) -> Self {
        TaskdeskError::YamlError(err)
    }
}

impl From<anyhow::Error> for TaskdeskError {
    fn from(err: anyhow::Error) -> Self {
        TaskdeskError::Other(err.to_string())
    }
}

impl From<String> for TaskdeskError {
    fn from(msg: String) -> Self {
        TaskdeskError::Other(msg)
    }
}

impl From<&str> for TaskdeskError {
    fn from(msg: &str) -> Self {
        TaskdeskError::Other(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TaskdeskError>;
