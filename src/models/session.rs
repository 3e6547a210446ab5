use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<hidden>")
            .finish()
    }
}

/// The server sends a numeric role code; older deployments sent free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserLabel {
    Code(i64),
    Text(String),
}

impl UserLabel {
    pub fn is_super_admin(&self) -> bool {
        matches!(self, UserLabel::Code(1))
    }
}

impl fmt::Display for UserLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserLabel::Code(1) => write!(f, "Super Admin"),
            UserLabel::Code(2) => write!(f, "User"),
            UserLabel::Code(code) => write!(f, "Role {}", code),
            UserLabel::Text(text) => write!(f, "{}", text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_label: Option<UserLabel>,
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub user_label: Option<UserLabel>,
    #[serde(default)]
    pub username: Option<String>,
}

impl LoginResponse {
    pub fn identity(&self) -> Option<UserIdentity> {
        self.user_id.map(|id| UserIdentity {
            id,
            user_label: self.user_label.clone(),
            username: self.username.clone().unwrap_or_default(),
        })
    }
}

/// In-memory session. `token` is the only input to authentication checks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserIdentity>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}
