mod filesystem;
mod memory;
mod storage;

pub use filesystem::FilesystemKeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use storage::KeyValueStore;

use crate::api::{response, ApiClient};
use crate::error::Result;
use crate::models::{Credentials, Session, UserIdentity};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Owns the authenticated session: keeps it in memory, mirrors it to durable
/// storage and keeps the API client's `Authorization` header in step with it.
pub struct SessionStore {
    state: RwLock<Session>,
    storage: Arc<dyn KeyValueStore>,
    api: Arc<ApiClient>,
}

impl SessionStore {
    pub fn new(api: Arc<ApiClient>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            state: RwLock::new(Session::default()),
            storage,
            api,
        }
    }

    /// Load a persisted session, if any, and arm the bearer header.
    /// Returns whether a session was restored.
    pub fn restore(&self) -> bool {
        let token = match self.storage.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => {
                self.discard_orphaned_user();
                return false;
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not read persisted token");
                return false;
            }
        };

        let header = match ApiClient::bearer_header(&token) {
            Ok(header) => header,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unusable persisted token");
                return false;
            }
        };

        let user = match self.storage.get(USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<UserIdentity>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring corrupt persisted user");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "could not read persisted user");
                None
            }
        };

        {
            let mut state = self.write_state();
            state.token = Some(token);
            state.user = user;
        }
        self.api.set_authorization(header);
        tracing::debug!("restored persisted session");
        true
    }

    /// Exchange credentials for a token. The session is only touched once the
    /// response carries a token and it has been persisted.
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        let body = self
            .api
            .post("/login", Some(serde_json::to_value(credentials)?))
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "login failed"))?;

        let login = response::extract_login(&body)?;
        let token = login.token.clone().unwrap_or_default();
        let user = login.identity();
        let header = ApiClient::bearer_header(&token)?;

        self.persist(&token, user.as_ref())?;

        {
            let mut state = self.write_state();
            state.token = Some(token);
            state.user = user;
        }
        self.api.set_authorization(header);
        tracing::debug!(username = %credentials.username, "logged in");
        Ok(())
    }

    /// Drop the session everywhere. Storage failures are logged, not returned.
    pub fn logout(&self) {
        {
            let mut state = self.write_state();
            state.token = None;
            state.user = None;
        }
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, error = %e, "could not remove persisted session entry");
            }
        }
        self.api.clear_authorization();
        tracing::debug!("logged out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_state().is_authenticated()
    }

    pub fn token(&self) -> Option<String> {
        self.read_state().token.clone()
    }

    pub fn user(&self) -> Option<UserIdentity> {
        self.read_state().user.clone()
    }

    pub fn snapshot(&self) -> Session {
        self.read_state().clone()
    }

    fn persist(&self, token: &str, user: Option<&UserIdentity>) -> Result<()> {
        let user_json = user.map(serde_json::to_string).transpose()?;

        let previous = self.storage.get(TOKEN_KEY).ok().flatten();

        self.storage.set(TOKEN_KEY, token)?;
        let stored_user = match &user_json {
            Some(json) => self.storage.set(USER_KEY, json),
            None => self.storage.remove(USER_KEY),
        };
        if let Err(e) = stored_user {
            let rolled_back = match previous {
                Some(previous) => self.storage.set(TOKEN_KEY, &previous),
                None => self.storage.remove(TOKEN_KEY),
            };
            if let Err(rollback) = rolled_back {
                tracing::warn!(
                    error = %rollback,
                    "could not roll back persisted token; stored session may be inconsistent"
                );
            }
            return Err(e);
        }
        Ok(())
    }

    fn discard_orphaned_user(&self) {
        if let Ok(Some(_)) = self.storage.get(USER_KEY) {
            tracing::debug!("removing persisted user without a token");
            if let Err(e) = self.storage.remove(USER_KEY) {
                tracing::warn!(key = USER_KEY, error = %e, "could not remove orphaned persisted user");
            }
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, Session> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, Session> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
