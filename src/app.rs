use std::sync::Arc;
use std::time::Duration;

use crate::api::{ApiClient, Collection, HttpTransport, Transport};
use crate::config::Config;
use crate::error::Result;
use crate::notices::NoticeQueue;
use crate::router::Router;
use crate::session::{FilesystemKeyValueStore, KeyValueStore, SessionStore};
use crate::stores::{CollectionStore, MetaStore, NotificationStore, TasksStore};

/// Every store and service, built once and handed out by reference.
pub struct App {
    api: Arc<ApiClient>,
    session: SessionStore,
    router: Router,
    meta: MetaStore,
    tasks: TasksStore,
    notifications: NotificationStore,
    notices: NoticeQueue,
}

impl App {
    /// Wire the services together and restore any persisted session.
    pub fn new(
        base_url: &str,
        storage: Arc<dyn KeyValueStore>,
        transport: Arc<dyn Transport>,
        notice_lifetime: Duration,
    ) -> Self {
        let api = Arc::new(ApiClient::new(base_url, transport));
        let session = SessionStore::new(Arc::clone(&api), storage);
        session.restore();

        Self {
            session,
            router: Router::default(),
            meta: MetaStore::new(Arc::clone(&api)),
            tasks: CollectionStore::new(Collection::Tasks, Arc::clone(&api)),
            notifications: NotificationStore::new(Arc::clone(&api)),
            notices: NoticeQueue::new(notice_lifetime),
            api,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let storage = Arc::new(FilesystemKeyValueStore::new(config.storage_dir.clone()));
        let transport = Arc::new(HttpTransport::new(config.timeout)?);
        Ok(Self::new(
            &config.base_url,
            storage,
            transport,
            config.notice_lifetime,
        ))
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn meta(&self) -> &MetaStore {
        &self.meta
    }

    pub fn tasks(&self) -> &TasksStore {
        &self.tasks
    }

    pub fn notifications(&self) -> &NotificationStore {
        &self.notifications
    }

    pub fn notices(&self) -> &NoticeQueue {
        &self.notices
    }
}
