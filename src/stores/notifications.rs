use std::sync::Arc;

use super::collection::CollectionStore;
use super::status::FetchStatus;
use crate::api::{ApiClient, Collection};
use crate::error::{Mutation, Result, TaskdeskError};
use crate::models::{Notification, RecordId};

/// Server-tracked notifications with read state.
///
/// The unread count is derived from the cached records, so it moves by exactly
/// one when an unread record is marked read and can never go below zero.
/// Local read flags only change after the server confirmed the change.
pub struct NotificationStore {
    inner: CollectionStore<Notification>,
}

impl NotificationStore {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            inner: CollectionStore::new(Collection::Notifications, api),
        }
    }

    pub async fn fetch_all(&self) {
        self.inner.fetch_all().await
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.inner.items()
    }

    pub fn unread_count(&self) -> usize {
        self.inner
            .items()
            .iter()
            .filter(|n| !n.is_read)
            .count()
    }

    pub fn status(&self) -> FetchStatus {
        self.inner.status()
    }

    pub fn error(&self) -> Option<String> {
        self.inner.error()
    }

    pub async fn mark_read(&self, id: RecordId) -> Result<()> {
        self.inner
            .api()
            .post(&format!("{}/read", Collection::Notifications.item_path(id)), None)
            .await
            .map_err(|e| TaskdeskError::mutation(Collection::Notifications, Mutation::MarkRead, e))?;

        self.inner.update_cached(|items| {
            if let Some(notification) = items.iter_mut().find(|n| n.id == id) {
                notification.is_read = true;
            }
        });
        Ok(())
    }

    pub async fn mark_all_read(&self) -> Result<()> {
        self.inner
            .api()
            .post("/notifications/read-all", None)
            .await
            .map_err(|e| TaskdeskError::mutation(Collection::Notifications, Mutation::MarkRead, e))?;

        self.inner.update_cached(|items| {
            for notification in items.iter_mut() {
                notification.is_read = true;
            }
        });
        Ok(())
    }
}
