use serde::Serialize;
use std::sync::Arc;

use super::collection::CollectionStore;
use crate::api::{ApiClient, Collection};
use crate::error::Result;
use crate::models::{Record, RecordId};

/// Form metadata: task types, users and groups.
pub struct MetaStore {
    task_types: CollectionStore<Record>,
    users: CollectionStore<Record>,
    groups: CollectionStore<Record>,
}

impl MetaStore {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            task_types: CollectionStore::new(Collection::TaskTypes, Arc::clone(&api)),
            users: CollectionStore::new(Collection::Users, Arc::clone(&api)),
            groups: CollectionStore::new(Collection::Groups, api),
        }
    }

    /// Fetch all three collections concurrently. Each cache is updated on its
    /// own; one endpoint failing leaves the other two with their fresh data.
    pub async fn load_all(&self) {
        futures::join!(
            self.task_types.fetch_all(),
            self.users.fetch_all(),
            self.groups.fetch_all()
        );
    }

    pub fn task_types(&self) -> &CollectionStore<Record> {
        &self.task_types
    }

    pub fn users(&self) -> &CollectionStore<Record> {
        &self.users
    }

    pub fn groups(&self) -> &CollectionStore<Record> {
        &self.groups
    }

    pub fn is_loading(&self) -> bool {
        self.stores().iter().any(|store| store.is_loading())
    }

    /// Current error of each failing collection.
    pub fn errors(&self) -> Vec<(Collection, String)> {
        self.stores()
            .iter()
            .filter_map(|store| store.error().map(|e| (store.collection(), e)))
            .collect()
    }

    pub async fn create_task_type<B: Serialize + ?Sized>(&self, task_type: &B) -> Result<()> {
        self.task_types.create(task_type).await
    }

    pub async fn update_task_type<B: Serialize + ?Sized>(
        &self,
        id: RecordId,
        task_type: &B,
    ) -> Result<()> {
        self.task_types.update(id, task_type).await
    }

    pub async fn delete_task_type(&self, id: RecordId) -> Result<()> {
        self.task_types.delete(id).await
    }

    pub async fn delete_group(&self, id: RecordId) -> Result<()> {
        self.groups.delete(id).await
    }

    fn stores(&self) -> [&CollectionStore<Record>; 3] {
        [&self.task_types, &self.users, &self.groups]
    }
}
