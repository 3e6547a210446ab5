use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::status::FetchStatus;
use crate::api::{response, ApiClient, Collection};
use crate::error::{Mutation, Result, TaskdeskError};
use crate::models::RecordId;

struct CacheState<T> {
    items: Vec<T>,
    status: FetchStatus,
    /// Ticket of the most recently issued fetch.
    issued: u64,
}

/// Cache of one server-owned collection.
///
/// The cache only ever holds the result of the latest successful fetch. Writes
/// go to the server and are followed by a full refetch; nothing is patched in
/// place. When fetches overlap, only the most recently issued one may update
/// the cache or the error descriptor.
pub struct CollectionStore<T> {
    collection: Collection,
    api: Arc<ApiClient>,
    state: RwLock<CacheState<T>>,
}

impl<T> CollectionStore<T>
where
    T: DeserializeOwned + Clone + Send + Sync,
{
    pub fn new(collection: Collection, api: Arc<ApiClient>) -> Self {
        Self {
            collection,
            api,
            state: RwLock::new(CacheState {
                items: vec![],
                status: FetchStatus::default(),
                issued: 0,
            }),
        }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn items(&self) -> Vec<T> {
        self.read_state().items.clone()
    }

    pub fn len(&self) -> usize {
        self.read_state().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_state().items.is_empty()
    }

    pub fn status(&self) -> FetchStatus {
        self.read_state().status.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read_state().status.loading
    }

    pub fn error(&self) -> Option<String> {
        self.read_state().status.error.clone()
    }

    /// Replace the cache with the server's list. Failures are recorded in the
    /// store's error descriptor and the previous cache is kept.
    pub async fn fetch_all(&self) {
        let ticket = {
            let mut state = self.write_state();
            state.issued += 1;
            state.status.begin();
            state.issued
        };
        let guard = FetchGuard {
            state: &self.state,
            ticket,
            settled: false,
        };
        tracing::debug!(collection = self.collection.plural(), ticket, "fetching");

        let result = self.load().await;
        guard.settle(|state| match result {
            Ok(items) => state.items = items,
            Err(e) => {
                tracing::warn!(collection = self.collection.plural(), error = %e, "fetch failed");
                state.status.error =
                    Some(format!("Failed to fetch {}: {}", self.collection.plural(), e));
            }
        });
    }

    pub async fn create<B: Serialize + ?Sized>(&self, record: &B) -> Result<()> {
        let body = serde_json::to_value(record)
            .map_err(|e| self.mutation_error(Mutation::Create, e.into()))?;
        self.api
            .post(self.collection.path(), Some(body))
            .await
            .map_err(|e| self.mutation_error(Mutation::Create, e))?;

        self.fetch_all().await;
        Ok(())
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: RecordId, record: &B) -> Result<()> {
        let body = serde_json::to_value(record)
            .map_err(|e| self.mutation_error(Mutation::Update, e.into()))?;
        self.api
            .put(&self.collection.item_path(id), body)
            .await
            .map_err(|e| self.mutation_error(Mutation::Update, e))?;

        self.fetch_all().await;
        Ok(())
    }

    pub async fn delete(&self, id: RecordId) -> Result<()> {
        self.api
            .delete(&self.collection.item_path(id))
            .await
            .map_err(|e| self.mutation_error(Mutation::Delete, e))?;

        self.fetch_all().await;
        Ok(())
    }

    /// Read one record straight from the server. The cache is not consulted
    /// and not updated.
    pub async fn fetch_by_id(&self, id: RecordId) -> Result<T> {
        let body = self.api.get(&self.collection.item_path(id)).await?;
        response::decode_record(&body)
    }

    /// Apply a server-confirmed change to cached records.
    pub(crate) fn update_cached(&self, apply: impl FnOnce(&mut Vec<T>)) {
        apply(&mut self.write_state().items);
    }

    pub(crate) fn api(&self) -> &ApiClient {
        &self.api
    }

    async fn load(&self) -> Result<Vec<T>> {
        let body = self.api.get(self.collection.path()).await?;
        response::decode_list(&body, self.collection.list_shape())
    }

    fn mutation_error(&self, action: Mutation, source: TaskdeskError) -> TaskdeskError {
        tracing::warn!(collection = self.collection.plural(), ?action, error = %source, "write failed");
        TaskdeskError::mutation(self.collection, action, source)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, CacheState<T>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CacheState<T>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears `loading` for the latest fetch even when its future is dropped
/// before the response arrives.
struct FetchGuard<'a, T> {
    state: &'a RwLock<CacheState<T>>,
    ticket: u64,
    settled: bool,
}

impl<T> FetchGuard<'_, T> {
    /// Apply the outcome if this is still the latest fetch; otherwise drop it.
    fn settle(mut self, apply: impl FnOnce(&mut CacheState<T>)) {
        self.settled = true;
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if self.ticket != state.issued {
            tracing::debug!(ticket = self.ticket, latest = state.issued, "discarding superseded fetch");
            return;
        }
        apply(&mut *state);
        state.status.loading = false;
    }
}

impl<T> Drop for FetchGuard<'_, T> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if self.ticket == state.issued {
            tracing::debug!(ticket = self.ticket, "fetch cancelled");
            state.status.loading = false;
        }
    }
}
