use std::{collections::HashMap, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error};

use common::metrics::STORAGE_WRITE_FAILURES_TOTAL;

use super::{Collection, CollectionBackend, FileBackend, WritePolicy};
use crate::errors::ServiceError;

/// Reads and writes whole collections as JSON arrays.
///
/// Every read goes to the backend; nothing is cached between calls. Writes
/// that fail are handled according to the configured [`WritePolicy`].
#[derive(Clone)]
pub struct CollectionStore {
    backend: Arc<dyn CollectionBackend>,
    policy: WritePolicy,
    // One writer at a time per collection for read-modify-write cycles.
    locks: Arc<HashMap<Collection, Mutex<()>>>,
}

impl CollectionStore {
    pub fn new(backend: Arc<dyn CollectionBackend>, policy: WritePolicy) -> Self {
        let locks: HashMap<_, _> = Collection::ALL.into_iter().map(|c| (c, Mutex::new(()))).collect();
        Self { backend, policy, locks: Arc::new(locks) }
    }

    /// File-backed store rooted at the configured data directory.
    pub fn from_config(cfg: &configs::StorageConfig) -> Arc<Self> {
        Arc::new(Self::new(Arc::new(FileBackend::from_config(cfg)), cfg.write_policy))
    }

    /// Load a collection. Missing or blank documents read as empty.
    pub async fn read_collection<T>(&self, collection: Collection) -> Result<Vec<T>, ServiceError>
    where
        T: DeserializeOwned,
    {
        let text = self
            .backend
            .load(collection)
            .await
            .map_err(|e| ServiceError::storage(collection, e))?;
        let Some(text) = text else {
            return Ok(Vec::new());
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text).map_err(|source| ServiceError::Decode { collection, source })
    }

    /// Overwrite a collection with pretty-printed JSON.
    pub async fn write_collection<T>(&self, collection: Collection, records: &[T]) -> Result<(), ServiceError>
    where
        T: Serialize + Sync,
    {
        let text = serde_json::to_string_pretty(records).map_err(|e| ServiceError::storage(collection, e))?;
        match self.backend.save(collection, &text).await {
            Ok(()) => {
                debug!(%collection, records = records.len(), "collection written");
                Ok(())
            }
            Err(e) => {
                STORAGE_WRITE_FAILURES_TOTAL.with_label_values(&[collection.as_str()]).inc();
                match self.policy {
                    WritePolicy::BestEffort => {
                        error!(%collection, error = %e, "collection write failed; continuing without persistence");
                        Ok(())
                    }
                    WritePolicy::Strict => {
                        error!(%collection, error = %e, "collection write failed");
                        Err(ServiceError::storage(collection, e))
                    }
                }
            }
        }
    }

    /// Read, mutate and write back a collection while holding its lock.
    ///
    /// Nothing is written when `f` returns an error.
    pub async fn modify_collection<T, R, F>(&self, collection: Collection, f: F) -> Result<R, ServiceError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce(&mut Vec<T>) -> Result<R, ServiceError> + Send,
    {
        let _guard = match self.locks.get(&collection) {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };
        let mut records = self.read_collection::<T>(collection).await?;
        let out = f(&mut records)?;
        self.write_collection(collection, &records).await?;
        Ok(out)
    }
}
