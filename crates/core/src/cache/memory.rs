//! In-process store backend.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::Error;
use crate::storage::{CacheStorage, Response, Store, StoreStats};

/// Stores held in a map behind a tokio RwLock.
///
/// Cloning yields another handle to the same stores.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    stores: Arc<RwLock<HashMap<Store, BTreeMap<String, Response>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for MemoryStorage {
    async fn keys(&self, store: Store) -> Result<Vec<String>, Error> {
        let stores = self.stores.read().await;
        Ok(stores.get(&store).map(|entries| entries.keys().cloned().collect()).unwrap_or_default())
    }

    async fn lookup(&self, store: Store, key: &str) -> Result<Option<Response>, Error> {
        let stores = self.stores.read().await;
        Ok(stores.get(&store).and_then(|entries| entries.get(key)).cloned())
    }

    async fn put(&self, store: Store, key: &str, response: &Response) -> Result<(), Error> {
        let mut stores = self.stores.write().await;
        stores.entry(store).or_default().insert(key.to_string(), response.clone());
        Ok(())
    }

    async fn delete(&self, store: Store, key: &str) -> Result<bool, Error> {
        let mut stores = self.stores.write().await;
        Ok(stores.get_mut(&store).is_some_and(|entries| entries.remove(key).is_some()))
    }

    async fn delete_store(&self, store: Store) -> Result<bool, Error> {
        let mut stores = self.stores.write().await;
        Ok(stores.remove(&store).is_some_and(|entries| !entries.is_empty()))
    }

    async fn stats(&self) -> Result<Vec<StoreStats>, Error> {
        let stores = self.stores.read().await;
        Ok(Store::ALL
            .into_iter()
            .map(|store| {
                let entries = stores.get(&store);
                StoreStats {
                    store,
                    entries: entries.map_or(0, |e| e.len() as u64),
                    body_bytes: entries.map_or(0, |e| e.values().map(|r| r.body.len() as u64).sum()),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_stores() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage
            .put(Store::Content, "https://app.example/a.js", &Response::ok("https://app.example/a.js", "a"))
            .await
            .unwrap();

        assert!(other.lookup(Store::Content, "https://app.example/a.js").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_store_reports_entries() {
        let storage = MemoryStorage::new();
        assert!(!storage.delete_store(Store::Temp).await.unwrap());

        storage
            .put(Store::Temp, "https://app.example/a.js", &Response::ok("https://app.example/a.js", "a"))
            .await
            .unwrap();
        assert!(storage.delete_store(Store::Temp).await.unwrap());
        assert!(storage.keys(Store::Temp).await.unwrap().is_empty());
    }
}
