//! Test doubles for worker tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::Worker;
use crate::Error;
use crate::cache::MemoryStorage;
use crate::manifest::{CoreSet, ResourceTable};
use crate::network::{FetchMode, Network};
use crate::origin::Origin;
use crate::storage::{CacheStorage, Response, Store, StoreStats};

pub(crate) const ORIGIN: &str = "https://app.example";

/// Scripted network: known URLs answer with a fixed status and body,
/// everything else fails as if offline.
#[derive(Clone, Default)]
pub(crate) struct FakeNetwork {
    routes: Arc<Mutex<HashMap<String, (u16, Vec<u8>)>>>,
    calls: Arc<Mutex<Vec<(String, FetchMode)>>>,
}

impl FakeNetwork {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn serve(self, url: &str, body: &str) -> Self {
        self.route(url, body);
        self
    }

    pub(crate) fn serve_status(self, url: &str, status: u16, body: &str) -> Self {
        self.routes.lock().unwrap().insert(url.to_string(), (status, body.as_bytes().to_vec()));
        self
    }

    pub(crate) fn route(&self, url: &str, body: &str) {
        self.routes.lock().unwrap().insert(url.to_string(), (200, body.as_bytes().to_vec()));
    }

    /// Drop every route so all fetches fail.
    pub(crate) fn go_offline(&self) {
        self.routes.lock().unwrap().clear();
    }

    pub(crate) fn calls(&self) -> Vec<(String, FetchMode)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Network for FakeNetwork {
    async fn fetch(&self, url: &str, mode: FetchMode) -> Result<Response, Error> {
        self.calls.lock().unwrap().push((url.to_string(), mode));
        let route = self.routes.lock().unwrap().get(url).cloned();
        match route {
            Some((status, body)) => Ok(Response::with_status(url, status, body)),
            None => Err(Error::Network(format!("unreachable: {url}"))),
        }
    }
}

pub(crate) fn table(entries: &[(&str, &str)]) -> ResourceTable {
    entries.iter().copied().collect()
}

pub(crate) fn worker_with(
    entries: &[(&str, &str)], core: &[&str], storage: &MemoryStorage, network: &FakeNetwork,
) -> Worker {
    worker_on(entries, core, Arc::new(storage.clone()), network)
}

/// Worker over any store backend.
pub(crate) fn worker_on(
    entries: &[(&str, &str)], core: &[&str], storage: Arc<dyn CacheStorage>, network: &FakeNetwork,
) -> Worker {
    let resources = table(entries);
    let core = CoreSet::new(core.iter().map(|p| p.to_string()).collect(), &resources).unwrap();
    Worker::new(Origin::parse(ORIGIN).unwrap(), resources, core, storage, Arc::new(network.clone()))
}

/// Memory stores whose lookups can be switched to fail.
#[derive(Clone, Default)]
pub(crate) struct FlakyStorage {
    inner: MemoryStorage,
    fail_lookups: Arc<AtomicBool>,
}

impl FlakyStorage {
    pub(crate) fn new(inner: MemoryStorage) -> Self {
        Self { inner, fail_lookups: Arc::default() }
    }

    pub(crate) fn break_lookups(&self) {
        self.fail_lookups.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CacheStorage for FlakyStorage {
    async fn keys(&self, store: Store) -> Result<Vec<String>, Error> {
        self.inner.keys(store).await
    }

    async fn lookup(&self, store: Store, key: &str) -> Result<Option<Response>, Error> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(Error::Database(tokio_rusqlite::Error::ConnectionClosed));
        }
        self.inner.lookup(store, key).await
    }

    async fn put(&self, store: Store, key: &str, response: &Response) -> Result<(), Error> {
        self.inner.put(store, key, response).await
    }

    async fn delete(&self, store: Store, key: &str) -> Result<bool, Error> {
        self.inner.delete(store, key).await
    }

    async fn delete_store(&self, store: Store) -> Result<bool, Error> {
        self.inner.delete_store(store).await
    }

    async fn stats(&self) -> Result<Vec<StoreStats>, Error> {
        self.inner.stats().await
    }
}

/// Install then activate, returning the activated worker.
pub(crate) async fn activated_worker(
    entries: &[(&str, &str)], core: &[&str], storage: &MemoryStorage, network: &FakeNetwork,
) -> Worker {
    let worker = worker_with(entries, core, storage, network);
    worker.on_install().await.unwrap();
    worker.on_activate().await.unwrap();
    worker
}
