//! Shared fixtures for host and tool tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use swcache_core::{
    CacheStorage, CoreSet, Error, FetchMode, MemoryStorage, Network, Origin, ResourceTable, Response, Store, StoreStats,
    Worker,
};

use crate::host::WorkerHost;

/// Network answering 200 for known URLs and failing for everything else.
#[derive(Clone, Default)]
pub(crate) struct StaticNetwork {
    routes: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl StaticNetwork {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn serve(self, url: &str, body: &str) -> Self {
        self.routes.lock().unwrap().insert(url.to_string(), body.as_bytes().to_vec());
        self
    }
}

#[async_trait]
impl Network for StaticNetwork {
    async fn fetch(&self, url: &str, _mode: FetchMode) -> Result<Response, Error> {
        match self.routes.lock().unwrap().get(url) {
            Some(body) => Ok(Response::ok(url, body.clone())),
            None => Err(Error::Network(format!("unreachable: {url}"))),
        }
    }
}

/// Host for `https://app.example` serving `/`, `index.html` and
/// `main.dart.js`, with `index.html` as the only core file.
pub(crate) fn host_with(network: StaticNetwork) -> (WorkerHost, MemoryStorage) {
    let storage = MemoryStorage::new();
    (host_on(Arc::new(storage.clone()), network), storage)
}

/// Same deployment as [`host_with`] over any store backend.
pub(crate) fn host_on(storage: Arc<dyn CacheStorage>, network: StaticNetwork) -> WorkerHost {
    let resources: ResourceTable = [
        ("/", "6d4ba7c2f1c2e9b3a3f1c0d2e4b5a6c7"),
        ("index.html", "6d4ba7c2f1c2e9b3a3f1c0d2e4b5a6c7"),
        ("main.dart.js", "0f1e2d3c4b5a69788796a5b4c3d2e1f0"),
    ]
    .into_iter()
    .collect();
    let core = CoreSet::new(vec!["index.html".to_string()], &resources).unwrap();
    let network: Arc<dyn Network> = Arc::new(network);
    let worker = Worker::new(Origin::parse("https://app.example").unwrap(), resources, core, storage, network.clone());
    WorkerHost::new(worker, network)
}

/// Store backend whose database has gone away.
pub(crate) struct ClosedStorage;

impl ClosedStorage {
    fn closed<T>() -> Result<T, Error> {
        Err(Error::MigrationFailed("database is closed".to_string()))
    }
}

#[async_trait]
impl CacheStorage for ClosedStorage {
    async fn keys(&self, _store: Store) -> Result<Vec<String>, Error> {
        Self::closed()
    }

    async fn lookup(&self, _store: Store, _key: &str) -> Result<Option<Response>, Error> {
        Self::closed()
    }

    async fn put(&self, _store: Store, _key: &str, _response: &Response) -> Result<(), Error> {
        Self::closed()
    }

    async fn delete(&self, _store: Store, _key: &str) -> Result<bool, Error> {
        Self::closed()
    }

    async fn delete_store(&self, _store: Store) -> Result<bool, Error> {
        Self::closed()
    }

    async fn stats(&self) -> Result<Vec<StoreStats>, Error> {
        Self::closed()
    }
}

/// The JSON text of a tool result.
pub(crate) fn output_text(result: &CallToolResult) -> String {
    let content_val = serde_json::to_value(&result.content[0]).unwrap();
    content_val
        .get("text")
        .and_then(|v| v.as_str())
        .expect("Expected text field in content")
        .to_string()
}
