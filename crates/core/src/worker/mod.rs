//! The offline cache worker.
//!
//! A [`Worker`] reacts to the four events a host delivers:
//!
//! - **install**: stage the core set into the temp store
//! - **activate**: reconcile the content store against the previous manifest
//! - **fetch**: serve resource table paths from the content store or network
//! - **message**: `skipWaiting` and `downloadOffline` control signals
//!
//! Stores and network are injected, so the worker holds no ambient state
//! beyond its lifecycle flags.

mod activate;
mod fetch;
mod install;
mod lifecycle;
mod message;
pub mod path;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::future::try_join_all;

use crate::Error;
use crate::manifest::{CoreSet, ResourceTable};
use crate::network::{FetchMode, Network};
use crate::origin::Origin;
use crate::storage::{CacheStorage, Store};

pub use activate::ActivationReport;
pub use fetch::{FetchOutcome, Request, Source};
pub use install::InstallReport;
pub use lifecycle::WorkerState;
pub use message::{ControlMessage, MessageOutcome};

/// Offline cache worker for one deployment.
pub struct Worker {
    origin: Origin,
    resources: ResourceTable,
    core: CoreSet,
    storage: Arc<dyn CacheStorage>,
    network: Arc<dyn Network>,
    state: Mutex<WorkerState>,
    skip_waiting: AtomicBool,
    clients_claimed: AtomicBool,
}

impl Worker {
    pub fn new(
        origin: Origin, resources: ResourceTable, core: CoreSet, storage: Arc<dyn CacheStorage>,
        network: Arc<dyn Network>,
    ) -> Self {
        Self {
            origin,
            resources,
            core,
            storage,
            network,
            state: Mutex::new(WorkerState::Parsed),
            skip_waiting: AtomicBool::new(false),
            clients_claimed: AtomicBool::new(false),
        }
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn resources(&self) -> &ResourceTable {
        &self.resources
    }

    pub fn core(&self) -> &CoreSet {
        &self.core
    }

    pub fn storage(&self) -> &Arc<dyn CacheStorage> {
        &self.storage
    }

    pub fn state(&self) -> WorkerState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Ask to be activated as soon as installation finishes.
    pub fn skip_waiting(&self) {
        self.skip_waiting.store(true, Ordering::SeqCst);
    }

    pub fn skip_waiting_requested(&self) -> bool {
        self.skip_waiting.load(Ordering::SeqCst)
    }

    /// Whether the worker has taken control of open clients.
    pub fn clients_claimed(&self) -> bool {
        self.clients_claimed.load(Ordering::SeqCst)
    }

    fn claim_clients(&self) {
        self.clients_claimed.store(true, Ordering::SeqCst);
        tracing::info!(origin = %self.origin, "claimed open clients");
    }

    /// Move to `to`, returning the previous state.
    fn transition(&self, to: WorkerState) -> Result<WorkerState, Error> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let from = *state;
        if !from.can_transition_to(to) {
            return Err(Error::InvalidState(format!("cannot move from {from} to {to}")));
        }
        *state = to;
        tracing::debug!(%from, %to, "worker state changed");
        Ok(from)
    }

    /// Fetch every path and store the responses, all or nothing.
    ///
    /// A transport failure or a non-2xx response aborts before anything is
    /// written. Returns the stored keys.
    async fn add_all(&self, store: Store, paths: &[String], mode: FetchMode) -> Result<Vec<String>, Error> {
        let fetches = paths.iter().map(|path| {
            let url = path::resource_url(&self.origin, path);
            async move {
                let response = self.network.fetch(&url, mode).await?;
                if !response.is_ok() {
                    return Err(Error::HttpError(format!("{url}: status {}", response.status)));
                }
                Ok((url, response))
            }
        });
        let fetched = try_join_all(fetches).await?;

        let mut stored = Vec::with_capacity(fetched.len());
        for (url, response) in fetched {
            self.storage.put(store, &url, &response).await?;
            stored.push(url);
        }
        Ok(stored)
    }
}
