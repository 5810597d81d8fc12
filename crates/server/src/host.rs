//! The worker host: owns one worker and delivers lifecycle events to it.
//!
//! Plays the part a browser plays for a service worker. It decides when a
//! waiting worker is activated and answers fetch events the worker passes
//! through (or every fetch while the worker is not yet active) straight from
//! the network.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use swcache_client::{FetchClient, FetchConfig};
use swcache_core::worker::{
    ActivationReport, FetchOutcome, InstallReport, MessageOutcome, Request, Source, WorkerState,
};
use swcache_core::{
    AppConfig, CacheDb, CacheStorage, CoreSet, Error, FetchMode, MemoryStorage, Network, ResourceTable, Response,
    StoreStats, Worker,
};

use crate::error::StartupError;

/// Who answered a delivered fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Served {
    /// The worker, from its content store.
    Cache,
    /// The worker, through the network.
    Network,
    /// The host's own network fetch.
    Passthrough,
}

/// Result of delivering install, with the activation it triggered.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct InstallSummary {
    pub install: InstallReport,
    /// Present when skip-waiting let the worker activate right away.
    pub activation: Option<ActivationReport>,
}

/// Result of delivering a message, with the activation it triggered.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct MessageSummary {
    pub outcome: MessageOutcome,
    pub activation: Option<ActivationReport>,
}

/// Snapshot of the worker and its stores.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct HostStatus {
    pub origin: String,
    pub state: WorkerState,
    pub skip_waiting: bool,
    pub clients_claimed: bool,
    /// Digest of the deployment this worker serves.
    pub deployment_digest: String,
    /// Digest of the deployment recorded by the last activation, if any.
    pub manifest_digest: Option<String>,
    pub resources: usize,
    pub core_files: usize,
    pub stores: Vec<StoreStats>,
}

pub struct WorkerHost {
    worker: Worker,
    network: Arc<dyn Network>,
}

impl WorkerHost {
    pub fn new(worker: Worker, network: Arc<dyn Network>) -> Self {
        Self { worker, network }
    }

    /// Assemble a worker from configuration: resource table, core set,
    /// cache database and HTTP client.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let origin = config.origin()?;
        let resources = ResourceTable::load(&config.resources_file)?;
        let core = CoreSet::new(config.core_files.clone(), &resources)?;

        let storage: Arc<dyn CacheStorage> = if config.in_memory() {
            Arc::new(MemoryStorage::new())
        } else {
            Arc::new(CacheDb::open(&config.db_path).await?)
        };
        let network: Arc<dyn Network> = Arc::new(FetchClient::new(FetchConfig::from(config))?);

        tracing::info!(
            origin = %origin,
            resources = resources.len(),
            core_files = core.paths().len(),
            digest = %resources.digest(),
            "loaded deployment"
        );

        let worker = Worker::new(origin, resources, core, storage, network.clone());
        Ok(Self::new(worker, network))
    }

    pub fn storage(&self) -> &Arc<dyn CacheStorage> {
        self.worker.storage()
    }

    /// Deliver install. A worker that asked to skip waiting is activated at once.
    pub async fn install(&self) -> Result<InstallSummary, Error> {
        let install = self.worker.on_install().await?;
        let activation = self.activate_if_skipping().await?;
        Ok(InstallSummary { install, activation })
    }

    /// Deliver activate to a waiting worker.
    pub async fn activate(&self) -> Result<ActivationReport, Error> {
        self.worker.on_activate().await
    }

    /// Deliver a fetch event, answering passthroughs from the network.
    pub async fn fetch(&self, request: &Request) -> Result<(Response, Served), Error> {
        if !self.worker.state().can_intercept_fetch() {
            tracing::debug!(url = %request.url, state = %self.worker.state(), "worker not active; fetching directly");
            return self.passthrough(request).await;
        }

        match self.worker.on_fetch(request).await? {
            FetchOutcome::Respond { response, source } => {
                let served = match source {
                    Source::Cache => Served::Cache,
                    Source::Network => Served::Network,
                };
                Ok((response, served))
            }
            FetchOutcome::Passthrough => self.passthrough(request).await,
        }
    }

    /// Deliver a control message. `skipWaiting` activates a waiting worker.
    pub async fn message(&self, data: &str) -> Result<MessageSummary, Error> {
        let outcome = self.worker.on_message(data).await?;
        let activation = match outcome {
            MessageOutcome::SkipWaiting => self.activate_if_skipping().await?,
            _ => None,
        };
        Ok(MessageSummary { outcome, activation })
    }

    pub async fn status(&self) -> Result<HostStatus, Error> {
        let manifest_digest = match self.worker.read_manifest().await {
            Ok(table) => table.map(|table| table.digest()),
            Err(Error::InvalidManifest(reason)) => {
                tracing::warn!(%reason, "stored manifest is unreadable");
                None
            }
            Err(err) => return Err(err),
        };
        Ok(HostStatus {
            origin: self.worker.origin().to_string(),
            state: self.worker.state(),
            skip_waiting: self.worker.skip_waiting_requested(),
            clients_claimed: self.worker.clients_claimed(),
            deployment_digest: self.worker.resources().digest(),
            manifest_digest,
            resources: self.worker.resources().len(),
            core_files: self.worker.core().paths().len(),
            stores: self.storage().stats().await?,
        })
    }

    async fn activate_if_skipping(&self) -> Result<Option<ActivationReport>, Error> {
        if self.worker.skip_waiting_requested() && self.worker.state().is_waiting() {
            return self.activate().await.map(Some);
        }
        Ok(None)
    }

    async fn passthrough(&self, request: &Request) -> Result<(Response, Served), Error> {
        if request.method != "GET" {
            return Err(Error::InvalidInput(format!("only GET can be fetched, got {}", request.method)));
        }
        let response = self.network.fetch(&request.url, FetchMode::Default).await?;
        Ok((response, Served::Passthrough))
    }
}
