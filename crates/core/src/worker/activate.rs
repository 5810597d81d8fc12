//! Activate: reconcile the content store with the new resource table.

use serde::{Deserialize, Serialize};

use super::{Worker, WorkerState, path};
use crate::Error;
use crate::manifest::ResourceTable;
use crate::storage::{Response, Store};

/// Key of the single record in the manifest store.
pub const MANIFEST_KEY: &str = "manifest";

/// What an activation did to the stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ActivationReport {
    /// No prior manifest: content store rebuilt from the temp store.
    Cold { copied: usize },
    /// Prior manifest found: stale entries evicted, the rest kept.
    Upgrade { evicted: usize, retained: usize, copied: usize },
    /// Reconciliation failed and every store was cleared.
    Reset { error: String },
}

impl Worker {
    /// Handle the activate event.
    ///
    /// Any failure while reconciling leaves the cache state unknown, so all
    /// three stores are dropped and the report is [`ActivationReport::Reset`].
    /// Only a failure to drop them is returned as an error.
    pub async fn on_activate(&self) -> Result<ActivationReport, Error> {
        self.transition(WorkerState::Activating)?;

        let report = match self.reconcile().await {
            Ok(report) => {
                self.claim_clients();
                report
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to upgrade offline cache; clearing all stores");
                if let Err(wipe_err) = self.clear_all().await {
                    self.transition(WorkerState::Redundant)?;
                    return Err(wipe_err);
                }
                ActivationReport::Reset { error: err.to_string() }
            }
        };

        self.transition(WorkerState::Activated)?;
        tracing::info!(report = ?report, digest = %self.resources.digest(), "activated worker");
        Ok(report)
    }

    async fn reconcile(&self) -> Result<ActivationReport, Error> {
        let report = match self.read_manifest().await? {
            None => {
                self.storage.delete_store(Store::Content).await?;
                let copied = self.copy_staged().await?;
                ActivationReport::Cold { copied }
            }
            Some(previous) => {
                let (evicted, retained) = self.evict_stale(&previous).await?;
                let copied = self.copy_staged().await?;
                ActivationReport::Upgrade { evicted, retained, copied }
            }
        };

        self.storage.delete_store(Store::Temp).await?;
        self.write_manifest().await?;
        Ok(report)
    }

    /// Drop content entries that are foreign, gone from the new table, or
    /// whose fingerprint changed since `previous`. Returns (evicted, retained).
    async fn evict_stale(&self, previous: &ResourceTable) -> Result<(usize, usize), Error> {
        let mut evicted = 0;
        let mut retained = 0;
        for key in self.storage.keys(Store::Content).await? {
            let fresh = path::store_key_path(&self.origin, &key)
                .is_some_and(|p| self.resources.get(&p).is_some_and(|hash| previous.get(&p) == Some(hash)));
            if fresh {
                retained += 1;
            } else {
                self.storage.delete(Store::Content, &key).await?;
                tracing::debug!(%key, "evicted stale entry");
                evicted += 1;
            }
        }
        Ok((evicted, retained))
    }

    /// Copy every temp entry into the content store, overwriting.
    async fn copy_staged(&self) -> Result<usize, Error> {
        let mut copied = 0;
        for key in self.storage.keys(Store::Temp).await? {
            let response = self
                .storage
                .lookup(Store::Temp, &key)
                .await?
                .ok_or_else(|| Error::CacheMiss(key.clone()))?;
            self.storage.put(Store::Content, &key, &response).await?;
            copied += 1;
        }
        Ok(copied)
    }

    /// The resource table persisted by the previous activation.
    pub async fn read_manifest(&self) -> Result<Option<ResourceTable>, Error> {
        match self.storage.lookup(Store::Manifest, MANIFEST_KEY).await? {
            Some(record) => Ok(Some(ResourceTable::from_record(&record.body)?)),
            None => Ok(None),
        }
    }

    async fn write_manifest(&self) -> Result<(), Error> {
        let record = Response {
            content_type: Some("application/json".to_string()),
            ..Response::ok(MANIFEST_KEY, self.resources.to_record()?)
        };
        self.storage.put(Store::Manifest, MANIFEST_KEY, &record).await
    }

    async fn clear_all(&self) -> Result<(), Error> {
        for store in [Store::Content, Store::Temp, Store::Manifest] {
            self.storage.delete_store(store).await?;
        }
        Ok(())
    }
}
