//! Install: stage the core set into the temp store.

use serde::{Deserialize, Serialize};

use super::{Worker, WorkerState};
use crate::Error;
use crate::network::FetchMode;
use crate::storage::Store;

/// Result of a successful install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct InstallReport {
    /// Keys written to the temp store, in core set order.
    pub staged: Vec<String>,
}

impl Worker {
    /// Handle the install event.
    ///
    /// Requests skip-waiting, then fetches every core path bypassing HTTP
    /// caches. Any failure fails the whole event and leaves the worker
    /// installable again.
    pub async fn on_install(&self) -> Result<InstallReport, Error> {
        self.transition(WorkerState::Installing)?;
        self.skip_waiting();

        match self.stage_core().await {
            Ok(staged) => {
                self.transition(WorkerState::Installed)?;
                tracing::info!(staged = staged.len(), "installed worker");
                Ok(InstallReport { staged })
            }
            Err(err) => {
                tracing::warn!(error = %err, "install failed");
                self.transition(WorkerState::Parsed)?;
                Err(err)
            }
        }
    }

    /// Replace the temp store with this deployment's core set.
    ///
    /// Entries left by an earlier install that never activated are dropped
    /// first; activation copies everything the temp store holds.
    async fn stage_core(&self) -> Result<Vec<String>, Error> {
        if self.storage.delete_store(Store::Temp).await? {
            tracing::debug!("dropped leftover staged entries");
        }
        self.add_all(Store::Temp, self.core.paths(), FetchMode::Reload).await
    }
}
