//! Out-of-band control messages.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{Worker, path};
use crate::Error;
use crate::network::FetchMode;
use crate::storage::Store;

/// Control signals understood by the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMessage {
    /// Activate a waiting worker now. Open pages must reload themselves.
    SkipWaiting,
    /// Fetch every resource table path not yet in the content store.
    DownloadOffline,
}

impl ControlMessage {
    /// Recognize a message payload. Unknown payloads yield `None`.
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "skipWaiting" => Some(ControlMessage::SkipWaiting),
            "downloadOffline" => Some(ControlMessage::DownloadOffline),
            _ => None,
        }
    }
}

/// What handling a message did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MessageOutcome {
    SkipWaiting,
    Downloaded { stored: Vec<String> },
    Ignored,
}

impl Worker {
    /// Handle a message event.
    pub async fn on_message(&self, data: &str) -> Result<MessageOutcome, Error> {
        match ControlMessage::parse(data) {
            Some(ControlMessage::SkipWaiting) => {
                self.skip_waiting();
                Ok(MessageOutcome::SkipWaiting)
            }
            Some(ControlMessage::DownloadOffline) => {
                let stored = self.download_offline().await?;
                Ok(MessageOutcome::Downloaded { stored })
            }
            None => {
                tracing::debug!(data, "ignoring unknown message");
                Ok(MessageOutcome::Ignored)
            }
        }
    }

    /// Fill the content store with every resource table path it lacks.
    ///
    /// All or nothing: one failed fetch aborts the batch before any write.
    pub async fn download_offline(&self) -> Result<Vec<String>, Error> {
        let present: HashSet<String> = self
            .storage
            .keys(Store::Content)
            .await?
            .iter()
            .filter_map(|key| path::store_key_path(&self.origin, key))
            .collect();

        let missing: Vec<String> = self
            .resources
            .paths()
            .filter(|p| !present.contains(*p))
            .map(String::from)
            .collect();

        tracing::info!(missing = missing.len(), "downloading resources for offline use");
        self.add_all(Store::Content, &missing, FetchMode::Default).await
    }
}
