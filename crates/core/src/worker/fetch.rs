//! Fetch: route resource requests through the content store.
//!
//! The site root is served network-first so a new deployment's entry page is
//! picked up as soon as it is reachable. Every other resource table path is
//! served cache-first and filled lazily.

use serde::{Deserialize, Serialize};

use super::{Worker, path};
use crate::Error;
use crate::manifest::ROOT_PATH;
use crate::network::FetchMode;
use crate::storage::{Response, Store};

/// A request delivered with a fetch event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    pub url: String,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self { method: "GET".to_string(), url: url.into() }
    }
}

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Cache,
    Network,
}

/// The worker's answer to a fetch event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Not intercepted; the host should perform its default network handling.
    Passthrough,
    Respond { response: Response, source: Source },
}

impl Worker {
    /// Handle a fetch event.
    ///
    /// Only GET requests for same-origin resource table paths are intercepted.
    pub async fn on_fetch(&self, request: &Request) -> Result<FetchOutcome, Error> {
        if request.method != "GET" {
            return Ok(FetchOutcome::Passthrough);
        }
        let Some(logical) = path::logical_path(&self.origin, &request.url) else {
            return Ok(FetchOutcome::Passthrough);
        };
        if !self.resources.contains(&logical) {
            tracing::trace!(url = %request.url, "not a resource; passing through");
            return Ok(FetchOutcome::Passthrough);
        }

        let key = path::cache_key(&request.url)?;
        if logical == ROOT_PATH { self.network_first(&key).await } else { self.cache_first(&key).await }
    }

    /// Try the network, falling back to the content store only when no
    /// response could be obtained. The network error is what the caller sees
    /// when the fallback has nothing to serve.
    async fn network_first(&self, key: &str) -> Result<FetchOutcome, Error> {
        match self.network.fetch(key, FetchMode::Default).await {
            Ok(response) => {
                self.fill(key, &response).await;
                Ok(FetchOutcome::Respond { response, source: Source::Network })
            }
            Err(err) => match self.storage.lookup(Store::Content, key).await {
                Ok(Some(cached)) => {
                    tracing::debug!(%key, error = %err, "network failed; serving cached root");
                    Ok(FetchOutcome::Respond { response: cached, source: Source::Cache })
                }
                Ok(None) => Err(err),
                Err(lookup_err) => {
                    tracing::warn!(%key, error = %lookup_err, "cache fallback failed");
                    Err(err)
                }
            },
        }
    }

    /// Serve from the content store, or fetch and keep successful responses.
    async fn cache_first(&self, key: &str) -> Result<FetchOutcome, Error> {
        if let Some(cached) = self.storage.lookup(Store::Content, key).await? {
            tracing::debug!(%key, "cache hit");
            return Ok(FetchOutcome::Respond { response: cached, source: Source::Cache });
        }

        tracing::debug!(%key, "cache miss");
        let response = self.network.fetch(key, FetchMode::Default).await?;
        if response.is_ok() {
            self.fill(key, &response).await;
        }
        Ok(FetchOutcome::Respond { response, source: Source::Network })
    }

    /// Store a copy of `response`. Failures do not affect the response being served.
    async fn fill(&self, key: &str, response: &Response) {
        if let Err(err) = self.storage.put(Store::Content, key, response).await {
            tracing::warn!(%key, error = %err, "failed to fill content store");
        }
    }
}
