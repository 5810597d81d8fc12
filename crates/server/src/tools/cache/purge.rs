//! cache_purge tool implementation.
//!
//! Drops whole stores. The next activation rebuilds from whatever is left.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_core::{CacheStorage, Error, Store};

use crate::tools::json_result;

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Stores to delete: "content", "temp", "manifest" or full store names.
    pub stores: Vec<String>,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Stores that held entries and were deleted.
    pub deleted: Vec<String>,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(storage: &dyn CacheStorage, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    if params.stores.is_empty() {
        return Err(Error::InvalidInput("At least one store must be specified".to_string()).into());
    }

    let stores = params.stores.iter().map(|s| s.parse::<Store>()).collect::<Result<Vec<_>, _>>()?;

    let mut deleted = Vec::new();
    for store in stores {
        if storage.delete_store(store).await? {
            tracing::info!(%store, "purged store");
            deleted.push(store.name().to_string());
        }
    }

    json_result(&CachePurgeOutput { deleted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::output_text;
    use swcache_core::{MemoryStorage, Response};

    async fn seeded() -> MemoryStorage {
        let storage = MemoryStorage::new();
        for (store, key) in [
            (Store::Content, "https://app.example/index.html"),
            (Store::Content, "https://app.example/main.dart.js"),
            (Store::Temp, "https://app.example/index.html"),
        ] {
            storage.put(store, key, &Response::ok(key, "x")).await.unwrap();
        }
        storage
    }

    #[tokio::test]
    async fn test_purge_content() {
        let storage = seeded().await;

        let params = CachePurgeParams { stores: vec!["content".into()] };
        let result = purge_impl(&storage, params).await.unwrap();
        let output: CachePurgeOutput = serde_json::from_str(&output_text(&result)).unwrap();

        assert_eq!(output.deleted, vec!["app-cache"]);
        assert!(storage.keys(Store::Content).await.unwrap().is_empty());
        assert_eq!(storage.keys(Store::Temp).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_purge_skips_empty_stores() {
        let storage = seeded().await;

        let params = CachePurgeParams { stores: vec!["temp".into(), "manifest".into()] };
        let result = purge_impl(&storage, params).await.unwrap();
        let output: CachePurgeOutput = serde_json::from_str(&output_text(&result)).unwrap();

        assert_eq!(output.deleted, vec!["app-temp-cache"]);
    }

    #[tokio::test]
    async fn test_purge_unknown_store_deletes_nothing() {
        let storage = seeded().await;

        let params = CachePurgeParams { stores: vec!["content".into(), "bogus".into()] };
        assert!(purge_impl(&storage, params).await.is_err());
        assert_eq!(storage.keys(Store::Content).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_purge_no_params() {
        let storage = MemoryStorage::new();
        let params = CachePurgeParams { stores: vec![] };

        let result = purge_impl(&storage, params).await;
        assert!(result.is_err());
    }
}
