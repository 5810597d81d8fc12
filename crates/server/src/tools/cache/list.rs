//! cache_list tool implementation.
//!
//! Lists the keys held in one store.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_core::{CacheStorage, Store};

use crate::tools::json_result;

/// Parameters for the cache_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheListParams {
    /// Store to list: "content", "temp", "manifest" or a full store name.
    pub store: String,
}

/// Output from the cache_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheListOutput {
    /// Persistent store name.
    pub store: String,
    pub keys: Vec<String>,
}

/// Implementation of the cache_list tool.
pub async fn list_impl(storage: &dyn CacheStorage, params: CacheListParams) -> Result<CallToolResult, McpError> {
    let store: Store = params.store.parse()?;
    let keys = storage.keys(store).await?;

    json_result(&CacheListOutput { store: store.name().to_string(), keys })
}
