//! sw_fetch tool implementation.
//!
//! Delivers a fetch event and reports who answered it.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_core::worker::Request;

use super::json_result;
use crate::host::{Served, WorkerHost};

/// Parameters for the sw_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FetchParams {
    /// Absolute URL of the request.
    pub url: String,

    /// HTTP method (default: GET). Only GET requests are intercepted.
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    "GET".into()
}

/// Output from the sw_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FetchOutput {
    /// URL the response was served from.
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub served: Served,
    pub fetched_at: String,
    pub body_bytes: usize,
    /// Body as text when it is valid UTF-8.
    pub body: Option<String>,
}

/// Implementation of the sw_fetch tool.
pub async fn fetch_impl(host: &WorkerHost, params: FetchParams) -> Result<CallToolResult, McpError> {
    if params.url.trim().is_empty() {
        return Err(swcache_core::Error::InvalidInput("url cannot be empty".into()).into());
    }

    let request = Request { method: params.method.to_ascii_uppercase(), url: params.url };
    let (response, served) = host.fetch(&request).await?;

    let output = FetchOutput {
        url: response.url,
        status: response.status,
        content_type: response.content_type,
        served,
        fetched_at: response.fetched_at,
        body_bytes: response.body.len(),
        body: String::from_utf8(response.body).ok(),
    };
    json_result(&output)
}
