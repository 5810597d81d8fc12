//! sw_message tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;
use crate::host::WorkerHost;

/// Parameters for the sw_message tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MessageParams {
    /// Message payload: "skipWaiting" or "downloadOffline".
    pub data: String,
}

/// Implementation of the sw_message tool.
pub async fn message_impl(host: &WorkerHost, params: MessageParams) -> Result<CallToolResult, McpError> {
    let summary = host.message(&params.data).await?;
    json_result(&summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{StaticNetwork, host_with, output_text};

    fn full_network() -> StaticNetwork {
        StaticNetwork::new()
            .serve("https://app.example/", "root")
            .serve("https://app.example/index.html", "<index>")
            .serve("https://app.example/main.dart.js", "main()")
    }

    #[tokio::test]
    async fn test_message_impl_download_offline() {
        let (host, _) = host_with(full_network());
        host.install().await.unwrap();

        let result = message_impl(&host, MessageParams { data: "downloadOffline".into() }).await.unwrap();
        let output: serde_json::Value = serde_json::from_str(&output_text(&result)).unwrap();

        assert_eq!(output["outcome"]["action"], "downloaded");
        assert_eq!(output["outcome"]["stored"].as_array().map(Vec::len), Some(2));
        assert!(output["activation"].is_null());
    }

    #[tokio::test]
    async fn test_message_impl_skip_waiting() {
        let (host, _) = host_with(full_network());

        let result = message_impl(&host, MessageParams { data: "skipWaiting".into() }).await.unwrap();
        let output: serde_json::Value = serde_json::from_str(&output_text(&result)).unwrap();

        assert_eq!(output["outcome"]["action"], "skip_waiting");
        assert!(output["activation"].is_null(), "nothing installed yet, nothing to activate");
    }

    #[tokio::test]
    async fn test_message_impl_unknown() {
        let (host, _) = host_with(full_network());

        let result = message_impl(&host, MessageParams { data: "hello".into() }).await.unwrap();
        let output: serde_json::Value = serde_json::from_str(&output_text(&result)).unwrap();

        assert_eq!(output["outcome"]["action"], "ignored");
    }
}
