//! cache_status tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};

use crate::host::WorkerHost;
use crate::tools::json_result;

/// Implementation of the cache_status tool.
pub async fn status_impl(host: &WorkerHost) -> Result<CallToolResult, McpError> {
    let status = host.status().await?;
    json_result(&status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostStatus;
    use crate::tools::testing::{StaticNetwork, host_with, output_text};
    use swcache_core::Store;
    use swcache_core::worker::WorkerState;

    #[tokio::test]
    async fn test_status_impl_after_install() {
        let (host, _) = host_with(StaticNetwork::new().serve("https://app.example/index.html", "<index>"));
        host.install().await.unwrap();

        let result = status_impl(&host).await.unwrap();
        let output: HostStatus = serde_json::from_str(&output_text(&result)).unwrap();

        assert_eq!(output.origin, "https://app.example");
        assert_eq!(output.state, WorkerState::Activated);
        assert_eq!(output.resources, 3);
        let content = output.stores.iter().find(|s| s.store == Store::Content).unwrap();
        assert_eq!(content.entries, 1);
    }
}
