//! sw_install and sw_activate tool implementations.
//!
//! Deliver the install and activate lifecycle events to the worker.

use rmcp::{ErrorData as McpError, model::CallToolResult};

use super::json_result;
use crate::host::WorkerHost;

/// Implementation of the sw_install tool.
pub async fn install_impl(host: &WorkerHost) -> Result<CallToolResult, McpError> {
    let summary = host.install().await?;
    json_result(&summary)
}

/// Implementation of the sw_activate tool.
pub async fn activate_impl(host: &WorkerHost) -> Result<CallToolResult, McpError> {
    let report = host.activate().await?;
    json_result(&report)
}
