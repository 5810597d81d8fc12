//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::host::WorkerHost;
use crate::tools::cache::{CacheListParams, CachePurgeParams, list_impl, purge_impl, status_impl};
use crate::tools::fetch::{FetchParams, fetch_impl};
use crate::tools::lifecycle::{activate_impl, install_impl};
use crate::tools::message::{MessageParams, message_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for swcache.
#[derive(Clone)]
pub struct SwcacheServer {
    host: Arc<WorkerHost>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl SwcacheServer {
    /// Create a new server handler around a worker host.
    pub fn new(host: Arc<WorkerHost>) -> Self {
        Self { host, tool_router: Self::tool_router() }
    }

    #[tool(
        description = "Deliver the install event: stage the core files into the temp store. Activates immediately when the worker asked to skip waiting."
    )]
    async fn sw_install(&self) -> Result<CallToolResult, McpError> {
        install_impl(&self.host).await
    }

    #[tool(
        description = "Deliver the activate event: reconcile the content store with the deployment's resource table and claim clients."
    )]
    async fn sw_activate(&self) -> Result<CallToolResult, McpError> {
        activate_impl(&self.host).await
    }

    /// Deliver a fetch event.
    ///
    /// Requests the worker does not intercept are fetched from the network directly.
    #[tool(
        description = "Fetch a URL through the offline cache worker. Reports whether the response came from the cache, the network, or a passthrough fetch."
    )]
    async fn sw_fetch(&self, params: Parameters<FetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(&self.host, params.0).await
    }

    #[tool(description = "Send a control message to the worker: \"skipWaiting\" or \"downloadOffline\".")]
    async fn sw_message(&self, params: Parameters<MessageParams>) -> Result<CallToolResult, McpError> {
        message_impl(&self.host, params.0).await
    }

    #[tool(description = "List the keys held in one store (content, temp or manifest).")]
    async fn cache_list(&self, params: Parameters<CacheListParams>) -> Result<CallToolResult, McpError> {
        list_impl(self.host.storage().as_ref(), params.0).await
    }

    #[tool(description = "Delete one or more stores (content, temp or manifest).")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(self.host.storage().as_ref(), params.0).await
    }

    #[tool(description = "Report worker state, deployment and manifest digests, and per-store entry counts.")]
    async fn cache_status(&self) -> Result<CallToolResult, McpError> {
        status_impl(&self.host).await
    }
}

impl ServerHandler for SwcacheServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "swcache".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
