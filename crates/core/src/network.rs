//! The live network as seen by the worker.

use async_trait::async_trait;

use crate::Error;
use crate::storage::Response;

/// How a request should treat intermediate HTTP caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    #[default]
    Default,
    /// Bypass HTTP caches and revalidate with the server.
    Reload,
}

/// Performs GET requests on behalf of the worker.
///
/// Any response that arrives is `Ok`, whatever its status. `Err` means no
/// response was obtained.
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, url: &str, mode: FetchMode) -> Result<Response, Error>;
}
