//! Cache-related MCP tools.
//!
//! This module provides tools for inspecting and clearing the worker's stores.

pub mod list;
pub mod purge;
pub mod status;

pub use list::{CacheListParams, list_impl};
pub use purge::{CachePurgeParams, purge_impl};
pub use status::status_impl;
