//! Core types and shared functionality for swcache.
//!
//! This crate provides:
//! - The offline cache worker and its install/activate/fetch/message handlers
//! - Named response stores with SQLite and in-memory backends
//! - The deployment resource table and manifest digest
//! - Unified error types and configuration

pub mod cache;
pub mod config;
pub mod error;
pub mod manifest;
pub mod network;
pub mod origin;
pub mod storage;
pub mod worker;

pub use cache::{CacheDb, MemoryStorage};
pub use config::AppConfig;
pub use error::Error;
pub use manifest::{CoreSet, ResourceTable};
pub use network::{FetchMode, Network};
pub use origin::Origin;
pub use storage::{CacheStorage, Response, Store, StoreStats};
pub use worker::Worker;
