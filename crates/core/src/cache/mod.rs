//! Store backends for the worker.
//!
//! - SQLite-backed stores with async access via tokio-rusqlite, WAL mode
//!   and automatic schema migrations
//! - An in-memory backend for tests and throw-away caches

pub mod connection;
pub mod entries;
pub mod memory;
pub mod migrations;

pub use crate::Error;

pub use connection::CacheDb;
pub use memory::MemoryStorage;
