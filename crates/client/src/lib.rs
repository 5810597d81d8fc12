//! Client code for swcache.
//!
//! This crate provides the HTTP implementation of the worker's
//! [`Network`](swcache_core::Network) seam.

pub mod fetch;

pub use fetch::{FetchClient, FetchConfig};
