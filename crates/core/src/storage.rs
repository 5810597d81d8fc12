//! Named response stores and the handle the worker is given to reach them.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Error;

/// The three persistent stores the worker manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Store {
    /// Single-record metadata store holding the previous deployment's table.
    Manifest,
    /// Transient staging store filled during install.
    Temp,
    /// Live serving store.
    Content,
}

impl Store {
    pub const ALL: [Store; 3] = [Store::Manifest, Store::Temp, Store::Content];

    /// Persistent name of the store.
    pub fn name(self) -> &'static str {
        match self {
            Store::Manifest => "app-manifest",
            Store::Temp => "app-temp-cache",
            Store::Content => "app-cache",
        }
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Store {
    type Err = Error;

    /// Accepts either the short alias (`content`) or the persistent name (`app-cache`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Store::ALL
            .into_iter()
            .find(|store| {
                store.name() == s
                    || matches!(
                        (store, s),
                        (Store::Manifest, "manifest") | (Store::Temp, "temp") | (Store::Content, "content")
                    )
            })
            .ok_or_else(|| Error::InvalidInput(format!("unknown store: {s}")))
    }
}

/// A response as fetched from the network or held in a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// URL the response was finally served from.
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    /// Response headers as a JSON object, when captured.
    pub headers_json: Option<String>,
    pub body: Vec<u8>,
    /// RFC 3339 timestamp of the fetch.
    pub fetched_at: String,
}

impl Response {
    /// A 200 response with the given body, stamped now.
    pub fn ok(url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self::with_status(url, 200, body)
    }

    pub fn with_status(url: impl Into<String>, status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url: url.into(),
            status,
            content_type: None,
            headers_json: None,
            body: body.into(),
            fetched_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Entry count and body size of one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct StoreStats {
    pub store: Store,
    pub entries: u64,
    pub body_bytes: u64,
}

/// Access to the named stores.
///
/// Keys are request URLs (or the fixed `manifest` key in the manifest store).
/// Writes are not coordinated: concurrent puts to one key leave the last one.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Every key held in `store`.
    async fn keys(&self, store: Store) -> Result<Vec<String>, Error>;

    /// The response stored under `key`, if any.
    async fn lookup(&self, store: Store, key: &str) -> Result<Option<Response>, Error>;

    /// Insert or overwrite the response stored under `key`.
    async fn put(&self, store: Store, key: &str, response: &Response) -> Result<(), Error>;

    /// Remove one entry. Returns whether it existed.
    async fn delete(&self, store: Store, key: &str) -> Result<bool, Error>;

    /// Drop a whole store. Returns whether it held any entries.
    async fn delete_store(&self, store: Store) -> Result<bool, Error>;

    /// Entry counts for every store, including empty ones.
    async fn stats(&self) -> Result<Vec<StoreStats>, Error>;
}
