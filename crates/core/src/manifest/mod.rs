//! Resource table and core set of a deployment.
//!
//! The resource table maps origin-relative paths (plus the literal `/` for
//! the site root) to opaque content fingerprints. It is regenerated wholesale
//! for every build and persisted as the manifest record on activation.

pub mod hash;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Error;
use hash::{compute_deployment_digest, is_fingerprint};

/// Logical path of the site root.
pub const ROOT_PATH: &str = "/";

/// Mapping from normalized path to content fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceTable {
    entries: BTreeMap<String, String>,
}

impl ResourceTable {
    /// Parse and validate a deployment table from its JSON form.
    ///
    /// Keys must be non-empty and values must be 32-character lowercase hex
    /// fingerprints.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let table: Self = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Read and validate a deployment table from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::InvalidManifest(format!("failed to read {}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// Decode a persisted manifest record.
    ///
    /// Records are trusted as written; fingerprints are only compared.
    pub fn from_record(bytes: &[u8]) -> Result<Self, Error> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Encode the table as a manifest record.
    pub fn to_record(&self) -> Result<Vec<u8>, Error> {
        Ok(serde_json::to_vec(self)?)
    }

    fn validate(&self) -> Result<(), Error> {
        for (path, fingerprint) in &self.entries {
            if path.is_empty() {
                return Err(Error::InvalidManifest("empty resource path".into()));
            }
            if !is_fingerprint(fingerprint) {
                return Err(Error::InvalidManifest(format!("invalid fingerprint for {path}: {fingerprint:?}")));
            }
        }
        Ok(())
    }

    /// Fingerprint recorded for `path`.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// SHA-256 digest identifying this deployment.
    pub fn digest(&self) -> String {
        compute_deployment_digest(self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResourceTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

/// Ordered paths that must be staged before the worker is usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreSet {
    paths: Vec<String>,
}

impl CoreSet {
    /// Build a core set, rejecting paths the resource table does not list.
    pub fn new(paths: Vec<String>, table: &ResourceTable) -> Result<Self, Error> {
        if let Some(unknown) = paths.iter().find(|p| !table.contains(p.as_str())) {
            return Err(Error::InvalidManifest(format!("core path {unknown} is not in the resource table")));
        }
        Ok(Self { paths })
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }
}
