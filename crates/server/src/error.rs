//! Startup errors for the swcache host.

use swcache_core::{Error, config::ConfigError};

/// Failures while assembling the worker from configuration.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Configuration could not be loaded or failed validation.
    #[error("CONFIG_INVALID: {0}")]
    Config(#[from] ConfigError),

    /// Resource table, cache database or HTTP client could not be set up.
    #[error("{0}")]
    Worker(#[from] Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err: StartupError = ConfigError::Invalid { field: "origin".into(), reason: "empty".into() }.into();
        assert!(err.to_string().starts_with("CONFIG_INVALID"));
    }

    #[test]
    fn test_worker_error_keeps_code() {
        let err: StartupError = Error::InvalidManifest("bad table".into()).into();
        assert!(err.to_string().starts_with("MANIFEST_INVALID"));
    }
}
