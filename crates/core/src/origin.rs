//! Origin canonicalization for the served application.

use std::fmt;

/// Error type for origin canonicalization failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OriginError {
    #[error("empty origin")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("origin must not carry a path, query or fragment: {0}")]
    NotAnOrigin(String),

    #[error("invalid origin: {0}")]
    InvalidUrl(String),
}

/// Scheme, host and port of the application, serialized without a trailing
/// slash (`https://app.example` or `http://localhost:8080`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin(String);

impl Origin {
    /// Canonicalize an origin string.
    ///
    /// Normalization steps:
    /// 1. Trim leading/trailing whitespace
    /// 2. Default scheme to https:// if missing
    /// 3. Lowercase the host and drop a default port
    /// 4. Reject anything beyond a bare `/` path
    pub fn parse(input: &str) -> Result<Self, OriginError> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Err(OriginError::Empty);
        }

        let url_str = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };

        let parsed = url::Url::parse(&url_str).map_err(|e| OriginError::InvalidUrl(e.to_string()))?;

        match parsed.scheme() {
            "http" | "https" => {}
            scheme => return Err(OriginError::UnsupportedScheme(scheme.to_string())),
        }

        if parsed.path() != "/" || parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(OriginError::NotAnOrigin(trimmed.to_string()));
        }

        Ok(Self(parsed.origin().ascii_serialization()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let origin = Origin::parse("https://app.example").unwrap();
        assert_eq!(origin.as_str(), "https://app.example");
    }

    #[test]
    fn test_parse_trailing_slash() {
        let origin = Origin::parse("https://app.example/").unwrap();
        assert_eq!(origin.as_str(), "https://app.example");
    }

    #[test]
    fn test_parse_default_scheme() {
        let origin = Origin::parse("app.example").unwrap();
        assert_eq!(origin.as_str(), "https://app.example");
    }

    #[test]
    fn test_parse_lowercase_host() {
        let origin = Origin::parse("https://APP.Example").unwrap();
        assert_eq!(origin.as_str(), "https://app.example");
    }

    #[test]
    fn test_parse_keeps_explicit_port() {
        let origin = Origin::parse("http://localhost:8080").unwrap();
        assert_eq!(origin.as_str(), "http://localhost:8080");
    }

    #[test]
    fn test_parse_drops_default_port() {
        let origin = Origin::parse("https://app.example:443").unwrap();
        assert_eq!(origin.as_str(), "https://app.example");
    }

    #[test]
    fn test_parse_rejects_path() {
        let result = Origin::parse("https://app.example/app/");
        assert!(matches!(result, Err(OriginError::NotAnOrigin(_))));
    }

    #[test]
    fn test_parse_rejects_query() {
        let result = Origin::parse("https://app.example/?v=1");
        assert!(matches!(result, Err(OriginError::NotAnOrigin(_))));
    }

    #[test]
    fn test_parse_unsupported_scheme() {
        let result = Origin::parse("file:///etc/passwd");
        assert!(matches!(result, Err(OriginError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Origin::parse("   "), Err(OriginError::Empty));
    }
}
