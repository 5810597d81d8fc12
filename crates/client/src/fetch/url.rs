//! Request URL checks before anything goes on the wire.

/// Error type for request URL failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Parse an absolute request URL.
///
/// Only `http` and `https` are fetched. The fragment is dropped since it never
/// reaches the server; the query string is kept byte for byte so versioned
/// requests (`?v=...`) stay distinct.
pub fn request_url(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = url::Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }
    parsed.set_fragment(None);

    Ok(parsed)
}
