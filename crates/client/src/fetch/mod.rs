//! HTTP fetch for the worker's network seam.
//!
//! ### Request handling
//! - Absolute `http`/`https` URLs only, fragment removed, query kept
//! - Max redirects: 5 (configurable)
//! - Max body bytes: 32MB (configurable)
//! - [`FetchMode::Reload`] sends `Cache-Control: no-cache` so intermediaries revalidate
//!
//! ### Responses
//! Every response is returned as-is whatever its status; only transport
//! failures, timeouts and oversized bodies are errors.

pub mod url;

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, header};

pub use url::{UrlError, request_url};

use swcache_core::{AppConfig, Error, FetchMode, Network, Response};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "swcache/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 32MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "swcache/0.1".to_string(),
            max_bytes: 32 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            max_redirects: config.max_redirects,
        }
    }
}

/// HTTP client the worker fetches through.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// GET a URL, returning whatever response the server sends.
    pub async fn fetch(&self, url_str: &str, mode: FetchMode) -> Result<Response, Error> {
        let start = Instant::now();
        let url = request_url(url_str).map_err(|e| Error::InvalidUrl(format!("{url_str}: {e}")))?;

        let mut request = self.http.get(url.as_str());
        if mode == FetchMode::Reload {
            request = request.header(header::CACHE_CONTROL, "no-cache").header(header::PRAGMA, "no-cache");
        }

        let response = request.send().await.map_err(|e| transport_error(&url, e))?;

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchTooLarge(format!("{url}: {} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let status = response.status();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let headers_json = headers_to_json(response.headers());

        let bytes: Bytes = response.bytes().await.map_err(|e| transport_error(&url, e))?;
        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!(
                "{url}: {} bytes exceeds {}",
                bytes.len(),
                self.config.max_bytes
            )));
        }

        tracing::debug!(
            "fetched {} -> {} {} in {}ms ({} bytes, {:?})",
            url,
            final_url,
            status.as_u16(),
            start.elapsed().as_millis(),
            bytes.len(),
            mode
        );

        Ok(Response {
            url: final_url,
            status: status.as_u16(),
            content_type,
            headers_json,
            body: bytes.to_vec(),
            fetched_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl Network for FetchClient {
    async fn fetch(&self, url: &str, mode: FetchMode) -> Result<Response, Error> {
        FetchClient::fetch(self, url, mode).await
    }
}

fn transport_error(url: &::url::Url, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::FetchTimeout(format!("{url}: {err}"))
    } else {
        Error::Network(format!("{url}: {err}"))
    }
}

/// Response headers as a JSON object. Repeated headers are joined with `, `;
/// values that are not visible ASCII are skipped.
fn headers_to_json(headers: &header::HeaderMap) -> Option<String> {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let Ok(value) = value.to_str() else { continue };
        map.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    serde_json::to_string(&map).ok()
}
