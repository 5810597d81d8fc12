//! Mapping between request URLs, store keys and logical resource paths.

use crate::Error;
use crate::manifest::ROOT_PATH;
use crate::origin::Origin;

/// Cache-busting query marker stripped before table lookups.
const VERSION_QUERY: &str = "?v=";

/// URL of a resource table path under `origin`.
pub fn resource_url(origin: &Origin, path: &str) -> String {
    if path == ROOT_PATH { format!("{origin}/") } else { format!("{origin}/{path}") }
}

/// Remainder of `url` after the origin, or `None` for a foreign URL.
///
/// The remainder excludes the separating `/`; the bare origin yields `""`.
fn origin_relative<'a>(origin: &Origin, url: &'a str) -> Option<&'a str> {
    let rest = url.strip_prefix(origin.as_str())?;
    if rest.is_empty() {
        return Some(rest);
    }
    rest.strip_prefix('/')
}

/// Logical path of an intercepted request URL.
///
/// Strips the origin, drops everything from the first `?v=`, and maps the bare
/// origin, an `origin/#…` URL or an empty remainder to `/`.
pub fn logical_path(origin: &Origin, url: &str) -> Option<String> {
    let rest = origin_relative(origin, url)?;
    if rest.is_empty() || rest.starts_with('#') {
        return Some(ROOT_PATH.to_string());
    }
    let path = match rest.find(VERSION_QUERY) {
        Some(idx) => &rest[..idx],
        None => rest,
    };
    if path.is_empty() { Some(ROOT_PATH.to_string()) } else { Some(path.to_string()) }
}

/// Logical path of a key already held in a store.
///
/// Unlike [`logical_path`], query strings are kept, so a key stored with a
/// `?v=` suffix never matches a table entry.
pub fn store_key_path(origin: &Origin, key: &str) -> Option<String> {
    let rest = origin_relative(origin, key)?;
    if rest.is_empty() { Some(ROOT_PATH.to_string()) } else { Some(rest.to_string()) }
}

/// Store key for a request URL: the parsed URL without its fragment.
pub fn cache_key(url: &str) -> Result<String, Error> {
    let mut parsed = url::Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
    parsed.set_fragment(None);
    Ok(parsed.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Origin {
        Origin::parse("https://app.example").unwrap()
    }

    #[test]
    fn test_resource_url() {
        assert_eq!(resource_url(&origin(), "/"), "https://app.example/");
        assert_eq!(resource_url(&origin(), "main.dart.js"), "https://app.example/main.dart.js");
        assert_eq!(
            resource_url(&origin(), "assets/FontManifest.json"),
            "https://app.example/assets/FontManifest.json"
        );
    }

    #[test]
    fn test_logical_path_plain() {
        assert_eq!(logical_path(&origin(), "https://app.example/main.dart.js").as_deref(), Some("main.dart.js"));
    }

    #[test]
    fn test_logical_path_strips_version_query() {
        assert_eq!(
            logical_path(&origin(), "https://app.example/main.dart.js?v=123").as_deref(),
            Some("main.dart.js")
        );
    }

    #[test]
    fn test_logical_path_keeps_other_queries() {
        assert_eq!(logical_path(&origin(), "https://app.example/a.js?x=1").as_deref(), Some("a.js?x=1"));
    }

    #[test]
    fn test_logical_path_root_forms() {
        for url in ["https://app.example", "https://app.example/", "https://app.example/#/home", "https://app.example/?v=9"]
        {
            assert_eq!(logical_path(&origin(), url).as_deref(), Some("/"), "{url}");
        }
    }

    #[test]
    fn test_logical_path_foreign() {
        assert_eq!(logical_path(&origin(), "https://cdn.example/main.dart.js"), None);
        assert_eq!(logical_path(&origin(), "https://app.example.evil/main.dart.js"), None);
    }

    #[test]
    fn test_store_key_path() {
        assert_eq!(store_key_path(&origin(), "https://app.example/").as_deref(), Some("/"));
        assert_eq!(store_key_path(&origin(), "https://app.example/index.html").as_deref(), Some("index.html"));
        assert_eq!(
            store_key_path(&origin(), "https://app.example/main.dart.js?v=1").as_deref(),
            Some("main.dart.js?v=1")
        );
        assert_eq!(store_key_path(&origin(), "https://other.example/index.html"), None);
    }

    #[test]
    fn test_cache_key_drops_fragment() {
        assert_eq!(cache_key("https://app.example/#/settings").unwrap(), "https://app.example/");
        assert_eq!(cache_key("https://app.example").unwrap(), "https://app.example/");
        assert_eq!(cache_key("https://app.example/a.js?v=1").unwrap(), "https://app.example/a.js?v=1");
    }

    #[test]
    fn test_cache_key_invalid() {
        assert!(matches!(cache_key("not a url"), Err(Error::InvalidUrl(_))));
    }
}
