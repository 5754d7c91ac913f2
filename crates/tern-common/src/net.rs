//! HTTP fetch utilities for the Tern engine.
//!
//! Provides the blocking GET wrapper used by the document loader, returning
//! the response headers together with the body text, plus an in-process
//! response cache driven by the `Cache-Control` header.
//!
//! Redirects follow reqwest's default policy (up to 10 hops).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use thiserror::Error;

/// User-Agent header sent with all requests.
///
/// Mimics a common desktop browser to avoid basic bot detection.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Response headers, keyed by lower-cased header name.
pub type HeaderMap = HashMap<String, String>;

/// Errors produced while fetching a document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request itself failed (DNS, connect, TLS, timeout).
    #[error("request for {url} failed: {source}")]
    Request {
        /// The URL that was requested.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status code.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// The URL that was requested.
        url: String,
        /// The status code of the response.
        status: u16,
    },

    /// The response body could not be decoded as text.
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Fetch a URL and return its headers and body text.
///
/// # Errors
///
/// Returns a [`FetchError`] if the client cannot be built, the request
/// fails, the response status is not a success, or the body cannot be
/// decoded as text.
pub fn fetch(url: &str) -> Result<(HeaderMap, String), FetchError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .build()
        .map_err(FetchError::Client)?;

    let response = client
        .get(url)
        .header("User-Agent", USER_AGENT)
        .send()
        .map_err(|e| FetchError::Request {
            url: url.to_string(),
            source: e,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let mut headers = HeaderMap::new();
    for (name, value) in response.headers() {
        if let Ok(text) = value.to_str() {
            let _ = headers.insert(name.as_str().to_ascii_lowercase(), text.to_string());
        }
    }

    let body = response.text().map_err(FetchError::Body)?;
    Ok((headers, body))
}

/// A cached GET response together with its expiry time.
struct CacheEntry {
    headers: HeaderMap,
    body: String,
    expires_at: Instant,
}

/// In-process cache of GET responses.
///
/// The same images, styles, and scripts tend to be requested from multiple
/// pages; refetching them every time is a waste. A response is cached only
/// when its `Cache-Control` header carries a `max-age` directive and no
/// `no-store`; any other directive disables caching for that response.
#[derive(Default)]
pub struct ResponseCache {
    entries: HashMap<String, CacheEntry>,
}

impl ResponseCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a URL, evicting the entry if it has expired.
    pub fn get(&mut self, url: &str) -> Option<(HeaderMap, String)> {
        match self.entries.get(url) {
            Some(entry) if Instant::now() < entry.expires_at => {
                Some((entry.headers.clone(), entry.body.clone()))
            }
            Some(_) => {
                let _ = self.entries.remove(url);
                None
            }
            None => None,
        }
    }

    /// Store a response if its `Cache-Control` header allows it.
    pub fn store(&mut self, url: &str, headers: &HeaderMap, body: &str) {
        let Some(max_age) = cache_lifetime(headers) else {
            return;
        };
        let _ = self.entries.insert(
            url.to_string(),
            CacheEntry {
                headers: headers.clone(),
                body: body.to_string(),
                expires_at: Instant::now() + max_age,
            },
        );
    }

    /// Number of live entries (expired entries may still be counted until
    /// the next lookup evicts them).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decide how long a response may be cached, from its `Cache-Control`
/// header. `None` means "do not cache".
fn cache_lifetime(headers: &HeaderMap) -> Option<Duration> {
    let cache_control = headers.get("cache-control")?.to_ascii_lowercase();
    if cache_control.contains("no-store") {
        return None;
    }
    let rest = cache_control.split("max-age=").nth(1)?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    let seconds: u64 = digits.parse().ok()?;
    if seconds == 0 {
        return None;
    }
    Some(Duration::from_secs(seconds))
}

/// Fetch a URL through a [`ResponseCache`].
///
/// A cache hit skips the network entirely; a miss performs [`fetch`] and
/// stores the result when the response's `Cache-Control` allows it.
///
/// # Errors
///
/// Propagates any [`FetchError`] from the underlying [`fetch`].
pub fn fetch_cached(
    cache: &mut ResponseCache,
    url: &str,
) -> Result<(HeaderMap, String), FetchError> {
    if let Some(hit) = cache.get(url) {
        return Ok(hit);
    }
    let (headers, body) = fetch(url)?;
    cache.store(url, &headers, &body);
    Ok((headers, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cache_control: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(value) = cache_control {
            let _ = map.insert("cache-control".to_string(), value.to_string());
        }
        map
    }

    #[test]
    fn uncacheable_without_cache_control() {
        let mut cache = ResponseCache::new();
        cache.store("http://a.example/", &headers(None), "body");
        assert!(cache.get("http://a.example/").is_none());
    }

    #[test]
    fn no_store_wins_over_max_age() {
        let mut cache = ResponseCache::new();
        let hdrs = headers(Some("no-store, max-age=3600"));
        cache.store("http://a.example/", &hdrs, "body");
        assert!(cache.get("http://a.example/").is_none());
    }

    #[test]
    fn max_age_caches_response() {
        let mut cache = ResponseCache::new();
        let hdrs = headers(Some("max-age=3600"));
        cache.store("http://a.example/", &hdrs, "body");
        let (_, body) = cache.get("http://a.example/").expect("cache hit");
        assert_eq!(body, "body");
    }

    #[test]
    fn zero_max_age_is_not_cached() {
        let mut cache = ResponseCache::new();
        let hdrs = headers(Some("max-age=0"));
        cache.store("http://a.example/", &hdrs, "body");
        assert!(cache.get("http://a.example/").is_none());
    }

    #[test]
    fn unknown_directives_disable_caching() {
        let mut cache = ResponseCache::new();
        let hdrs = headers(Some("private"));
        cache.store("http://a.example/", &hdrs, "body");
        assert!(cache.get("http://a.example/").is_none());
    }
}
