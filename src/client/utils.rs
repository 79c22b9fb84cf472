//! Utility functions for the PocketBase client.
//!
//! This module provides helper functions for:
//! - Joining the base url with api paths
//! - Building percent-encoded api paths
//! - Retry logic with exponential backoff
//! - Status code classification

use crate::protocol::encode_uri_component;
use std::time::Duration;

/// Join `base_url` and `path` with exactly one `/` between them.
///
/// An empty path returns the base url unchanged.
///
/// # Examples
///
/// ```
/// use pocketbase_client::client::join_url;
///
/// assert_eq!(join_url("http://127.0.0.1:8090", "/api/health"), "http://127.0.0.1:8090/api/health");
/// assert_eq!(join_url("http://127.0.0.1:8090/", "api/health"), "http://127.0.0.1:8090/api/health");
/// assert_eq!(join_url("http://127.0.0.1:8090", ""), "http://127.0.0.1:8090");
/// ```
pub fn join_url(base_url: &str, path: &str) -> String {
    let mut url = base_url.to_string();

    if !path.is_empty() {
        if !url.ends_with('/') {
            url.push('/');
        }
        url.push_str(path.strip_prefix('/').unwrap_or(path));
    }

    url
}

/// Build a `/`-joined path where every dynamic segment is percent-encoded.
///
/// ```
/// use pocketbase_client::client::api_path;
///
/// assert_eq!(api_path("/api/collections", &["my posts", "records"]), "/api/collections/my%20posts/records");
/// ```
pub fn api_path(base: &str, segments: &[&str]) -> String {
    let mut path = base.trim_end_matches('/').to_string();
    for segment in segments {
        path.push('/');
        path.push_str(&encode_uri_component(segment));
    }
    path
}

/// Check if status code indicates retryable error
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 425 | 429 | 502 | 503 | 504)
}

/// Exponential backoff delay calculation
pub fn exponential_backoff(attempt: u32, base_ms: u64) -> Duration {
    let delay_ms = base_ms.saturating_mul(2_u64.pow(attempt.min(10)));
    Duration::from_millis(delay_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_slashes() {
        assert_eq!(join_url("http://a", "b"), "http://a/b");
        assert_eq!(join_url("http://a/", "/b"), "http://a/b");
        assert_eq!(join_url("http://a/sub", "/api/x"), "http://a/sub/api/x");
        assert_eq!(join_url("/relative", "api"), "/relative/api");
    }

    #[test]
    fn test_api_path_encodes_segments() {
        assert_eq!(api_path("/api/admins", &["a/b"]), "/api/admins/a%2Fb");
        assert_eq!(api_path("/api/files/", &[]), "/api/files");
    }

    #[test]
    fn test_is_retryable_status() {
        assert!(is_retryable_status(503));
        assert!(is_retryable_status(429));
        assert!(!is_retryable_status(404));
    }

    #[test]
    fn test_exponential_backoff() {
        let delay0 = exponential_backoff(0, 100);
        let delay1 = exponential_backoff(1, 100);
        assert!(delay1 > delay0);
        assert_eq!(exponential_backoff(2, 100), Duration::from_millis(400));
    }
}
