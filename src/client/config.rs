//! Client configuration.

use crate::error::{ClientError, Result};
use serde::Deserialize;
use std::env;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8090";
const DEFAULT_LANG: &str = "en-US";

/// Configuration for [`Client`](super::Client).
///
/// # Examples
///
/// ```
/// use pocketbase_client::ClientConfig;
///
/// let config = ClientConfig {
///     base_url: "https://pb.example.com".into(),
///     max_retries: 2,
///     ..Default::default()
/// };
/// assert_eq!(config.lang, "en-US");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend address, e.g. `http://127.0.0.1:8090`.
    pub base_url: String,
    /// Sent as `Accept-Language` unless a request sets its own.
    pub lang: String,
    /// Per-request timeout.
    pub request_timeout_ms: u64,
    /// Idle connections kept per host.
    pub max_total_connections: u32,
    /// Proxy url, empty for none.
    pub proxy_url: String,
    /// Extra attempts for transport failures and retryable statuses.
    pub max_retries: u32,
    /// Base delay of the exponential backoff.
    pub retry_delay_ms: u64,
    /// Initial state of the duplicated request auto-cancellation.
    pub auto_cancellation: bool,
    pub enable_logging: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            lang: DEFAULT_LANG.to_string(),
            request_timeout_ms: 30_000,
            max_total_connections: 100,
            proxy_url: String::new(),
            max_retries: 0,
            retry_delay_ms: 500,
            auto_cancellation: true,
            enable_logging: true,
        }
    }
}

impl ClientConfig {
    /// Default configuration pointing at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Read the configuration from `POCKETBASE_*` environment variables.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `POCKETBASE_URL` | `base_url` |
    /// | `POCKETBASE_LANG` | `lang` |
    /// | `POCKETBASE_TIMEOUT_MS` | `request_timeout_ms` |
    /// | `POCKETBASE_MAX_RETRIES` | `max_retries` |
    /// | `POCKETBASE_AUTO_CANCEL` | `auto_cancellation` |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(mut lookup: F) -> Result<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = ClientConfig::default();

        if let Some(url) = optional_trimmed("POCKETBASE_URL", &mut lookup) {
            config.base_url = url;
        }
        if let Some(lang) = optional_trimmed("POCKETBASE_LANG", &mut lookup) {
            config.lang = lang;
        }
        if let Some(timeout) = parse_optional("POCKETBASE_TIMEOUT_MS", &mut lookup)? {
            config.request_timeout_ms = timeout;
        }
        if let Some(retries) = parse_optional("POCKETBASE_MAX_RETRIES", &mut lookup)? {
            config.max_retries = retries;
        }
        if let Some(auto_cancel) = optional_trimmed("POCKETBASE_AUTO_CANCEL", &mut lookup) {
            config.auto_cancellation = parse_bool("POCKETBASE_AUTO_CANCEL", &auto_cancel)?;
        }

        Ok(config)
    }
}

fn optional_trimmed<F>(key: &str, lookup: &mut F) -> Option<String>
where
    F: FnMut(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_optional<T, F>(key: &str, lookup: &mut F) -> Result<Option<T>>
where
    T: std::str::FromStr,
    F: FnMut(&str) -> Option<String>,
{
    match optional_trimmed(key, lookup) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ClientError::Config(format!("{} must be a number, got {:?}", key, raw))),
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ClientError::Config(format!("{} must be a boolean, got {:?}", key, raw))),
    }
}
