//! Main PocketBase client implementation.
//!
//! Provides [`Client`], which owns the HTTP connection pool, the auth store and
//! the request hooks, and hands out the per-API services.
//!
//! # Examples
//!
//! ## Health check
//!
//! ```ignore
//! use pocketbase_client::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("http://127.0.0.1:8090");
//!     let health = client.health().check(Default::default()).await?;
//!     println!("{}", health.message);
//!     Ok(())
//! }
//! ```
//!
//! ## Authenticate and list records
//!
//! ```ignore
//! use pocketbase_client::{Client, QueryParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("http://127.0.0.1:8090");
//!     client
//!         .collection("users")
//!         .auth_with_password("test@example.com", "123456", QueryParams::new())
//!         .await?;
//!
//!     let posts = client
//!         .collection("posts")
//!         .get_list(1, 20, QueryParams::new().set("filter", "published = true"))
//!         .await?;
//!     println!("{} posts", posts.total_items);
//!     Ok(())
//! }
//! ```
//!
//! ## Custom headers through a hook
//!
//! ```ignore
//! use pocketbase_client::{BeforeSendResult, Client};
//!
//! let client = Client::new("http://127.0.0.1:8090");
//! client.set_before_send(|url, options| {
//!     let options = options.clone().header("X-Custom-Header", "example");
//!     BeforeSendResult { url: Some(url.to_string()), options: Some(options) }
//! });
//! ```

use super::cancel::CancelRegistry;
use super::config::ClientConfig;
use super::options::{
    AfterSendHook, BeforeSendHook, BeforeSendResult, RequestBody, ResponseInfo, SendOptions,
};
use super::utils::{exponential_backoff, join_url};
use crate::error::{ClientError, Result};
use crate::models::Record;
use crate::protocol::constants::{ACCEPT_LANGUAGE, APPLICATION_JSON, AUTHORIZATION, CONTENT_TYPE};
use crate::protocol::{set_header_if_missing, QueryParams};
use crate::services::{
    AdminService, CollectionService, FileService, HealthService, LogService, RecordService,
    SettingsService,
};
use crate::stores::{AuthStore, LocalAuthStore};
use futures::future::Abortable;
use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// The PocketBase API client.
///
/// Cheap to clone; clones share the connection pool, the auth store, the hooks
/// and the pending request registry.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    config: ClientConfig,
    auth_store: Arc<dyn AuthStore>,
    before_send: RwLock<Option<BeforeSendHook>>,
    after_send: RwLock<Option<AfterSendHook>>,
    auto_cancellation: AtomicBool,
    cancel_registry: CancelRegistry,
}

impl Client {
    /// Create a client for `base_url` with default configuration.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_config(ClientConfig::new(base_url))
    }

    /// Create a client with custom configuration and an in-memory [`LocalAuthStore`].
    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_auth_store(config, Arc::new(LocalAuthStore::default()))
    }

    /// Create a client with custom configuration and auth store.
    pub fn with_auth_store(config: ClientConfig, auth_store: Arc<dyn AuthStore>) -> Self {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(config.max_total_connections as usize);

        if !config.proxy_url.is_empty() {
            match reqwest::Proxy::all(&config.proxy_url) {
                Ok(proxy) => builder = builder.proxy(proxy),
                Err(e) => tracing::warn!("Ignoring invalid proxy url {}: {}", config.proxy_url, e),
            }
        }

        let http = builder.build().unwrap_or_default();

        Client {
            inner: Arc::new(ClientInner {
                http,
                auto_cancellation: AtomicBool::new(config.auto_cancellation),
                config,
                auth_store,
                before_send: RwLock::new(None),
                after_send: RwLock::new(None),
                cancel_registry: CancelRegistry::new(),
            }),
        }
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn base_url(&self) -> &str {
        &self.inner.config.base_url
    }

    pub fn lang(&self) -> &str {
        &self.inner.config.lang
    }

    /// The auth store whose token is attached to every request.
    pub fn auth_store(&self) -> &Arc<dyn AuthStore> {
        &self.inner.auth_store
    }

    // ========== Services ==========

    /// Admin APIs.
    pub fn admins(&self) -> AdminService {
        AdminService::new(self.clone())
    }

    /// Collection APIs.
    pub fn collections(&self) -> CollectionService {
        CollectionService::new(self.clone())
    }

    /// File APIs.
    pub fn files(&self) -> FileService {
        FileService::new(self.clone())
    }

    /// Log APIs.
    pub fn logs(&self) -> LogService {
        LogService::new(self.clone())
    }

    /// Settings APIs.
    pub fn settings(&self) -> SettingsService {
        SettingsService::new(self.clone())
    }

    /// Health APIs.
    pub fn health(&self) -> HealthService {
        HealthService::new(self.clone())
    }

    /// Record APIs of the collection identified by id or name.
    pub fn collection(&self, id_or_name: &str) -> RecordService {
        RecordService::new(self.clone(), id_or_name)
    }

    // ========== Hooks ==========

    /// Install a hook that runs right before each request is sent.
    pub fn set_before_send<F>(&self, hook: F)
    where
        F: Fn(&str, &SendOptions) -> BeforeSendResult + Send + Sync + 'static,
    {
        *self.inner.before_send.write() = Some(Arc::new(hook));
    }

    pub fn clear_before_send(&self) {
        *self.inner.before_send.write() = None;
    }

    /// Install a hook that runs after each response, before the status check.
    pub fn set_after_send<F>(&self, hook: F)
    where
        F: Fn(&ResponseInfo, Value) -> Result<Value> + Send + Sync + 'static,
    {
        *self.inner.after_send.write() = Some(Arc::new(hook));
    }

    pub fn clear_after_send(&self) {
        *self.inner.after_send.write() = None;
    }

    // ========== Cancellation ==========

    /// Globally enable or disable auto cancellation for pending duplicated requests.
    pub fn auto_cancellation(&self, enable: bool) {
        self.inner.auto_cancellation.store(enable, Ordering::Relaxed);
    }

    pub fn is_auto_cancellation_enabled(&self) -> bool {
        self.inner.auto_cancellation.load(Ordering::Relaxed)
    }

    /// Cancel a single pending request by its cancellation key.
    pub fn cancel_request(&self, cancel_key: &str) {
        if self.inner.cancel_registry.cancel(cancel_key) {
            tracing::debug!("Cancelled request {}", cancel_key);
        }
    }

    /// Cancel all pending requests.
    pub fn cancel_all_requests(&self) {
        let count = self.inner.cancel_registry.cancel_all();
        if count > 0 {
            tracing::debug!("Cancelled {} pending requests", count);
        }
    }

    // ========== Urls ==========

    /// Build a full client url by safely concatenating the provided path.
    pub fn build_url(&self, path: &str) -> String {
        join_url(&self.inner.config.base_url, path)
    }

    /// Absolute url of a record file. Same as [`FileService::get_url`].
    pub fn get_file_url(&self, record: &Record, filename: &str, params: &QueryParams) -> String {
        self.files().get_url(record, filename, params)
    }

    // ========== Sending ==========

    /// Send an api request and decode the response data into `T`.
    pub async fn send<T: DeserializeOwned>(&self, path: &str, options: SendOptions) -> Result<T> {
        let data = self.send_value(path, options).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Send an api request and return the raw response data.
    ///
    /// Adds the default `Content-Type`, `Accept-Language` and `Authorization`
    /// headers, registers the request for cancellation, serializes the query
    /// params and runs the hooks. Every failure is normalized into
    /// [`ClientError`].
    pub async fn send_value(&self, path: &str, mut options: SendOptions) -> Result<Value> {
        // multipart bodies get their Content-Type (with boundary) from the transport
        if !options.body.is_form() {
            set_header_if_missing(&mut options.headers, CONTENT_TYPE, APPLICATION_JSON);
        }

        set_header_if_missing(&mut options.headers, ACCEPT_LANGUAGE, &self.inner.config.lang);

        let token = self.inner.auth_store.token();
        if !token.is_empty() {
            set_header_if_missing(&mut options.headers, AUTHORIZATION, &token);
        }

        let (auto_cancel, cancel_key) = options.params.take_cancel_controls();
        let cancellation = if self.is_auto_cancellation_enabled() && auto_cancel != Some(false) {
            let key = cancel_key
                .filter(|k| !k.is_empty())
                .unwrap_or_else(|| format!("{}{}", options.method, path));
            let (ticket, registration) = self.inner.cancel_registry.register(&key);
            Some((key, ticket, registration))
        } else {
            None
        };

        let params = std::mem::take(&mut options.params);
        let mut url = params.append_to(&self.build_url(path));

        let before_send = self.inner.before_send.read().clone();
        if let Some(hook) = before_send {
            let result = hook(&url, &options);
            if let Some(new_url) = result.url {
                url = new_url;
            }
            if let Some(new_options) = result.options {
                options = new_options;
            }
            // params set by the hook still go out
            let params = std::mem::take(&mut options.params);
            url = params.append_to(&url);
        }

        match cancellation {
            Some((key, ticket, registration)) => {
                let outcome =
                    Abortable::new(self.send_with_retries(&url, &options), registration).await;
                self.inner.cancel_registry.finish(&key, ticket);

                match outcome {
                    Ok(result) => result,
                    Err(_) => {
                        tracing::debug!("Request {} {} was aborted", options.method, url);
                        Err(ClientError::Aborted { url })
                    }
                }
            }
            None => self.send_with_retries(&url, &options).await,
        }
    }

    /// Internal send with retry logic
    async fn send_with_retries(&self, url: &str, options: &SendOptions) -> Result<Value> {
        let mut attempt = 0;
        loop {
            match self.send_once(url, options).await {
                Ok(data) => return Ok(data),
                Err(e) if e.is_retryable() && attempt < self.inner.config.max_retries => {
                    let delay = exponential_backoff(attempt, self.inner.config.retry_delay_ms);
                    if self.inner.config.enable_logging {
                        tracing::warn!(
                            "Request failed (attempt {}), retrying after {:?}: {}",
                            attempt + 1,
                            delay,
                            e
                        );
                    }
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Internal send implementation
    async fn send_once(&self, url: &str, options: &SendOptions) -> Result<Value> {
        tracing::debug!("{} {}", options.method, url);

        let parsed_url = reqwest::Url::parse(url)?;

        let mut headers = HeaderMap::new();
        for (k, v) in &options.headers {
            let name = HeaderName::from_bytes(k.as_bytes())
                .map_err(|e| ClientError::InvalidHeader(format!("{}: {}", k, e)))?;
            let value = HeaderValue::from_str(v)
                .map_err(|e| ClientError::InvalidHeader(format!("{}: {}", k, e)))?;
            headers.insert(name, value);
        }

        let mut req_builder = self
            .inner
            .http
            .request(options.method.into(), parsed_url)
            .headers(headers);

        req_builder = match &options.body {
            RequestBody::None => req_builder,
            RequestBody::Json(value) => req_builder.body(value.to_string()),
            RequestBody::Text(text) => req_builder.body(text.clone()),
            RequestBody::Form(form) => req_builder.multipart(form.to_multipart()?),
        };

        let response = req_builder.send().await?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();

        let mut headers = BTreeMap::new();
        for (k, v) in response.headers() {
            if let Ok(val) = v.to_str() {
                headers.insert(k.as_str().to_string(), val.to_string());
            }
        }

        let body = response.bytes().await?;
        let mut data = if status >= 400 {
            // error data always stays an object
            serde_json::from_slice(&body).unwrap_or_else(|_| json!({}))
        } else if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body)?
        };

        tracing::debug!("{} {} -> {}", options.method, final_url, status);

        let after_send = self.inner.after_send.read().clone();
        if let Some(hook) = after_send {
            let info = ResponseInfo {
                url: final_url.clone(),
                status,
                headers,
            };
            data = hook(&info, data)?;
        }

        if status >= 400 {
            return Err(ClientError::Response {
                url: final_url,
                status,
                data,
            });
        }

        Ok(data)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.config.base_url)
            .field("lang", &self.inner.config.lang)
            .field("auto_cancellation", &self.is_auto_cancellation_enabled())
            .field("pending_requests", &self.inner.cancel_registry.pending())
            .finish()
    }
}
