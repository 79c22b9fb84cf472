//! PocketBase HTTP client implementation.
//!
//! This module provides the request helper every service goes through:
//!
//! - **Builds urls** from the configured base url
//! - **Injects headers** (`Content-Type`, `Accept-Language`, `Authorization`)
//! - **Serializes query params** with `encodeURIComponent` rules
//! - **Cancels duplicated requests** automatically, or on demand by key
//! - **Normalizes errors** into [`ClientError`](crate::ClientError)
//! - **Runs hooks** before sending and after receiving
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── fetch   - Client and the send pipeline
//! ├── options - SendOptions, request bodies and hook types
//! ├── cancel  - registry of cancellable requests
//! ├── config  - client configuration
//! └── utils   - url helpers, retry helpers
//! ```
//!
//! # Examples
//!
//! ## Creating a Client
//!
//! ```
//! use pocketbase_client::client::{Client, ClientConfig};
//!
//! // Default configuration
//! let client = Client::new("http://127.0.0.1:8090");
//!
//! // Custom configuration
//! let config = ClientConfig {
//!     base_url: "http://127.0.0.1:8090".into(),
//!     lang: "pl-PL".into(),
//!     max_retries: 2,
//!     ..Default::default()
//! };
//! let client = Client::with_config(config);
//! assert_eq!(client.build_url("/api/health"), "http://127.0.0.1:8090/api/health");
//! ```
//!
//! ## Cancelling Requests
//!
//! ```
//! use pocketbase_client::{Client, QueryParams};
//!
//! let client = Client::new("http://127.0.0.1:8090");
//!
//! // opt a single request out of auto-cancellation
//! let params = QueryParams::new().auto_cancel(false);
//!
//! // or group requests under a custom key and cancel them later
//! let params = QueryParams::new().cancel_key("posts-list");
//! client.cancel_request("posts-list");
//!
//! // or turn the behavior off globally
//! client.auto_cancellation(false);
//! ```

mod cancel;
mod config;
mod fetch;
mod options;
mod utils;

pub use config::ClientConfig;
pub use fetch::Client;
pub use options::{
    AfterSendHook, BeforeSendHook, BeforeSendResult, FilePart, FormData, FormValue, Method,
    RequestBody, ResponseInfo, SendOptions,
};
pub use utils::*;
