#![doc = include_str!("../README.md")]

//! # PocketBase client
//!
//! A typed async client for the [PocketBase](https://pocketbase.io) REST API.
//!
//! ## Overview
//!
//! The crate is organized around a single [`Client`] that owns the connection
//! pool, the auth store and the request hooks. Every API family is exposed as a
//! service handed out by the client:
//!
//! 1. **Collections** - schema management and import
//! 2. **Records** - CRUD plus the auth collection flows
//! 3. **Admins** - CRUD plus admin authentication
//! 4. **Files** - file urls and private file tokens
//! 5. **Logs**, **Settings**, **Health** - administration endpoints
//!
//! ## Key Features
//!
//! - **Header injection**: `Content-Type`, `Accept-Language` and the stored
//!   `Authorization` token are added unless the caller set them
//! - **Query serialization**: arrays repeat keys, dates become ISO-8601,
//!   objects become JSON, nulls are skipped
//! - **Request cancellation**: duplicated pending requests are cancelled
//!   automatically; any request can be cancelled by its key
//! - **Error normalization**: transport failures, cancellations and error
//!   statuses all surface as [`ClientError`]
//! - **Auth persistence**: [`LocalAuthStore`] keeps the token and model in
//!   memory or in a directory on disk
//!
//! ## Client Usage
//!
//! ```ignore
//! use pocketbase_client::{Client, QueryParams};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("http://127.0.0.1:8090");
//!
//!     client
//!         .admins()
//!         .auth_with_password("admin@example.com", "1234567890", QueryParams::new())
//!         .await?;
//!
//!     let post = client
//!         .collection("posts")
//!         .create(json!({"title": "Hello"}), QueryParams::new())
//!         .await?;
//!     println!("created {}", post.id);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - **[client]** - the client, send options, hooks and configuration
//! - **[services]** - per-API services
//! - **[models]** - typed payloads
//! - **[stores]** - auth token persistence
//! - **[protocol]** - query serialization, header helpers, token decoding
//! - **[error]** - error types and result handling

pub mod client;
pub mod error;
pub mod models;
pub mod protocol;
pub mod services;
pub mod stores;

pub use client::{
    BeforeSendResult, Client, ClientConfig, FormData, Method, RequestBody, ResponseInfo,
    SendOptions,
};
pub use error::{ClientError, Result};
pub use models::{
    Admin, AuthModel, Collection, ExternalAuth, HealthCheckResponse, ListResult, LogRequest,
    Record,
};
pub use protocol::{QueryParams, QueryValue};
pub use stores::{AuthStore, BaseAuthStore, LocalAuthStore};

#[cfg(test)]
mod tests;
