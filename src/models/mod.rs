//! Typed PocketBase payloads.
//!
//! Models are plain serde types. Decoding is lenient: a field with the wrong
//! JSON type falls back to its default instead of failing the whole response.
//!
//! | Type | Endpoint family |
//! |------|-----------------|
//! | [`Record`] | `/api/collections/{collection}/records` |
//! | [`Admin`] | `/api/admins` |
//! | [`Collection`] | `/api/collections` |
//! | [`ExternalAuth`] | `/api/collections/{collection}/records/{id}/external-auths` |
//! | [`LogRequest`] | `/api/logs/requests` |
//! | [`HealthCheckResponse`] | `/api/health` |

mod admin;
mod auth;
mod collection;
mod external_auth;
pub mod lenient;
mod list_result;
mod log;
mod record;

pub use admin::Admin;
pub use auth::{AdminAuthResponse, AuthMethodsList, AuthModel, AuthProviderInfo, RecordAuthResponse};
pub use collection::{
    Collection, SchemaField, COLLECTION_TYPE_AUTH, COLLECTION_TYPE_BASE, COLLECTION_TYPE_VIEW,
};
pub use external_auth::ExternalAuth;
pub use list_result::ListResult;
pub use log::{HourlyStats, LogRequest};
pub use record::{Expand, Record};

use serde::{Deserialize, Serialize};

/// Response of the health endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    #[serde(default, deserialize_with = "lenient::int")]
    pub code: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub message: String,
}
