//! Auth token persistence.
//!
//! The client reads the token to send from an [`AuthStore`] and writes the
//! token/model pair back after every successful auth call.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`AuthStore`] | Trait the client talks to |
//! | [`BaseAuthStore`] | In-memory store with change listeners |
//! | [`LocalAuthStore`] | Store persisting into an [`AuthStorage`] backend |
//! | [`MemoryStorage`] | Process-local key/value backend |
//! | [`FileStorage`] | One JSON file per key in a directory |
//!
//! # Examples
//!
//! ```
//! use pocketbase_client::stores::{AuthStore, BaseAuthStore};
//!
//! let store = BaseAuthStore::new();
//! assert!(!store.is_valid());
//! store.save("token", None).unwrap();
//! assert_eq!(store.token(), "token");
//! ```

mod base;
mod local;
mod storage;

pub use base::{BaseAuthStore, ListenerId};
pub use local::{LocalAuthStore, DEFAULT_STORAGE_KEY};
pub use storage::{AuthStorage, FileStorage, MemoryStorage};

use crate::error::Result;
use crate::models::AuthModel;
use crate::protocol::jwt;

/// Storage for the current auth token and model.
pub trait AuthStore: Send + Sync {
    /// Stored token, `""` when not authenticated.
    fn token(&self) -> String;

    /// Stored auth model.
    fn model(&self) -> Option<AuthModel>;

    /// Replace the stored token and model.
    fn save(&self, token: &str, model: Option<AuthModel>) -> Result<()>;

    /// Remove the stored token and model.
    fn clear(&self) -> Result<()>;

    /// Whether a non-expired token is stored.
    fn is_valid(&self) -> bool {
        let token = self.token();
        !token.is_empty() && !jwt::is_token_expired(&token, 0)
    }

    /// Whether the stored model is an admin.
    fn is_admin(&self) -> bool {
        matches!(self.model(), Some(AuthModel::Admin(_)))
    }

    /// Whether the stored model is an auth collection record.
    fn is_auth_record(&self) -> bool {
        matches!(self.model(), Some(AuthModel::Record(_)))
    }
}
