use super::lenient;
use serde::{Deserialize, Serialize};

/// A PocketBase administrator account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    /// Admin id.
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    /// Creation timestamp.
    #[serde(default, deserialize_with = "lenient::string")]
    pub created: String,
    /// Last update timestamp.
    #[serde(default, deserialize_with = "lenient::string")]
    pub updated: String,
    /// Avatar index.
    #[serde(default, deserialize_with = "lenient::int")]
    pub avatar: i64,
    /// Admin email.
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
}
