use super::lenient;
use serde::{Deserialize, Serialize};

/// An OAuth2 provider linked to an auth record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalAuth {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub updated: String,
    /// Linked auth record.
    #[serde(default, deserialize_with = "lenient::string")]
    pub record_id: String,
    /// Collection of the linked record.
    #[serde(default, deserialize_with = "lenient::string")]
    pub collection_id: String,
    /// Provider name (`google`, `github`, ...).
    #[serde(default, deserialize_with = "lenient::string")]
    pub provider: String,
    /// User id on the provider side.
    #[serde(default, deserialize_with = "lenient::string")]
    pub provider_id: String,
}
