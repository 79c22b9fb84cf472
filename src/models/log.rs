use super::lenient;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A logged API request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRequest {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub updated: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub method: String,
    /// Response status of the logged request.
    #[serde(default, deserialize_with = "lenient::int")]
    pub status: i64,
    /// `guest`, `admin` or `auth_record`.
    #[serde(default, deserialize_with = "lenient::string")]
    pub auth: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub remote_ip: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub user_ip: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub referer: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub user_agent: String,
    /// Extra request details (errors, timings).
    #[serde(default, deserialize_with = "lenient::object")]
    pub meta: Map<String, Value>,
}

/// Number of requests logged in a single hour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyStats {
    #[serde(default, deserialize_with = "lenient::int")]
    pub total: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub date: String,
}
