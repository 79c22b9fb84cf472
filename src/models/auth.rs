//! Auth related models: the authenticated model and the auth endpoint responses.

use super::lenient;
use super::{Admin, Record};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The model an auth token belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AuthModel {
    /// An administrator.
    Admin(Admin),
    /// A record of an auth collection.
    Record(Record),
}

impl AuthModel {
    /// Classify a raw model: admins carry no `collectionId`.
    ///
    /// Returns `None` for anything that is not a JSON object.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(ref map) = value else {
            return None;
        };

        if map.contains_key("collectionId") {
            Some(AuthModel::Record(Record::from_value(value)))
        } else {
            Some(AuthModel::Admin(serde_json::from_value(value).unwrap_or_default()))
        }
    }

    /// Id of the underlying model.
    pub fn id(&self) -> &str {
        match self {
            AuthModel::Admin(a) => &a.id,
            AuthModel::Record(r) => &r.id,
        }
    }

    pub fn as_admin(&self) -> Option<&Admin> {
        match self {
            AuthModel::Admin(a) => Some(a),
            AuthModel::Record(_) => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            AuthModel::Record(r) => Some(r),
            AuthModel::Admin(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for AuthModel {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(de)?;
        AuthModel::from_value(value)
            .ok_or_else(|| serde::de::Error::custom("auth model must be a JSON object"))
    }
}

impl From<Admin> for AuthModel {
    fn from(admin: Admin) -> Self {
        AuthModel::Admin(admin)
    }
}

impl From<Record> for AuthModel {
    fn from(record: Record) -> Self {
        AuthModel::Record(record)
    }
}

/// Response of the admin auth endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminAuthResponse {
    #[serde(default, deserialize_with = "lenient::string")]
    pub token: String,
    #[serde(default)]
    pub admin: Admin,
}

/// Response of the record auth endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordAuthResponse {
    #[serde(default, deserialize_with = "lenient::string")]
    pub token: String,
    #[serde(default)]
    pub record: Record,
    /// OAuth2 provider data, only set by the OAuth2 flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

/// An OAuth2 provider enabled for a collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthProviderInfo {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub state: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub code_verifier: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub code_challenge: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub code_challenge_method: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub auth_url: String,
}

/// Auth methods enabled for an auth collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthMethodsList {
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub username_password: bool,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub email_password: bool,
    #[serde(default, deserialize_with = "lenient::list")]
    pub auth_providers: Vec<AuthProviderInfo>,
}
