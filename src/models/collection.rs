//! Collection and schema field models.

use super::lenient;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Collection kind.
pub const COLLECTION_TYPE_BASE: &str = "base";
/// Auth collection kind.
pub const COLLECTION_TYPE_AUTH: &str = "auth";
/// View collection kind.
pub const COLLECTION_TYPE_VIEW: &str = "view";

/// A collection definition.
///
/// Access rules are `None` when the action is restricted to admins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub updated: String,
    /// Unique collection name.
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    /// `base`, `auth` or `view`.
    #[serde(rename = "type", default = "default_type", deserialize_with = "lenient_type")]
    pub kind: String,
    /// Field definitions.
    #[serde(default, deserialize_with = "lenient::list")]
    pub schema: Vec<SchemaField>,
    /// Unique and regular indexes.
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub indexes: Vec<String>,
    /// System collections cannot be renamed or deleted.
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub system: bool,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub list_rule: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub view_rule: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub create_rule: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub update_rule: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub delete_rule: Option<String>,
    /// Type specific options.
    #[serde(default, deserialize_with = "lenient::object")]
    pub options: Map<String, Value>,
}

fn default_type() -> String {
    COLLECTION_TYPE_BASE.to_string()
}

fn lenient_type<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(lenient::opt_string(de)?
        .filter(|kind| !kind.is_empty())
        .unwrap_or_else(default_type))
}

impl Default for Collection {
    fn default() -> Self {
        Collection {
            id: String::new(),
            created: String::new(),
            updated: String::new(),
            name: String::new(),
            kind: default_type(),
            schema: Vec::new(),
            indexes: Vec::new(),
            system: false,
            list_rule: None,
            view_rule: None,
            create_rule: None,
            update_rule: None,
            delete_rule: None,
            options: Map::new(),
        }
    }
}

impl Collection {
    pub fn is_base(&self) -> bool {
        self.kind == COLLECTION_TYPE_BASE
    }

    pub fn is_auth(&self) -> bool {
        self.kind == COLLECTION_TYPE_AUTH
    }

    pub fn is_view(&self) -> bool {
        self.kind == COLLECTION_TYPE_VIEW
    }

    /// Schema field by name.
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.schema.iter().find(|f| f.name == name)
    }
}

/// A single collection field definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    /// Field type (`text`, `number`, `relation`, ...).
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub system: bool,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub required: bool,
    /// Type specific options.
    #[serde(default, deserialize_with = "lenient::object")]
    pub options: Map<String, Value>,
}
