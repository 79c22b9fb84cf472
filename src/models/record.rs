//! Collection record model.

use super::lenient;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A record of a base or auth collection.
///
/// The system fields are typed; every other column stays in [`Record::data`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Record id.
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    /// Creation timestamp as sent by the server.
    #[serde(default, deserialize_with = "lenient::string")]
    pub created: String,
    /// Last update timestamp as sent by the server.
    #[serde(default, deserialize_with = "lenient::string")]
    pub updated: String,
    /// Id of the owning collection.
    #[serde(default, deserialize_with = "lenient::string")]
    pub collection_id: String,
    /// Name of the owning collection.
    #[serde(default, deserialize_with = "lenient::string")]
    pub collection_name: String,
    /// Expanded relations.
    #[serde(default, deserialize_with = "deserialize_expand", skip_serializing_if = "BTreeMap::is_empty")]
    pub expand: BTreeMap<String, Expand>,
    /// Remaining record fields.
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

/// An expanded relation: a single record or a list of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expand {
    /// Single relation.
    One(Box<Record>),
    /// Multiple relation.
    Many(Vec<Record>),
}

impl Expand {
    /// All expanded records, regardless of cardinality.
    pub fn records(&self) -> Vec<&Record> {
        match self {
            Expand::One(r) => vec![r.as_ref()],
            Expand::Many(list) => list.iter().collect(),
        }
    }
}

fn record_or_default(value: Value) -> Record {
    serde_json::from_value(value).unwrap_or_default()
}

fn deserialize_expand<'de, D: Deserializer<'de>>(
    de: D,
) -> Result<BTreeMap<String, Expand>, D::Error> {
    let raw = lenient::object(de)?;

    Ok(raw
        .into_iter()
        .map(|(key, value)| {
            let expand = match value {
                Value::Array(items) => {
                    Expand::Many(items.into_iter().map(record_or_default).collect())
                }
                other => Expand::One(Box::new(record_or_default(other))),
            };
            (key, expand)
        })
        .collect())
}

impl Record {
    /// Decode a record from an arbitrary JSON value.
    pub fn from_value(value: Value) -> Self {
        record_or_default(value)
    }

    /// Raw value of a non-system field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// Typed value of a non-system field.
    pub fn get_as<T: DeserializeOwned>(&self, field: &str) -> Option<T> {
        self.data
            .get(field)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// String value of a non-system field, `""` when absent or not a string.
    pub fn get_str(&self, field: &str) -> &str {
        self.data.get(field).and_then(Value::as_str).unwrap_or("")
    }

    /// Expanded relation by field name.
    pub fn expanded(&self, field: &str) -> Option<&Expand> {
        self.expand.get(field)
    }

    /// Collection reference used in file urls: the id, or the name when the id is empty.
    pub fn collection_ref(&self) -> &str {
        if self.collection_id.is_empty() {
            &self.collection_name
        } else {
            &self.collection_id
        }
    }
}
