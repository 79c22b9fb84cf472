//! Lenient field deserializers.
//!
//! The backend is the source of truth for the shape of its payloads, but a
//! field with an unexpected JSON type must not make a whole response
//! unreadable. These helpers coerce such fields to their default value.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// String field, `""` when not a JSON string.
pub fn string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

/// Optional string field, `None` when not a JSON string.
pub fn opt_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Integer field, `0` when not a JSON number.
pub fn int<'de, D: Deserializer<'de>>(de: D) -> Result<i64, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        _ => 0,
    })
}

/// Boolean field, `false` when not a JSON boolean.
pub fn boolean<'de, D: Deserializer<'de>>(de: D) -> Result<bool, D::Error> {
    Ok(matches!(Value::deserialize(de)?, Value::Bool(true)))
}

/// Object field, empty when not a JSON object.
pub fn object<'de, D: Deserializer<'de>>(de: D) -> Result<Map<String, Value>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Object(map) => map,
        _ => Map::new(),
    })
}

/// List of strings, dropping entries that are not strings.
pub fn string_list<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// List of `T`, dropping entries that fail to decode.
pub fn list<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    Ok(match Value::deserialize(de)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "super::string")]
        name: String,
        #[serde(default, deserialize_with = "super::int")]
        count: i64,
        #[serde(default, deserialize_with = "super::boolean")]
        flag: bool,
        #[serde(default, deserialize_with = "super::string_list")]
        tags: Vec<String>,
    }

    #[test]
    fn test_wrong_types_fall_back_to_defaults() {
        let sample: Sample =
            serde_json::from_value(json!({"name": 5, "count": "x", "flag": "yes", "tags": [1, "a"]}))
                .unwrap();
        assert_eq!(sample.name, "");
        assert_eq!(sample.count, 0);
        assert!(!sample.flag);
        assert_eq!(sample.tags, vec!["a"]);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let sample: Sample = serde_json::from_value(json!({})).unwrap();
        assert_eq!(sample.name, "");
        assert_eq!(sample.count, 0);
    }

    #[test]
    fn test_float_is_truncated() {
        let sample: Sample = serde_json::from_value(json!({"count": 2.9})).unwrap();
        assert_eq!(sample.count, 2);
    }
}
