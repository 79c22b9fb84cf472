//! Query parameter model and serialization.
//!
//! PocketBase endpoints accept their options (`page`, `perPage`, `filter`,
//! `sort`, `expand`, ...) as query string parameters. [`QueryParams`] keeps
//! them in insertion order and serializes them the way the backend expects:
//!
//! | Value | Serialized as |
//! |-------|---------------|
//! | null | skipped |
//! | list | key repeated once per item |
//! | date-time | ISO-8601 UTC with milliseconds |
//! | object | JSON string |
//! | scalar | plain string |
//!
//! Two control keys never reach the server: `$autoCancel` and `$cancelKey`.
//! They tune the client side request cancellation and are exposed as
//! [`QueryParams::auto_cancel`] and [`QueryParams::cancel_key`].
//!
//! # Examples
//!
//! ```
//! use pocketbase_client::QueryParams;
//!
//! let params = QueryParams::new()
//!     .set("filter", "status = true")
//!     .set("tags", vec!["a", "b"]);
//!
//! assert_eq!(params.serialize(), "filter=status%20%3D%20true&tags=a&tags=b");
//! ```

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Reserved key disabling auto-cancellation for a single request.
pub const AUTO_CANCEL_KEY: &str = "$autoCancel";

/// Reserved key overriding the auto-cancellation key of a request.
pub const CANCEL_KEY: &str = "$cancelKey";

/// Characters left untouched by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a single url component.
pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// Skipped during serialization.
    Null,
    /// Plain text value.
    Text(String),
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(serde_json::Number),
    /// Repeated key, one entry per item.
    List(Vec<QueryValue>),
    /// Point in time, rendered as ISO-8601 UTC.
    DateTime(OffsetDateTime),
    /// Arbitrary JSON, rendered as a JSON string.
    Json(Value),
}

impl QueryValue {
    /// Render the value as the raw (not yet encoded) string sent to the server.
    ///
    /// Returns `None` for null values.
    fn render(&self) -> Option<String> {
        match self {
            QueryValue::Null => None,
            QueryValue::Text(s) => Some(s.clone()),
            QueryValue::Bool(b) => Some(b.to_string()),
            QueryValue::Number(n) => Some(n.to_string()),
            QueryValue::DateTime(dt) => Some(format_iso_datetime(*dt)),
            QueryValue::Json(v) => Some(v.to_string()),
            QueryValue::List(items) => Some(
                items
                    .iter()
                    .filter_map(QueryValue::render)
                    .collect::<Vec<_>>()
                    .join(","),
            ),
        }
    }
}

/// Format a timestamp like `Date.prototype.toISOString` does.
pub fn format_iso_datetime(dt: OffsetDateTime) -> String {
    let format = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    );
    dt.to_offset(UtcOffset::UTC)
        .format(&format)
        .unwrap_or_default()
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        QueryValue::Text(v.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(v: String) -> Self {
        QueryValue::Text(v)
    }
}

impl From<&String> for QueryValue {
    fn from(v: &String) -> Self {
        QueryValue::Text(v.clone())
    }
}

impl From<bool> for QueryValue {
    fn from(v: bool) -> Self {
        QueryValue::Bool(v)
    }
}

macro_rules! impl_number_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for QueryValue {
                fn from(v: $t) -> Self {
                    QueryValue::Number(v.into())
                }
            }
        )*
    };
}

impl_number_from!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl From<f64> for QueryValue {
    fn from(v: f64) -> Self {
        serde_json::Number::from_f64(v)
            .map(QueryValue::Number)
            .unwrap_or(QueryValue::Null)
    }
}

impl From<OffsetDateTime> for QueryValue {
    fn from(v: OffsetDateTime) -> Self {
        QueryValue::DateTime(v)
    }
}

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(v: Vec<T>) -> Self {
        QueryValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(QueryValue::Null)
    }
}

impl From<Value> for QueryValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => QueryValue::Null,
            Value::Bool(b) => QueryValue::Bool(b),
            Value::Number(n) => QueryValue::Number(n),
            Value::String(s) => QueryValue::Text(s),
            Value::Array(items) => QueryValue::List(items.into_iter().map(Into::into).collect()),
            obj @ Value::Object(_) => QueryValue::Json(obj),
        }
    }
}

/// Ordered set of query parameters plus the client side cancellation controls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    entries: Vec<(String, QueryValue)>,
    auto_cancel: Option<bool>,
    cancel_key: Option<String>,
}

impl QueryParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing a previous value for the same key.
    ///
    /// The reserved `$autoCancel` and `$cancelKey` keys are routed to the
    /// cancellation controls instead of the query string.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// In-place variant of [`QueryParams::set`].
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();

        match key.as_str() {
            AUTO_CANCEL_KEY => {
                self.auto_cancel = match value {
                    QueryValue::Bool(b) => Some(b),
                    QueryValue::Null => None,
                    _ => Some(true),
                };
                return;
            }
            CANCEL_KEY => {
                self.cancel_key = value.render();
                return;
            }
            _ => {}
        }

        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Set `key` only if it is not present yet.
    pub fn set_default(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        let key = key.into();
        if !self.contains(&key) {
            self.insert(key, value);
        }
        self
    }

    /// Enable or disable auto-cancellation for this request.
    pub fn auto_cancel(mut self, enable: bool) -> Self {
        self.auto_cancel = Some(enable);
        self
    }

    /// Use a custom cancellation key for this request.
    pub fn cancel_key(mut self, key: impl Into<String>) -> Self {
        self.cancel_key = Some(key.into());
        self
    }

    /// Value of `key`, if set.
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Whether `key` is set.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove `key` and return its value.
    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Whether no query parameters are set (control values are ignored).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the query parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Per-request auto-cancellation override.
    pub fn auto_cancel_flag(&self) -> Option<bool> {
        self.auto_cancel
    }

    /// Per-request cancellation key.
    pub fn cancel_key_value(&self) -> Option<&str> {
        self.cancel_key.as_deref()
    }

    /// Drop the cancellation controls, returning `(auto_cancel, cancel_key)`.
    pub fn take_cancel_controls(&mut self) -> (Option<bool>, Option<String>) {
        (self.auto_cancel.take(), self.cancel_key.take())
    }

    /// Serialize into a query string (without the leading `?`).
    pub fn serialize(&self) -> String {
        let mut result = Vec::new();

        for (key, value) in &self.entries {
            let encoded_key = encode_uri_component(key);

            match value {
                QueryValue::Null => continue,
                QueryValue::List(items) => {
                    for item in items {
                        if let Some(raw) = item.render() {
                            result.push(format!("{}={}", encoded_key, encode_uri_component(&raw)));
                        }
                    }
                }
                other => {
                    if let Some(raw) = other.render() {
                        result.push(format!("{}={}", encoded_key, encode_uri_component(&raw)));
                    }
                }
            }
        }

        result.join("&")
    }

    /// Serialize with `application/x-www-form-urlencoded` rules.
    ///
    /// Used for the file urls, which follow `URLSearchParams` encoding.
    pub fn serialize_form(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.entries {
            if let Some(raw) = value.render() {
                serializer.append_pair(key, &raw);
            }
        }
        serializer.finish()
    }

    /// Append the serialized parameters to `url` using `?` or `&`.
    pub fn append_to(&self, url: &str) -> String {
        append_query(url, &self.serialize())
    }
}

/// Append an already serialized query string to a url.
pub fn append_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, sep, query)
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}
