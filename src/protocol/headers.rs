//! Header names and case-insensitive header map helpers.
//!
//! Request headers travel through the hooks as a plain string map so callers can
//! inspect and rewrite them freely. HTTP header names are case-insensitive, so
//! every lookup here ignores ASCII case.
//!
//! # Examples
//!
//! ```
//! use pocketbase_client::protocol::{has_header, set_header_if_missing};
//! use std::collections::BTreeMap;
//!
//! let mut headers = BTreeMap::new();
//! headers.insert("content-type".to_string(), "text/plain".to_string());
//!
//! assert!(has_header(&headers, "Content-Type"));
//! set_header_if_missing(&mut headers, "Content-Type", "application/json");
//! assert_eq!(headers["content-type"], "text/plain");
//! ```

use std::collections::BTreeMap;

/// Header constants used by the client.
pub mod constants {
    /// `Content-Type`
    pub const CONTENT_TYPE: &str = "Content-Type";
    /// `Accept-Language`
    pub const ACCEPT_LANGUAGE: &str = "Accept-Language";
    /// `Authorization`
    pub const AUTHORIZATION: &str = "Authorization";
    /// JSON media type.
    pub const APPLICATION_JSON: &str = "application/json";
}

/// Whether `name` is present in `headers`, ignoring ASCII case.
pub fn has_header(headers: &BTreeMap<String, String>, name: &str) -> bool {
    headers.keys().any(|k| k.eq_ignore_ascii_case(name))
}

/// Insert `name: value` unless a header with the same name already exists.
///
/// Returns `true` when the header was inserted.
pub fn set_header_if_missing(
    headers: &mut BTreeMap<String, String>,
    name: &str,
    value: &str,
) -> bool {
    if has_header(headers, name) {
        return false;
    }
    headers.insert(name.to_string(), value.to_string());
    true
}
