//! Wire-level helpers shared by the client and the services.
//!
//! - **[query]** - query parameter model and `encodeURIComponent` serialization
//! - **[headers]** - header constants and case-insensitive lookups
//! - **[jwt]** - token payload decoding and expiry checks

pub mod headers;
pub mod jwt;
pub mod query;

pub use headers::{constants, has_header, set_header_if_missing};
pub use jwt::{decode_token_payload, is_token_expired};
pub use query::{
    append_query, encode_uri_component, format_iso_datetime, QueryParams, QueryValue,
    AUTO_CANCEL_KEY, CANCEL_KEY,
};
