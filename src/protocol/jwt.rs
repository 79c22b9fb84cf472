//! Minimal JWT payload inspection.
//!
//! The client never verifies token signatures; it only peeks at the payload to
//! decide whether a stored token is still worth sending.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{Map, Value};
use std::time::{SystemTime, UNIX_EPOCH};

/// Decode the payload segment of a JWT.
///
/// Returns an empty map when the token is malformed.
pub fn decode_token_payload(token: &str) -> Map<String, Value> {
    let Some(segment) = token.split('.').nth(1) else {
        return Map::new();
    };

    let segment = segment.trim_end_matches('=');
    let Ok(raw) = URL_SAFE_NO_PAD.decode(segment) else {
        return Map::new();
    };

    match serde_json::from_slice::<Value>(&raw) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Whether `token` is expired, treating it as expired `threshold_secs` early.
///
/// Tokens with a readable payload but no `exp` claim never expire.
pub fn is_token_expired(token: &str, threshold_secs: i64) -> bool {
    let payload = decode_token_payload(token);
    if payload.is_empty() {
        return true;
    }

    let Some(exp) = payload.get("exp").and_then(Value::as_f64) else {
        return false;
    };

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default();

    exp - threshold_secs as f64 <= now
}

#[cfg(test)]
pub(crate) fn make_token(payload: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{}.{}.signature", header, body)
}
