//! Request options and hook types for [`Client::send`](super::Client::send).

use crate::error::{ClientError, Result};
use crate::protocol::QueryParams;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file part of a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub filename: String,
    pub content: Vec<u8>,
    pub mime_type: Option<String>,
}

/// A single multipart form value.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File(FilePart),
}

/// A multipart/form-data body, used for record file uploads.
///
/// Kept as plain data (instead of a `reqwest` form) so hooks can inspect it and
/// retries can rebuild it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    parts: Vec<(String, FormValue)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push((name.into(), FormValue::Text(value.into())));
        self
    }

    /// Append a file field.
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        self.parts.push((
            name.into(),
            FormValue::File(FilePart {
                filename: filename.into(),
                content: content.into(),
                mime_type: None,
            }),
        ));
        self
    }

    /// Append a file field with an explicit mime type.
    pub fn file_with_mime(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content: impl Into<Vec<u8>>,
        mime_type: impl Into<String>,
    ) -> Self {
        self.parts.push((
            name.into(),
            FormValue::File(FilePart {
                filename: filename.into(),
                content: content.into(),
                mime_type: Some(mime_type.into()),
            }),
        ));
        self
    }

    /// Append every top level field of a JSON object as text.
    ///
    /// Strings are sent as-is, everything else as its JSON text.
    pub fn json_fields(mut self, value: &Value) -> Self {
        if let Value::Object(map) = value {
            for (key, value) in map {
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                self.parts.push((key.clone(), FormValue::Text(text)));
            }
        }
        self
    }

    pub fn parts(&self) -> &[(String, FormValue)] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub(crate) fn to_multipart(&self) -> Result<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in &self.parts {
            form = match value {
                FormValue::Text(text) => form.text(name.clone(), text.clone()),
                FormValue::File(file) => {
                    let mut part = reqwest::multipart::Part::bytes(file.content.clone())
                        .file_name(file.filename.clone());
                    if let Some(mime) = &file.mime_type {
                        part = part.mime_str(mime).map_err(|e| {
                            ClientError::InvalidHeader(format!("mime type {:?}: {}", mime, e))
                        })?;
                    }
                    form.part(name.clone(), part)
                }
            };
        }
        Ok(form)
    }
}

/// Request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    None,
    /// Serialized as JSON.
    Json(Value),
    /// Sent verbatim.
    Text(String),
    /// Sent as multipart/form-data.
    Form(FormData),
}

impl RequestBody {
    /// JSON body from any serializable value.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(RequestBody::Json(serde_json::to_value(value)?))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, RequestBody::None)
    }

    pub fn is_form(&self) -> bool {
        matches!(self, RequestBody::Form(_))
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RequestBody::None,
            other => RequestBody::Json(other),
        }
    }
}

impl From<FormData> for RequestBody {
    fn from(form: FormData) -> Self {
        RequestBody::Form(form)
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Text(text.to_string())
    }
}

/// Options of a single [`Client::send`](super::Client::send) call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SendOptions {
    pub method: Method,
    /// Request headers; names are matched case-insensitively.
    pub headers: BTreeMap<String, String>,
    pub body: RequestBody,
    pub params: QueryParams,
}

impl SendOptions {
    /// Options for a request with the given method.
    pub fn new(method: Method) -> Self {
        SendOptions {
            method,
            ..Default::default()
        }
    }

    pub fn get() -> Self {
        Self::new(Method::Get)
    }

    pub fn post() -> Self {
        Self::new(Method::Post)
    }

    pub fn put() -> Self {
        Self::new(Method::Put)
    }

    pub fn patch() -> Self {
        Self::new(Method::Patch)
    }

    pub fn delete() -> Self {
        Self::new(Method::Delete)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = body.into();
        self
    }

    pub fn params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }
}

/// Replacement returned by a before-send hook. Unset fields keep the original.
#[derive(Debug, Clone, Default)]
pub struct BeforeSendResult {
    pub url: Option<String>,
    pub options: Option<SendOptions>,
}

/// Response metadata handed to the after-send hook.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseInfo {
    pub url: String,
    pub status: u16,
    /// Response headers with lowercase names.
    pub headers: BTreeMap<String, String>,
}

/// Hook run right before a request is sent, with the final url and options.
pub type BeforeSendHook = Arc<dyn Fn(&str, &SendOptions) -> BeforeSendResult + Send + Sync>;

/// Hook run after a response was received; may replace the data or fail the request.
pub type AfterSendHook = Arc<dyn Fn(&ResponseInfo, Value) -> Result<Value> + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_form_json_fields() {
        let form = FormData::new().json_fields(&json!({"title": "x", "views": 3, "tags": ["a"]}));
        let texts: Vec<_> = form
            .parts()
            .iter()
            .map(|(k, v)| match v {
                FormValue::Text(t) => format!("{}={}", k, t),
                FormValue::File(_) => unreachable!(),
            })
            .collect();
        assert!(texts.contains(&"title=x".to_string()));
        assert!(texts.contains(&"views=3".to_string()));
        assert!(texts.contains(&"tags=[\"a\"]".to_string()));
    }

    #[test]
    fn test_invalid_mime_type_is_rejected() {
        let form = FormData::new().file_with_mime("doc", "a.txt", b"x".to_vec(), "not a mime");
        let err = form.to_multipart().unwrap_err();
        assert!(matches!(err, ClientError::InvalidHeader(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_body_conversions() {
        assert!(RequestBody::from(Value::Null).is_none());
        assert!(RequestBody::from(FormData::new().text("a", "b")).is_form());
        assert_eq!(
            RequestBody::json(&json!({"a": 1})).unwrap(),
            RequestBody::Json(json!({"a": 1}))
        );
    }

    #[test]
    fn test_send_options_builder() {
        let options = SendOptions::patch()
            .header("X-Trace", "1")
            .body(json!({"a": 1}));
        assert_eq!(options.method.as_str(), "PATCH");
        assert_eq!(options.headers["X-Trace"], "1");
    }
}
