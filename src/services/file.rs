use crate::client::{Client, SendOptions};
use crate::error::Result;
use crate::models::Record;
use crate::protocol::{append_query, encode_uri_component, QueryParams};
use serde_json::Value;

/// File APIs.
#[derive(Debug, Clone)]
pub struct FileService {
    client: Client,
}

impl FileService {
    pub(crate) fn new(client: Client) -> Self {
        FileService { client }
    }

    /// Absolute url of a record file.
    ///
    /// `params` (e.g. `thumb`, `token`, `download`) are appended form-encoded.
    pub fn get_url(&self, record: &Record, filename: &str, params: &QueryParams) -> String {
        let parts = [
            "api".to_string(),
            "files".to_string(),
            encode_uri_component(record.collection_ref()),
            encode_uri_component(&record.id),
            encode_uri_component(filename),
        ];

        let url = self.client.build_url(&parts.join("/"));

        if params.is_empty() {
            return url;
        }
        append_query(&url, &params.serialize_form())
    }

    /// Request a private file access token for the current auth model.
    ///
    /// Returns `""` when the server sends no token.
    pub async fn get_token(&self, params: QueryParams) -> Result<String> {
        let data = self
            .client
            .send_value("/api/files/token", SendOptions::post().params(params))
            .await?;

        Ok(data
            .get("token")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }
}
