use crate::client::{Client, RequestBody, SendOptions};
use crate::error::Result;
use crate::protocol::QueryParams;
use serde_json::{json, Value};

const BASE_PATH: &str = "/api/settings";

/// Application settings APIs (admins only).
///
/// Settings are returned as raw JSON; their shape depends on the server version.
#[derive(Debug, Clone)]
pub struct SettingsService {
    client: Client,
}

impl SettingsService {
    pub(crate) fn new(client: Client) -> Self {
        SettingsService { client }
    }

    /// All application settings.
    pub async fn get_all(&self, params: QueryParams) -> Result<Value> {
        self.client
            .send_value(BASE_PATH, SendOptions::get().params(params))
            .await
    }

    /// Bulk update settings, returning the updated settings.
    pub async fn update(&self, body: impl Into<RequestBody>, params: QueryParams) -> Result<Value> {
        self.client
            .send_value(BASE_PATH, SendOptions::patch().body(body).params(params))
            .await
    }

    /// Test the S3 connection of a filesystem (`storage` or `backups`).
    pub async fn test_s3(&self, filesystem: &str, params: QueryParams) -> Result<bool> {
        self.client
            .send_value(
                &format!("{}/test/s3", BASE_PATH),
                SendOptions::post()
                    .body(json!({ "filesystem": filesystem }))
                    .params(params),
            )
            .await
            .map(|_| true)
    }

    /// Send a test email using one of the templates
    /// (`verification`, `password-reset`, `email-change`).
    pub async fn test_email(
        &self,
        to_email: &str,
        email_template: &str,
        params: QueryParams,
    ) -> Result<bool> {
        let body = json!({
            "email": to_email,
            "template": email_template,
        });

        self.client
            .send_value(
                &format!("{}/test/email", BASE_PATH),
                SendOptions::post().body(body).params(params),
            )
            .await
            .map(|_| true)
    }
}
