//! Record APIs of a single collection, including the auth collection flows.

use super::crud::CrudService;
use crate::client::{api_path, Client, RequestBody, SendOptions};
use crate::error::Result;
use crate::models::{AuthMethodsList, AuthModel, ExternalAuth, Record, RecordAuthResponse};
use crate::protocol::{encode_uri_component, QueryParams};
use crate::stores::AuthStore;
use serde_json::{json, Map, Value};
use std::ops::Deref;

/// Record APIs of one collection.
///
/// Auth methods only work on auth collections. Successful auth calls store the
/// token and record in the client's auth store, and updating or deleting the
/// currently authenticated record keeps the store in sync.
#[derive(Debug, Clone)]
pub struct RecordService {
    crud: CrudService<Record>,
    collection_id_or_name: String,
}

impl RecordService {
    pub(crate) fn new(client: Client, collection_id_or_name: &str) -> Self {
        let base = format!("/api/collections/{}", encode_uri_component(collection_id_or_name));
        RecordService {
            crud: CrudService::new(client, format!("{}/records", base)),
            collection_id_or_name: collection_id_or_name.to_string(),
        }
    }

    /// Collection id or name this service was created for.
    pub fn collection_id_or_name(&self) -> &str {
        &self.collection_id_or_name
    }

    /// Base path of the collection itself (auth endpoints live here).
    pub fn base_collection_path(&self) -> String {
        format!("/api/collections/{}", encode_uri_component(&self.collection_id_or_name))
    }

    fn collection_path(&self, action: &str) -> String {
        format!("{}/{}", self.base_collection_path(), action)
    }

    fn is_current(&self, record: &Record) -> bool {
        let Some(AuthModel::Record(current)) = self.client().auth_store().model() else {
            return false;
        };

        current.id == record.id
            && (current.collection_id == self.collection_id_or_name
                || current.collection_name == self.collection_id_or_name
                || current.collection_id == record.collection_id)
    }

    fn is_current_id(&self, id: &str) -> bool {
        let Some(AuthModel::Record(current)) = self.client().auth_store().model() else {
            return false;
        };

        current.id == id
            && (current.collection_id == self.collection_id_or_name
                || current.collection_name == self.collection_id_or_name)
    }

    // ========== CRUD with auth sync ==========

    /// Update a record, refreshing the stored model when it is the current one.
    ///
    /// Expanded relations of the stored model are kept when the response does
    /// not carry its own.
    pub async fn update(
        &self,
        id: &str,
        body: impl Into<RequestBody>,
        params: QueryParams,
    ) -> Result<Record> {
        let mut record = self.crud.update(id, body, params).await?;

        if self.is_current(&record) {
            let store = self.client().auth_store();
            if record.expand.is_empty() {
                if let Some(AuthModel::Record(current)) = store.model() {
                    record.expand = current.expand;
                }
            }
            store.save(&store.token(), Some(AuthModel::Record(record.clone())))?;
        }

        Ok(record)
    }

    /// Delete a record, clearing the auth store when it is the current one.
    pub async fn delete(&self, id: &str, params: QueryParams) -> Result<bool> {
        let deleted = self.crud.delete(id, params).await?;

        if deleted && self.is_current_id(id) {
            self.client().auth_store().clear()?;
        }

        Ok(deleted)
    }

    // ========== Auth ==========

    fn save_auth(&self, response: RecordAuthResponse) -> Result<RecordAuthResponse> {
        if !response.token.is_empty() {
            self.client()
                .auth_store()
                .save(&response.token, Some(AuthModel::Record(response.record.clone())))?;
        }
        Ok(response)
    }

    /// Auth methods enabled for this collection.
    pub async fn list_auth_methods(&self, params: QueryParams) -> Result<AuthMethodsList> {
        self.client()
            .send(
                &self.collection_path("auth-methods"),
                SendOptions::get().params(params),
            )
            .await
    }

    /// Authenticate with username/email and password.
    pub async fn auth_with_password(
        &self,
        identity: &str,
        password: &str,
        params: QueryParams,
    ) -> Result<RecordAuthResponse> {
        let body = json!({
            "identity": identity,
            "password": password,
        });

        let response = self
            .client()
            .send(
                &self.collection_path("auth-with-password"),
                SendOptions::post().body(body).params(params),
            )
            .await?;

        self.save_auth(response)
    }

    /// Authenticate with an OAuth2 authorization code.
    ///
    /// `create_data` is used when the sign-in creates a new record.
    pub async fn auth_with_oauth2(
        &self,
        provider: &str,
        code: &str,
        code_verifier: &str,
        redirect_url: &str,
        create_data: Option<Map<String, Value>>,
        params: QueryParams,
    ) -> Result<RecordAuthResponse> {
        let body = json!({
            "provider": provider,
            "code": code,
            "codeVerifier": code_verifier,
            "redirectUrl": redirect_url,
            "createData": create_data.unwrap_or_default(),
        });

        let response = self
            .client()
            .send(
                &self.collection_path("auth-with-oauth2"),
                SendOptions::post().body(body).params(params),
            )
            .await?;

        self.save_auth(response)
    }

    /// Refresh the current record token.
    pub async fn auth_refresh(&self, params: QueryParams) -> Result<RecordAuthResponse> {
        let response = self
            .client()
            .send(
                &self.collection_path("auth-refresh"),
                SendOptions::post().params(params),
            )
            .await?;

        self.save_auth(response)
    }

    async fn post_action(&self, action: &str, body: Value, params: QueryParams) -> Result<bool> {
        self.client()
            .send_value(
                &self.collection_path(action),
                SendOptions::post().body(body).params(params),
            )
            .await
            .map(|_| true)
    }

    /// Send a password reset email.
    pub async fn request_password_reset(&self, email: &str, params: QueryParams) -> Result<bool> {
        self.post_action("request-password-reset", json!({ "email": email }), params)
            .await
    }

    /// Confirm a password reset with the emailed token.
    pub async fn confirm_password_reset(
        &self,
        reset_token: &str,
        password: &str,
        password_confirm: &str,
        params: QueryParams,
    ) -> Result<bool> {
        let body = json!({
            "token": reset_token,
            "password": password,
            "passwordConfirm": password_confirm,
        });
        self.post_action("confirm-password-reset", body, params).await
    }

    /// Send a verification email.
    pub async fn request_verification(&self, email: &str, params: QueryParams) -> Result<bool> {
        self.post_action("request-verification", json!({ "email": email }), params)
            .await
    }

    /// Confirm an email verification with the emailed token.
    pub async fn confirm_verification(
        &self,
        verification_token: &str,
        params: QueryParams,
    ) -> Result<bool> {
        self.post_action(
            "confirm-verification",
            json!({ "token": verification_token }),
            params,
        )
        .await
    }

    /// Request an email change for the authenticated record.
    pub async fn request_email_change(&self, new_email: &str, params: QueryParams) -> Result<bool> {
        self.post_action(
            "request-email-change",
            json!({ "newEmail": new_email }),
            params,
        )
        .await
    }

    /// Confirm an email change with the emailed token and the current password.
    pub async fn confirm_email_change(
        &self,
        email_change_token: &str,
        password: &str,
        params: QueryParams,
    ) -> Result<bool> {
        let body = json!({
            "token": email_change_token,
            "password": password,
        });
        self.post_action("confirm-email-change", body, params).await
    }

    // ========== External auths ==========

    /// OAuth2 providers linked to a record.
    pub async fn list_external_auths(
        &self,
        record_id: &str,
        params: QueryParams,
    ) -> Result<Vec<ExternalAuth>> {
        let path = api_path(self.base_crud_path(), &[record_id, "external-auths"]);
        self.client()
            .send(&path, SendOptions::get().params(params))
            .await
    }

    /// Unlink an OAuth2 provider from a record.
    pub async fn unlink_external_auth(
        &self,
        record_id: &str,
        provider: &str,
        params: QueryParams,
    ) -> Result<bool> {
        let path = api_path(self.base_crud_path(), &[record_id, "external-auths", provider]);
        self.client()
            .send_value(&path, SendOptions::delete().params(params))
            .await
            .map(|_| true)
    }

    // ========== Files ==========

    /// Absolute url of a file of `record`.
    pub fn get_file_url(&self, record: &Record, filename: &str, params: &QueryParams) -> String {
        self.client().files().get_url(record, filename, params)
    }
}

impl Deref for RecordService {
    type Target = CrudService<Record>;

    fn deref(&self) -> &Self::Target {
        &self.crud
    }
}
