//! Admin APIs.

use super::crud::CrudService;
use crate::client::{Client, RequestBody, SendOptions};
use crate::error::Result;
use crate::models::{Admin, AdminAuthResponse, AuthModel};
use crate::protocol::QueryParams;
use crate::stores::AuthStore;
use serde_json::{json, Value};
use std::ops::Deref;

const BASE_PATH: &str = "/api/admins";

/// Admin APIs.
///
/// Successful auth calls store the token and admin in the client's auth store.
/// Updating or deleting the currently authenticated admin keeps the store in
/// sync.
#[derive(Debug, Clone)]
pub struct AdminService {
    crud: CrudService<Admin>,
}

impl AdminService {
    pub(crate) fn new(client: Client) -> Self {
        AdminService {
            crud: CrudService::new(client, BASE_PATH),
        }
    }

    fn is_current(&self, id: &str) -> bool {
        matches!(
            self.client().auth_store().model(),
            Some(AuthModel::Admin(ref admin)) if admin.id == id
        )
    }

    /// Update an admin, refreshing the stored model when it is the current one.
    pub async fn update(
        &self,
        id: &str,
        body: impl Into<RequestBody>,
        params: QueryParams,
    ) -> Result<Admin> {
        let admin = self.crud.update(id, body, params).await?;

        if self.is_current(&admin.id) {
            let store = self.client().auth_store();
            store.save(&store.token(), Some(AuthModel::Admin(admin.clone())))?;
        }

        Ok(admin)
    }

    /// Delete an admin, clearing the auth store when it is the current one.
    pub async fn delete(&self, id: &str, params: QueryParams) -> Result<bool> {
        let deleted = self.crud.delete(id, params).await?;

        if deleted && self.is_current(id) {
            self.client().auth_store().clear()?;
        }

        Ok(deleted)
    }

    fn save_auth(&self, response: AdminAuthResponse) -> Result<AdminAuthResponse> {
        if !response.token.is_empty() {
            self.client()
                .auth_store()
                .save(&response.token, Some(AuthModel::Admin(response.admin.clone())))?;
        }
        Ok(response)
    }

    /// Authenticate with email and password.
    pub async fn auth_with_password(
        &self,
        email: &str,
        password: &str,
        params: QueryParams,
    ) -> Result<AdminAuthResponse> {
        let body = json!({
            "identity": email,
            "password": password,
        });

        let response = self
            .client()
            .send(
                &format!("{}/auth-with-password", BASE_PATH),
                SendOptions::post().body(body).params(params),
            )
            .await?;

        self.save_auth(response)
    }

    /// Refresh the current admin token.
    pub async fn auth_refresh(&self, params: QueryParams) -> Result<AdminAuthResponse> {
        let response = self
            .client()
            .send(
                &format!("{}/auth-refresh", BASE_PATH),
                SendOptions::post().params(params),
            )
            .await?;

        self.save_auth(response)
    }

    /// Send a password reset email.
    pub async fn request_password_reset(&self, email: &str, params: QueryParams) -> Result<bool> {
        self.client()
            .send_value(
                &format!("{}/request-password-reset", BASE_PATH),
                SendOptions::post().body(json!({ "email": email })).params(params),
            )
            .await
            .map(|_: Value| true)
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

        self.client()
            .send_value(
                &format!("{}/confirm-password-reset", BASE_PATH),
                SendOptions::post().body(body).params(params),
            )
            .await
            .map(|_: Value| true)
    }
}

impl Deref for AdminService {
    type Target = CrudService<Admin>;

    fn deref(&self) -> &Self::Target {
        &self.crud
    }
}
