use super::crud::CrudService;
use crate::client::{Client, SendOptions};
use crate::error::Result;
use crate::models::Collection;
use crate::protocol::QueryParams;
use serde_json::{json, Value};
use std::ops::Deref;

const BASE_PATH: &str = "/api/collections";

/// Collection APIs.
#[derive(Debug, Clone)]
pub struct CollectionService {
    crud: CrudService<Collection>,
}

impl CollectionService {
    pub(crate) fn new(client: Client) -> Self {
        CollectionService {
            crud: CrudService::new(client, BASE_PATH),
        }
    }

    /// Import the provided collections.
    ///
    /// With `delete_missing`, collections and schema fields missing from the
    /// import are deleted on the server, together with their records.
    pub async fn import(
        &self,
        collections: &[Collection],
        delete_missing: bool,
        params: QueryParams,
    ) -> Result<bool> {
        let body = json!({
            "collections": collections,
            "deleteMissing": delete_missing,
        });

        self.client()
            .send_value(
                &format!("{}/import", self.base_crud_path()),
                SendOptions::put().body(body).params(params),
            )
            .await
            .map(|_: Value| true)
    }
}

impl Deref for CollectionService {
    type Target = CrudService<Collection>;

    fn deref(&self) -> &Self::Target {
        &self.crud
    }
}
