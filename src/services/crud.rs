//! Generic CRUD operations shared by the collection, admin and record services.

use crate::client::{api_path, Client, Method, RequestBody, SendOptions};
use crate::error::{ClientError, Result};
use crate::models::ListResult;
use crate::protocol::QueryParams;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

/// Default page size of [`CrudService::get_full_list`].
pub const DEFAULT_BATCH_SIZE: u32 = 200;

/// Default page size of [`CrudService::get_list`].
pub const DEFAULT_PER_PAGE: u32 = 30;

/// CRUD operations over a base api path, decoding items into `M`.
pub struct CrudService<M> {
    client: Client,
    base_path: String,
    _model: PhantomData<fn() -> M>,
}

impl<M> Clone for CrudService<M> {
    fn clone(&self) -> Self {
        CrudService {
            client: self.client.clone(),
            base_path: self.base_path.clone(),
            _model: PhantomData,
        }
    }
}

impl<M> std::fmt::Debug for CrudService<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudService")
            .field("base_path", &self.base_path)
            .finish()
    }
}

impl<M: DeserializeOwned> CrudService<M> {
    pub(crate) fn new(client: Client, base_path: impl Into<String>) -> Self {
        CrudService {
            client,
            base_path: base_path.into(),
            _model: PhantomData,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Base path all CRUD requests are sent to.
    pub fn base_crud_path(&self) -> &str {
        &self.base_path
    }

    fn item_path(&self, id: &str) -> String {
        api_path(&self.base_path, &[id])
    }

    /// Fetch every item by requesting pages of `batch` items until exhausted.
    ///
    /// A `batch` of 0 uses [`DEFAULT_BATCH_SIZE`].
    pub async fn get_full_list(&self, batch: u32, params: QueryParams) -> Result<Vec<M>> {
        let batch = if batch == 0 { DEFAULT_BATCH_SIZE } else { batch };
        let mut result = Vec::new();
        let mut page = 1;

        loop {
            let list = self.get_list(page, batch, params.clone()).await?;
            let fetched = list.items.len();
            result.extend(list.items);

            let done = if list.total_items < 0 {
                // totals were skipped, a short page is the last one
                fetched < batch as usize
            } else {
                result.len() as i64 >= list.total_items
            };

            if fetched == 0 || done {
                break;
            }
            page += 1;
        }

        Ok(result)
    }

    /// Fetch a single page. `page` and `per_page` do not override values
    /// already present in `params`.
    ///
    /// A `page` of 0 requests the first page and a `per_page` of 0 uses
    /// [`DEFAULT_PER_PAGE`].
    pub async fn get_list(
        &self,
        page: u32,
        per_page: u32,
        params: QueryParams,
    ) -> Result<ListResult<M>> {
        let page = page.max(1);
        let per_page = if per_page == 0 { DEFAULT_PER_PAGE } else { per_page };
        let params = params
            .set_default("page", page)
            .set_default("perPage", per_page);

        self.client
            .send(&self.base_path, SendOptions::get().params(params))
            .await
    }

    /// First item matching `filter`, or a 404 error when nothing matches.
    pub async fn get_first_list_item(&self, filter: &str, params: QueryParams) -> Result<M> {
        let mut params = params.set("filter", filter);
        if params.cancel_key_value().is_none() {
            params = params.cancel_key(format!("one_by_filter_{}_{}", self.base_path, filter));
        }

        let mut list = self.get_list(1, 1, params).await?;
        if list.items.is_empty() {
            return Err(ClientError::not_found(self.client.build_url(&self.base_path)));
        }
        Ok(list.items.swap_remove(0))
    }

    /// Item by id. An empty id fails with 404 without hitting the server.
    pub async fn get_one(&self, id: &str, params: QueryParams) -> Result<M> {
        if id.is_empty() {
            return Err(ClientError::not_found(self.client.build_url(&self.item_path(""))));
        }

        self.client
            .send(&self.item_path(id), SendOptions::get().params(params))
            .await
    }

    /// Create a new item.
    pub async fn create(&self, body: impl Into<RequestBody>, params: QueryParams) -> Result<M> {
        self.client
            .send(
                &self.base_path,
                SendOptions::new(Method::Post).body(body).params(params),
            )
            .await
    }

    /// Update an existing item.
    pub async fn update(
        &self,
        id: &str,
        body: impl Into<RequestBody>,
        params: QueryParams,
    ) -> Result<M> {
        self.client
            .send(
                &self.item_path(id),
                SendOptions::new(Method::Patch).body(body).params(params),
            )
            .await
    }

    /// Delete an item.
    pub async fn delete(&self, id: &str, params: QueryParams) -> Result<bool> {
        self.client
            .send_value(&self.item_path(id), SendOptions::delete().params(params))
            .await
            .map(|_: Value| true)
    }
}
