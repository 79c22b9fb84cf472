use crate::client::{api_path, Client, SendOptions};
use crate::error::Result;
use crate::models::{HourlyStats, ListResult, LogRequest};
use crate::protocol::QueryParams;

const BASE_PATH: &str = "/api/logs/requests";

/// Request log APIs (admins only).
#[derive(Debug, Clone)]
pub struct LogService {
    client: Client,
}

impl LogService {
    pub(crate) fn new(client: Client) -> Self {
        LogService { client }
    }

    /// Paginated request logs.
    pub async fn get_request_list(
        &self,
        page: u32,
        per_page: u32,
        params: QueryParams,
    ) -> Result<ListResult<LogRequest>> {
        let params = params
            .set_default("page", page)
            .set_default("perPage", per_page);

        self.client
            .send(BASE_PATH, SendOptions::get().params(params))
            .await
    }

    /// Single request log by id.
    pub async fn get_request(&self, id: &str, params: QueryParams) -> Result<LogRequest> {
        self.client
            .send(&api_path(BASE_PATH, &[id]), SendOptions::get().params(params))
            .await
    }

    /// Hourly request statistics.
    pub async fn get_requests_stats(&self, params: QueryParams) -> Result<Vec<HourlyStats>> {
        self.client
            .send(&format!("{}/stats", BASE_PATH), SendOptions::get().params(params))
            .await
    }
}
