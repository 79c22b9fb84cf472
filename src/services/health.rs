use crate::client::{Client, SendOptions};
use crate::error::Result;
use crate::models::HealthCheckResponse;
use crate::protocol::QueryParams;

/// Health APIs.
#[derive(Debug, Clone)]
pub struct HealthService {
    client: Client,
}

impl HealthService {
    pub(crate) fn new(client: Client) -> Self {
        HealthService { client }
    }

    /// Check the health status of the api.
    pub async fn check(&self, params: QueryParams) -> Result<HealthCheckResponse> {
        self.client
            .send("/api/health", SendOptions::get().params(params))
            .await
    }
}
