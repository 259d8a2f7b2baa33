use tracing::debug;

use super::ApiClient;
use crate::error::ApiResult;
use crate::models::{Chart, ChartCreate, ChartUpdate};
use crate::traits::HttpRequest;

pub const CHARTS_PATH: &str = "/api/charts";

#[derive(Debug, Clone, Copy)]
pub struct ChartApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ChartApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    fn item_url(&self, id: i64) -> String {
        self.client.url(&format!("{}/{}", CHARTS_PATH, id))
    }

    pub async fn create(&self, chart: &ChartCreate) -> ApiResult<Chart> {
        debug!(name = %chart.name, sheet_id = chart.sheet_id, chart_type = ?chart.chart_type, "Creating chart");
        let request = HttpRequest::post(self.client.url(CHARTS_PATH)).with_json(chart)?;
        self.client.send_json(request).await
    }

    /// List charts, optionally only those on `sheet_id`.
    pub async fn list(&self, sheet_id: Option<i64>) -> ApiResult<Vec<Chart>> {
        debug!(?sheet_id, "Listing charts");
        let mut request = HttpRequest::get(self.client.url(CHARTS_PATH));
        if let Some(sheet_id) = sheet_id {
            request = request.with_query("sheet_id", sheet_id);
        }
        self.client.send_json(request).await
    }

    pub async fn get(&self, id: i64) -> ApiResult<Chart> {
        debug!(id, "Fetching chart");
        self.client.send_json(HttpRequest::get(self.item_url(id))).await
    }

    pub async fn update(&self, id: i64, update: &ChartUpdate) -> ApiResult<Chart> {
        debug!(id, "Updating chart");
        let request = HttpRequest::put(self.item_url(id)).with_json(update)?;
        self.client.send_json(request).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        debug!(id, "Deleting chart");
        self.client.send_empty(HttpRequest::delete(self.item_url(id))).await
    }
}
