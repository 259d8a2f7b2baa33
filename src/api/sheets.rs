//! Sheet operations.

use tracing::debug;

use super::ApiClient;
use crate::error::ApiResult;
use crate::models::{Sheet, SheetCreate, SheetUpdate};
use crate::traits::HttpRequest;

pub const SHEETS_PATH: &str = "/api/sheets";

#[derive(Debug, Clone, Copy)]
pub struct SheetApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SheetApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    fn item_url(&self, id: i64) -> String {
        self.client.url(&format!("{}/{}", SHEETS_PATH, id))
    }

    pub async fn create(&self, sheet: &SheetCreate) -> ApiResult<Sheet> {
        debug!(name = %sheet.name, dataset_id = sheet.dataset_id, "Creating sheet");
        let request = HttpRequest::post(self.client.url(SHEETS_PATH)).with_json(sheet)?;
        self.client.send_json(request).await
    }

    /// List sheets, optionally only those built on `dataset_id`.
    pub async fn list(&self, dataset_id: Option<i64>) -> ApiResult<Vec<Sheet>> {
        debug!(?dataset_id, "Listing sheets");
        let mut request = HttpRequest::get(self.client.url(SHEETS_PATH));
        if let Some(dataset_id) = dataset_id {
            request = request.with_query("dataset_id", dataset_id);
        }
        self.client.send_json(request).await
    }

    pub async fn get(&self, id: i64) -> ApiResult<Sheet> {
        debug!(id, "Fetching sheet");
        self.client.send_json(HttpRequest::get(self.item_url(id))).await
    }

    pub async fn update(&self, id: i64, update: &SheetUpdate) -> ApiResult<Sheet> {
        debug!(id, "Updating sheet");
        let request = HttpRequest::put(self.item_url(id)).with_json(update)?;
        self.client.send_json(request).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        debug!(id, "Deleting sheet");
        self.client.send_empty(HttpRequest::delete(self.item_url(id))).await
    }
}
