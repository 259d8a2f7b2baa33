//! Dataset operations.

use std::path::Path;

use bytes::Bytes;
use tracing::debug;

use super::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    AggregateRequest, AggregateResult, Dataset, DatasetPage, DatasetUpdate, FilterQuery,
};
use crate::traits::{FormPart, HttpRequest};

pub const DATASETS_PATH: &str = "/api/datasets";

/// A file to upload, already in memory.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let content_type = guess_content_type(&file_name).map(str::to_string);
        Self {
            file_name,
            content_type,
            data: data.into(),
        }
    }
}

fn guess_content_type(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "csv" => Some("text/csv"),
        "xlsx" => Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        "xls" => Some("application/vnd.ms-excel"),
        "json" => Some("application/json"),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DatasetApi<'a> {
    client: &'a ApiClient,
}

impl<'a> DatasetApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    fn item_url(&self, id: i64) -> String {
        self.client.url(&format!("{}/{}", DATASETS_PATH, id))
    }

    /// POST /api/datasets as multipart `name`, `file`, `description`.
    pub async fn upload(
        &self,
        name: &str,
        file: UploadFile,
        description: Option<&str>,
    ) -> ApiResult<Dataset> {
        debug!(name, file_name = %file.file_name, bytes = file.data.len(), "Uploading dataset");
        let mut parts = vec![
            FormPart::text("name", name),
            FormPart::file(
                "file",
                file.file_name,
                file.content_type.as_deref(),
                file.data,
            ),
        ];
        if let Some(description) = description {
            parts.push(FormPart::text("description", description));
        }
        let request = HttpRequest::post(self.client.url(DATASETS_PATH)).with_multipart(parts);
        self.client.send_json(request).await
    }

    /// Read `path` from disk and upload it under its own file name.
    pub async fn upload_path(
        &self,
        name: &str,
        path: &Path,
        description: Option<&str>,
    ) -> ApiResult<Dataset> {
        let data = tokio::fs::read(path).await.map_err(|e| ApiError::InvalidInput {
            message: format!("Could not read {}: {}", path.display(), e),
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ApiError::InvalidInput {
                message: format!("{} is not a file", path.display()),
            })?;
        self.upload(name, UploadFile::new(file_name, data), description)
            .await
    }

    /// GET /api/datasets
    pub async fn list(&self) -> ApiResult<Vec<Dataset>> {
        debug!("Listing datasets");
        self.client
            .send_json(HttpRequest::get(self.client.url(DATASETS_PATH)))
            .await
    }

    /// GET /api/datasets/{id}
    pub async fn get(&self, id: i64) -> ApiResult<Dataset> {
        debug!(id, "Fetching dataset");
        self.client.send_json(HttpRequest::get(self.item_url(id))).await
    }

    /// GET /api/datasets/{id}/data
    pub async fn get_page(&self, id: i64, page: u32, page_size: u32) -> ApiResult<DatasetPage> {
        debug!(id, page, page_size, "Fetching dataset rows");
        let request = HttpRequest::get(format!("{}/data", self.item_url(id)))
            .with_query("page", page)
            .with_query("page_size", page_size);
        self.client.send_json(request).await
    }

    /// POST /api/datasets/{id}/filter
    pub async fn filter(&self, id: i64, query: &FilterQuery) -> ApiResult<DatasetPage> {
        debug!(id, conditions = query.filters.len(), "Filtering dataset");
        let request = HttpRequest::post(format!("{}/filter", self.item_url(id))).with_json(query)?;
        self.client.send_json(request).await
    }

    /// POST /api/datasets/{id}/aggregate
    pub async fn aggregate(&self, id: i64, request: &AggregateRequest) -> ApiResult<AggregateResult> {
        debug!(id, column = %request.column, operation = ?request.operation, "Aggregating dataset");
        let http = HttpRequest::post(format!("{}/aggregate", self.item_url(id))).with_json(request)?;
        self.client.send_json(http).await
    }

    /// PUT /api/datasets/{id}
    pub async fn update(&self, id: i64, update: &DatasetUpdate) -> ApiResult<Dataset> {
        debug!(id, "Updating dataset");
        let request = HttpRequest::put(self.item_url(id)).with_json(update)?;
        self.client.send_json(request).await
    }

    /// DELETE /api/datasets/{id}
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        debug!(id, "Deleting dataset");
        self.client.send_empty(HttpRequest::delete(self.item_url(id))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type("sales.csv"), Some("text/csv"));
        assert_eq!(guess_content_type("Report.XLSX").map(|s| s.starts_with("application/")), Some(true));
        assert_eq!(guess_content_type("notes"), None);
        assert_eq!(guess_content_type("archive.tar.gz"), None);
    }

    #[test]
    fn test_upload_file_new() {
        let file = UploadFile::new("sales.csv", b"a,b\n1,2\n".to_vec());
        assert_eq!(file.content_type.as_deref(), Some("text/csv"));
        assert_eq!(file.data.len(), 8);
    }
}
