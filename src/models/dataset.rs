use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::timestamp;

/// Uploaded dataset metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub file_name: String,
    pub file_size: i64,
    pub row_count: i64,
    pub column_count: i64,
    #[serde(default)]
    pub schema: Option<DatasetSchema>,
    pub owner_id: i64,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Column layout inferred by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetSchema {
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,
    #[serde(default)]
    pub row_count: i64,
    #[serde(default)]
    pub column_count: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Numeric,
    Text,
    Datetime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    /// Storage type reported by the backend, e.g. `int64`
    #[serde(rename = "type")]
    pub dtype: String,
    #[serde(default)]
    pub semantic_type: Option<SemanticType>,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub unique_count: i64,
    #[serde(default)]
    pub sample_values: Vec<Value>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub mean: Option<f64>,
}

/// Partial update for `PUT /api/datasets/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DatasetUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One page of rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetPage {
    pub data: Vec<Map<String, Value>>,
    pub total_rows: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl DatasetPage {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
    Contains,
    Startswith,
    Endswith,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FilterLogic {
    #[default]
    And,
    Or,
}

/// A single `column operator value` condition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterCondition {
    pub column: String,
    pub operator: FilterOperator,
    pub value: Value,
}

impl FilterCondition {
    pub fn new(column: impl Into<String>, operator: FilterOperator, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }
}

/// Body of `POST /api/datasets/{id}/filter`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterQuery {
    pub filters: Vec<FilterCondition>,
    #[serde(default)]
    pub logic: FilterLogic,
    pub page: u32,
    pub page_size: u32,
}

impl Default for FilterQuery {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            logic: FilterLogic::And,
            page: 1,
            page_size: 100,
        }
    }
}

impl FilterQuery {
    pub fn new(filters: Vec<FilterCondition>) -> Self {
        Self {
            filters,
            ..Default::default()
        }
    }

    pub fn with_logic(mut self, logic: FilterLogic) -> Self {
        self.logic = logic;
        self
    }

    pub fn with_page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AggregateOperation {
    Sum,
    Avg,
    Min,
    Max,
    Count,
    Median,
}

/// Body of `POST /api/datasets/{id}/aggregate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregateRequest {
    pub column: String,
    pub operation: AggregateOperation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<Vec<String>>,
}

impl AggregateRequest {
    pub fn new(column: impl Into<String>, operation: AggregateOperation) -> Self {
        Self {
            column: column.into(),
            operation,
            group_by: None,
        }
    }

    pub fn grouped_by(mut self, columns: Vec<String>) -> Self {
        self.group_by = Some(columns);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AggregateResult {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub group_results: Option<Vec<Map<String, Value>>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_query_defaults() {
        let query = FilterQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 100);
        assert_eq!(query.logic, FilterLogic::And);
    }

    #[test]
    fn test_filter_query_wire_format() {
        let query = FilterQuery::new(vec![
            FilterCondition::new("region", FilterOperator::Eq, "west"),
            FilterCondition::new("amount", FilterOperator::Gte, 100),
        ])
        .with_logic(FilterLogic::Or)
        .with_page(2, 25);

        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "filters": [
                    {"column": "region", "operator": "eq", "value": "west"},
                    {"column": "amount", "operator": "gte", "value": 100}
                ],
                "logic": "or",
                "page": 2,
                "page_size": 25
            })
        );
    }

    #[test]
    fn test_aggregate_request_omits_empty_group_by() {
        let request = AggregateRequest::new("amount", AggregateOperation::Median);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"column": "amount", "operation": "median"})
        );

        let grouped = request.grouped_by(vec!["region".to_string()]);
        assert_eq!(
            serde_json::to_value(&grouped).unwrap()["group_by"],
            json!(["region"])
        );
    }

    #[test]
    fn test_aggregate_result_group_results() {
        let result: AggregateResult = serde_json::from_value(json!({
            "result": null,
            "group_results": [{"region": "west", "amount": 10.5}]
        }))
        .unwrap();
        assert!(result.result.is_none());
        assert_eq!(result.group_results.unwrap()[0]["region"], "west");
    }

    #[test]
    fn test_dataset_with_schema() {
        let dataset: Dataset = serde_json::from_value(json!({
            "id": 3,
            "name": "sales",
            "description": null,
            "file_name": "sales.csv",
            "file_size": 2048,
            "row_count": 100,
            "column_count": 2,
            "schema": {
                "columns": [
                    {"name": "amount", "type": "float64", "semantic_type": "numeric",
                     "nullable": false, "unique_count": 97, "sample_values": [1.5, 2.0],
                     "min": 0.5, "max": 99.0, "mean": 42.1},
                    {"name": "region", "type": "object", "semantic_type": "text",
                     "nullable": true, "unique_count": 4, "sample_values": ["west"]}
                ],
                "row_count": 100,
                "column_count": 2
            },
            "owner_id": 1,
            "created_at": "2024-05-01T10:00:00"
        }))
        .unwrap();

        let schema = dataset.schema.unwrap();
        assert_eq!(schema.columns.len(), 2);
        assert_eq!(schema.columns[0].dtype, "float64");
        assert_eq!(schema.columns[0].semantic_type, Some(SemanticType::Numeric));
        assert_eq!(schema.columns[1].max, None);
        assert!(dataset.updated_at.is_none());
    }

    #[test]
    fn test_dataset_page_has_next() {
        let page = DatasetPage {
            data: Vec::new(),
            total_rows: 250,
            page: 2,
            page_size: 100,
            total_pages: 3,
        };
        assert!(page.has_next());
        assert!(!DatasetPage { page: 3, ..page }.has_next());
    }

    #[test]
    fn test_dataset_update_only_sends_set_fields() {
        let update = DatasetUpdate {
            description: Some("Q3 numbers".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"description": "Q3 numbers"})
        );
    }
}
