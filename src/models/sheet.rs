use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::timestamp;

/// A saved view on top of a dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sheet {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub dataset_id: i64,
    pub owner_id: i64,
    #[serde(default)]
    pub config: Option<Map<String, Value>>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /api/sheets`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SheetCreate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub dataset_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
}

impl SheetCreate {
    pub fn new(name: impl Into<String>, dataset_id: i64) -> Self {
        Self {
            name: name.into(),
            description: None,
            dataset_id,
            config: None,
        }
    }
}

/// Partial update for `PUT /api/sheets/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SheetUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
}
