//! Payload types for the SigmaLite REST API.

mod auth;
mod chart;
mod dataset;
mod sheet;

pub use auth::{CredentialPair, LoginForm, RefreshRequest, RegisterRequest, User};
pub use chart::{Chart, ChartConfig, ChartCreate, ChartType, ChartUpdate};
pub use dataset::{
    AggregateOperation, AggregateRequest, AggregateResult, ColumnInfo, Dataset, DatasetPage,
    DatasetSchema, DatasetUpdate, FilterCondition, FilterLogic, FilterOperator, FilterQuery,
    SemanticType,
};
pub use sheet::{Sheet, SheetCreate, SheetUpdate};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 and naive ISO-8601 (read as UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Serde adapter for required timestamps.
pub(crate) mod timestamp {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    /// Serde adapter for nullable timestamps.
    pub mod option {
        use super::*;

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => parse_timestamp(&raw).map(Some).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid timestamp: {}", raw))
                }),
                None => Ok(None),
            }
        }

        pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }
    }
}
