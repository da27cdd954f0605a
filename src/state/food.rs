use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON keys owned by the system. Callers can send them, but they are
/// overwritten before a record is stored.
pub const ID_FIELD: &str = "id";
pub const CREATED_AT_FIELD: &str = "createdAt";
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Caller attributes every record must carry. Their values are opaque.
pub const REQUIRED_FIELDS: [&str; 3] = ["name", "type", "price"];

/// A single food record.
///
/// `created_at` is set once when the record is created. `updated_at` stays
/// `None` (serialized as `null`) until the first successful update.
/// `name`, `kind` and `price` hold whatever JSON the caller sent.
/// Fields the caller sends beyond the known ones are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub id: String,
    pub name: Value,
    #[serde(rename = "type")]
    pub kind: Value,
    pub price: Value,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
