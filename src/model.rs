//! Message entity, request body and the validated field set written to the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored contact message as returned by the list endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    /// Null when the stored document has no creation time.
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Raw body of create and update requests. Fields stay optional so that a
/// missing field is reported by validation rather than by the JSON parser.
#[derive(Clone, Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct MessageRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Name, email and message after validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageFields {
    pub name: String,
    pub email: String,
    pub message: String,
}
