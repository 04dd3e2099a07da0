// File: botdeck-common/src/models/notion.rs
//
// Shapes exchanged with the Notion workspace-integration API. The remote
// side wraps every response in the same `{success, data, count, error}`
// envelope; `ApiEnvelope::into_result` is the only way callers unwrap it.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::error::Error;

/// Uniform response wrapper used by every workspace-API endpoint.
/// Exactly one of (`success=true` with optional `data`/`count`) or
/// (`success=false` with `error`) holds on the wire.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub count: Option<i64>,
    pub error: Option<String>,
}

impl<T: DeserializeOwned> ApiEnvelope<T> {
    /// Parse a response body into the envelope shape. The remote side is
    /// trusted to speak the envelope, so an unparseable body is itself a
    /// remote failure, reported under the operation's default message.
    pub fn parse(raw: &str, fallback: &str) -> Result<Self, Error> {
        serde_json::from_str(raw)
            .map_err(|e| Error::Remote(format!("{fallback}: unreadable response ({e})")))
    }
}

impl<T> ApiEnvelope<T> {
    /// Convert the loose wire shape into a typed result. A failure envelope
    /// with no message (or a blank one) falls back to the operation's fixed
    /// default string so the caller never surfaces an empty error.
    pub fn into_result(self, fallback: &str) -> Result<T, Error> {
        if self.success {
            self.data
                .ok_or_else(|| Error::Remote(format!("{fallback}: response carried no data")))
        } else {
            let msg = self.error.unwrap_or_default();
            if msg.trim().is_empty() {
                Err(Error::Remote(fallback.to_string()))
            } else {
                Err(Error::Remote(msg))
            }
        }
    }
}

/// What `GET /validate` reports about the connected workspace.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConnectionSummary {
    pub workspace_name: String,
    pub database_count: i64,
}

/// Database listing entry from `GET /databases` / `GET /databases/{id}`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseInfo {
    pub id: String,
    pub title: String,
    pub created_time: Option<DateTime<Utc>>,
    pub last_edited_time: Option<DateTime<Utc>>,
}

/// A page record. `properties` is passed through verbatim; the remote
/// API owns that shape.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Page {
    pub id: String,
    pub url: Option<String>,
    pub properties: Value,
}

/// Result of a database query: the matching pages plus the remote-side
/// total, which can exceed `pages.len()` when the server paginates.
#[derive(Debug, Clone)]
pub struct PageBatch {
    pub pages: Vec<Page>,
    pub count: i64,
}
