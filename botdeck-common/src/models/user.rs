// File: botdeck-common/src/models/user.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Profile blob returned by the login endpoint and cached alongside the
/// session token so the dashboards can render without an extra fetch.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub company: Option<String>,
    pub plan: Option<String>,
}
