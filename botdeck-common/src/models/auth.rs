// File: botdeck-common/src/models/auth.rs

use serde::{Deserialize, Serialize};
use crate::models::user::UserProfile;

/// Body posted to the login endpoint.
#[derive(Debug, Serialize, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload of a successful login envelope.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoginSuccess {
    pub token: String,
    pub user: UserProfile,
}
