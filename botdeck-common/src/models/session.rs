// File: botdeck-common/src/models/session.rs

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Which dashboard a session belongs to. Customer and admin sessions are
/// stored under separate keys so an admin signing in does not clobber a
/// customer session in the same store.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash)]
pub enum SessionScope {
    Customer,
    Admin,
}

impl SessionScope {
    /// Storage key holding the bearer token for this scope.
    pub fn token_key(&self) -> &'static str {
        match self {
            SessionScope::Customer => "botdeck_token",
            SessionScope::Admin => "botdeck_admin_token",
        }
    }

    /// Storage key holding the RFC 3339 expiry timestamp, if one was set.
    pub fn expiry_key(&self) -> &'static str {
        match self {
            SessionScope::Customer => "botdeck_token_expiry",
            SessionScope::Admin => "botdeck_admin_token_expiry",
        }
    }

    /// Storage key holding the cached profile blob for this scope.
    pub fn profile_key(&self) -> &'static str {
        match self {
            SessionScope::Customer => "botdeck_user",
            SessionScope::Admin => "botdeck_admin_user",
        }
    }
}

impl fmt::Display for SessionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionScope::Customer => write!(f, "customer"),
            SessionScope::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for SessionScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "customer" | "user" => Ok(SessionScope::Customer),
            "admin" => Ok(SessionScope::Admin),
            _ => Err(format!("Unknown session scope: {}", s)),
        }
    }
}
