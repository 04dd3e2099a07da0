// botdeck-core/src/config.rs

use std::path::PathBuf;

use dotenv::dotenv;

pub const DEFAULT_API_BASE: &str = "https://api.botdeck.app/api";

/// Process configuration, sourced from the environment (a `.env` file is
/// honored if present).
#[derive(Debug, Clone)]
pub struct BotdeckConfig {
    /// Prefix for every remote API call, e.g. `https://api.botdeck.app/api`.
    pub api_base: String,
    /// Postgres URL for the analytics store; absent when this process
    /// only talks to the remote API.
    pub database_url: Option<String>,
    /// Where the file-backed session store lives.
    pub session_file: PathBuf,
}

impl BotdeckConfig {
    pub fn from_env() -> Self {
        dotenv().ok();
        let api_base = std::env::var("BOTDECK_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let database_url = std::env::var("BOTDECK_DATABASE_URL").ok();
        let session_file = std::env::var("BOTDECK_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_session_file());
        Self {
            api_base,
            database_url,
            session_file,
        }
    }
}

fn default_session_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("botdeck")
        .join("session.json")
}
