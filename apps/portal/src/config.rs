use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_SESSION_PATH: &str = ".portal_session.json";

/// Client configuration loaded from environment variables (and `.env`).
/// Every value has a default; CLI flags override what is loaded here.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub session_path: PathBuf,
    /// `None` means requests never time out.
    pub request_timeout: Option<Duration>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let request_timeout = match std::env::var("PORTAL_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => Some(Duration::from_secs(
                raw.parse::<u64>()
                    .context("PORTAL_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            )),
            Err(_) => None,
        };

        Ok(Config {
            api_url: std::env::var("PORTAL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            session_path: std::env::var("PORTAL_SESSION_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_PATH)),
            request_timeout,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn with_overrides(mut self, api_url: Option<String>, session_path: Option<PathBuf>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        if let Some(path) = session_path {
            self.session_path = path;
        }
        self
    }
}
