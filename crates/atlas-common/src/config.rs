//! Endpoint configuration for the atlas web service.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Host serving RMA queries and grid data.
pub const DEFAULT_API_URL: &str = "http://api.brain-map.org";

/// Host serving the CCF reference volumes.
pub const DEFAULT_DOWNLOAD_URL: &str =
    "http://download.alleninstitute.org/informatics-archive/current-release";

/// Where the client sends requests and how long it waits for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the query and grid data API (no trailing slash).
    pub api_url: String,

    /// Base URL of the release archive (no trailing slash).
    pub download_url: String,

    /// Per-request timeout.
    pub request_timeout: Duration,

    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            download_url: DEFAULT_DOWNLOAD_URL.to_string(),
            request_timeout: Duration::from_secs(600),
            user_agent: concat!("mouse-connectivity/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("BRAIN_MAP_API_URL") {
            config.api_url = val.trim_end_matches('/').to_string();
        }

        if let Ok(val) = std::env::var("BRAIN_MAP_DOWNLOAD_URL") {
            config.download_url = val.trim_end_matches('/').to_string();
        }

        if let Ok(val) = std::env::var("BRAIN_MAP_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                config.request_timeout = Duration::from_secs(secs);
            }
        }

        config
    }

    /// Point both hosts at the same base URL (useful against a local mock server).
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            api_url: base.to_string(),
            download_url: base.to_string(),
            ..Self::default()
        }
    }

    /// RMA query endpoint.
    pub fn query_endpoint(&self) -> String {
        format!("{}/api/v2/data/query.json", self.api_url)
    }
}
