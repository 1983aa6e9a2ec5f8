use std::time::Duration;

use serde::Deserialize;

use crate::services::credentials::AuthMode;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB v4 read access token, sent as a bearer header
    #[serde(default)]
    pub tmdb_v4_token: Option<String>,

    /// Legacy TMDB key; used as the bearer token when no v4 token is set
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB v3 key, sent as the `api_key` query parameter
    #[serde(default)]
    pub tmdb_api_key_v3: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Quiet interval before typed search text is settled
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Upstream request timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Sort order used until the user picks one
    #[serde(default = "default_sort")]
    pub default_sort: String,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_debounce_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_sort() -> String {
    "popularity.desc".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmdb_v4_token: None,
            tmdb_api_key: None,
            tmdb_api_key_v3: None,
            tmdb_api_url: default_tmdb_api_url(),
            debounce_ms: default_debounce_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            default_sort: default_sort(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Resolves the authentication mode for the lifetime of the process.
    ///
    /// A v4 token wins, then the legacy key (both as bearer), then the v3
    /// query-string key. Blank values are treated as unset.
    pub fn auth_mode(&self) -> AuthMode {
        let bearer = non_blank(&self.tmdb_v4_token).or_else(|| non_blank(&self.tmdb_api_key));
        if let Some(token) = bearer {
            return AuthMode::BearerHeader(token);
        }

        match non_blank(&self.tmdb_api_key_v3) {
            Some(key) => AuthMode::QueryKey(key),
            None => AuthMode::None,
        }
    }

    pub fn debounce_interval(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
