//! Configuration management for the server.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Gist file used when `GIST_FILE` is not set.
pub const DEFAULT_GIST_FILE: &str = "plantxwallet.json";

/// GitHub REST API base used when `GITHUB_API_URL` is not set.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Store timeout used when `STORE_TIMEOUT_SECS` is not set.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Which document store backs the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// A file inside a GitHub gist
    Gist,
    /// Process-local memory; contents are lost on restart
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gist" => Ok(StoreBackend::Gist),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(ConfigError::InvalidBackend(other.to_string())),
        }
    }
}

/// Gist coordinates and credentials.
#[derive(Clone)]
pub struct GistConfig {
    /// Gist identifier
    pub gist_id: String,
    /// GitHub token sent as `Authorization: token ...`
    pub token: String,
    /// File inside the gist holding the records
    pub file_name: String,
    /// GitHub REST API base URL
    pub api_url: String,
}

// Keeps the token out of logs.
impl fmt::Debug for GistConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GistConfig")
            .field("gist_id", &self.gist_id)
            .field("token", &"<redacted>")
            .field("file_name", &self.file_name)
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Selected store backend
    pub backend: StoreBackend,
    /// Gist settings; present when `backend` is `Gist`
    pub gist: Option<GistConfig>,
    /// Timeout applied to every store request
    pub store_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let backend = match lookup("STORE_BACKEND") {
            Some(value) => value.parse()?,
            None => StoreBackend::Gist,
        };

        let timeout_secs: u64 = match lookup("STORE_TIMEOUT_SECS") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidTimeout)?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        let gist = match backend {
            StoreBackend::Gist => Some(GistConfig {
                gist_id: lookup("GIST_ID").ok_or(ConfigError::MissingGistId)?,
                token: lookup("GITHUB_TOKEN").ok_or(ConfigError::MissingToken)?,
                file_name: lookup("GIST_FILE").unwrap_or_else(|| DEFAULT_GIST_FILE.to_string()),
                api_url: lookup("GITHUB_API_URL")
                    .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            }),
            StoreBackend::Memory => None,
        };

        Ok(Self {
            host,
            port,
            backend,
            gist,
            store_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("GIST_ID environment variable is required")]
    MissingGistId,

    #[error("GITHUB_TOKEN environment variable is required")]
    MissingToken,

    #[error("Invalid PORT value")]
    InvalidPort,

    #[error("Invalid STORE_TIMEOUT_SECS value")]
    InvalidTimeout,

    #[error("Unknown STORE_BACKEND: {0}")]
    InvalidBackend(String),
}
