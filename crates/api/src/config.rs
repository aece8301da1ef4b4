//! Client configuration.
//!
//! The base URL comes from the `API_URL` environment variable, falling back to
//! the value baked in at compile time (browser builds have no process
//! environment) and then to a local development server.

use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

use crate::error::{ApiError, Result};

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "API_URL";

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Path prefix of the back office. Requests issued from pages under it carry
/// the bearer token.
pub const PROTECTED_PREFIX: &str = "/dashboard";

/// Route the session guard navigates to when the server rejects the token.
pub const LOGIN_ROUTE: &str = "/login";

/// Settings shared by every client built from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Pages whose path starts with this prefix send credentials
    pub protected_prefix: String,
    /// Login page route
    pub login_route: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            protected_prefix: PROTECTED_PREFIX.to_string(),
            login_route: LOGIN_ROUTE.to_string(),
        }
    }
}

impl ClientConfig {
    /// Configuration for an explicit base URL, other settings defaulted.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(API_URL_ENV)
            .ok()
            .or_else(|| option_env!("API_URL").map(str::to_string))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let config = Self::new(base_url);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ApiError::config(format!("Failed to read config: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)
            .map_err(|e| ApiError::config(format!("Failed to parse config: {}", e)))?;
        config.base_url = normalize_base_url(config.base_url);
        config.validate()?;
        Ok(config)
    }

    /// Check that the base URL is absolute and the routes are paths.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::config(format!("Invalid base URL '{}': {}", self.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::config(format!(
                "Unsupported scheme '{}' in base URL",
                url.scheme()
            )));
        }
        if !self.protected_prefix.starts_with('/') {
            return Err(ApiError::config("Protected prefix must start with '/'"));
        }
        if !self.login_route.starts_with('/') {
            return Err(ApiError::config("Login route must start with '/'"));
        }
        Ok(())
    }

    /// Whether a page path is inside the back office.
    pub fn is_protected(&self, pathname: &str) -> bool {
        pathname.starts_with(&self.protected_prefix)
    }
}

fn normalize_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}
