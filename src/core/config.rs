//! Client configuration from environment variables.
//!
//! Load configuration using `Config::from_env()` after calling `dotenvy::dotenv()`.

use std::path::PathBuf;
use std::time::Duration;

/// Default API base URL used when `CLINIC_API_URL` is not set
pub const DEFAULT_API_URL: &str = "http://localhost:3333";

/// Default request timeout (10 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default file for the native session storage area
pub const DEFAULT_SESSION_FILE: &str = ".clinic-session.json";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL every API path is resolved against
    /// Example: https://api.clinic.example
    pub api_url: String,

    /// Timeout applied to every outgoing request
    pub request_timeout: Duration,

    /// File backing the native storage area
    pub session_file: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` before this to load from `.env` file.
    pub fn from_env() -> Self {
        let api_url =
            std::env::var("CLINIC_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let timeout_secs = std::env::var("CLINIC_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let session_file = std::env::var("CLINIC_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE));

        Self {
            api_url,
            request_timeout: Duration::from_secs(timeout_secs),
            session_file,
        }
    }

    /// Set the API base URL
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the session file
    pub fn session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.api_url, "http://localhost:3333");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.session_file, PathBuf::from(".clinic-session.json"));
    }

    #[test]
    fn test_builder_setters() {
        let config = Config::default()
            .api_url("https://api.clinic.example")
            .request_timeout(Duration::from_millis(250))
            .session_file("/tmp/session.json");

        assert_eq!(config.api_url, "https://api.clinic.example");
        assert_eq!(config.request_timeout, Duration::from_millis(250));
        assert_eq!(config.session_file, PathBuf::from("/tmp/session.json"));
    }

    #[test]
    fn test_base_url_strips_trailing_slashes() {
        let config = Config::default().api_url("https://api.clinic.example//");
        assert_eq!(config.base_url(), "https://api.clinic.example");

        let config = Config::default().api_url("https://api.clinic.example");
        assert_eq!(config.base_url(), "https://api.clinic.example");
    }

    #[test]
    fn test_config_from_env_returns_config() {
        // Values depend on the environment, only check it loads
        let config = Config::from_env();

        let _ = config.base_url();
        let _ = config.session_file.as_path();
    }

    #[test]
    fn test_config_clone() {
        let config = Config::default().api_url("http://10.0.0.5:8080");
        let cloned = config.clone();

        assert_eq!(config.api_url, cloned.api_url);
        assert_eq!(config.request_timeout, cloned.request_timeout);
        assert_eq!(config.session_file, cloned.session_file);
    }
}
