//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `PIZZERIA_API_URL` - Base URL of the REST API (default: `https://cobiesscooby.com:51001/api/v1/`)
//! - `PIZZERIA_SESSION_FILE` - Where the session is persisted
//!   (default: `<config dir>/pizzeria/session.json`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Base URL used when `PIZZERIA_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "https://cobiesscooby.com:51001/api/v1/";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API, always ending in `/`
    pub api_url: Url,
    /// Session persistence file
    pub session_file: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `PIZZERIA_API_URL` is not an absolute
    /// `http(s)` URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url(&get_env_or_default("PIZZERIA_API_URL", DEFAULT_API_URL))
            .map_err(|e| ConfigError::InvalidEnvVar("PIZZERIA_API_URL".to_string(), e))?;
        let session_file =
            get_optional_env("PIZZERIA_SESSION_FILE").map_or_else(default_session_file, PathBuf::from);
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            api_url,
            session_file,
            sentry_dsn,
        })
    }

    /// Build a configuration for an explicit API URL, e.g. a local backend.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `api_url` is not an absolute
    /// `http(s)` URL.
    pub fn with_api_url(api_url: &str, session_file: PathBuf) -> Result<Self, ConfigError> {
        let api_url = parse_api_url(api_url)
            .map_err(|e| ConfigError::InvalidEnvVar("PIZZERIA_API_URL".to_string(), e))?;
        Ok(Self {
            api_url,
            session_file,
            sentry_dsn: None,
        })
    }
}

/// Parse the API base URL. Relative paths are joined onto it, so it must end
/// in `/` or its last segment would be replaced.
fn parse_api_url(raw: &str) -> Result<Url, String> {
    let raw = raw.trim();
    let mut url = Url::parse(raw).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn default_session_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pizzeria")
        .join("session.json")
}

fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_api_url_parses() {
        let url = parse_api_url(DEFAULT_API_URL).unwrap();
        assert_eq!(url.as_str(), DEFAULT_API_URL);
        assert_eq!(url.join("productos").unwrap().path(), "/api/v1/productos");
    }

    #[test]
    fn test_trailing_slash_is_added() {
        let url = parse_api_url("http://localhost:8080/api/v1").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/v1/");
        assert_eq!(
            url.join("pedidos/usuario/7").unwrap().as_str(),
            "http://localhost:8080/api/v1/pedidos/usuario/7"
        );
    }

    #[test]
    fn test_rejects_relative_and_other_schemes() {
        assert!(parse_api_url("api/v1/").is_err());
        assert!(parse_api_url("ftp://example.com/api/").is_err());
    }

    #[test]
    fn test_with_api_url() {
        let config =
            ClientConfig::with_api_url(" http://127.0.0.1:3000 ", PathBuf::from("s.json")).unwrap();
        assert_eq!(config.api_url.as_str(), "http://127.0.0.1:3000/");
        assert!(config.sentry_dsn.is_none());

        let err = ClientConfig::with_api_url("nope", PathBuf::from("s.json")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(var, _) if var == "PIZZERIA_API_URL"));
    }

    #[test]
    fn test_default_session_file_name() {
        let path = default_session_file();
        assert!(path.ends_with("pizzeria/session.json"));
    }
}
