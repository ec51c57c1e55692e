//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 5000;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL (CORS origin)
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// GCP project ID. Without one, user records are kept in memory.
    pub gcp_project_id: Option<String>,
    /// Base URL of the matching/event service
    pub matching_service_url: String,
    /// Upper bound for every remote call made by the session core
    pub remote_timeout: Duration,
    /// Mark session cookies `Secure`
    pub cookie_secure: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string());

        let remote_timeout = match env::var("REMOTE_TIMEOUT_MS") {
            Ok(raw) => {
                let ms: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("REMOTE_TIMEOUT_MS", raw.clone()))?;
                if ms == 0 {
                    return Err(ConfigError::Invalid("REMOTE_TIMEOUT_MS", raw));
                }
                Duration::from_millis(ms)
            }
            Err(_) => Duration::from_millis(DEFAULT_REMOTE_TIMEOUT_MS),
        };

        let cookie_secure = match env::var("COOKIE_SECURE") {
            Ok(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid("COOKIE_SECURE", raw))?,
            Err(_) => !is_local_origin(&frontend_url),
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            gcp_project_id: env::var("GCP_PROJECT_ID")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            matching_service_url: env::var("MATCHING_SERVICE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("MATCHING_SERVICE_URL"))?,
            frontend_url,
            remote_timeout,
            cookie_secure,
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            port: 8080,
            gcp_project_id: None,
            matching_service_url: "http://localhost:9090".to_string(),
            remote_timeout: Duration::from_millis(500),
            cookie_secure: false,
        }
    }
}

/// True for localhost-style origins used during development.
pub fn is_local_origin(origin: &str) -> bool {
    origin.starts_with("http://localhost") || origin.starts_with("http://127.0.0.1")
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("MATCHING_SERVICE_URL", "https://matching.example.com/");
        env::set_var("FRONTEND_URL", "http://localhost:5173");
        env::remove_var("REMOTE_TIMEOUT_MS");
        env::remove_var("COOKIE_SECURE");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.matching_service_url, "https://matching.example.com");
        assert_eq!(config.remote_timeout, Duration::from_millis(5000));
        assert!(!config.cookie_secure);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" 0 "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_is_local_origin() {
        assert!(is_local_origin("http://127.0.0.1:5173"));
        assert!(!is_local_origin("https://app.example.com"));
    }
}
