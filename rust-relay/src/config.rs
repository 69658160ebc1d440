//! Configuration module for environment variable parsing.
//!
//! Everything is read once at startup. Missing secrets fail here rather than
//! on the first webhook.

use std::env;

use thiserror::Error;
use tracing::warn;
use url::Url;

/// Default subscriber email sent to Novu.
pub const DEFAULT_SUBSCRIBER_EMAIL: &str = "emil@novu.co";

/// Default branding logo placed in every notification payload.
pub const DEFAULT_APP_LOGO_URL: &str = "https://avatars.githubusercontent.com/u/77433905?s=200&v=4";

/// Default Novu API base URL.
pub const DEFAULT_NOVU_API_URL: &str = "https://api.novu.co";

/// Configuration errors raised while loading the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Svix signing secret for Clerk webhooks (`whsec_...`)
    pub clerk_webhook_secret: String,

    /// Novu API key
    pub novu_secret_key: String,

    /// Novu API base URL
    pub novu_api_url: Url,

    /// Base URL for invitation accept links
    pub after_sign_in_url: String,

    /// Email placed on every subscriber sent to Novu
    pub subscriber_email: String,

    /// Logo URL placed on every notification payload
    pub app_logo_url: String,

    /// Port for the web server to listen on
    pub port: u16,

    /// Outbound HTTP request timeout in milliseconds
    pub request_timeout_ms: u64,

    /// Maximum clock skew in seconds for Svix webhook timestamps
    pub timestamp_tolerance_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let novu_api_url = optional("NOVU_API_URL")
            .unwrap_or_else(|| DEFAULT_NOVU_API_URL.to_string());
        let novu_api_url = Url::parse(&novu_api_url).map_err(|e| ConfigError::Invalid {
            var: "NOVU_API_URL",
            reason: e.to_string(),
        })?;

        Ok(Config {
            clerk_webhook_secret: required("CLERK_WEBHOOK_SECRET")?,

            novu_secret_key: required("NOVU_SECRET_KEY")?,

            novu_api_url,

            after_sign_in_url: required("NEXT_PUBLIC_CLERK_AFTER_SIGN_IN_URL")?,

            subscriber_email: optional("SUBSCRIBER_EMAIL_OVERRIDE")
                .unwrap_or_else(|| DEFAULT_SUBSCRIBER_EMAIL.to_string()),

            app_logo_url: optional("APP_LOGO_URL")
                .unwrap_or_else(|| DEFAULT_APP_LOGO_URL.to_string()),

            port: parse_or("PORT", 8080),

            request_timeout_ms: parse_or("REQUEST_TIMEOUT_MS", 8000),

            timestamp_tolerance_secs: parse_or("SVIX_TIMESTAMP_TOLERANCE_SECS", 300),
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("clerk_webhook_secret", &"<redacted>")
            .field("novu_secret_key", &"<redacted>")
            .field("novu_api_url", &self.novu_api_url.as_str())
            .field("after_sign_in_url", &self.after_sign_in_url)
            .field("subscriber_email", &self.subscriber_email)
            .field("app_logo_url", &self.app_logo_url)
            .field("port", &self.port)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("timestamp_tolerance_secs", &self.timestamp_tolerance_secs)
            .finish()
    }
}

/// Read a required variable, treating blank values as missing.
fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

/// Read an optional variable, trimming whitespace and dropping blank values.
fn optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a numeric variable, falling back to `default` when unset or invalid.
fn parse_or<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    let raw = match optional(name) {
        Some(v) => v,
        None => return default,
    };

    match raw.parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid numeric value, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_valid() {
        env::set_var("TEST_PARSE_OR_VALID", "9090");
        let result: u16 = parse_or("TEST_PARSE_OR_VALID", 8080);
        assert_eq!(result, 9090);
        env::remove_var("TEST_PARSE_OR_VALID");
    }

    #[test]
    fn test_parse_or_invalid_uses_default() {
        env::set_var("TEST_PARSE_OR_INVALID", "not-a-port");
        let result: u16 = parse_or("TEST_PARSE_OR_INVALID", 8080);
        assert_eq!(result, 8080);
        env::remove_var("TEST_PARSE_OR_INVALID");
    }

    #[test]
    fn test_parse_or_default() {
        let result: u64 = parse_or("NONEXISTENT_VAR", 300);
        assert_eq!(result, 300);
    }

    #[test]
    fn test_optional_blank_is_none() {
        env::set_var("TEST_OPTIONAL_BLANK", "   ");
        assert_eq!(optional("TEST_OPTIONAL_BLANK"), None);
        env::remove_var("TEST_OPTIONAL_BLANK");
    }

    #[test]
    fn test_required_missing() {
        let err = required("TEST_REQUIRED_NEVER_SET").unwrap_err();
        assert!(matches!(err, ConfigError::Missing("TEST_REQUIRED_NEVER_SET")));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config {
            clerk_webhook_secret: "whsec_c2VjcmV0".to_string(),
            novu_secret_key: "novu-live-key".to_string(),
            novu_api_url: Url::parse(DEFAULT_NOVU_API_URL).unwrap(),
            after_sign_in_url: "https://app.example.com".to_string(),
            subscriber_email: DEFAULT_SUBSCRIBER_EMAIL.to_string(),
            app_logo_url: DEFAULT_APP_LOGO_URL.to_string(),
            port: 8080,
            request_timeout_ms: 8000,
            timestamp_tolerance_secs: 300,
        };

        let debug = format!("{:?}", config);

        assert!(!debug.contains("whsec_c2VjcmV0"));
        assert!(!debug.contains("novu-live-key"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("https://app.example.com"));
    }

    #[test]
    fn test_required_present() {
        env::set_var("TEST_REQUIRED_PRESENT", " whsec_abc ");
        assert_eq!(required("TEST_REQUIRED_PRESENT").unwrap(), "whsec_abc");
        env::remove_var("TEST_REQUIRED_PRESENT");
    }
}
