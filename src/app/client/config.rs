//! HTTP client configuration and the runtime parser configuration
//!
//! `ParserConfig` is the single value a [`ParserClient`](super::ParserClient)
//! is built from. It is assembled by the caller (usually from
//! [`AppConfig`](crate::config::AppConfig)); the client never reads the
//! process environment itself.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::client::poll::PollConfig;
use crate::app::models::ParseOptions;
use crate::auth::ApiCredentials;
use crate::constants::{endpoints, http};
use crate::errors::{ClientError, ClientResult};

/// Configuration for the underlying HTTP client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Request timeout, applied to every call
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// User agent header
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            user_agent: http::USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Builds the HTTP client with the specified configuration
    pub fn build_http_client(&self) -> ClientResult<Client> {
        Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(ClientError::Http)
    }
}

/// Everything a `ParserClient` needs
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Service base URL, e.g. `http://localhost:9997`
    pub base_url: String,
    /// Keys forwarded on submission
    pub credentials: ApiCredentials,
    /// Instance-level parse defaults
    pub defaults: ParseOptions,
    /// HTTP settings
    pub http: ClientConfig,
    /// Default polling budget
    pub poll: PollConfig,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            base_url: endpoints::DEFAULT_BASE_URL.to_string(),
            credentials: ApiCredentials::default(),
            defaults: ParseOptions::default(),
            http: ClientConfig::default(),
            poll: PollConfig::default(),
        }
    }
}

impl ParserConfig {
    /// Configuration pointing at `base_url` with the given keys and defaults elsewhere
    pub fn new(base_url: impl Into<String>, credentials: ApiCredentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            ..Default::default()
        }
    }

    /// Parse the base URL, normalised to end with exactly one `/`
    pub fn parsed_base_url(&self) -> ClientResult<Url> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        Url::parse(&format!("{}/", trimmed)).map_err(|e| ClientError::InvalidUrl {
            url: self.base_url.clone(),
            error: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert!(config.user_agent.starts_with("teddynote-parser-client/"));
    }

    #[test]
    fn test_http_client_creation() {
        let config = ClientConfig {
            request_timeout: Duration::from_secs(5),
            ..Default::default()
        };
        assert!(config.build_http_client().is_ok());
    }

    #[test]
    fn test_base_url_normalisation() {
        let config = ParserConfig::new("http://test-api-url:9997///", ApiCredentials::default());
        let url = config.parsed_base_url().unwrap();
        assert_eq!(url.as_str(), "http://test-api-url:9997/");
        assert_eq!(
            url.join("status/abc").unwrap().as_str(),
            "http://test-api-url:9997/status/abc"
        );

        let prefixed = ParserConfig::new("https://host/api/v1", ApiCredentials::default());
        let url = prefixed.parsed_base_url().unwrap();
        assert_eq!(url.join("jobs").unwrap().as_str(), "https://host/api/v1/jobs");
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ParserConfig::new("not a url", ApiCredentials::default());
        assert!(matches!(
            config.parsed_base_url(),
            Err(ClientError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_parser_config_defaults() {
        let config = ParserConfig::default();
        assert_eq!(config.base_url, "http://localhost:9997");
        assert_eq!(config.defaults.language, "Korean");
        assert_eq!(config.poll.max_attempts, 60);
        assert!(!config.credentials.status().has_credentials());
    }
}
