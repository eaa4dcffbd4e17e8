//! Configuration management for the TeddyNote Parser client
//!
//! Settings are resolved once at startup with multi-source precedence:
//! 1. Default values
//! 2. Config file (if exists)
//! 3. Environment variables
//! 4. CLI arguments (applied by the caller)
//!
//! The result is turned into an explicit [`ParserConfig`] that is handed to
//! the client; nothing downstream reads the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::app::{ClientConfig, DownloadOptions, ParseOptions, ParserConfig, PollConfig};
use crate::auth::ApiCredentials;
use crate::constants::{defaults, endpoints, env as env_constants, files, http, logging};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Service connection settings
    pub server: ServerConfigToml,
    /// Default parse parameters
    pub parse: ParseConfigToml,
    /// Default polling budget
    pub poll: PollConfigToml,
    /// Default download behaviour
    pub download: DownloadConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// File this configuration was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// TOML-friendly server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfigToml {
    /// Parser service base URL
    pub api_url: String,
    /// Upstage API key (prefer the environment for secrets)
    pub upstage_api_key: Option<String>,
    /// OpenAI API key (prefer the environment for secrets)
    pub openai_api_key: Option<String>,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for ServerConfigToml {
    fn default() -> Self {
        Self {
            api_url: endpoints::DEFAULT_BASE_URL.to_string(),
            upstage_api_key: None,
            openai_api_key: None,
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
        }
    }
}

/// TOML-friendly parse parameter defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfigToml {
    pub language: String,
    pub include_image: bool,
    pub batch_size: u32,
    pub test_page: Option<u32>,
}

impl Default for ParseConfigToml {
    fn default() -> Self {
        let options = ParseOptions::default();
        Self {
            language: options.language,
            include_image: options.include_image,
            batch_size: options.batch_size,
            test_page: options.test_page,
        }
    }
}

/// TOML-friendly polling configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfigToml {
    /// Seconds between two status checks
    pub check_interval_secs: u64,
    /// Maximum number of status checks
    pub max_attempts: u32,
}

impl Default for PollConfigToml {
    fn default() -> Self {
        Self {
            check_interval_secs: defaults::CHECK_INTERVAL.as_secs(),
            max_attempts: defaults::MAX_ATTEMPTS,
        }
    }
}

/// TOML-friendly download configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfigToml {
    /// Directory receiving result archives
    pub save_dir: PathBuf,
    /// Unpack archives after download
    pub extract: bool,
    /// Replace existing archives
    pub overwrite: bool,
}

impl Default for DownloadConfigToml {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from(defaults::SAVE_DIR),
            extract: false,
            overwrite: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level for the application
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: logging::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an explicit file or the standard locations
    ///
    /// An explicitly given file must exist; a missing file in a standard
    /// location simply means "use defaults".
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path });
                }
                Some(path)
            }
            None => Self::find_config_file(),
        };

        match config_path {
            Some(path) => Self::load_from_file(&path).await,
            None => Ok(Self::default()),
        }
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(files::LOCAL_CONFIG_FILE)];
        if let Some(path) = Self::default_config_path() {
            search_paths.push(path);
        }

        search_paths.into_iter().find(|path| path.exists())
    }

    /// Get the default config file path for the current user
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(files::CONFIG_DIR_NAME).join("config.toml"))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let mut config = Self::from_toml(&content)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Report where the configuration came from
    ///
    /// Called once logging is set up; loading happens before that.
    pub fn log_source(&self) {
        match &self.source {
            Some(path) => info!("Loaded configuration from: {}", path.display()),
            None => debug!("No config file found, using defaults"),
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(env_constants::API_URL) {
            self.server.api_url = url;
        }
        if let Some(key) = non_empty(env_constants::UPSTAGE_API_KEY) {
            self.server.upstage_api_key = Some(key);
        }
        if let Some(key) = non_empty(env_constants::OPENAI_API_KEY) {
            self.server.openai_api_key = Some(key);
        }
        self
    }

    /// Validate and convert into the runtime client configuration
    pub fn to_parser_config(&self) -> ConfigResult<ParserConfig> {
        self.validate()?;

        Ok(ParserConfig {
            base_url: self.server.api_url.clone(),
            credentials: ApiCredentials::new(
                self.server.upstage_api_key.clone(),
                self.server.openai_api_key.clone(),
            ),
            defaults: ParseOptions {
                language: self.parse.language.clone(),
                include_image: self.parse.include_image,
                batch_size: self.parse.batch_size,
                test_page: self.parse.test_page,
            },
            http: ClientConfig {
                request_timeout: Duration::from_secs(self.server.request_timeout_secs),
                connect_timeout: Duration::from_secs(self.server.connect_timeout_secs),
                ..ClientConfig::default()
            },
            poll: PollConfig::new(
                Duration::from_secs(self.poll.check_interval_secs),
                self.poll.max_attempts,
            ),
        })
    }

    /// Default download options from the `[download]` section
    pub fn download_options(&self) -> DownloadOptions {
        DownloadOptions {
            save_dir: self.download.save_dir.clone(),
            extract: self.download.extract,
            overwrite: self.download.overwrite,
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        if let Err(e) = Url::parse(&self.server.api_url) {
            return Err(invalid("server.api_url", &self.server.api_url, e.to_string()));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(invalid(
                "server.request_timeout_secs",
                "0",
                "Timeout must be greater than 0",
            ));
        }
        if self.parse.batch_size == 0 {
            return Err(invalid(
                "parse.batch_size",
                "0",
                "Batch size must be greater than 0",
            ));
        }
        if self.parse.test_page == Some(0) {
            return Err(invalid(
                "parse.test_page",
                "0",
                "Page limit must be greater than 0; omit it to process all pages",
            ));
        }
        if self.poll.max_attempts == 0 {
            return Err(invalid(
                "poll.max_attempts",
                "0",
                "At least one status check is required",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}
