//! Application constants for the TeddyNote Parser client
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// Environment variable names read by the configuration layer
pub mod env {
    /// Base URL of the parser service
    pub const API_URL: &str = "TEDDYNOTE_API_URL";

    /// API key for the Upstage OCR/layout backend
    pub const UPSTAGE_API_KEY: &str = "UPSTAGE_API_KEY";

    /// API key for the OpenAI post-processing backend
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("teddynote-parser-client/", env!("CARGO_PKG_VERSION"));

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Maximum number of bytes of a response body kept in error messages
    pub const MAX_ERROR_BODY_LEN: usize = 2048;
}

/// Parser service endpoints, relative to the base URL
pub mod endpoints {
    /// Default service base URL
    pub const DEFAULT_BASE_URL: &str = "http://localhost:9997";

    pub const HEALTH: &str = "health";
    pub const PARSE: &str = "parse";
    pub const STATUS: &str = "status";
    pub const DOWNLOAD: &str = "download";
    pub const JOBS: &str = "jobs";
}

/// Request header and multipart field names
pub mod headers {
    /// Header carrying the Upstage API key
    pub const UPSTAGE_API_KEY: &str = "X-UPSTAGE-API-KEY";

    /// Header carrying the OpenAI API key
    pub const OPENAI_API_KEY: &str = "X-OPENAI-API-KEY";

    /// Multipart part holding the uploaded document
    pub const FILE_FIELD: &str = "file";

    /// Content type of the uploaded document
    pub const PDF_MIME: &str = "application/pdf";
}

/// Default parse and polling parameters
pub mod defaults {
    use super::Duration;

    /// Default document language
    pub const LANGUAGE: &str = "Korean";

    /// Whether extracted images are included in the result by default
    pub const INCLUDE_IMAGE: bool = true;

    /// Default number of pages processed per batch
    pub const BATCH_SIZE: u32 = 30;

    /// Default delay between two status queries
    pub const CHECK_INTERVAL: Duration = Duration::from_secs(2);

    /// Default maximum number of status queries while waiting
    pub const MAX_ATTEMPTS: u32 = 60;

    /// Default directory for downloaded result archives
    pub const SAVE_DIR: &str = "parser_results";
}

/// File operation constants
pub mod files {
    /// Extension of downloaded result archives
    pub const ARCHIVE_EXTENSION: &str = "zip";

    /// Suffix of in-flight archive writes
    pub const TEMP_FILE_SUFFIX: &str = ".tmp";

    /// chrono format of the archive timestamp (second resolution)
    pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

    /// Project-local configuration file name
    pub const LOCAL_CONFIG_FILE: &str = "teddynote-parser.toml";

    /// Directory under the user config dir holding `config.toml`
    pub const CONFIG_DIR_NAME: &str = "teddynote-parser";
}

/// Logging constants
pub mod logging {
    /// Default log level
    pub const DEFAULT_LOG_LEVEL: &str = "warn";
}

// Re-export commonly used constants for convenience
pub use defaults::{CHECK_INTERVAL as DEFAULT_CHECK_INTERVAL, MAX_ATTEMPTS as DEFAULT_MAX_ATTEMPTS};
pub use endpoints::DEFAULT_BASE_URL;
pub use env::{API_URL as ENV_API_URL, OPENAI_API_KEY as ENV_OPENAI_API_KEY};
pub use env::UPSTAGE_API_KEY as ENV_UPSTAGE_API_KEY;
pub use http::{DEFAULT_TIMEOUT as HTTP_TIMEOUT, USER_AGENT};
