//! Error types for the TeddyNote Parser client
//!
//! This module defines error types for all components of the application.
//! Errors carry enough context (job id, status, path, computed bound) for a
//! caller to act on them; nothing in this crate retries internally.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors raised by the parser client: transport, submission, polling and retrieval
#[derive(Error, Debug)]
pub enum ClientError {
    /// Local input document does not exist or cannot be read
    #[error("Input file not found: {path}")]
    ArtifactNotFound { path: PathBuf },

    /// A required API key is not configured
    #[error("Missing {name} API key. Pass it explicitly or set the {env_var} environment variable")]
    MissingCredential {
        name: &'static str,
        env_var: &'static str,
    },

    /// The service answered with a non-success HTTP status
    #[error("Request to {url} failed with HTTP {status}: {body}")]
    RemoteRequest {
        url: String,
        status: u16,
        body: String,
    },

    /// Transport failure without an HTTP status (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered 2xx with a body of the wrong shape
    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },

    /// Base URL or endpoint could not be built
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Result retrieval attempted before the job completed
    #[error("Job '{job_id}' is not completed (current status: {status})")]
    JobNotReady { job_id: String, status: String },

    /// Polling budget exhausted without a terminal status
    #[error("Timed out waiting for job '{job_id}' after {attempts} status checks (up to {bound:?})")]
    PollTimeout {
        job_id: String,
        attempts: u32,
        bound: Duration,
    },

    /// Wait aborted through a cancellation token
    #[error("Waiting for job '{job_id}' was cancelled after {attempts} status checks")]
    Cancelled { job_id: String, attempts: u32 },

    /// Archive already exists and overwrite was not requested
    #[error("File already exists: {path}. Use --overwrite to replace it")]
    ArtifactExists { path: PathBuf },

    /// Downloaded archive cannot be read as a ZIP file
    #[error("Corrupt result archive {path}: {reason}")]
    ArchiveCorrupt { path: PathBuf, reason: String },

    /// Local filesystem failure while storing or extracting results
    #[error("Storage error at {path}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    /// Wrap an I/O error with the path it happened at
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Parser client error
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Whether retrying the same call later could plausibly succeed
    ///
    /// The client never retries on its own; this only informs callers.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Client(ClientError::Http(_))
            | AppError::Client(ClientError::PollTimeout { .. }) => true,
            // A failed job never becomes ready
            AppError::Client(ClientError::JobNotReady { status, .. }) => status != "failed",
            AppError::Client(ClientError::RemoteRequest { status, .. }) => {
                *status == 429 || *status >= 500
            }
            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Client(ClientError::ArtifactNotFound { .. })
            | AppError::Client(ClientError::MissingCredential { .. }) => "precondition",
            AppError::Client(ClientError::RemoteRequest { .. })
            | AppError::Client(ClientError::Http(_))
            | AppError::Client(ClientError::InvalidResponse { .. })
            | AppError::Client(ClientError::InvalidUrl { .. }) => "transport",
            AppError::Client(ClientError::JobNotReady { .. })
            | AppError::Client(ClientError::PollTimeout { .. })
            | AppError::Client(ClientError::Cancelled { .. }) => "job",
            AppError::Client(ClientError::ArtifactExists { .. })
            | AppError::Client(ClientError::ArchiveCorrupt { .. })
            | AppError::Client(ClientError::Storage { .. }) => "storage",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Client result type alias
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_timeout_reports_bound() {
        let err = ClientError::PollTimeout {
            job_id: "abc123".to_string(),
            attempts: 60,
            bound: Duration::from_secs(120),
        };
        let message = err.to_string();
        assert!(message.contains("abc123"));
        assert!(message.contains("60 status checks"));
        assert!(message.contains("120s"));
    }

    #[test]
    fn test_error_categories() {
        let missing = AppError::from(ClientError::ArtifactNotFound {
            path: PathBuf::from("missing.pdf"),
        });
        assert_eq!(missing.category(), "precondition");
        assert!(!missing.is_transient());

        let remote = AppError::from(ClientError::RemoteRequest {
            url: "http://localhost/status/x".to_string(),
            status: 503,
            body: "busy".to_string(),
        });
        assert_eq!(remote.category(), "transport");
        assert!(remote.is_transient());

        let not_found = AppError::from(ClientError::RemoteRequest {
            url: "http://localhost/status/x".to_string(),
            status: 404,
            body: String::new(),
        });
        assert!(!not_found.is_transient());

        let running = AppError::from(ClientError::JobNotReady {
            job_id: "abc123".to_string(),
            status: "processing".to_string(),
        });
        assert!(running.is_transient());

        let failed = AppError::from(ClientError::JobNotReady {
            job_id: "abc123".to_string(),
            status: "failed".to_string(),
        });
        assert_eq!(failed.category(), "job");
        assert!(!failed.is_transient());

        assert_eq!(AppError::generic("boom").category(), "generic");
    }

    #[test]
    fn test_missing_credential_message_names_env_var() {
        let err = ClientError::MissingCredential {
            name: "OpenAI",
            env_var: "OPENAI_API_KEY",
        };
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}
