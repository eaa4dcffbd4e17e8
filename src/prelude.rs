//! Prelude module for the TeddyNote Parser client
//!
//! Re-exports the most commonly used items so a single
//! `use teddynote_parser_client::prelude::*;` is enough for typical usage.
//!
//! # Usage
//!
//! ```rust,no_run
//! use teddynote_parser_client::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::load(None).await?.with_env_overrides();
//!     let client = ParserClient::new(config.to_parser_config()?)?;
//!     let health = client.health_check().await?;
//!     println!("{}", health);
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, ClientError, Result};

// Client and models
pub use crate::app::{
    DownloadOptions, DownloadOutcome, JobState, JobStatus, JobSummary, ParseOptions,
    ParseOverrides, ParserClient, ParserConfig, PollConfig, SubmitResponse,
};

// Credentials and configuration
pub use crate::auth::ApiCredentials;
pub use crate::config::AppConfig;

// Cancellation for long waits
pub use tokio_util::sync::CancellationToken;

pub use std::path::{Path, PathBuf};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        let _options = ParseOptions::default();
        let _download = DownloadOptions::default();
        let poll = PollConfig::default();
        assert_eq!(poll.max_attempts, crate::constants::DEFAULT_MAX_ATTEMPTS);

        let config = ParserConfig::default();
        assert!(ParserClient::new(config).is_ok());
    }
}
