//! Core application logic for the TeddyNote Parser client
//!
//! This module contains the parser service client, the job and parameter
//! models, and result archive handling.
//!
//! # Examples
//!
//! ```rust,no_run
//! use teddynote_parser_client::app::{
//!     DownloadOptions, ParseOverrides, ParserClient, ParserConfig,
//! };
//! use teddynote_parser_client::auth::ApiCredentials;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = ApiCredentials::new(Some("up".into()), Some("oa".into()));
//! let client = ParserClient::new(ParserConfig::new("http://localhost:9997", credentials))?;
//!
//! let job = client.parse_pdf("report.pdf", &ParseOverrides::default()).await?;
//! let state = client
//!     .wait_for_completion(&job.job_id, client.poll_config())
//!     .await?;
//!
//! if state.status.is_completed() {
//!     let outcome = client
//!         .download_result(&job.job_id, &DownloadOptions { extract: true, ..Default::default() })
//!         .await?;
//!     println!("archive: {}", outcome.archive_path.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod client;
pub mod models;

// Re-export main public API
pub use client::{ClientConfig, ParserClient, ParserConfig, PollConfig};
pub use models::{
    DownloadOptions, DownloadOutcome, JobState, JobStatus, JobSummary, ParseOptions,
    ParseOverrides, SubmitResponse,
};
