//! HTTP client for the TeddyNote Parser service
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and the runtime `ParserConfig`
//! - `http`: single-shot HTTP operations (transport)
//! - `jobs`: health, status and listing queries
//! - `submit`: multipart document submission
//! - `poll`: bounded wait for a terminal job status
//! - `download`: result retrieval with overwrite guard and extraction
//!
//! Every call carries its own job id; the client keeps no job state between
//! calls and can be shared freely.

use std::path::Path;

use chrono::Local;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::app::models::{
    DownloadOptions, DownloadOutcome, JobState, JobSummary, ParseOptions, ParseOverrides,
    SubmitResponse,
};
use crate::errors::ClientResult;

// Module declarations
pub mod config;
pub mod download;
pub mod http;
pub mod jobs;
pub mod poll;
pub mod submit;

pub use config::{ClientConfig, ParserConfig};
pub use poll::PollConfig;

use download::DownloadHandler;
use http::HttpHandler;
use jobs::JobsHandler;
use submit::SubmitHandler;

/// Client for the parser service
///
/// Submits documents, tracks the resulting jobs and retrieves their result
/// archives. Nothing is retried internally; every failure reaches the
/// caller.
#[derive(Debug, Clone)]
pub struct ParserClient {
    http_handler: HttpHandler,
    config: ParserConfig,
}

impl ParserClient {
    /// Creates a new client from an explicit configuration
    ///
    /// Missing API keys are only warned about here; they become an error
    /// once a document is submitted.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the base URL is invalid or the HTTP client
    /// cannot be built
    pub fn new(config: ParserConfig) -> ClientResult<Self> {
        let base_url = config.parsed_base_url()?;
        let client = config.http.build_http_client()?;
        let http_handler = HttpHandler::new(client, base_url);

        let auth = config.credentials.status();
        if !auth.upstage_set {
            tracing::warn!("Upstage API key is not configured");
        }
        if !auth.openai_set {
            tracing::warn!("OpenAI API key is not configured");
        }

        tracing::info!(base_url = %http_handler.base_url(), "created parser client");

        Ok(Self {
            http_handler,
            config,
        })
    }

    /// Check that the service is up (`GET /health`)
    pub async fn health_check(&self) -> ClientResult<Value> {
        JobsHandler::new(&self.http_handler).health().await
    }

    /// Submit a PDF for parsing
    ///
    /// Unset fields of `overrides` fall back to the instance defaults.
    ///
    /// # Errors
    ///
    /// `ArtifactNotFound` and `MissingCredential` are raised before any
    /// request is made.
    pub async fn parse_pdf(
        &self,
        pdf_path: impl AsRef<Path>,
        overrides: &ParseOverrides,
    ) -> ClientResult<SubmitResponse> {
        let options = self.resolve_options(overrides);
        tracing::debug!(?overrides, ?options, "resolved parse parameters");
        SubmitHandler::new(&self.http_handler)
            .submit(pdf_path.as_ref(), &options, &self.config.credentials)
            .await
    }

    /// Query the current status of a job
    pub async fn get_job_status(&self, job_id: &str) -> ClientResult<JobState> {
        let state = JobsHandler::new(&self.http_handler).status(job_id).await?;
        tracing::info!(job_id, status = %state.status, "current job status");
        Ok(state)
    }

    /// Wait until the job is `completed` or `failed`
    ///
    /// # Errors
    ///
    /// `PollTimeout` when the budget runs out; any status query failure is
    /// returned unchanged.
    pub async fn wait_for_completion(
        &self,
        job_id: &str,
        poll: &PollConfig,
    ) -> ClientResult<JobState> {
        self.wait_for_completion_with_cancel(job_id, poll, &CancellationToken::new())
            .await
    }

    /// Same as [`wait_for_completion`](Self::wait_for_completion), abortable through `cancel`
    pub async fn wait_for_completion_with_cancel(
        &self,
        job_id: &str,
        poll: &PollConfig,
        cancel: &CancellationToken,
    ) -> ClientResult<JobState> {
        let jobs = JobsHandler::new(&self.http_handler);
        poll::poll_until_terminal(job_id, poll, cancel, || jobs.status(job_id)).await
    }

    /// Download the result archive of a completed job
    ///
    /// # Errors
    ///
    /// `JobNotReady` unless the job is `completed` right now, `ArtifactExists`
    /// when the archive path is taken and overwrite is off, `ArchiveCorrupt`
    /// or `Storage` when extraction fails.
    pub async fn download_result(
        &self,
        job_id: &str,
        options: &DownloadOptions,
    ) -> ClientResult<DownloadOutcome> {
        self.download_result_at(job_id, options, Local::now().naive_local())
            .await
    }

    /// Download with an explicit archive timestamp
    pub async fn download_result_at(
        &self,
        job_id: &str,
        options: &DownloadOptions,
        timestamp: chrono::NaiveDateTime,
    ) -> ClientResult<DownloadOutcome> {
        DownloadHandler::new(&self.http_handler)
            .download_result(job_id, options, timestamp)
            .await
    }

    /// List all jobs known to the service
    pub async fn list_jobs(&self) -> ClientResult<Vec<JobSummary>> {
        JobsHandler::new(&self.http_handler).list().await
    }

    /// Instance defaults with per-call overrides applied
    pub fn resolve_options(&self, overrides: &ParseOverrides) -> ParseOptions {
        self.config.defaults.merged(overrides)
    }

    /// Default polling budget of this client
    pub fn poll_config(&self) -> &PollConfig {
        &self.config.poll
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &url::Url {
        self.http_handler.base_url()
    }
}

#[cfg(test)]
mod tests;
