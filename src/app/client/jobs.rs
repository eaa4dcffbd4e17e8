//! Read-only job endpoints: health, status and the job listing

use serde_json::Value;
use tracing::{debug, info};

use crate::app::client::http::HttpHandler;
use crate::app::models::{JobState, JobSummary};
use crate::constants::endpoints;
use crate::errors::{ClientError, ClientResult};

/// Read-only job queries
pub struct JobsHandler<'a> {
    http_handler: &'a HttpHandler,
}

impl<'a> JobsHandler<'a> {
    pub fn new(http_handler: &'a HttpHandler) -> Self {
        Self { http_handler }
    }

    /// `GET /health`
    pub async fn health(&self) -> ClientResult<Value> {
        let url = self.http_handler.endpoint(&[endpoints::HEALTH])?;
        let body = self.http_handler.get_json(&url).await?;
        info!("parser service is healthy");
        Ok(body)
    }

    /// `GET /status/{job_id}`
    pub async fn status(&self, job_id: &str) -> ClientResult<JobState> {
        let url = self.http_handler.endpoint(&[endpoints::STATUS, job_id])?;
        let body = self.http_handler.get_json(&url).await?;
        let state = JobState::from_payload(job_id, body);
        debug!(job_id, status = %state.status, "fetched job status");
        Ok(state)
    }

    /// `GET /jobs`
    pub async fn list(&self) -> ClientResult<Vec<JobSummary>> {
        let url = self.http_handler.endpoint(&[endpoints::JOBS])?;
        let body = self.http_handler.get_json(&url).await?;
        let jobs: Vec<JobSummary> =
            serde_json::from_value(body).map_err(|e| ClientError::InvalidResponse {
                url: url.to_string(),
                reason: format!("expected a list of jobs: {}", e),
            })?;
        info!(count = jobs.len(), "listed jobs");
        Ok(jobs)
    }
}
