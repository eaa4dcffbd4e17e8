//! Data models for the TeddyNote Parser client
//!
//! This module defines the job status model, parse request parameters and
//! the response and result types handed back to callers.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::defaults;

/// Status of a parse job as reported by the service
///
/// Only `completed` and `failed` are terminal. Known in-progress values map
/// to `Pending`; anything else is kept verbatim in `Unrecognized` so that it
/// shows up in logs and errors instead of disappearing into "still running".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    /// Job accepted or running (`pending`, `queued`, `processing`, `running`)
    Pending(String),
    /// Job finished and its result archive can be downloaded
    Completed,
    /// Job finished without a result
    Failed,
    /// Any other value; treated as non-terminal
    Unrecognized(String),
}

impl JobStatus {
    /// Placeholder used when a status payload has no `status` field
    pub const MISSING: &'static str = "unknown";

    /// Parse a wire status string
    pub fn parse(raw: &str) -> Self {
        match raw {
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            "pending" | "queued" | "processing" | "running" => Self::Pending(raw.to_string()),
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Original wire string
    pub fn as_str(&self) -> &str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Pending(raw) | Self::Unrecognized(raw) => raw,
        }
    }

    /// Whether polling stops at this status
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Extract the status from a JSON payload, falling back to [`JobStatus::MISSING`]
    pub fn from_payload(payload: &Value) -> Self {
        Self::parse(
            payload
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or(Self::MISSING),
        )
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse parameters sent with every submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Document language (e.g., "Korean")
    pub language: String,
    /// Include extracted images in the result archive
    pub include_image: bool,
    /// Number of pages processed per batch
    pub batch_size: u32,
    /// Only process the first N pages; `None` processes the whole document
    pub test_page: Option<u32>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            language: defaults::LANGUAGE.to_string(),
            include_image: defaults::INCLUDE_IMAGE,
            batch_size: defaults::BATCH_SIZE,
            test_page: None,
        }
    }
}

impl ParseOptions {
    /// Apply per-call overrides on top of these defaults
    pub fn merged(&self, overrides: &ParseOverrides) -> ParseOptions {
        ParseOptions {
            language: overrides
                .language
                .clone()
                .unwrap_or_else(|| self.language.clone()),
            include_image: overrides.include_image.unwrap_or(self.include_image),
            batch_size: overrides.batch_size.unwrap_or(self.batch_size),
            test_page: overrides.test_page.or(self.test_page),
        }
    }

    /// Multipart form fields, in wire order
    ///
    /// `test_page` is left out entirely when unset; the service reads a
    /// missing field as "all pages".
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("language", self.language.clone()),
            ("include_image", self.include_image.to_string()),
            ("batch_size", self.batch_size.to_string()),
        ];
        if let Some(test_page) = self.test_page {
            fields.push(("test_page", test_page.to_string()));
        }
        fields
    }
}

/// Per-call parse parameters; unset fields fall back to the client defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOverrides {
    pub language: Option<String>,
    pub include_image: Option<bool>,
    pub batch_size: Option<u32>,
    pub test_page: Option<u32>,
}

/// Response to a successful submission
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitResponse {
    /// Identifier issued by the service
    pub job_id: String,
    /// Initial status reported alongside the id
    pub status: JobStatus,
    /// Full response body
    pub body: Value,
}

/// A single status observation of a job
#[derive(Debug, Clone, PartialEq)]
pub struct JobState {
    pub job_id: String,
    pub status: JobStatus,
    /// Full status payload; service-defined metadata is not interpreted
    pub body: Value,
}

impl JobState {
    /// Build from a status payload
    pub fn from_payload(job_id: impl Into<String>, body: Value) -> Self {
        Self {
            job_id: job_id.into(),
            status: JobStatus::from_payload(&body),
            body,
        }
    }
}

/// Entry of the job listing
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobSummary {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default = "missing_status")]
    pub status: JobStatus,
    /// Remaining service-defined fields
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

fn missing_status() -> JobStatus {
    JobStatus::parse(JobStatus::MISSING)
}

/// Options for result retrieval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Directory receiving the archive (created if absent)
    pub save_dir: PathBuf,
    /// Unpack the archive into `{save_dir}/{job_id}`
    pub extract: bool,
    /// Replace an existing archive at the computed path
    pub overwrite: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from(defaults::SAVE_DIR),
            extract: false,
            overwrite: false,
        }
    }
}

/// Where a retrieved result ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// Path of the stored ZIP archive
    pub archive_path: PathBuf,
    /// Extraction directory; only set when extraction was requested
    pub extract_dir: Option<PathBuf>,
}
