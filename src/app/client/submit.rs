//! Document submission
//!
//! Preconditions are checked before anything goes on the wire: the input
//! file must exist and both API keys must be configured. The document is
//! read into memory up front, so no file handle outlives this call on any
//! path.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use crate::app::client::http::HttpHandler;
use crate::app::models::{JobStatus, ParseOptions, SubmitResponse};
use crate::auth::ApiCredentials;
use crate::constants::{endpoints, headers};
use crate::errors::{ClientError, ClientResult};

/// Submission handler
pub struct SubmitHandler<'a> {
    http_handler: &'a HttpHandler,
}

impl<'a> SubmitHandler<'a> {
    pub fn new(http_handler: &'a HttpHandler) -> Self {
        Self { http_handler }
    }

    /// Upload `pdf_path` with `options` and return the issued job
    ///
    /// # Errors
    ///
    /// - `ArtifactNotFound` if the file is missing or unreadable
    /// - `MissingCredential` if either API key is absent
    /// - `RemoteRequest` / `Http` for transport failures
    /// - `InvalidResponse` if the answer carries no `job_id`
    pub async fn submit(
        &self,
        pdf_path: &Path,
        options: &ParseOptions,
        credentials: &ApiCredentials,
    ) -> ClientResult<SubmitResponse> {
        let is_file = tokio::fs::metadata(pdf_path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            tracing::error!(path = %pdf_path.display(), "input file not found");
            return Err(ClientError::ArtifactNotFound {
                path: pdf_path.to_path_buf(),
            });
        }

        let keys = credentials.require()?;

        let content = tokio::fs::read(pdf_path).await.map_err(|e| {
            tracing::error!(path = %pdf_path.display(), error = %e, "failed to read input file");
            ClientError::ArtifactNotFound {
                path: pdf_path.to_path_buf(),
            }
        })?;

        let file_name = pdf_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());

        let form = build_form(file_name.clone(), content, options)?;

        info!(
            file = %file_name,
            language = %options.language,
            include_image = options.include_image,
            batch_size = options.batch_size,
            test_page = ?options.test_page,
            "submitting parse request"
        );

        let url = self.http_handler.endpoint(&[endpoints::PARSE])?;
        let body = self
            .http_handler
            .post_multipart(
                &url,
                &[
                    (headers::UPSTAGE_API_KEY, keys.upstage),
                    (headers::OPENAI_API_KEY, keys.openai),
                ],
                form,
            )
            .await?;

        let job_id = body
            .get("job_id")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| ClientError::InvalidResponse {
                url: url.to_string(),
                reason: "response has no 'job_id' field".to_string(),
            })?;
        let status = JobStatus::from_payload(&body);

        info!(job_id = %job_id, status = %status, "parse job started");
        Ok(SubmitResponse {
            job_id,
            status,
            body,
        })
    }
}

/// Multipart body: the document part followed by the option fields
fn build_form(file_name: String, content: Vec<u8>, options: &ParseOptions) -> ClientResult<Form> {
    let part = Part::bytes(content)
        .file_name(file_name)
        .mime_str(headers::PDF_MIME)?;

    let mut form = Form::new().part(headers::FILE_FIELD, part);
    for (name, value) in options.form_fields() {
        debug!(field = name, value = %value, "adding form field");
        form = form.text(name, value);
    }
    if options.test_page.is_none() {
        debug!("test_page unset, field omitted so the service processes all pages");
    }
    Ok(form)
}
