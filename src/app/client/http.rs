//! Core HTTP operations against the parser service
//!
//! Every call goes out once with the configured timeout. Any non-2xx answer
//! is turned into `ClientError::RemoteRequest` with the status code and the
//! (truncated) body preserved. Retry policy is the caller's business.

use reqwest::multipart::Form;
use reqwest::{Client, Response};
use serde_json::Value;
use url::Url;

use crate::constants::http;
use crate::errors::{ClientError, ClientResult};

/// HTTP operations handler bound to one service base URL
#[derive(Debug, Clone)]
pub struct HttpHandler {
    client: Client,
    base_url: Url,
}

impl HttpHandler {
    /// Creates a new HttpHandler for the given client and base URL
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Build an endpoint URL by appending path segments to the base URL
    ///
    /// Segments are percent-encoded, so a job id can never change the path
    /// structure.
    pub fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl {
                url: self.base_url.to_string(),
                error: "base URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET a JSON document
    pub async fn get_json(&self, url: &Url) -> ClientResult<Value> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url.as_str()).send().await?;
        let response = Self::check_status(response, url).await?;
        Self::decode_json(response, url).await
    }

    /// GET a binary body
    pub async fn get_bytes(&self, url: &Url) -> ClientResult<Vec<u8>> {
        tracing::debug!(%url, "GET (binary)");
        let response = self.client.get(url.as_str()).send().await?;
        let response = Self::check_status(response, url).await?;
        let bytes = response.bytes().await?;
        tracing::debug!(%url, bytes = bytes.len(), "received body");
        Ok(bytes.to_vec())
    }

    /// POST a multipart form with extra headers and decode the JSON answer
    pub async fn post_multipart(
        &self,
        url: &Url,
        headers: &[(&str, &str)],
        form: Form,
    ) -> ClientResult<Value> {
        tracing::debug!(%url, "POST (multipart)");
        let mut request = self.client.post(url.as_str()).multipart(form);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request.send().await?;
        let response = Self::check_status(response, url).await?;
        Self::decode_json(response, url).await
    }

    /// Turn a non-success status into `RemoteRequest`
    async fn check_status(response: Response, url: &Url) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let body = truncate_body(body);
        tracing::error!(%url, status = status.as_u16(), %body, "request failed");
        Err(ClientError::RemoteRequest {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    async fn decode_json(response: Response, url: &Url) -> ClientResult<Value> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse {
            url: url.to_string(),
            reason: format!("body is not valid JSON: {}", e),
        })
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

fn truncate_body(mut body: String) -> String {
    if body.len() > http::MAX_ERROR_BODY_LEN {
        let mut cut = http::MAX_ERROR_BODY_LEN;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push_str("...");
    }
    body
}
