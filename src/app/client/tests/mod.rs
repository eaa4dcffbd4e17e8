//! Client tests against a mock parser service
//!
//! Every test spins up its own `wiremock::MockServer`. Call counts are
//! asserted with `.expect(n)`, which the server verifies when dropped.


use std::io::{Cursor, Write};
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{ParserClient, ParserConfig, PollConfig};
use crate::auth::ApiCredentials;

pub(super) const UPSTAGE_KEY: &str = "test-upstage-api-key";
pub(super) const OPENAI_KEY: &str = "test-openai-api-key";

pub(super) fn test_credentials() -> ApiCredentials {
    ApiCredentials::new(Some(UPSTAGE_KEY.to_string()), Some(OPENAI_KEY.to_string()))
}

pub(super) fn client_with(server: &MockServer, credentials: ApiCredentials) -> ParserClient {
    ParserClient::new(ParserConfig::new(server.uri(), credentials)).unwrap()
}

pub(super) fn client_for(server: &MockServer) -> ParserClient {
    client_with(server, test_credentials())
}

pub(super) fn fast_poll(max_attempts: u32) -> PollConfig {
    PollConfig::new(Duration::from_millis(10), max_attempts)
}

pub(super) async fn mount_status(server: &MockServer, job_id: &str, status: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/status/{}", job_id)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "job_id": job_id, "status": status })),
        )
        .mount(server)
        .await;
}

pub(super) fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "timestamp": "2023-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Health checks work without credentials
    let client = client_with(&server, ApiCredentials::default());
    let result = client.health_check().await.unwrap();
    assert_eq!(result["status"], "ok");
}

#[tokio::test]
async fn test_get_job_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/test-job-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "test-job-id",
            "status": "completed",
            "pages": 12
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let state = client.get_job_status("test-job-id").await.unwrap();
    assert_eq!(state.job_id, "test-job-id");
    assert!(state.status.is_completed());
    assert_eq!(state.body["pages"], 12);
}

#[tokio::test]
async fn test_list_jobs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "job_id": "a", "status": "completed" },
            { "job_id": "b", "status": "processing", "filename": "b.pdf" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let jobs = client.list_jobs().await.unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].job_id.as_deref(), Some("a"));
    assert!(!jobs[1].status.is_terminal());
    assert_eq!(jobs[1].extra["filename"], "b.pdf");
}

#[tokio::test]
async fn test_list_jobs_rejects_non_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "jobs": [] })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(
        client.list_jobs().await,
        Err(crate::errors::ClientError::InvalidResponse { .. })
    ));
}

#[test]
fn test_client_rejects_invalid_base_url() {
    let result = ParserClient::new(ParserConfig::new("::not-a-url::", test_credentials()));
    assert!(result.is_err());
}
