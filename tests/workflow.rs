//! End-to-end workflow against a mock parser service
//!
//! Submit a document, wait for the job, download and unpack the result.

use std::io::{Cursor, Write};
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use teddynote_parser_client::prelude::*;

fn result_zip() -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("job-42.md", zip::write::FileOptions::default())
        .unwrap();
    writer.write_all(b"# Quarterly report\n").unwrap();
    writer
        .start_file("images/page1.png", zip::write::FileOptions::default())
        .unwrap();
    writer.write_all(b"png").unwrap();
    writer.finish().unwrap().into_inner()
}

fn client_for(server: &MockServer, credentials: ApiCredentials) -> ParserClient {
    let mut config = ParserConfig::new(server.uri(), credentials);
    config.poll = PollConfig::new(Duration::from_millis(10), 10);
    ParserClient::new(config).unwrap()
}

fn credentials() -> ApiCredentials {
    ApiCredentials::new(Some("up-key".to_string()), Some("oa-key".to_string()))
}

#[tokio::test]
async fn test_submit_wait_download_extract() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/parse"))
        .and(header("X-UPSTAGE-API-KEY", "up-key"))
        .and(header("X-OPENAI-API-KEY", "oa-key"))
        .and(body_string_contains("filename=\"report.pdf\""))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "job_id": "job-42",
                "status": "pending"
            })),
        )
        .expect(1)
        .mount(&server)
        .await;

    // First query reports progress, every later one completion
    Mock::given(method("GET"))
        .and(path("/status/job-42"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "job_id": "job-42",
                "status": "processing"
            })),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status/job-42"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "job_id": "job-42",
                "status": "completed",
                "pages": 12
            })),
        )
        .mount(&server)
        .await;

    let zip = result_zip();
    Mock::given(method("GET"))
        .and(path("/download/job-42"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(zip.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let pdf = temp_dir.path().join("report.pdf");
    std::fs::write(&pdf, b"%PDF-1.4 test document").unwrap();

    let client = client_for(&server, credentials());

    let submitted = client
        .parse_pdf(&pdf, &ParseOverrides::default())
        .await
        .unwrap();
    assert_eq!(submitted.job_id, "job-42");
    assert_eq!(submitted.status, JobStatus::parse("pending"));
    assert!(!submitted.status.is_terminal());

    let state = client
        .wait_for_completion(&submitted.job_id, client.poll_config())
        .await
        .unwrap();
    assert!(state.status.is_completed());
    assert_eq!(state.body["pages"], 12);

    let options = DownloadOptions {
        save_dir: temp_dir.path().join("results"),
        extract: true,
        overwrite: false,
    };
    let outcome = client
        .download_result(&submitted.job_id, &options)
        .await
        .unwrap();

    let file_name = outcome
        .archive_path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .into_owned();
    assert!(file_name.starts_with("job-42_"));
    assert!(file_name.ends_with(".zip"));
    assert_eq!(std::fs::read(&outcome.archive_path).unwrap(), zip);

    let extract_dir = outcome.extract_dir.unwrap();
    assert_eq!(extract_dir, options.save_dir.join("job-42"));
    assert_eq!(
        std::fs::read_to_string(extract_dir.join("job-42.md")).unwrap(),
        "# Quarterly report\n"
    );
    assert!(extract_dir.join("images").join("page1.png").is_file());
}

#[tokio::test]
async fn test_missing_document_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/parse"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let client = client_for(&server, credentials());
    let result = client
        .parse_pdf(temp_dir.path().join("absent.pdf"), &ParseOverrides::default())
        .await;

    let err = AppError::from(result.unwrap_err());
    assert_eq!(err.category(), "precondition");
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_failed_job_cannot_be_downloaded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/job-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "job-7",
            "status": "failed",
            "error": "unreadable document"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/download/job-7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let client = client_for(&server, credentials());

    let state = client
        .wait_for_completion("job-7", client.poll_config())
        .await
        .unwrap();
    assert_eq!(state.status, JobStatus::Failed);

    let options = DownloadOptions {
        save_dir: temp_dir.path().to_path_buf(),
        ..DownloadOptions::default()
    };
    let result = client.download_result("job-7", &options).await;
    assert!(matches!(
        result,
        Err(ClientError::JobNotReady { ref status, .. }) if status == "failed"
    ));
}

#[tokio::test]
async fn test_config_file_drives_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "job_id": "a", "status": "completed" },
            { "job_id": "b", "status": "queued", "filename": "b.pdf" },
            { "status": "running" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("parser.toml");
    std::fs::write(
        &config_path,
        format!("[server]\napi_url = \"{}/\"\n\n[poll]\nmax_attempts = 5\n", server.uri()),
    )
    .unwrap();

    let config = AppConfig::load(Some(config_path)).await.unwrap();
    let client = ParserClient::new(config.to_parser_config().unwrap()).unwrap();
    assert_eq!(client.poll_config().max_attempts, 5);

    let jobs = client.list_jobs().await.unwrap();
    assert_eq!(jobs.len(), 3);
    assert_eq!(jobs[0].status, JobStatus::Completed);
    assert_eq!(jobs[1].extra["filename"], "b.pdf");
    assert_eq!(jobs[2].job_id, None);
    assert!(!jobs[2].status.is_terminal());
}
