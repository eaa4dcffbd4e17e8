//! Command handlers for the TeddyNote Parser CLI
//!
//! This module implements the command handlers that connect CLI arguments
//! to the parser client.

use std::time::Instant;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::app::{JobState, JobStatus, ParserClient, PollConfig};
use crate::cli::progress::{cancel_on_ctrl_c, WaitSpinner};
use crate::cli::{DownloadArgs, GlobalArgs, ParseArgs, StatusArgs};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Apply global CLI flags on top of the loaded configuration
pub fn apply_global_overrides(mut config: AppConfig, global: &GlobalArgs) -> AppConfig {
    if let Some(url) = &global.api_url {
        config.server.api_url = url.clone();
    }
    if let Some(key) = &global.upstage_api_key {
        config.server.upstage_api_key = Some(key.clone());
    }
    if let Some(key) = &global.openai_api_key {
        config.server.openai_api_key = Some(key.clone());
    }
    if let Some(timeout) = global.timeout {
        config.server.request_timeout_secs = timeout;
    }
    config
}

/// Build the parser client from the fully resolved configuration
pub fn build_client(config: &AppConfig) -> Result<ParserClient> {
    let parser_config = config.to_parser_config()?;
    debug!(
        base_url = %parser_config.base_url,
        credentials = ?parser_config.credentials,
        "building parser client"
    );
    Ok(ParserClient::new(parser_config)?)
}

/// Handle the health command
pub async fn handle_health(client: &ParserClient) -> Result<()> {
    let payload = client.health_check().await?;
    println!("Parser service at {} is healthy", client.base_url());
    print_json(&payload)
}

/// Handle the parse command
///
/// Submits the document and, when asked to, waits for the job and
/// retrieves its result.
pub async fn handle_parse(
    client: &ParserClient,
    config: &AppConfig,
    args: ParseArgs,
    quiet: bool,
) -> Result<()> {
    args.validate().map_err(AppError::generic)?;

    let options = client.resolve_options(&args.overrides());
    info!(
        pdf = %args.pdf.display(),
        language = %options.language,
        include_image = options.include_image,
        batch_size = options.batch_size,
        test_page = ?options.test_page,
        "submitting document"
    );

    let submitted = client.parse_pdf(&args.pdf, &args.overrides()).await?;
    println!("Submitted {} as job {}", args.pdf.display(), submitted.job_id);
    println!("  Status: {}", submitted.status);

    if !args.should_wait() {
        println!();
        println!("Check progress with: teddynote-parser status {}", submitted.job_id);
        return Ok(());
    }

    let poll = poll_config(client.poll_config(), &args);
    let state = wait_with_spinner(client, &submitted.job_id, &poll, quiet).await?;

    match state.status {
        JobStatus::Completed => {}
        JobStatus::Failed => {
            print_json(&state.body)?;
            return Err(AppError::generic(format!(
                "Job {} failed on the server",
                state.job_id
            )));
        }
        ref other => {
            return Err(AppError::generic(format!(
                "Job {} ended in unexpected status '{}'",
                state.job_id, other
            )));
        }
    }

    if !args.download {
        println!(
            "Download the result with: teddynote-parser download {}",
            state.job_id
        );
        return Ok(());
    }

    let options = args.output.apply(config.download_options());
    download(client, &state.job_id, &options).await
}

/// Handle the status command
pub async fn handle_status(client: &ParserClient, args: StatusArgs) -> Result<()> {
    let state = client.get_job_status(&args.job_id).await?;
    print_state(&state)
}

/// Handle the download command
pub async fn handle_download(
    client: &ParserClient,
    config: &AppConfig,
    args: DownloadArgs,
) -> Result<()> {
    let options = args.output.apply(config.download_options());
    download(client, &args.job_id, &options).await
}

/// Handle the jobs command
pub async fn handle_jobs(client: &ParserClient) -> Result<()> {
    let jobs = client.list_jobs().await?;
    if jobs.is_empty() {
        println!("No jobs found");
        return Ok(());
    }

    println!("{:<40} STATUS", "JOB ID");
    for job in &jobs {
        let job_id = job.job_id.as_deref().unwrap_or("-");
        println!("{:<40} {}", job_id, job.status);
    }
    println!();
    println!("{} job(s)", jobs.len());
    Ok(())
}

fn poll_config(defaults: &PollConfig, args: &ParseArgs) -> PollConfig {
    PollConfig::new(
        args.check_interval().unwrap_or(defaults.check_interval),
        args.max_attempts.unwrap_or(defaults.max_attempts),
    )
}

async fn wait_with_spinner(
    client: &ParserClient,
    job_id: &str,
    poll: &PollConfig,
    quiet: bool,
) -> Result<JobState> {
    let start = Instant::now();
    let spinner = WaitSpinner::start(
        format!(
            "Waiting for job {} (checking every {:?}, up to {:?})",
            job_id,
            poll.check_interval,
            poll.bound()
        ),
        !quiet,
    );

    let cancel = CancellationToken::new();
    let listener = cancel_on_ctrl_c(cancel.clone());
    let result = client
        .wait_for_completion_with_cancel(job_id, poll, &cancel)
        .await;
    listener.abort();

    match &result {
        Ok(state) => spinner.finish(format!(
            "Job {} {} after {:.1}s",
            job_id,
            state.status,
            start.elapsed().as_secs_f64()
        )),
        Err(e) => {
            spinner.clear();
            warn!(job_id, "wait ended without a result: {}", e);
        }
    }

    Ok(result?)
}

async fn download(
    client: &ParserClient,
    job_id: &str,
    options: &crate::app::DownloadOptions,
) -> Result<()> {
    let outcome = client.download_result(job_id, options).await?;
    println!("Saved result archive: {}", outcome.archive_path.display());
    if let Some(dir) = outcome.extract_dir {
        println!("Extracted to: {}", dir.display());
    }
    Ok(())
}

fn print_state(state: &JobState) -> Result<()> {
    println!("Job {}: {}", state.job_id, state.status);
    print_json(&state.body)
}

fn print_json(value: &Value) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::generic(format!("Failed to format response: {}", e)))?;
    println!("{}", pretty);
    Ok(())
}
