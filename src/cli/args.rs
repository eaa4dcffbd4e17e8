//! Command-line argument parsing for the TeddyNote Parser client
//!
//! This module defines the CLI structure using clap derive macros. Values
//! given here take precedence over the config file and the environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::app::{DownloadOptions, ParseOverrides};

/// TeddyNote Parser - parse PDF documents with a remote parser service
#[derive(Parser, Debug)]
#[command(
    name = "teddynote-parser",
    version,
    about = "Submit PDFs to a TeddyNote Parser service and retrieve the results",
    long_about = "Client for the TeddyNote Parser service.
Submits PDF documents for asynchronous parsing, waits for the job under a bounded
polling budget, and downloads (and optionally unpacks) the result archive."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Parser service base URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Upstage API key
    #[arg(long, global = true, value_name = "KEY")]
    pub upstage_api_key: Option<String>,

    /// OpenAI API key
    #[arg(long, global = true, value_name = "KEY")]
    pub openai_api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the parser service is reachable
    Health,

    /// Submit a PDF for parsing
    Parse(ParseArgs),

    /// Show the status of a parse job
    Status(StatusArgs),

    /// Download the result archive of a completed job
    Download(DownloadArgs),

    /// List jobs known to the service
    Jobs,
}

/// Arguments for the parse command
#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// PDF file to parse
    #[arg(value_name = "PDF")]
    pub pdf: PathBuf,

    /// Document language
    #[arg(long)]
    pub language: Option<String>,

    /// Extract images from the document
    #[arg(long, value_name = "BOOL")]
    pub include_image: Option<bool>,

    /// Pages per processing batch
    #[arg(long)]
    pub batch_size: Option<u32>,

    /// Only process the first N pages
    #[arg(long, value_name = "N")]
    pub test_page: Option<u32>,

    /// Wait for the job to finish
    #[arg(short, long)]
    pub wait: bool,

    /// Seconds between status checks while waiting
    #[arg(long, value_name = "SECS")]
    pub check_interval: Option<u64>,

    /// Maximum number of status checks while waiting
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Download the result once the job completes (implies --wait)
    #[arg(short, long)]
    pub download: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the status command
#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    /// Job identifier returned by `parse`
    #[arg(value_name = "JOB_ID")]
    pub job_id: String,
}

/// Arguments for the download command
#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    /// Job identifier returned by `parse`
    #[arg(value_name = "JOB_ID")]
    pub job_id: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Where and how result archives are stored
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Directory for result archives
    #[arg(long, value_name = "DIR")]
    pub save_dir: Option<PathBuf>,

    /// Unpack the archive after download
    #[arg(short, long)]
    pub extract: bool,

    /// Replace an existing archive with the same name
    #[arg(long)]
    pub overwrite: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level, falling back to the configured level
    pub fn log_level(&self, configured: &str) -> String {
        if self.global.quiet {
            "error".to_string()
        } else if self.global.debug {
            "debug".to_string()
        } else if self.global.verbose {
            "info".to_string()
        } else {
            configured.to_string()
        }
    }
}

impl ParseArgs {
    /// Reject values the service would refuse
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == Some(0) {
            return Err("Batch size must be greater than 0".to_string());
        }

        if self.test_page == Some(0) {
            return Err("--test-page must be greater than 0".to_string());
        }

        if self.max_attempts == Some(0) {
            return Err("--max-attempts must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Per-call parameter overrides
    pub fn overrides(&self) -> ParseOverrides {
        ParseOverrides {
            language: self.language.clone(),
            include_image: self.include_image,
            batch_size: self.batch_size,
            test_page: self.test_page,
        }
    }

    /// Whether the command should wait for the job at all
    pub fn should_wait(&self) -> bool {
        self.wait || self.download
    }

    /// Check interval override
    pub fn check_interval(&self) -> Option<Duration> {
        self.check_interval.map(Duration::from_secs)
    }
}

impl OutputArgs {
    /// Apply these flags on top of the configured download defaults
    pub fn apply(&self, defaults: DownloadOptions) -> DownloadOptions {
        DownloadOptions {
            save_dir: self.save_dir.clone().unwrap_or(defaults.save_dir),
            extract: self.extract || defaults.extract,
            overwrite: self.overwrite || defaults.overwrite,
        }
    }
}
