//! Command-line interface components
//!
//! This module contains CLI-specific code for the TeddyNote Parser client,
//! including argument parsing, command handlers and wait feedback.

pub mod args;
pub mod commands;
pub mod progress;

pub use args::{
    Cli, Commands, DownloadArgs, GlobalArgs, OutputArgs, ParseArgs, StatusArgs,
};
pub use commands::{
    apply_global_overrides, build_client, handle_download, handle_health, handle_jobs,
    handle_parse, handle_status,
};
pub use progress::{cancel_on_ctrl_c, WaitSpinner};
