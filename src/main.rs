//! TeddyNote Parser CLI application
//!
//! Command-line interface for submitting PDFs to a TeddyNote Parser service,
//! tracking parse jobs and retrieving their result archives.

use std::process;

use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use teddynote_parser_client::cli::{
    apply_global_overrides, build_client, handle_download, handle_health, handle_jobs,
    handle_parse, handle_status, Cli, Commands,
};
use teddynote_parser_client::config::AppConfig;
use teddynote_parser_client::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();

    let config = AppConfig::load(cli.global.config.clone())
        .await?
        .with_env_overrides();
    let config = apply_global_overrides(config, &cli.global);

    init_logging(&cli, &config.logging.level);

    info!("TeddyNote Parser client v{} starting", env!("CARGO_PKG_VERSION"));
    config.log_source();

    let client = build_client(&config)?;
    let quiet = cli.global.quiet;

    match cli.command {
        Commands::Health => {
            debug!("Executing health command");
            handle_health(&client).await
        }
        Commands::Parse(args) => {
            debug!("Executing parse command");
            handle_parse(&client, &config, args, quiet).await
        }
        Commands::Status(args) => {
            debug!("Executing status command");
            handle_status(&client, args).await
        }
        Commands::Download(args) => {
            debug!("Executing download command");
            handle_download(&client, &config, args).await
        }
        Commands::Jobs => {
            debug!("Executing jobs command");
            handle_jobs(&client).await
        }
    }
}

/// Initialize logging based on CLI verbosity settings and the config file
fn init_logging(cli: &Cli, configured_level: &str) {
    let log_level = cli.log_level(configured_level);

    let mut filter = EnvFilter::from_default_env();
    match format!("teddynote_parser_client={}", log_level).parse() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("Ignoring invalid log level '{}': {}", log_level, e),
    }

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.debug)
        .with_writer(std::io::stderr)
        .init();

    if cli.global.debug {
        info!("Debug logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
