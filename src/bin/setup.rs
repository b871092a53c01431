//! VeTube local environment setup
//!
//! Waits for RabbitMQ and LocalStack, then provisions the upload bucket,
//! the publisher function and the notification wiring between them.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use vetube::{
    config,
    error::Result,
    models::Config,
    pipeline::{self, bootstrap},
    services::LocalStackAdmin,
};

/// VeTube - local dev environment bootstrap
#[derive(Parser, Debug)]
#[command(
    name = "vetube-setup",
    version,
    about = "Prepare RabbitMQ and LocalStack for local VeTube development"
)]
struct Cli {
    /// Optional TOML config file; environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Wait for every dependency, then provision (default workflow)
    Up,

    /// Only wait until RabbitMQ and LocalStack accept connections
    Wait,

    /// Only provision resources, assuming dependencies are up
    Provision,

    /// Validate configuration and exit
    Validate,

    /// Print the effective configuration with secrets masked
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_not_ready() {
                log::error!("{}; giving up", e);
            } else {
                log::error!("Setup failed: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Up => {
            let report = bootstrap::run_local_bootstrap(&config).await?;
            log::info!(
                "Bucket {} notifies {}",
                report.bucket,
                report.function_arn
            );
        }

        Command::Wait => {
            let probes = bootstrap::default_probes(&config)?;
            bootstrap::run_wait(&probes, &config).await?;
            log::info!("All dependencies are ready");
        }

        Command::Provision => {
            let admin = LocalStackAdmin::connect(&config.localstack).await;
            let report = pipeline::run_provision(&admin, &config).await?;
            log::info!(
                "Provisioned bucket {} after {} listing attempt(s)",
                report.bucket,
                report.bucket_checks
            );
        }

        Command::Validate => {
            // Loading already validated.
            log::info!("✓ Config OK");
        }

        Command::Info => print_info(&config)?,
    }

    Ok(())
}

fn print_info(config: &Config) -> Result<()> {
    let rendered = toml::to_string_pretty(&config.redacted())?;
    println!("{rendered}");
    Ok(())
}
