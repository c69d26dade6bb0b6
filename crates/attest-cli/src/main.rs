//! # attest CLI entry point
//!
//! Parses command-line arguments, loads layered configuration, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use attest_cli::config::AppConfig;
use attest_cli::digest::{run_digest, DigestArgs};
use attest_cli::health::run_health;
use attest_cli::inspect::{run_inspect, InspectArgs};
use attest_cli::sign::{run_sign, SignArgs};
use attest_cli::verify::{run_verify, VerifyArgs};

/// Document attestation toolkit.
///
/// Signs documents with a data-attestation credential issued by the local
/// signing agent and submits the resulting archives for verification.
#[derive(Parser, Debug)]
#[command(name = "attest", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the SHA-256 digest of a file.
    Digest(DigestArgs),

    /// Sign a document and write the signed archive.
    Sign(SignArgs),

    /// Submit a signed archive for verification.
    Verify(VerifyArgs),

    /// Show the digest and entries of a signed archive.
    Inspect(InspectArgs),

    /// Check that the verification service is up.
    Health,
}

fn log_filter(verbose: u8, level: Option<&str>) -> EnvFilter {
    let configured = level
        .filter(|l| !l.trim().is_empty())
        .and_then(|l| EnvFilter::try_new(l).ok());
    if let Some(filter) = configured {
        return filter;
    }
    match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref());
    let level = config.as_ref().ok().and_then(|c| c.log_level());
    let filter = log_filter(cli.verbose, level.as_deref());

    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(2);
        }
    };
    tracing::debug!(?config, "configuration loaded");

    let result = match &cli.command {
        Commands::Digest(args) => run_digest(args),
        Commands::Sign(args) => run_sign(args, &config).await,
        Commands::Verify(args) => run_verify(args, &config).await,
        Commands::Inspect(args) => run_inspect(args),
        Commands::Health => run_health(&config).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
