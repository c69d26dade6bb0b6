//! `attest verify`: Submit a signed archive to the verification service.
//!
//! Exit code 0 when the service accepts the archive, 1 otherwise. The
//! service's answer is printed verbatim.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use attest_verifier::{VerificationClient, VerificationReport};

use crate::config::AppConfig;

/// Verify subcommand arguments.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Signed archive named `<stem>-digest=<digest>.zip`.
    pub archive: PathBuf,
}

/// Execute the verify subcommand.
pub async fn run_verify(args: &VerifyArgs, config: &AppConfig) -> Result<u8> {
    let client = VerificationClient::new(config.verifier_config()?)?;
    let report = VerificationReport::from_result(client.submit_archive_file(&args.archive).await);
    println!("{report}");
    Ok(if report.is_passed() { 0 } else { 1 })
}
