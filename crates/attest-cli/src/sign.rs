//! # `attest sign` -- Sign a Document
//!
//! Runs one full session against the local signing agent:
//!
//! ```text
//! initialize ─▶ select ─▶ authorize ─▶ issue ─▶ download ─▶ write archive
//! ```
//!
//! The agent prompts the user to pick an identity. On success the path of
//! the written `<stem>-digest=<hex>.zip` is printed.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use attest_core::Document;
use attest_gateway::HttpExtensionGateway;
use attest_workflow::AttestationWorkflow;

use crate::config::AppConfig;

/// Sign subcommand arguments.
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Document to sign.
    pub file: PathBuf,

    /// Directory the signed archive is written to.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

/// Execute the sign subcommand against the configured agent bridge.
pub async fn run_sign(args: &SignArgs, config: &AppConfig) -> Result<u8> {
    let gateway = HttpExtensionGateway::new(config.agent_config()?)?;
    let workflow = AttestationWorkflow::new(Arc::new(gateway), config.signing_config()?);

    let path = sign_document(&workflow, &args.file, &args.out_dir).await?;
    println!("{}", path.display());
    Ok(0)
}

/// Drive `workflow` through a complete signing session for `file` and save
/// the archive under `out_dir`.
pub async fn sign_document(
    workflow: &AttestationWorkflow,
    file: &Path,
    out_dir: &Path,
) -> Result<PathBuf> {
    workflow
        .initialize()
        .await
        .context("signing agent unavailable")?;

    let document = Document::from_path(file)
        .with_context(|| format!("failed to load {}", file.display()))?;
    let digest = workflow.select_document(document);
    tracing::info!(file = %file.display(), %digest, "document selected");

    workflow
        .authorize_and_issue()
        .await
        .context("could not obtain a credential")?;
    let archive = workflow
        .download_archive()
        .await
        .context("could not build the signed archive")?;

    archive
        .write_to_dir(out_dir)
        .with_context(|| format!("failed to write archive to {}", out_dir.display()))
}
