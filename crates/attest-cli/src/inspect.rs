//! `attest inspect`: Show what a signed archive claims and contains.
//!
//! Prints the digest carried by the filename and the two entries. Nothing
//! is verified: the digest is not recomputed and the credential is not
//! checked.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use attest_core::parse_digest_from_filename;
use attest_pack::read_archive;

/// Inspect subcommand arguments.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Signed archive to inspect.
    pub archive: PathBuf,
}

/// Summary of a signed archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub filename: String,
    pub filename_digest: String,
    pub document_name: String,
    pub document_size: usize,
    pub credential_name: String,
    pub credential_size: usize,
}

impl std::fmt::Display for ArchiveSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "archive: {}", self.filename)?;
        writeln!(f, "digest:  {}", self.filename_digest)?;
        writeln!(f, "entries:")?;
        writeln!(f, "  {}  ({} bytes)", self.document_name, self.document_size)?;
        write!(f, "  {}  ({} bytes)", self.credential_name, self.credential_size)
    }
}

/// Read and summarise a signed archive.
pub fn inspect_archive(path: &Path) -> Result<ArchiveSummary> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no file name", path.display()))?
        .to_string();
    let filename_digest = parse_digest_from_filename(&filename)?;

    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let contents = read_archive(&bytes).with_context(|| format!("{filename} is not a signed archive"))?;

    Ok(ArchiveSummary {
        filename,
        filename_digest,
        document_size: contents.document.len(),
        document_name: contents.document_name,
        credential_size: contents.credential.len(),
        credential_name: contents.credential_name,
    })
}

/// Execute the inspect subcommand.
pub fn run_inspect(args: &InspectArgs) -> Result<u8> {
    let summary = inspect_archive(&args.archive)?;
    println!("{summary}");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_without_digest_is_rejected_before_reading() {
        let err = inspect_archive(Path::new("/nonexistent/report.zip")).unwrap_err();
        assert!(format!("{err:#}").contains("digest"));
    }

    #[test]
    fn summary_display() {
        let summary = ArchiveSummary {
            filename: "a-digest=abc.zip".into(),
            filename_digest: "abc".into(),
            document_name: "a.txt".into(),
            document_size: 3,
            credential_name: "a.txt.cesr".into(),
            credential_size: 10,
        };
        let text = summary.to_string();
        assert!(text.starts_with("archive: a-digest=abc.zip\ndigest:  abc\n"));
        assert!(text.ends_with("a.txt.cesr  (10 bytes)"));
    }
}
