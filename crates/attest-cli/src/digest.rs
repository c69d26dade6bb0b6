//! `attest digest`: Print the SHA-256 digest of a file.
//!
//! The printed value is the same string the signing agent receives and the
//! signed archive's filename carries.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use attest_core::digest_file;

/// Digest subcommand arguments.
#[derive(Args, Debug)]
pub struct DigestArgs {
    /// File to hash.
    pub file: PathBuf,
}

/// Execute the digest subcommand.
pub fn run_digest(args: &DigestArgs) -> Result<u8> {
    let digest = digest_file(&args.file)
        .with_context(|| format!("failed to hash {}", args.file.display()))?;
    println!("{}", digest.to_hex());
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_error() {
        let args = DigestArgs {
            file: PathBuf::from("/nonexistent/attest/input.pdf"),
        };
        let err = run_digest(&args).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/attest/input.pdf"));
    }

    #[test]
    fn existing_file_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, b"abc").unwrap();
        assert_eq!(run_digest(&DigestArgs { file }).unwrap(), 0);
    }
}
