//! Building, persisting, and reading signed archives.

use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use attest_core::{
    build_archive_filename, credential_entry_name, ContentDigest, Document, MAX_DOCUMENT_BYTES,
};

use crate::error::PackError;

/// Suffix of the temporary file written before the final rename.
pub const PARTIAL_SUFFIX: &str = ".partial";

/// Largest decompressed entry [`read_archive`] accepts: the document limit
/// plus 1 MiB for the credential.
pub const MAX_ENTRY_BYTES: u64 = MAX_DOCUMENT_BYTES + 1024 * 1024;

/// A packaged archive held in memory, ready to be saved or submitted.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedArchive {
    /// `<stem>-digest=<hex>.zip`
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for SignedArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedArchive")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl SignedArchive {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Save the archive under `dir`, creating the directory if needed.
    ///
    /// The bytes go to `<filename>.partial` first and are renamed into place
    /// once fully written. On any failure the partial file is removed.
    /// Returns the final path.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf, PackError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let final_path = dir.join(&self.filename);
        let partial_path = dir.join(format!("{}{PARTIAL_SUFFIX}", self.filename));

        let saved = write_synced(&partial_path, &self.bytes)
            .and_then(|()| std::fs::rename(&partial_path, &final_path));
        if let Err(e) = saved {
            if let Err(cleanup) = std::fs::remove_file(&partial_path) {
                tracing::debug!(
                    path = %partial_path.display(),
                    error = %cleanup,
                    "partial archive not removed"
                );
            }
            return Err(e.into());
        }

        tracing::info!(path = %final_path.display(), size = self.bytes.len(), "signed archive saved");
        Ok(final_path)
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default())
        .unix_permissions(0o644)
}

/// Package a document and its serialized credential.
///
/// `digest` must be the digest the credential was issued over; it is
/// embedded in the archive filename. The archive is assembled entirely in
/// memory and only returned once both entries have been written.
pub fn package(
    document: &Document,
    credential: &[u8],
    digest: &ContentDigest,
) -> Result<SignedArchive, PackError> {
    let filename = build_archive_filename(document.stem(), &digest.to_hex());
    let credential_name = credential_entry_name(document.name());

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file(document.name(), entry_options())?;
    writer.write_all(document.bytes())?;
    writer.start_file(credential_name.as_str(), entry_options())?;
    writer.write_all(credential)?;
    let bytes = writer.finish()?.into_inner();

    tracing::debug!(
        filename = %filename,
        document = document.name(),
        credential_len = credential.len(),
        archive_len = bytes.len(),
        "packaged signed archive"
    );
    Ok(SignedArchive { filename, bytes })
}

// ─── Reading ─────────────────────────────────────────────────────────

/// The two payloads recovered from a signed archive.
#[derive(Clone, PartialEq, Eq)]
pub struct ArchiveContents {
    pub document_name: String,
    pub document: Vec<u8>,
    pub credential_name: String,
    pub credential: Vec<u8>,
}

impl std::fmt::Debug for ArchiveContents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveContents")
            .field("document_name", &self.document_name)
            .field("document_len", &self.document.len())
            .field("credential_name", &self.credential_name)
            .field("credential_len", &self.credential.len())
            .finish()
    }
}

impl ArchiveContents {
    /// Entry names in archive order.
    pub fn entry_names(&self) -> [&str; 2] {
        [self.document_name.as_str(), self.credential_name.as_str()]
    }
}

/// Read a signed archive back into its document and credential.
///
/// The archive must hold exactly two file entries where one is named
/// `<other>.cesr`. Entry order is not enforced on read. Entries larger than
/// [`MAX_ENTRY_BYTES`] once decompressed are rejected without being fully read.
pub fn read_archive(bytes: &[u8]) -> Result<ArchiveContents, PackError> {
    read_archive_limited(bytes, MAX_ENTRY_BYTES)
}

fn read_archive_limited(bytes: &[u8], limit: u64) -> Result<ArchiveContents, PackError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let name = file.name().to_string();
        if file.size() > limit {
            return Err(PackError::EntryTooLarge { name, limit });
        }
        // The declared size is attacker-controlled; bound the actual read too.
        let mut payload = Vec::new();
        file.by_ref().take(limit + 1).read_to_end(&mut payload)?;
        if payload.len() as u64 > limit {
            return Err(PackError::EntryTooLarge { name, limit });
        }
        entries.push((name, payload));
    }

    if entries.len() != 2 {
        return Err(PackError::UnexpectedLayout {
            reason: format!("expected 2 entries, found {}", entries.len()),
        });
    }

    let (doc_idx, cred_idx) = if entries[1].0 == credential_entry_name(&entries[0].0) {
        (0, 1)
    } else if entries[0].0 == credential_entry_name(&entries[1].0) {
        (1, 0)
    } else {
        return Err(PackError::UnexpectedLayout {
            reason: format!(
                "no credential entry matches document: {:?}, {:?}",
                entries[0].0, entries[1].0
            ),
        });
    };

    let (credential_name, credential) = std::mem::take(&mut entries[cred_idx]);
    let (document_name, document) = std::mem::take(&mut entries[doc_idx]);
    Ok(ArchiveContents {
        document_name,
        document,
        credential_name,
        credential,
    })
}
