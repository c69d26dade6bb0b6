//! # Signed-Archive Naming Contract
//!
//! A signed archive is named `<base>-digest=<digest>.zip` and contains the
//! unmodified document plus `<document name>.cesr`. The digest embedded in
//! the filename is the only link between an archive and the digest the
//! credential was requested for; verifiers recover it with
//! [`parse_digest_from_filename()`].
//!
//! The filename is not authenticated. Nothing here checks that the embedded
//! digest matches the document or the credential claim inside the archive.

use crate::error::CoreError;

/// Marker that precedes the digest in an archive filename.
pub const DIGEST_MARKER: &str = "digest=";

/// Extension of the produced archive.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Extension appended to the document name for the credential entry.
pub const CREDENTIAL_EXTENSION: &str = "cesr";

/// Build the archive filename for a document base name and digest string.
pub fn build_archive_filename(base: &str, digest: &str) -> String {
    format!("{base}-{DIGEST_MARKER}{digest}.{ARCHIVE_EXTENSION}")
}

/// Name of the credential entry stored next to `document_name`.
pub fn credential_entry_name(document_name: &str) -> String {
    format!("{document_name}.{CREDENTIAL_EXTENSION}")
}

/// Recover the expected digest from an archive filename.
///
/// Only the final path component is considered. The digest is the text
/// following the last `digest=` marker up to the next `.`.
///
/// # Errors
///
/// [`CoreError::MalformedArchiveName`] if the marker is absent, the value is
/// empty, or no extension follows the value.
pub fn parse_digest_from_filename(filename: &str) -> Result<String, CoreError> {
    let file_name = filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename);

    let malformed = |reason| CoreError::MalformedArchiveName {
        filename: filename.to_string(),
        reason,
    };

    let idx = file_name
        .rfind(DIGEST_MARKER)
        .ok_or_else(|| malformed("missing digest= marker"))?;
    let rest = &file_name[idx + DIGEST_MARKER.len()..];

    let (value, _ext) = rest
        .split_once('.')
        .ok_or_else(|| malformed("missing extension after digest"))?;
    if value.is_empty() {
        return Err(malformed("empty digest value"));
    }

    Ok(value.to_string())
}
