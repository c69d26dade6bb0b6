//! # Content Digest
//!
//! Defines `ContentDigest` and `DigestAlgorithm`, the Digest Computer of the
//! signing workflow.
//!
//! ## Invariant
//!
//! The digest is a pure function of the document bytes. The hex rendering
//! returned by [`ContentDigest::to_hex()`] is the single string form used in
//! the credential request (`credData.digest`) and in the archive filename
//! (`<base>-digest=<hex>.zip`). Nothing else may be substituted for it.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CoreError;

/// The hash algorithm used to produce a content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// SHA-256, hex encoded.
    Sha256,
}

impl DigestAlgorithm {
    /// Returns the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }

    /// The label sent to the signing agent in `credData.digestAlgo`.
    pub fn wire_label(&self) -> &'static str {
        match self {
            Self::Sha256 => "SHA-256",
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A content digest with its algorithm tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The hash algorithm that produced this digest.
    pub algorithm: DigestAlgorithm,
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Create a new content digest from raw bytes and algorithm.
    pub fn new(algorithm: DigestAlgorithm, bytes: [u8; 32]) -> Self {
        Self { algorithm, bytes }
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse a SHA-256 digest from its hex rendering.
    ///
    /// Accepts upper- or lowercase input; the parsed digest always renders
    /// back as lowercase.
    pub fn from_hex(value: &str) -> Result<Self, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidDigest {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        if value.len() != 64 {
            return Err(invalid("expected 64 hex characters"));
        }
        if !value.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid("non-hex character"));
        }

        let mut bytes = [0u8; 32];
        for (i, pair) in value.as_bytes().chunks(2).enumerate() {
            bytes[i] = (hex_value(pair[0]) << 4) | hex_value(pair[1]);
        }
        Ok(Self::new(DigestAlgorithm::Sha256, bytes))
    }
}

/// Value of an ASCII hex digit. Callers check `is_ascii_hexdigit` first.
fn hex_value(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        _ => c - b'A' + 10,
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

/// Compute the SHA-256 digest of a byte slice.
pub fn sha256_digest(data: &[u8]) -> ContentDigest {
    let hash = Sha256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::new(DigestAlgorithm::Sha256, bytes)
}

/// Compute the SHA-256 digest of everything a reader yields.
///
/// Fails with [`CoreError::Io`] if a read fails; the algorithm itself
/// has no failure modes.
pub fn sha256_reader<R: Read>(mut reader: R) -> Result<ContentDigest, CoreError> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hasher.finalize());
    Ok(ContentDigest::new(DigestAlgorithm::Sha256, bytes))
}

/// Compute the SHA-256 digest of a file on disk.
pub fn digest_file(path: impl AsRef<Path>) -> Result<ContentDigest, CoreError> {
    let file = std::fs::File::open(path)?;
    sha256_reader(std::io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic() {
        let d1 = sha256_digest(b"quarterly report");
        let d2 = sha256_digest(b"quarterly report");
        assert_eq!(d1, d2);
        assert_eq!(d1.algorithm, DigestAlgorithm::Sha256);
    }

    #[test]
    fn hex_format() {
        let hex = sha256_digest(b"x").to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn known_vectors() {
        assert_eq!(
            sha256_digest(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_digest(b"abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn reader_matches_slice() {
        let data = vec![7u8; 20_000];
        let from_reader = sha256_reader(std::io::Cursor::new(&data)).unwrap();
        assert_eq!(from_reader, sha256_digest(&data));
    }

    #[test]
    fn reader_propagates_io_error() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"))
            }
        }
        assert!(matches!(sha256_reader(Broken), Err(CoreError::Io(_))));
    }

    #[test]
    fn from_hex_accepts_uppercase_and_normalises() {
        let d = sha256_digest(b"abc");
        let parsed = ContentDigest::from_hex(&d.to_hex().to_uppercase()).unwrap();
        assert_eq!(parsed, d);
        assert_eq!(parsed.to_hex(), d.to_hex());
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(ContentDigest::from_hex("abc").is_err());
        assert!(ContentDigest::from_hex(&"zz".repeat(32)).is_err());
        assert!(ContentDigest::from_hex(&"é".repeat(32)).is_err());
    }

    #[test]
    fn from_hex_rejects_sign_prefixes() {
        assert!(ContentDigest::from_hex(&"+a".repeat(32)).is_err());
        assert!(ContentDigest::from_hex(&"-a".repeat(32)).is_err());
        assert!(ContentDigest::from_hex(&format!("+{}", "a".repeat(63))).is_err());
    }

    #[test]
    fn display_carries_algorithm_tag() {
        let s = sha256_digest(b"a").to_string();
        assert!(s.starts_with("sha256:"));
        assert_eq!(s.len(), 7 + 64);
    }

    #[test]
    fn wire_label() {
        assert_eq!(DigestAlgorithm::Sha256.wire_label(), "SHA-256");
        assert_eq!(DigestAlgorithm::Sha256.to_string(), "sha256");
    }
}
