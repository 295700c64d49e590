//! SHA-256 digests as they appear in audit pack artifacts.
//!
//! Pack artifacts record digests as 64 lowercase hexadecimal characters. Files
//! are hashed by streaming them through the hasher in fixed-size chunks, so
//! arbitrarily large inputs never have to fit in memory.

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::OnceLock;

use crate::validation::ValidationError;

/// Read buffer used while hashing files. Only affects throughput.
const CHUNK_SIZE: usize = 64 * 1024;

fn sha256_hex_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9a-f]{64}$").expect("invalid regex"))
}

/// Lowercase hexadecimal SHA-256 digest (64 characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sha256Hex(String);

impl Sha256Hex {
    /// Parses a validated digest from a string.
    ///
    /// Uppercase hex is rejected: the pack format records lowercase digests
    /// and comparisons are plain string equality.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !sha256_hex_pattern().is_match(&s) {
            return Err(ValidationError::PatternMismatch {
                field: "sha256",
                value: s,
            });
        }
        Ok(Self(s))
    }

    /// Returns the digest as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_hash(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }
}

impl AsRef<str> for Sha256Hex {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Sha256Hex {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Digest and length of a hashed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigest {
    /// SHA-256 of the file contents.
    pub sha256: Sha256Hex,
    /// Number of bytes fed to the hasher.
    pub size_bytes: u64,
}

/// Streams the file at `path` through SHA-256.
///
/// # Errors
///
/// Returns the underlying [`io::Error`] if the file cannot be opened or read.
pub fn sha256_file<P: AsRef<Path>>(path: P) -> io::Result<FileDigest> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut size_bytes: u64 = 0;

    loop {
        let n = match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
        size_bytes += n as u64;
    }

    Ok(FileDigest {
        sha256: Sha256Hex::from_hash(&hasher.finalize()),
        size_bytes,
    })
}

/// Hashes an in-memory buffer.
pub fn sha256_bytes(bytes: &[u8]) -> Sha256Hex {
    Sha256Hex::from_hash(&Sha256::digest(bytes))
}
