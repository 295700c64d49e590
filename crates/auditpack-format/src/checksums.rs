//! Checksum listing (`manifest.sha256`).
//!
//! Each non-blank line not starting with `#` has the form
//! `<sha256 hex><whitespace><file name>`, the same shape `sha256sum`
//! produces. Only the first run of whitespace separates the two fields, so
//! file names may contain spaces.

use std::collections::HashSet;
use thiserror::Error;

use crate::digest::Sha256Hex;
use crate::validation::{validate_listing_name, ValidationError};

/// Errors raised while parsing a checksum listing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingError {
    /// A line has no whitespace separating digest and file name.
    #[error("line {line}: expected '<sha256> <file name>'")]
    MalformedLine {
        /// 1-based line number.
        line: usize,
    },
    /// The digest field is not 64 lowercase hex characters.
    #[error("line {line}: {source}")]
    InvalidDigest {
        /// 1-based line number.
        line: usize,
        /// Underlying pattern failure.
        source: ValidationError,
    },
    /// The file name could resolve outside the pack directory.
    #[error("line {line}: {source}")]
    UnsafeName {
        /// 1-based line number.
        line: usize,
        /// Underlying path failure.
        source: ValidationError,
    },
    /// The same file name is listed more than once.
    #[error("line {line}: '{name}' is already listed on line {first_line}")]
    DuplicateName {
        /// 1-based line number of the repeated entry.
        line: usize,
        /// Line where the name first appeared.
        first_line: usize,
        /// Repeated file name.
        name: String,
    },
    /// The listing contains no entries at all.
    #[error("listing has no entries")]
    Empty,
}

/// One entry of the checksum listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumRecord {
    /// File name relative to the pack directory.
    pub file_name: String,
    /// Digest the file is expected to have.
    pub expected: Sha256Hex,
    /// 1-based line number the record came from.
    pub line: usize,
}

/// Parsed checksum listing, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumListing {
    records: Vec<ChecksumRecord>,
}

impl ChecksumListing {
    /// Parses listing text.
    ///
    /// Blank lines and `#` comment lines are skipped. Leading whitespace before the digest and
    /// trailing whitespace after the file name are ignored.
    pub fn parse(text: &str) -> Result<Self, ListingError> {
        let mut records: Vec<ChecksumRecord> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let (digest, name) = trimmed
                .split_once(char::is_whitespace)
                .map(|(d, n)| (d, n.trim()))
                .filter(|(_, n)| !n.is_empty())
                .ok_or(ListingError::MalformedLine { line })?;

            let expected = Sha256Hex::parse(digest)
                .map_err(|source| ListingError::InvalidDigest { line, source })?;
            validate_listing_name(name)
                .map_err(|source| ListingError::UnsafeName { line, source })?;

            if !seen.insert(name) {
                let first_line = records
                    .iter()
                    .find(|r| r.file_name == name)
                    .map(|r| r.line)
                    .unwrap_or(line);
                return Err(ListingError::DuplicateName {
                    line,
                    first_line,
                    name: name.to_string(),
                });
            }

            records.push(ChecksumRecord {
                file_name: name.to_string(),
                expected,
                line,
            });
        }

        if records.is_empty() {
            return Err(ListingError::Empty);
        }
        Ok(Self { records })
    }

    /// Records in listing order.
    pub fn records(&self) -> &[ChecksumRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a successfully parsed listing.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
