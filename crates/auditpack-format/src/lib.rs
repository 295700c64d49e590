//! Artifact formats and digest primitives for proof-first audit packs.
//!
//! An audit pack is a directory holding three text artifacts:
//! `manifest.sha256` (checksum listing), `manifest.json` (input inventory)
//! and `run_meta.json` (run summary). This crate owns the data model for
//! those artifacts and the primitives used to check them: streaming SHA-256
//! hashing, LF-only text loading, and relative path validation.
//!
//! Nothing here decides whether a pack is valid; that is the job of
//! `auditpack-verify`.
//!
#![deny(missing_docs)]

/// Checksum listing (`manifest.sha256`) parsing.
pub mod checksums;
/// SHA-256 digest newtype and streaming file hashing.
pub mod digest;
/// Fixed artifact names inside an audit pack.
pub mod layout;
/// Manifest and run-metadata document types.
pub mod manifest;
/// LF-only UTF-8 text loading.
pub mod text;
/// Validation helpers for digests and relative paths.
pub mod validation;

pub use checksums::{ChecksumListing, ChecksumRecord, ListingError};
pub use digest::{sha256_bytes, sha256_file, FileDigest, Sha256Hex};
pub use layout::{CHECKSUM_FILE, MANIFEST_FILE, REQUIRED_TOOL, RUN_META_FILE};
pub use manifest::{Manifest, ManifestEntry, RunMeta, Summary};
pub use text::{read_lf_text, TextError};
pub use validation::{validate_listing_name, validate_rel_path, ValidationError};
