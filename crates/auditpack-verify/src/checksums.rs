//! Stage A: pack artifacts match the checksum listing.

use auditpack_format::{sha256_file, ChecksumListing, ListingError, CHECKSUM_FILE};
use std::path::Path;
use tracing::debug;

use crate::context::ResolvedContext;
use crate::errors::{FormatViolation, SchemaViolation, VerifyError};
use crate::loader::load_text;

/// Loads `manifest.sha256` and checks every listed pack file against it.
///
/// Files are checked in listing order and the first mismatch ends the
/// stage. Returns the parsed listing on success.
///
/// # Errors
///
/// - [`VerifyError::Format`] if the listing is not LF-only UTF-8 or a line is malformed
/// - [`VerifyError::Schema`] if a file name is listed twice
/// - [`VerifyError::Io`] if the listing or a listed file cannot be read
/// - [`VerifyError::Integrity`] on the first digest mismatch
pub fn verify_checksums(ctx: &ResolvedContext) -> Result<ChecksumListing, VerifyError> {
    let listing_path = ctx.pack_artifact(CHECKSUM_FILE);
    let text = load_text(&listing_path)?;
    let listing = ChecksumListing::parse(&text).map_err(|e| listing_error(&listing_path, e))?;

    for record in listing.records() {
        let target = ctx.pack_artifact(&record.file_name);
        let digest = sha256_file(&target).map_err(|source| VerifyError::Io {
            path: target.clone(),
            source,
        })?;
        if digest.sha256 != record.expected {
            return Err(VerifyError::Integrity {
                file_name: record.file_name.clone(),
                expected: record.expected.clone(),
                actual: digest.sha256,
            });
        }
        debug!(file = %record.file_name, "checksum ok");
    }

    Ok(listing)
}

fn listing_error(listing_path: &Path, err: ListingError) -> VerifyError {
    match err {
        ListingError::DuplicateName {
            line,
            first_line,
            name,
        } => SchemaViolation::DuplicateChecksumName {
            name,
            first_line,
            line,
        }
        .into(),
        other => VerifyError::Format {
            artifact: listing_path.to_path_buf(),
            violation: FormatViolation::Listing(other),
        },
    }
}
