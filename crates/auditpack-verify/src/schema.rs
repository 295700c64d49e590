//! Stage B: `manifest.json` is well-formed.

use auditpack_format::{validate_rel_path, Manifest, Sha256Hex, Summary, MANIFEST_FILE};
use std::collections::HashSet;
use tracing::debug;

use crate::context::ResolvedContext;
use crate::errors::{SchemaViolation, VerifyError};
use crate::loader::load_json;

/// Loads `manifest.json` and checks its structural invariants.
///
/// # Errors
///
/// - [`VerifyError::Format`] if the document is not LF-only UTF-8 JSON with a `files` array
/// - [`VerifyError::Io`] if it cannot be read
/// - [`VerifyError::Schema`] if [`check_manifest`] fails
pub fn verify_manifest(ctx: &ResolvedContext) -> Result<Manifest, VerifyError> {
    let manifest: Manifest = load_json(&ctx.pack_artifact(MANIFEST_FILE))?;
    check_manifest(&manifest)?;
    debug!(files = manifest.files.len(), "manifest structure ok");
    Ok(manifest)
}

/// Checks manifest invariants, in this order:
///
/// 1. paths are sorted (plain byte-wise string order)
/// 2. paths are unique
/// 3. every path is a clean relative path
/// 4. every digest is 64 lowercase hex characters
/// 5. `summary`, when present, matches the entries
pub fn check_manifest(manifest: &Manifest) -> Result<(), SchemaViolation> {
    check_sorted(manifest)?;
    check_unique(manifest)?;

    for entry in &manifest.files {
        validate_rel_path(&entry.path).map_err(SchemaViolation::UnsafePath)?;
        if Sha256Hex::parse(entry.sha256.as_str()).is_err() {
            return Err(SchemaViolation::InvalidDigest {
                path: entry.path.clone(),
                value: entry.sha256.clone(),
            });
        }
    }

    if let Some(recorded) = manifest.summary {
        check_summary(manifest.computed_summary(), recorded)?;
    }
    Ok(())
}

fn check_sorted(manifest: &Manifest) -> Result<(), SchemaViolation> {
    let unsorted = manifest
        .files
        .windows(2)
        .position(|pair| pair[0].path > pair[1].path);
    match unsorted {
        Some(i) => Err(SchemaViolation::Unsorted {
            index: i + 1,
            previous: manifest.files[i].path.clone(),
            next: manifest.files[i + 1].path.clone(),
        }),
        None => Ok(()),
    }
}

fn check_unique(manifest: &Manifest) -> Result<(), SchemaViolation> {
    let mut seen = HashSet::with_capacity(manifest.files.len());
    for entry in &manifest.files {
        if !seen.insert(entry.path.as_str()) {
            return Err(SchemaViolation::DuplicatePath {
                path: entry.path.clone(),
            });
        }
    }
    Ok(())
}

fn check_summary(computed: Summary, recorded: Summary) -> Result<(), SchemaViolation> {
    if recorded.file_count != computed.file_count {
        return Err(SchemaViolation::SummaryMismatch {
            field: "file_count",
            expected: computed.file_count,
            actual: recorded.file_count,
        });
    }
    if recorded.total_bytes != computed.total_bytes {
        return Err(SchemaViolation::SummaryMismatch {
            field: "total_bytes",
            expected: computed.total_bytes,
            actual: recorded.total_bytes,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditpack_format::ManifestEntry;

    const DIGEST: &str = "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03";

    fn manifest(paths: &[&str]) -> Manifest {
        Manifest {
            version: None,
            input: None,
            files: paths
                .iter()
                .map(|p| ManifestEntry {
                    path: p.to_string(),
                    size_bytes: 6,
                    sha256: DIGEST.to_string(),
                })
                .collect(),
            summary: None,
        }
    }

    #[test]
    fn sorted_unique_manifest_passes() {
        assert_eq!(check_manifest(&manifest(&["a.txt", "b/c.txt", "b/d.txt"])), Ok(()));
    }

    #[test]
    fn empty_manifest_passes() {
        assert_eq!(check_manifest(&manifest(&[])), Ok(()));
    }

    #[test]
    fn order_is_bytewise_not_natural() {
        // 'B' (0x42) sorts before 'a' (0x61); "file10" before "file2".
        assert_eq!(check_manifest(&manifest(&["B.txt", "a.txt"])), Ok(()));
        assert_eq!(check_manifest(&manifest(&["file10", "file2"])), Ok(()));
        assert!(matches!(
            check_manifest(&manifest(&["file2", "file10"])),
            Err(SchemaViolation::Unsorted { index: 1, .. })
        ));
    }

    #[test]
    fn unsorted_reports_first_offending_pair() {
        assert_eq!(
            check_manifest(&manifest(&["a", "c", "b"])),
            Err(SchemaViolation::Unsorted {
                index: 2,
                previous: "c".into(),
                next: "b".into(),
            })
        );
    }

    #[test]
    fn adjacent_duplicate_is_reported_as_duplicate() {
        assert_eq!(
            check_manifest(&manifest(&["a", "b", "b"])),
            Err(SchemaViolation::DuplicatePath { path: "b".into() })
        );
    }

    #[test]
    fn unsafe_path_is_rejected() {
        assert!(matches!(
            check_manifest(&manifest(&["../escape.txt"])),
            Err(SchemaViolation::UnsafePath(_))
        ));
    }

    #[test]
    fn malformed_digest_is_rejected() {
        let mut m = manifest(&["a.txt"]);
        m.files[0].sha256 = DIGEST.to_uppercase();
        assert!(matches!(
            check_manifest(&m),
            Err(SchemaViolation::InvalidDigest { .. })
        ));
    }

    #[test]
    fn summary_must_match_entries() {
        let mut m = manifest(&["a.txt", "b.txt"]);
        m.summary = Some(Summary {
            file_count: 2,
            total_bytes: 12,
        });
        assert_eq!(check_manifest(&m), Ok(()));

        m.summary = Some(Summary {
            file_count: 2,
            total_bytes: 13,
        });
        assert_eq!(
            check_manifest(&m),
            Err(SchemaViolation::SummaryMismatch {
                field: "total_bytes",
                expected: 12,
                actual: 13,
            })
        );
    }
}
