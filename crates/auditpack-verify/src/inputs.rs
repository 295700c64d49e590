//! Stage C: manifest entries match the input directory.

use auditpack_format::{sha256_file, Manifest, ManifestEntry};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use crate::context::ResolvedContext;
use crate::errors::{MissingReason, VerifyError};

/// Checks every manifest entry against the input directory, in manifest order.
///
/// For each entry the checks run as: regular file exists, size matches,
/// digest matches. The first failing check ends the stage.
///
/// Returns the number of entries checked.
pub fn verify_inputs(ctx: &ResolvedContext, manifest: &Manifest) -> Result<usize, VerifyError> {
    for entry in &manifest.files {
        verify_entry(ctx, entry)?;
    }
    Ok(manifest.files.len())
}

fn verify_entry(ctx: &ResolvedContext, entry: &ManifestEntry) -> Result<(), VerifyError> {
    let full = ctx.input_file(&entry.path);
    let missing = |reason| VerifyError::MissingFile {
        path: entry.path.clone(),
        reason,
    };

    let metadata = match fs::metadata(&full) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(missing(MissingReason::NotFound)),
        Err(e) => return Err(missing(MissingReason::Inaccessible(e.to_string()))),
    };
    if !metadata.is_file() {
        return Err(missing(MissingReason::NotRegularFile));
    }

    if metadata.len() != entry.size_bytes {
        return Err(VerifyError::SizeMismatch {
            path: entry.path.clone(),
            expected: entry.size_bytes,
            actual: metadata.len(),
        });
    }

    let digest = sha256_file(&full).map_err(|source| VerifyError::Io {
        path: full.clone(),
        source,
    })?;
    if digest.sha256.as_str() != entry.sha256 {
        return Err(VerifyError::HashMismatch {
            path: entry.path.clone(),
            expected: entry.sha256.clone(),
            actual: digest.sha256,
        });
    }

    debug!(path = %entry.path, bytes = entry.size_bytes, "input file ok");
    Ok(())
}

/// Fails if the input directory holds a regular file the manifest does not list.
///
/// Symlinks are not followed. When the pack directory lives inside the input
/// directory it is skipped, since its artifacts are never part of the
/// manifest. Extra files are reported in sorted path order.
///
/// Returns the number of regular files found.
pub fn check_no_extra_files(
    ctx: &ResolvedContext,
    manifest: &Manifest,
) -> Result<usize, VerifyError> {
    let listed: HashSet<&str> = manifest.files.iter().map(|f| f.path.as_str()).collect();
    let found = walk_regular_files(ctx.input_dir(), ctx.pack_dir())?;

    if let Some(extra) = found.iter().find(|rel| !listed.contains(rel.as_str())) {
        return Err(VerifyError::UnexpectedFile {
            path: extra.clone(),
        });
    }
    Ok(found.len())
}

fn walk_regular_files(input_dir: &Path, skip_dir: &Path) -> Result<Vec<String>, VerifyError> {
    let mut found = Vec::new();
    let walker = WalkDir::new(input_dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || e.path() != skip_dir);

    for item in walker {
        let entry = item.map_err(|e| VerifyError::Io {
            path: e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| input_dir.to_path_buf()),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(input_dir)
            .unwrap_or_else(|_| entry.path());
        let rel = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        found.push(rel);
    }

    found.sort();
    Ok(found)
}
