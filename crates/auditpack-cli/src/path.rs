//! Directory argument resolution.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Input directory used by the producer's demo layout.
pub const DEFAULT_INPUT_DIR: &str = "out/demo_input";
/// Pack directory used by the producer's demo layout.
pub const DEFAULT_PACK_DIR: &str = "out";

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("{flag} directory {path} cannot be resolved: {source}")]
    Unresolvable {
        flag: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("{flag} path {path} is not a directory")]
    NotDirectory { flag: &'static str, path: String },
}

/// Resolves a directory argument against the working directory into an
/// absolute path with symlinks resolved.
pub fn resolve_dir(flag: &'static str, raw: &str) -> Result<PathBuf, ResolveError> {
    let resolved = std::fs::canonicalize(raw).map_err(|source| ResolveError::Unresolvable {
        flag,
        path: raw.to_string(),
        source,
    })?;
    if !resolved.is_dir() {
        return Err(ResolveError::NotDirectory {
            flag,
            path: raw.to_string(),
        });
    }
    Ok(resolved)
}
