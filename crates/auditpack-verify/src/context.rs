//! Execution context shared by all verification stages.

use std::path::{Path, PathBuf};

/// The two directories a verification run operates on.
///
/// Both paths are expected to be absolute; resolving user input into this
/// form is the caller's job. The context is immutable for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContext {
    input_dir: PathBuf,
    pack_dir: PathBuf,
}

impl ResolvedContext {
    /// Creates a context from already-resolved directories.
    pub fn new(input_dir: impl Into<PathBuf>, pack_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            pack_dir: pack_dir.into(),
        }
    }

    /// Directory whose files the manifest describes.
    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// Directory holding the audit pack artifacts.
    pub fn pack_dir(&self) -> &Path {
        &self.pack_dir
    }

    /// Final component of the input directory, if it has a UTF-8 one.
    pub fn input_dir_name(&self) -> Option<&str> {
        self.input_dir.file_name().and_then(|n| n.to_str())
    }

    /// Resolves a pack-relative, `/`-separated name.
    pub fn pack_artifact(&self, name: &str) -> PathBuf {
        join_rel(&self.pack_dir, name)
    }

    /// Resolves a manifest path against the input directory.
    pub fn input_file(&self, rel: &str) -> PathBuf {
        join_rel(&self.input_dir, rel)
    }
}

/// Options that change what a run checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Also fail when the input directory holds regular files the manifest
    /// does not list.
    pub strict: bool,
}

fn join_rel(base: &Path, rel: &str) -> PathBuf {
    rel.split('/').fold(base.to_path_buf(), |acc, seg| acc.join(seg))
}
