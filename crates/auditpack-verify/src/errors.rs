use auditpack_format::{ListingError, Sha256Hex, ValidationError};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Verification stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Stage A: pack artifacts match `manifest.sha256`.
    ChecksumIntegrity,
    /// Stage B: `manifest.json` is well-formed.
    ManifestSchema,
    /// Stage C: manifest entries match the input directory.
    InputCrossCheck,
    /// Stage D: `run_meta.json` is plausible for the input directory.
    RunMetadata,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::ChecksumIntegrity => "checksum integrity",
            Stage::ManifestSchema => "manifest schema",
            Stage::InputCrossCheck => "input cross-check",
            Stage::RunMetadata => "run metadata",
        };
        f.write_str(label)
    }
}

/// Ways a text artifact can be malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatViolation {
    /// Contents are not UTF-8.
    #[error("not valid UTF-8")]
    InvalidUtf8,
    /// Contents use CRLF line endings.
    #[error("CRLF line ending at byte offset {offset}")]
    CrlfLineEnding {
        /// Byte offset of the first `\r\n`.
        offset: usize,
    },
    /// Contents are not the expected JSON document.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    /// Checksum listing line could not be parsed.
    #[error("{0}")]
    Listing(ListingError),
}

/// Manifest-level invariants (plus checksum-name uniqueness).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    /// Paths are not in lexicographic order.
    #[error("manifest files are not sorted by path: '{previous}' precedes '{next}' at index {index}")]
    Unsorted {
        /// Index of `next` within `files`.
        index: usize,
        /// Entry that should have come later.
        previous: String,
        /// Entry that should have come earlier.
        next: String,
    },
    /// The same path appears twice.
    #[error("duplicate manifest path '{path}'")]
    DuplicatePath {
        /// Repeated path.
        path: String,
    },
    /// A path is absolute, unclean or escapes the input directory.
    #[error("manifest path invalid: {0}")]
    UnsafePath(ValidationError),
    /// A recorded digest is not 64 lowercase hex characters.
    #[error("manifest sha256 invalid for '{path}': '{value}'")]
    InvalidDigest {
        /// Entry path.
        path: String,
        /// Recorded digest.
        value: String,
    },
    /// `summary` disagrees with the entries.
    #[error("summary.{field} mismatch: expected {expected}, got {actual}")]
    SummaryMismatch {
        /// `file_count` or `total_bytes`.
        field: &'static str,
        /// Value computed from the entries.
        expected: u64,
        /// Value recorded in the summary.
        actual: u64,
    },
    /// The checksum listing names one file twice.
    #[error("checksum listing names '{name}' twice (lines {first_line} and {line})")]
    DuplicateChecksumName {
        /// Repeated file name.
        name: String,
        /// Line of the first occurrence.
        first_line: usize,
        /// Line of the repeat.
        line: usize,
    },
}

/// Why a manifest entry has no usable counterpart in the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingReason {
    /// Nothing exists at the path.
    NotFound,
    /// Something exists but it is a directory or special file.
    NotRegularFile,
    /// The path could not be inspected.
    Inaccessible(String),
}

impl fmt::Display for MissingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingReason::NotFound => f.write_str("not found"),
            MissingReason::NotRegularFile => f.write_str("not a regular file"),
            MissingReason::Inaccessible(detail) => write!(f, "inaccessible ({})", detail),
        }
    }
}

/// Run-metadata checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataViolation {
    /// `tool` is absent or not the required literal.
    #[error("tool must be '{expected}', found {}", describe_tool(.found))]
    ToolMismatch {
        /// Required value.
        expected: &'static str,
        /// Recorded value, if any.
        found: Option<String>,
    },
    /// `input` is absent or empty.
    #[error("run_meta.json missing input label")]
    EmptyInputLabel,
    /// `input` fits none of the accepted forms.
    #[error("input label '{label}' does not match input directory {}", .input_dir.display())]
    InputLabel {
        /// Recorded label.
        label: String,
        /// Directory actually verified.
        input_dir: PathBuf,
    },
    /// `summary` disagrees with the manifest.
    #[error("summary.{field} mismatch: manifest has {expected}, run metadata has {actual}")]
    SummaryMismatch {
        /// `file_count` or `total_bytes`.
        field: &'static str,
        /// Value computed from the manifest.
        expected: u64,
        /// Value recorded in the run metadata.
        actual: u64,
    },
}

fn describe_tool(found: &Option<String>) -> String {
    match found {
        Some(tool) => format!("'{}'", tool),
        None => "nothing".to_string(),
    }
}

/// Error categories, stable for machine-readable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`VerifyError::Format`].
    Format,
    /// See [`VerifyError::Io`].
    Io,
    /// See [`VerifyError::Integrity`].
    Integrity,
    /// See [`VerifyError::Schema`].
    Schema,
    /// See [`VerifyError::MissingFile`].
    MissingFile,
    /// See [`VerifyError::SizeMismatch`].
    SizeMismatch,
    /// See [`VerifyError::HashMismatch`].
    HashMismatch,
    /// See [`VerifyError::UnexpectedFile`].
    UnexpectedFile,
    /// See [`VerifyError::MetadataMismatch`].
    MetadataMismatch,
}

/// Errors raised by the verification stages. All are fatal.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// A text artifact is not LF-only UTF-8 or does not parse.
    #[error("format error in {}: {violation}", .artifact.display())]
    Format {
        /// Offending artifact.
        artifact: PathBuf,
        /// What was wrong with it.
        violation: FormatViolation,
    },
    /// A required file is missing or unreadable.
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A pack artifact does not match its listed checksum.
    #[error("sha256 mismatch for {file_name}: expected {expected}, got {actual}")]
    Integrity {
        /// File name as listed in `manifest.sha256`.
        file_name: String,
        /// Listed digest.
        expected: Sha256Hex,
        /// Computed digest.
        actual: Sha256Hex,
    },
    /// A manifest invariant does not hold.
    #[error("schema violation: {0}")]
    Schema(SchemaViolation),
    /// A manifest entry has no regular file behind it.
    #[error("missing input file '{path}': {reason}")]
    MissingFile {
        /// Manifest path.
        path: String,
        /// What was found instead.
        reason: MissingReason,
    },
    /// A file's length differs from the manifest.
    #[error("size mismatch for '{path}': expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Manifest path.
        path: String,
        /// Recorded size.
        expected: u64,
        /// Actual size.
        actual: u64,
    },
    /// A file's contents differ from the manifest.
    #[error("hash mismatch for '{path}': expected {expected}, got {actual}")]
    HashMismatch {
        /// Manifest path.
        path: String,
        /// Recorded digest.
        expected: String,
        /// Computed digest.
        actual: Sha256Hex,
    },
    /// Strict mode found a file the manifest does not mention.
    #[error("extra input file not in manifest: '{path}'")]
    UnexpectedFile {
        /// Path relative to the input directory.
        path: String,
    },
    /// `run_meta.json` does not describe this run.
    #[error("run metadata mismatch: {0}")]
    MetadataMismatch(MetadataViolation),
}

impl VerifyError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            VerifyError::Format { .. } => ErrorKind::Format,
            VerifyError::Io { .. } => ErrorKind::Io,
            VerifyError::Integrity { .. } => ErrorKind::Integrity,
            VerifyError::Schema(_) => ErrorKind::Schema,
            VerifyError::MissingFile { .. } => ErrorKind::MissingFile,
            VerifyError::SizeMismatch { .. } => ErrorKind::SizeMismatch,
            VerifyError::HashMismatch { .. } => ErrorKind::HashMismatch,
            VerifyError::UnexpectedFile { .. } => ErrorKind::UnexpectedFile,
            VerifyError::MetadataMismatch(_) => ErrorKind::MetadataMismatch,
        }
    }
}

impl From<SchemaViolation> for VerifyError {
    fn from(violation: SchemaViolation) -> Self {
        VerifyError::Schema(violation)
    }
}

impl From<MetadataViolation> for VerifyError {
    fn from(violation: MetadataViolation) -> Self {
        VerifyError::MetadataMismatch(violation)
    }
}

/// First failure of a verification run, tagged with its stage.
#[derive(Debug, Error)]
#[error("{stage}: {error}")]
pub struct StageFailure {
    /// Stage that failed.
    pub stage: Stage,
    /// What went wrong.
    #[source]
    pub error: VerifyError,
}

impl StageFailure {
    /// Category of the underlying error.
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}
