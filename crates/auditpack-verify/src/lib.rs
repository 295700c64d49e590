//! Offline verification protocol for proof-first audit packs.
//!
//! A run checks, in order and stopping at the first failure:
//!
//! - **A** pack artifacts against `manifest.sha256`
//! - **B** the structure of `manifest.json`
//! - **C** every manifest entry against the input directory
//! - **D** `run_meta.json` against the input directory actually used
//!
//! Verification is deterministic, single-threaded and keeps no state between
//! runs. Failures carry the [`Stage`] and a [`VerifyError`] naming the
//! offending artifact or path.
//!
#![deny(missing_docs)]

/// Stage A: checksum listing integrity.
pub mod checksums;
/// Resolved directories and run options.
pub mod context;
/// Error taxonomy.
pub mod errors;
/// Stage C: manifest-to-input cross-check.
pub mod inputs;
/// Text and JSON artifact loading.
pub mod loader;
/// Stage D: run-metadata plausibility.
pub mod run_meta;
/// Stage B: manifest structure.
pub mod schema;
/// Stage orchestration.
pub mod verifier;

pub use context::{ResolvedContext, VerifyOptions};
pub use errors::{
    ErrorKind, FormatViolation, MetadataViolation, MissingReason, SchemaViolation, Stage,
    StageFailure, VerifyError,
};
pub use run_meta::LabelMatch;
pub use verifier::{VerificationReport, Verifier};
