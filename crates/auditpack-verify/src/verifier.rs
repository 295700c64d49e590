//! Runs the verification stages in order and stops at the first failure.

use serde::Serialize;
use tracing::{info, warn};

use crate::checksums::verify_checksums;
use crate::context::{ResolvedContext, VerifyOptions};
use crate::errors::{Stage, StageFailure, VerifyError};
use crate::inputs::{check_no_extra_files, verify_inputs};
use crate::run_meta::{verify_run_meta, LabelMatch};
use crate::schema::verify_manifest;

/// What a successful run checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// Pack artifacts matched against `manifest.sha256`.
    pub checksums_verified: usize,
    /// Manifest entries matched against the input directory.
    pub files_verified: usize,
    /// Sum of `size_bytes` over the manifest.
    pub total_bytes: u64,
    /// Regular files found in the input directory; only set in strict mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_files_scanned: Option<usize>,
    /// Predicate that accepted the run metadata's input label.
    pub label_match: LabelMatch,
}

/// Verifier for a single audit pack.
///
/// Holds no state besides its inputs, so [`Verifier::run`] can be called
/// repeatedly and gives the same answer for an unchanged pack.
///
/// # Example
///
/// ```rust,no_run
/// use auditpack_verify::{ResolvedContext, Verifier, VerifyOptions};
///
/// let ctx = ResolvedContext::new("/srv/out/demo_input", "/srv/out");
/// let report = Verifier::new(ctx, VerifyOptions::default()).run()?;
/// println!("{} files verified", report.files_verified);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Verifier {
    ctx: ResolvedContext,
    options: VerifyOptions,
}

impl Verifier {
    /// Creates a verifier over resolved directories.
    pub fn new(ctx: ResolvedContext, options: VerifyOptions) -> Self {
        Self { ctx, options }
    }

    /// Context this verifier runs against.
    pub fn context(&self) -> &ResolvedContext {
        &self.ctx
    }

    /// Runs stages A through D.
    ///
    /// # Errors
    ///
    /// Returns the first [`StageFailure`]; later stages do not run.
    pub fn run(&self) -> Result<VerificationReport, StageFailure> {
        let ctx = &self.ctx;

        let listing = in_stage(Stage::ChecksumIntegrity, verify_checksums(ctx))?;
        let manifest = in_stage(Stage::ManifestSchema, verify_manifest(ctx))?;
        let files_verified = in_stage(Stage::InputCrossCheck, verify_inputs(ctx, &manifest))?;
        let input_files_scanned = if self.options.strict {
            Some(in_stage(
                Stage::InputCrossCheck,
                check_no_extra_files(ctx, &manifest),
            )?)
        } else {
            None
        };
        let label_match = in_stage(Stage::RunMetadata, verify_run_meta(ctx, &manifest))?;

        Ok(VerificationReport {
            checksums_verified: listing.len(),
            files_verified,
            total_bytes: manifest.computed_summary().total_bytes,
            input_files_scanned,
            label_match,
        })
    }
}

fn in_stage<T>(stage: Stage, result: Result<T, VerifyError>) -> Result<T, StageFailure> {
    match result {
        Ok(value) => {
            info!(%stage, "stage passed");
            Ok(value)
        }
        Err(error) => {
            warn!(%stage, %error, "stage failed");
            Err(StageFailure { stage, error })
        }
    }
}
