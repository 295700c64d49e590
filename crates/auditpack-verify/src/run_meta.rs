//! Stage D: `run_meta.json` is plausible for the input directory.
//!
//! The producer may have recorded its input location as an absolute path, a
//! relative path or a bare directory name, so the label is accepted if any
//! one of several [`LabelMatch`] predicates holds.

use auditpack_format::{Manifest, RunMeta, Summary, REQUIRED_TOOL, RUN_META_FILE};
use serde::Serialize;
use std::path::{Path, MAIN_SEPARATOR};
use tracing::debug;

use crate::context::ResolvedContext;
use crate::errors::{MetadataViolation, VerifyError};
use crate::loader::load_json;

/// Accepted relationships between the input label and the input directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelMatch {
    /// Label is the absolute input directory in native form.
    NativePath,
    /// Label is the absolute input directory with `/` separators.
    PosixPath,
    /// The `/`-separated input directory ends with the `/`-separated label.
    PosixSuffix,
    /// Label is the input directory's final component.
    DirName,
    /// Label ends with the input directory's final component.
    DirNameSuffix,
}

impl LabelMatch {
    /// Predicates in the order they are tried.
    pub const ORDER: [LabelMatch; 5] = [
        LabelMatch::NativePath,
        LabelMatch::PosixPath,
        LabelMatch::PosixSuffix,
        LabelMatch::DirName,
        LabelMatch::DirNameSuffix,
    ];

    /// Evaluates this predicate alone.
    pub fn accepts(self, label: &str, input_dir: &Path) -> bool {
        let native = input_dir.to_string_lossy();
        let dir_name = input_dir.file_name().map(|n| n.to_string_lossy());
        match self {
            LabelMatch::NativePath => label == native,
            LabelMatch::PosixPath => label == posix_path(&native),
            LabelMatch::PosixSuffix => posix_path(&native).ends_with(&posix_label(label)),
            LabelMatch::DirName => dir_name.is_some_and(|n| label == n),
            LabelMatch::DirNameSuffix => dir_name.is_some_and(|n| label.ends_with(&*n)),
        }
    }

    /// First predicate in [`LabelMatch::ORDER`] that accepts the label.
    pub fn find(label: &str, input_dir: &Path) -> Option<LabelMatch> {
        Self::ORDER
            .into_iter()
            .find(|m| m.accepts(label, input_dir))
    }
}

fn posix_path(native: &str) -> String {
    native.replace(MAIN_SEPARATOR, "/")
}

fn posix_label(label: &str) -> String {
    label.replace('\\', "/")
}

/// Loads `run_meta.json` and checks it against the run.
pub fn verify_run_meta(ctx: &ResolvedContext, manifest: &Manifest) -> Result<LabelMatch, VerifyError> {
    let meta: RunMeta = load_json(&ctx.pack_artifact(RUN_META_FILE))?;
    let matched = check_run_meta(&meta, ctx.input_dir(), manifest.computed_summary())?;
    debug!(label_match = ?matched, "run metadata ok");
    Ok(matched)
}

/// Checks tool identity, the input label and (when recorded) the summary.
pub fn check_run_meta(
    meta: &RunMeta,
    input_dir: &Path,
    manifest_summary: Summary,
) -> Result<LabelMatch, MetadataViolation> {
    if meta.tool_name() != Some(REQUIRED_TOOL) {
        let found = meta.tool.as_ref().map(|tool| match tool.as_str() {
            Some(name) => name.to_string(),
            None => tool.to_string(),
        });
        return Err(MetadataViolation::ToolMismatch {
            expected: REQUIRED_TOOL,
            found,
        });
    }

    let label = match meta.input.as_deref() {
        Some(label) if !label.is_empty() => label,
        _ => return Err(MetadataViolation::EmptyInputLabel),
    };

    let matched = LabelMatch::find(label, input_dir).ok_or_else(|| MetadataViolation::InputLabel {
        label: label.to_string(),
        input_dir: input_dir.to_path_buf(),
    })?;

    if let Some(recorded) = meta.summary {
        if recorded.file_count != manifest_summary.file_count {
            return Err(MetadataViolation::SummaryMismatch {
                field: "file_count",
                expected: manifest_summary.file_count,
                actual: recorded.file_count,
            });
        }
        if recorded.total_bytes != manifest_summary.total_bytes {
            return Err(MetadataViolation::SummaryMismatch {
                field: "total_bytes",
                expected: manifest_summary.total_bytes,
                actual: recorded.total_bytes,
            });
        }
    }

    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn input_dir() -> PathBuf {
        PathBuf::from("/srv/runs/out/demo_input")
    }

    fn meta(tool: &str, input: &str) -> RunMeta {
        RunMeta {
            tool: Some(tool.into()),
            input: Some(input.into()),
            ..RunMeta::default()
        }
    }

    fn summary() -> Summary {
        Summary {
            file_count: 2,
            total_bytes: 12,
        }
    }

    #[test]
    fn each_predicate_is_independent() {
        let dir = input_dir();
        assert!(LabelMatch::NativePath.accepts("/srv/runs/out/demo_input", &dir));
        assert!(LabelMatch::PosixPath.accepts("/srv/runs/out/demo_input", &dir));
        assert!(LabelMatch::PosixSuffix.accepts("out/demo_input", &dir));
        assert!(!LabelMatch::PosixSuffix.accepts("other/demo_input", &dir));
        assert!(LabelMatch::DirName.accepts("demo_input", &dir));
        assert!(!LabelMatch::DirName.accepts("./demo_input", &dir));
        assert!(LabelMatch::DirNameSuffix.accepts("other/demo_input", &dir));
        assert!(!LabelMatch::DirNameSuffix.accepts("demo_input/", &dir));
    }

    #[test]
    fn first_matching_predicate_wins() {
        let dir = input_dir();
        assert_eq!(
            LabelMatch::find("/srv/runs/out/demo_input", &dir),
            Some(LabelMatch::NativePath)
        );
        assert_eq!(LabelMatch::find("out/demo_input", &dir), Some(LabelMatch::PosixSuffix));
        assert_eq!(LabelMatch::find("elsewhere/demo_input", &dir), Some(LabelMatch::DirNameSuffix));
        assert_eq!(LabelMatch::find("unrelated", &dir), None);
    }

    #[test]
    fn backslash_labels_are_normalized_for_suffix_match() {
        assert!(LabelMatch::PosixSuffix.accepts("out\\demo_input", &input_dir()));
    }

    #[test]
    fn bare_directory_name_is_accepted() {
        assert_eq!(
            check_run_meta(&meta(REQUIRED_TOOL, "demo_input"), &input_dir(), summary()),
            Ok(LabelMatch::PosixSuffix)
        );
    }

    #[test]
    fn wrong_tool_fails_regardless_of_label() {
        for label in ["demo_input", "/srv/runs/out/demo_input", ""] {
            assert!(matches!(
                check_run_meta(&meta("auditpack", label), &input_dir(), summary()),
                Err(MetadataViolation::ToolMismatch { .. })
            ));
        }
    }

    #[test]
    fn missing_tool_fails() {
        let m = RunMeta {
            input: Some("demo_input".into()),
            ..RunMeta::default()
        };
        assert_eq!(
            check_run_meta(&m, &input_dir(), summary()),
            Err(MetadataViolation::ToolMismatch {
                expected: REQUIRED_TOOL,
                found: None,
            })
        );
    }

    #[test]
    fn non_string_tool_fails_as_mismatch() {
        let m = RunMeta {
            tool: Some(serde_json::json!(5)),
            input: Some("demo_input".into()),
            ..RunMeta::default()
        };
        assert_eq!(
            check_run_meta(&m, &input_dir(), summary()),
            Err(MetadataViolation::ToolMismatch {
                expected: REQUIRED_TOOL,
                found: Some("5".into()),
            })
        );
    }

    #[test]
    fn empty_or_missing_label_fails() {
        assert_eq!(
            check_run_meta(&meta(REQUIRED_TOOL, ""), &input_dir(), summary()),
            Err(MetadataViolation::EmptyInputLabel)
        );
        let m = RunMeta {
            tool: Some(REQUIRED_TOOL.into()),
            ..RunMeta::default()
        };
        assert_eq!(
            check_run_meta(&m, &input_dir(), summary()),
            Err(MetadataViolation::EmptyInputLabel)
        );
    }

    #[test]
    fn implausible_label_fails() {
        assert!(matches!(
            check_run_meta(&meta(REQUIRED_TOOL, "some/other_dir"), &input_dir(), summary()),
            Err(MetadataViolation::InputLabel { .. })
        ));
    }

    #[test]
    fn recorded_summary_must_match_manifest() {
        let mut m = meta(REQUIRED_TOOL, "demo_input");
        m.summary = Some(Summary {
            file_count: 3,
            total_bytes: 12,
        });
        assert_eq!(
            check_run_meta(&m, &input_dir(), summary()),
            Err(MetadataViolation::SummaryMismatch {
                field: "file_count",
                expected: 2,
                actual: 3,
            })
        );
    }
}
