//! Output formatting utilities.

use auditpack_verify::{ResolvedContext, StageFailure, VerificationReport};
use serde_json::json;

/// Formats a successful run as JSON.
pub fn format_report(ctx: &ResolvedContext, report: &VerificationReport) -> String {
    let value = json!({
        "ok": true,
        "input_dir": ctx.input_dir().to_string_lossy(),
        "pack_dir": ctx.pack_dir().to_string_lossy(),
        "report": report,
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
}

/// Formats the first failure of a run as JSON.
pub fn format_failure(ctx: &ResolvedContext, failure: &StageFailure) -> String {
    let value = json!({
        "ok": false,
        "input_dir": ctx.input_dir().to_string_lossy(),
        "pack_dir": ctx.pack_dir().to_string_lossy(),
        "stage": failure.stage,
        "kind": failure.kind(),
        "error": failure.error.to_string(),
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
}
