use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One input file recorded in `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Path relative to the input directory, `/`-separated.
    pub path: String,
    /// File length in bytes.
    pub size_bytes: u64,
    /// Lowercase hex SHA-256 of the file contents.
    ///
    /// Kept as a raw string so a malformed value is reported as a schema
    /// violation rather than a parse failure.
    pub sha256: String,
}

/// File count and byte total written by the pack producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of manifest entries.
    pub file_count: u64,
    /// Sum of `size_bytes` over all entries.
    pub total_bytes: u64,
}

/// Inventory of the input directory (`manifest.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Producer version string; informational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Input label as the producer recorded it; informational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    /// Recorded files, expected in sorted path order.
    pub files: Vec<ManifestEntry>,
    /// Optional totals over `files`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

impl Manifest {
    /// Totals computed from the entries themselves.
    pub fn computed_summary(&self) -> Summary {
        Summary {
            file_count: self.files.len() as u64,
            total_bytes: self.files.iter().map(|f| f.size_bytes).sum(),
        }
    }
}

/// Summary of the producing run (`run_meta.json`).
///
/// `tool` and `input` are optional at the parse layer so that their absence
/// surfaces as a metadata mismatch instead of a JSON error. `tool` accepts
/// any JSON value for the same reason.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunMeta {
    /// Name of the tool that produced the pack.
    #[serde(default)]
    pub tool: Option<Value>,
    /// Producer version string; informational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Where the run believed its input came from.
    #[serde(default)]
    pub input: Option<String>,
    /// Optional totals over the manifest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

impl RunMeta {
    /// `tool` when it is a JSON string.
    pub fn tool_name(&self) -> Option<&str> {
        self.tool.as_ref().and_then(Value::as_str)
    }
}
