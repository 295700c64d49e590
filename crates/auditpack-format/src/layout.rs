/// Checksum listing covering the other pack artifacts.
pub const CHECKSUM_FILE: &str = "manifest.sha256";

/// Inventory of the input directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Summary of the run that produced the pack.
pub const RUN_META_FILE: &str = "run_meta.json";

/// Value `run_meta.json` must carry in its `tool` field.
pub const REQUIRED_TOOL: &str = "proof-first-auditpack";
