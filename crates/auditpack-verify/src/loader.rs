//! Loading helpers that map artifact read failures onto [`VerifyError`].

use auditpack_format::{read_lf_text, TextError};
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::errors::{FormatViolation, VerifyError};

/// Reads a text artifact, enforcing UTF-8 and LF-only line endings.
pub fn load_text(path: &Path) -> Result<String, VerifyError> {
    read_lf_text(path).map_err(|e| match e {
        TextError::Io(source) => VerifyError::Io {
            path: path.to_path_buf(),
            source,
        },
        TextError::InvalidUtf8(_) => VerifyError::Format {
            artifact: path.to_path_buf(),
            violation: FormatViolation::InvalidUtf8,
        },
        TextError::CrlfLineEnding { offset } => VerifyError::Format {
            artifact: path.to_path_buf(),
            violation: FormatViolation::CrlfLineEnding { offset },
        },
    })
}

/// Reads a text artifact and decodes it as JSON.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, VerifyError> {
    let text = load_text(path)?;
    serde_json::from_str(&text).map_err(|e| VerifyError::Format {
        artifact: path.to_path_buf(),
        violation: FormatViolation::InvalidJson(e.to_string()),
    })
}
