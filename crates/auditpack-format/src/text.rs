use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a text artifact.
#[derive(Debug, Error)]
pub enum TextError {
    /// The file could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid UTF-8.
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    /// The file contains a CRLF line ending; pack artifacts are LF-only.
    #[error("CRLF line ending at byte offset {offset}")]
    CrlfLineEnding {
        /// Byte offset of the `\r` that starts the first CRLF pair.
        offset: usize,
    },
}

/// Reads a UTF-8 text artifact and rejects CRLF line endings.
///
/// A lone `\r` is tolerated; only the two-byte sequence `\r\n` is a
/// violation.
pub fn read_lf_text<P: AsRef<Path>>(path: P) -> Result<String, TextError> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8(bytes)?;
    if let Some(offset) = text.find("\r\n") {
        return Err(TextError::CrlfLineEnding { offset });
    }
    Ok(text)
}
