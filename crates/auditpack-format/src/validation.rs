use thiserror::Error;

/// Validation errors for audit pack primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// When a value does not match the required pattern.
    #[error("{field} ('{value}') is not allowed")]
    PatternMismatch {
        /// Field name that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// When a relative path could escape its base directory or is not in clean form.
    #[error("path '{value}' is unsafe: {reason}")]
    UnsafePath {
        /// Offending path.
        value: String,
        /// Which rule the path broke.
        reason: &'static str,
    },
}

/// Checks that `path` is a clean, relative, forward-slash separated path.
///
/// Rejected: empty paths, backslashes, leading `/`, and any empty, `.` or
/// `..` segment (which also covers `a//b`, trailing slashes and traversal).
pub fn validate_rel_path(path: &str) -> Result<(), ValidationError> {
    let unsafe_path = |reason| ValidationError::UnsafePath {
        value: path.to_string(),
        reason,
    };

    if path.is_empty() {
        return Err(unsafe_path("empty path"));
    }
    if path.contains('\\') {
        return Err(unsafe_path("must use forward slashes"));
    }
    if path.starts_with('/') {
        return Err(unsafe_path("must be relative"));
    }
    for segment in path.split('/') {
        match segment {
            "" | "." => return Err(unsafe_path("not in clean form")),
            ".." => return Err(unsafe_path("path traversal not allowed")),
            _ => {}
        }
    }
    Ok(())
}

/// Checks a file name from a checksum listing.
///
/// Looser than [`validate_rel_path`]: `sha256sum ./*` style names with `.`
/// or empty segments are fine as long as the name stays inside the pack
/// directory. Rejected: empty names, backslashes, leading `/` and `..`
/// segments.
pub fn validate_listing_name(name: &str) -> Result<(), ValidationError> {
    let unsafe_name = |reason| ValidationError::UnsafePath {
        value: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(unsafe_name("empty path"));
    }
    if name.contains('\\') {
        return Err(unsafe_name("must use forward slashes"));
    }
    if name.starts_with('/') {
        return Err(unsafe_name("must be relative"));
    }
    if name.split('/').any(|segment| segment == "..") {
        return Err(unsafe_name("path traversal not allowed"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_nested_relative_paths() {
        assert!(validate_rel_path("hello.txt").is_ok());
        assert!(validate_rel_path("nested/world.txt").is_ok());
        assert!(validate_rel_path("with space/file name.txt").is_ok());
        assert!(validate_rel_path("..hidden").is_ok());
    }

    #[test]
    fn rejects_unclean_or_escaping_paths() {
        for bad in ["", "/etc/passwd", "a\\b", "../x", "a/../b", "./a", "a//b", "a/", "."] {
            assert!(
                matches!(validate_rel_path(bad), Err(ValidationError::UnsafePath { .. })),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn listing_names_allow_dot_prefix() {
        assert!(validate_listing_name("./manifest.json").is_ok());
        assert!(validate_listing_name("reports//summary.txt").is_ok());
        assert!(validate_listing_name("..hidden").is_ok());
        for bad in ["", "/etc/passwd", "a\\b", "../x", "./a/../../b"] {
            assert!(
                matches!(validate_listing_name(bad), Err(ValidationError::UnsafePath { .. })),
                "expected {:?} to be rejected",
                bad
            );
        }
    }
}
