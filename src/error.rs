//! Error types for the pathscheme naming engine.

use std::path::PathBuf;

/// Naming engine error type with contextual variants.
///
/// All variants carry the offending field name, level name, pattern or path.
/// Uses `#[non_exhaustive]` for forward compatibility.
///
/// # Examples
///
/// ```rust
/// use pathscheme::NamingError;
///
/// let err = NamingError::FieldUndefined { name: "orbit".into() };
/// assert_eq!(err.to_string(), "field not in schema: orbit");
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum NamingError {
    // Filename codec errors
    /// A field name is not part of the schema.
    #[error("field not in schema: {name}")]
    FieldUndefined {
        /// The unknown field name.
        name: String,
    },

    /// An encoded field value exceeds the field's declared width.
    #[error("field '{name}': encoded value too long ({length} > {max})")]
    FieldTooLong {
        /// The field whose width was exceeded.
        name: String,
        /// Length of the encoded value.
        length: usize,
        /// Declared maximum length.
        max: usize,
    },

    /// A non-text value was given for a field without a codec.
    #[error("field '{name}': non-text value but no codec declared")]
    UnsupportedValueType {
        /// The field missing a codec.
        name: String,
    },

    /// A filename does not tokenize into the schema's fields.
    #[error("malformed filename {filename:?}: {details}")]
    MalformedFilename {
        /// The filename that failed to parse.
        filename: String,
        /// What went wrong.
        details: String,
    },

    /// Two schema fields share a name.
    #[error("duplicate field in schema: {name}")]
    DuplicateField {
        /// The repeated field name.
        name: String,
    },

    /// An optional field is followed by a required one.
    #[error("optional field '{name}' must be trailing")]
    NonTrailingOptional {
        /// The misplaced optional field.
        name: String,
    },

    // Path hierarchy errors
    /// Two hierarchy levels share a name.
    #[error("duplicate level in hierarchy: {name}")]
    DuplicateLevel {
        /// The repeated level name.
        name: String,
    },

    /// A level name is not part of the hierarchy.
    #[error("level not in hierarchy: {level}")]
    UnknownLevel {
        /// The unknown level name.
        level: String,
    },

    /// The tree root directory does not exist.
    #[error("tree root not found: {}", path.display())]
    RootNotFound {
        /// The missing root directory.
        path: PathBuf,
    },

    /// A path's hierarchy does not match the tree's.
    #[error("hierarchy mismatch: tree has [{expected}], path has [{found}]")]
    HierarchyMismatch {
        /// The tree's hierarchy, comma-joined.
        expected: String,
        /// The path's hierarchy, comma-joined.
        found: String,
    },

    // Search and subsetting errors
    /// A filename substring does not conform to the timestamp format.
    #[error("cannot parse timestamp {raw:?} with format {format:?}")]
    TimestampParse {
        /// The substring that failed to parse.
        raw: String,
        /// The chrono format string in use.
        format: String,
    },

    /// More than one tree member matches a pattern that must be unique.
    #[error("pattern {pattern:?} matches {count} members, expected exactly one")]
    AmbiguousSubset {
        /// The offending pattern.
        pattern: String,
        /// Number of matching members.
        count: usize,
    },

    /// No tree member matches the given pattern.
    #[error("no member matches pattern {pattern:?}")]
    NoMatch {
        /// The pattern that matched nothing.
        pattern: String,
    },

    /// A search or subset pattern is not a valid regex.
    #[error("invalid pattern {pattern:?}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// I/O error with operation and path context.
    #[error("{operation} failed for {}: {source}", path.display())]
    Io {
        /// The operation that failed.
        operation: &'static str,
        /// The path involved in the operation.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_undefined_display() {
        let err = NamingError::FieldUndefined {
            name: "orbit".into(),
        };
        assert_eq!(err.to_string(), "field not in schema: orbit");
    }

    #[test]
    fn field_too_long_display() {
        let err = NamingError::FieldTooLong {
            name: "tile".into(),
            length: 12,
            max: 10,
        };
        assert_eq!(
            err.to_string(),
            "field 'tile': encoded value too long (12 > 10)"
        );
    }

    #[test]
    fn root_not_found_display() {
        let err = NamingError::RootNotFound {
            path: PathBuf::from("/missing"),
        };
        assert!(err.to_string().contains("/missing"));
    }

    #[test]
    fn ambiguous_subset_display() {
        let err = NamingError::AmbiguousSubset {
            pattern: "E048".into(),
            count: 3,
        };
        assert!(err.to_string().contains("E048"));
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn invalid_pattern_has_source() {
        use std::error::Error;
        let source = regex::Regex::new("[").unwrap_err();
        let err = NamingError::InvalidPattern {
            pattern: "[".into(),
            source,
        };
        assert!(err.source().is_some());
    }

    #[test]
    fn io_error_display() {
        let err = NamingError::Io {
            operation: "read_dir",
            path: PathBuf::from("/data"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().starts_with("read_dir failed for /data"));
    }
}
