//! Error types for the w2con data model.
//!
//! One enum per layer:
//!
//! - [`CellParseError`] - malformed cell text (always recovered locally)
//! - [`SectionError`] - payload shape problems inside one section
//! - [`CatalogError`] - invalid section catalog definitions
//! - [`DocumentError`] - unknown section/row/field requested by a caller
//! - [`StoreError`] - snapshot/export persistence failures
//! - [`W2ConError`] - top-level wrapper used by the CLI
//!
//! Conversion is automatic via `From`, so `?` works across layers.

use thiserror::Error;

// =============================================================================
// Cell Parsing Errors
// =============================================================================

/// Errors while decoding the textual form of a cell.
///
/// Never surfaced past the section layer: callers fall back to the
/// type's minimum or placeholder.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CellParseError {
    /// Text is not an integer.
    #[error("'{0}' is not an integer")]
    InvalidInteger(String),

    /// Text is not a decimal number.
    #[error("'{0}' is not a decimal number")]
    InvalidDecimal(String),

    /// Text is not one of the declared options.
    #[error("'{text}' is not one of [{options}]")]
    UnknownOption { text: String, options: String },
}

// =============================================================================
// Section Errors
// =============================================================================

/// Errors applying a payload to a single section.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SectionError {
    /// Scalar payload length differs from the schema. The section has been cleared.
    #[error("section '{section}' expects {expected} fields, got {actual}; section cleared")]
    ShapeMismatch {
        section: String,
        expected: usize,
        actual: usize,
    },

    /// Payload kind does not match the section kind.
    #[error("section '{section}' payload is not a {expected} payload")]
    WrongPayload { section: String, expected: &'static str },
}

// =============================================================================
// Catalog Errors
// =============================================================================

/// Errors raised while building a section catalog.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    /// Two sections share a name.
    #[error("duplicate section name: {0}")]
    DuplicateSection(String),

    /// Two fields/rows of one section share a label.
    #[error("duplicate label '{label}' in section '{section}'")]
    DuplicateLabel { section: String, label: String },

    /// A dependency points at a section that does not exist.
    #[error("section '{section}' depends on unknown section '{target}'")]
    UnknownSection { section: String, target: String },

    /// A dependency points at a field that does not exist or is not scalar.
    #[error("section '{section}' depends on unknown scalar field '{target}.{field}'")]
    UnknownField {
        section: String,
        target: String,
        field: String,
    },

    /// A rule names a row the section does not declare.
    #[error("section '{section}' has no base row '{row}'")]
    MissingRow { section: String, row: String },

    /// A section declares no fields or rows.
    #[error("section '{0}' declares no fields")]
    EmptySection(String),
}

// =============================================================================
// Document Errors
// =============================================================================

/// Errors from the document accessor API.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DocumentError {
    /// Section name not in the document.
    #[error("unknown section: {0}")]
    UnknownSection(String),

    /// Field label not in the scalar section.
    #[error("section '{section}' has no field '{label}'")]
    UnknownField { section: String, label: String },

    /// Row label not in the matrix section.
    #[error("section '{section}' has no row '{label}'")]
    UnknownRow { section: String, label: String },

    /// Column index past the current width.
    #[error("section '{section}' has {count} columns, column {column} requested")]
    ColumnOutOfRange {
        section: String,
        column: usize,
        count: usize,
    },

    /// Operation requires the other section kind.
    #[error("section '{section}' is not a {expected} section")]
    WrongKind { section: String, expected: &'static str },
}

// =============================================================================
// Persistence Errors
// =============================================================================

/// Errors reading or writing the snapshot and export files.
///
/// The in-memory document is never modified when one of these is returned.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot is not valid JSON.
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot does not match the envelope schema.
    #[error("snapshot rejected: {}", errors.join("; "))]
    Schema { errors: Vec<String> },

    /// CSV writer error.
    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),
}

impl StoreError {
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

// =============================================================================
// Top-level Errors
// =============================================================================

/// Top-level error returned by the CLI commands.
#[derive(Debug, Error)]
pub enum W2ConError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("{0}")]
    Document(#[from] DocumentError),

    #[error("Section error: {0}")]
    Section(#[from] SectionError),

    #[error("Persistence error: {0}")]
    Store(#[from] StoreError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for catalog construction.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Result type for document accessors.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Result type for persistence.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for CLI commands.
pub type W2ConResult<T> = Result<T, W2ConError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let doc_err = DocumentError::UnknownSection("Ice Cover".into());
        let top: W2ConError = doc_err.into();
        assert!(top.to_string().contains("Ice Cover"));

        let store_err = StoreError::Schema {
            errors: vec!["missing sections".into(), "bad version".into()],
        };
        let top: W2ConError = store_err.into();
        assert!(top.to_string().contains("missing sections; bad version"));
    }

    #[test]
    fn test_shape_mismatch_format() {
        let err = SectionError::ShapeMismatch {
            section: "Time Control".into(),
            expected: 3,
            actual: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("Time Control"));
        assert!(msg.contains("expects 3"));
        assert!(msg.contains("cleared"));
    }

    #[test]
    fn test_io_error_carries_path() {
        let err = StoreError::io(
            "/tmp/missing.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("/tmp/missing.json"));
    }
}
