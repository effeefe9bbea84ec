//! Error types for statute conversion.
//!
//! Shape problems in one section's text never surface here: malformed or
//! absent subsection structure degrades to flat-text rendering inside the
//! splitting engine and serializer. Only programmer-error conditions and
//! I/O failures reach the caller.

use thiserror::Error;

/// Main error type for the statute-xml library.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Jurisdiction id is not in the registry.
    #[error("Unknown jurisdiction: '{0}'. Expected 'us' or 'us-XX' (e.g., us-ca)")]
    UnknownJurisdiction(String),

    /// A citation string could not be parsed.
    #[error("Unrecognized citation format: '{0}'")]
    CitationFormat(String),

    /// A citation was built with an empty section number or path segment.
    #[error("Empty section number or subsection segment in citation for code '{0}'")]
    EmptySection(String),

    /// Invalid date format.
    #[error("Invalid date format: '{0}'. Expected YYYY-MM-DD (e.g., 2025-01-01)")]
    InvalidDate(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Section JSON (de)serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for statute-xml operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
