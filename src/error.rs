//! Error types for the fxzhihu library.

use std::io;
use thiserror::Error;

/// Result type alias for fxzhihu operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while normalizing or rendering content.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Upstream JSON could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A segment or mark is missing a field its kind requires.
    ///
    /// This means the upstream schema has drifted; it is never used for
    /// optional fields.
    #[error("{kind} is missing required field `{field}`")]
    MissingField {
        /// Segment or mark kind that was being decoded
        kind: String,
        /// Name of the missing field
        field: &'static str,
    },

    /// A required field is present but has the wrong shape.
    #[error("{kind} has invalid field `{field}`: {reason}")]
    InvalidField {
        /// Segment or mark kind that was being decoded
        kind: String,
        /// Name of the offending field
        field: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// The content kind name is not one of answer, article, question, pin.
    #[error("Unknown content kind: {0}")]
    UnknownContentKind(String),

    /// A template placeholder has no value.
    #[error("Template error: {0}")]
    Template(String),

    /// Error during rendering.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    pub(crate) fn missing(kind: impl Into<String>, field: &'static str) -> Self {
        Error::MissingField {
            kind: kind.into(),
            field,
        }
    }

    pub(crate) fn invalid(
        kind: impl Into<String>,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidField {
            kind: kind.into(),
            field,
            reason: reason.into(),
        }
    }

    /// Check if this error reports upstream schema drift.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Error::MissingField { .. } | Error::InvalidField { .. })
    }
}
