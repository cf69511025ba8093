use polypath::PathError;
use thiserror::Error;

use crate::units::Unit;

/// Errors raised while building, combining or querying footprints and
/// while resolving registry formats.
#[derive(Error, Debug)]
pub enum PawprintError {
    /// A footprint's frame differs from the frame it is being combined with
    #[error("Frame mismatch: expected {expected}, got {found}")]
    FrameMismatch { expected: String, found: String },

    /// A raw vertex array mixes bare numbers with unit-carrying values
    #[error("Ambiguous units: vertex array mixes bare numbers and quantities")]
    AmbiguousUnits,

    /// A required input field is absent
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Structurally invalid input (length mismatch, wrong dimension, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot convert {from} to {to}")]
    UnitConversion { from: Unit, to: Unit },

    /// No constructor is registered for this input kind
    #[error("No constructor registered for input kind '{0}'")]
    UnsupportedInput(String),

    /// Frame-bound data was given to something that cannot transform it
    #[error("Unsupported frame: {0}")]
    UnsupportedFrame(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// An export mapping of one footprint type was given to another type
    #[error("Export mismatch: expected a '{expected}' footprint, got '{found}'")]
    ExportMismatch { expected: &'static str, found: &'static str },

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Invalid polygon: {0}")]
    InvalidPolygon(#[from] PathError),

    /// No registered identifier recognised the candidate
    #[error("No format could be identified for {0}")]
    FormatNotFound(String),

    /// More than one registered identifier recognised the candidate
    #[error("Format is ambiguous between {candidates:?}")]
    AmbiguousFormat { candidates: Vec<String> },

    /// The format is known but has no handler for this operation
    #[error("No {op} registered for format '{format}'")]
    NoHandler { op: &'static str, format: String },
}

impl PawprintError {
    pub(crate) fn frame_mismatch(expected: impl ToString, found: impl ToString) -> Self {
        Self::FrameMismatch { expected: expected.to_string(), found: found.to_string() }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Result type alias for pawprint operations.
pub type Result<T> = std::result::Result<T, PawprintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let e = PawprintError::frame_mismatch("icrs", "galactic");
        assert_eq!(e.to_string(), "Frame mismatch: expected icrs, got galactic");

        let e = PawprintError::AmbiguousFormat { candidates: vec!["a".into(), "b".into()] };
        assert!(e.to_string().contains("\"a\""));
    }

    #[test]
    fn error_from_path_error() {
        let err: PawprintError = PathError::TooFewVertices(2).into();
        assert!(matches!(err, PawprintError::InvalidPolygon(PathError::TooFewVertices(2))));
    }
}
