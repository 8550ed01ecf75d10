//! Error types for drawnet operations.
//!
//! [`DrawnetError`] wraps every failure a conversion can end in. Each variant
//! maps to its own process exit status through [`DrawnetError::exit_code`], and
//! extraction failures further distinguish the document problem or the empty
//! stage that stopped the run.

use std::io;

use thiserror::Error;

use drawnet_parser::{
    ShapePatternError,
    error::{ErrorCode, ParseError},
};

/// The main error type for drawnet operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the diagram source next to the structured
/// diagnostics so callers can render labelled excerpts of the offending cells.
#[derive(Debug, Error)]
pub enum DrawnetError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Export error: {0}")]
    Export(#[from] crate::export::Error),
}

impl From<ShapePatternError> for DrawnetError {
    fn from(error: ShapePatternError) -> Self {
        Self::Config(error.to_string())
    }
}

impl DrawnetError {
    /// Create a new `Parse` error with the associated diagram source.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }

    /// Process exit status for this error.
    ///
    /// | Status | Condition                                      |
    /// |--------|------------------------------------------------|
    /// | 2      | invalid configuration or ambiguous shapes      |
    /// | 3      | malformed or compressed document               |
    /// | 4      | document without styled cells                  |
    /// | 10     | no routers                                     |
    /// | 11     | no links                                       |
    /// | 12     | no networks                                    |
    /// | 20     | output rendering failed                        |
    /// | 74     | I/O failure                                    |
    pub fn exit_code(&self) -> u8 {
        match self {
            DrawnetError::Io(_) => 74,
            DrawnetError::Config(_) => 2,
            DrawnetError::Export(_) => 20,
            DrawnetError::Parse { err, .. } => match err.primary_code() {
                Some(ErrorCode::E100) => 2,
                Some(ErrorCode::E002) => 4,
                Some(ErrorCode::E300) => 10,
                Some(ErrorCode::E301) => 11,
                Some(ErrorCode::E302) => 12,
                _ => 3,
            },
        }
    }
}
