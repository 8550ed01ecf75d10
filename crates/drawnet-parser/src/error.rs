//! Error and diagnostic system for the drawnet extraction engine.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Multiple labeled spans pointing into the diagram document
//! - Severity levels
//! - Diagnostic collector for accumulating warnings and errors
//!
//! # Overview
//!
//! Problems with individual diagram cells (a dangling edge endpoint, a label
//! token that is not a subnet) are reported as warnings and never stop a
//! conversion. Only whole-document or whole-stage failures are errors. All
//! errors of a run are returned together in a [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use drawnet_parser::error::{Diagnostic, ErrorCode};
//! # use drawnet_parser::Span;
//!
//! let diag = Diagnostic::warning("edge `e1` references missing cell `r9`")
//!     .with_code(ErrorCode::E200)
//!     .with_label(Span::new(120..180), "dangling target")
//!     .with_help("the edge is kept as a stub link");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
