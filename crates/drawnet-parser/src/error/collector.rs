//! Collector for accumulating diagnostics during a conversion.
//!
//! The [`DiagnosticCollector`] lets every phase report problems with individual
//! cells without stopping, and decides at the end whether the run failed.

use crate::error::{Diagnostic, ParseError};

/// A collector for accumulating diagnostics across phases.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Returns `true` once an error has been emitted.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Finish collection.
    ///
    /// - If there are errors, returns `Err(ParseError)` with all diagnostics,
    ///   warnings included.
    /// - Otherwise returns the collected warnings.
    pub fn finish(self) -> Result<Vec<Diagnostic>, ParseError> {
        if self.has_errors {
            Err(ParseError::new(self.diagnostics))
        } else {
            Ok(self.diagnostics)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorCode, span::Span};

    #[test]
    fn test_collector_new_finish_ok() {
        let collector = DiagnosticCollector::new();
        assert!(collector.finish().unwrap().is_empty());
    }

    #[test]
    fn test_collector_warnings_are_returned() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(Diagnostic::warning("dangling target").with_code(ErrorCode::E200));
        collector.emit(Diagnostic::warning("bad subnet").with_code(ErrorCode::E303));

        let warnings = collector.finish().unwrap();
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[1].code(), Some(ErrorCode::E303));
    }

    #[test]
    fn test_collector_error_keeps_everything() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(Diagnostic::warning("dangling target"));
        collector.emit(
            Diagnostic::error("no routers")
                .with_code(ErrorCode::E300)
                .with_label(Span::new(0..4), "here"),
        );
        assert!(collector.has_errors());

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 2);
        assert_eq!(err.diagnostics()[1].message(), "no routers");
    }
}
