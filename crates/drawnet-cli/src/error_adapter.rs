//! Error adapter for converting DrawnetError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! When a [`drawnet_parser::error::ParseError`] contains multiple diagnostics,
//! each diagnostic is rendered independently. Warnings returned next to a
//! successful extraction go through the same [`DiagnosticAdapter`].

use std::fmt;

use miette::{
    Diagnostic as MietteDiagnostic, GraphicalReportHandler, LabeledSpan, Severity as MietteSeverity,
    SourceSpan,
};

use drawnet::DrawnetError;
use drawnet_parser::error::{Diagnostic, Severity};

/// Adapter for a single drawnet diagnostic.
///
/// This adapter wraps a single [`Diagnostic`] and implements
/// [`MietteDiagnostic`] to enable rich error formatting in the CLI.
pub struct DiagnosticAdapter<'a> {
    /// The wrapped diagnostic
    diag: &'a Diagnostic,
    /// Diagram source for displaying the offending cells
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<MietteSeverity> {
        Some(match self.diag.severity() {
            Severity::Error => MietteSeverity::Error,
            Severity::Warning => MietteSeverity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for non-diagnostic [`DrawnetError`] variants.
///
/// This adapter handles errors that don't carry source locations, such as
/// I/O errors, configuration errors, and export errors.
pub struct ErrorAdapter<'a>(pub &'a DrawnetError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            DrawnetError::Io(_) => "drawnet::io",
            DrawnetError::Config(_) => "drawnet::config",
            DrawnetError::Parse { .. } => return None,
            DrawnetError::Export(_) => "drawnet::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            DrawnetError::Config(_) => Some(Box::new(
                "check the [shapes] patterns and [topology] stages in the configuration file",
            )),
            _ => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a single diagnostic or a non-diagnostic error,
/// providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A rich diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<MietteSeverity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a drawnet [`Span`](drawnet_parser::Span) to a miette [`SourceSpan`].
fn span_to_miette(span: drawnet_parser::Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`DrawnetError`] into a list of reportable errors.
///
/// For [`DrawnetError::Parse`], this returns one [`Reportable`] for
/// each diagnostic in the error. For other error variants, this returns a
/// single [`Reportable`].
pub fn to_reportables(err: &DrawnetError) -> Vec<Reportable<'_>> {
    match err {
        DrawnetError::Parse {
            err: parse_err,
            src,
        } => parse_err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

/// Render one reportable with miette's graphical handler.
pub fn render(reportable: &dyn MietteDiagnostic) -> Result<String, fmt::Error> {
    let mut writer = String::new();
    GraphicalReportHandler::new().render_report(&mut writer, reportable)?;
    Ok(writer)
}

#[cfg(test)]
mod tests {
    use drawnet_parser::{
        Span,
        error::{ErrorCode, ParseError},
    };

    use super::*;

    #[test]
    fn test_single_diagnostic() {
        let diag = Diagnostic::error("dangling edge endpoint")
            .with_code(ErrorCode::E200)
            .with_label(Span::new(10..30), "edge `e1`")
            .with_help("connect both ends of the edge to a shape");
        let err = DrawnetError::new_parse_error(ParseError::from(diag), "x".repeat(40));

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        let reportable = &reportables[0];
        assert_eq!(reportable.to_string(), "dangling edge endpoint");
        assert_eq!(reportable.code().unwrap().to_string(), "E200");
        assert_eq!(
            reportable.help().unwrap().to_string(),
            "connect both ends of the edge to a shape"
        );
        assert!(reportable.source_code().is_some());
        assert_eq!(reportable.severity(), Some(MietteSeverity::Error));
    }

    #[test]
    fn test_multiple_diagnostics() {
        let diagnostics = vec![
            Diagnostic::error("first ambiguous shape").with_code(ErrorCode::E100),
            Diagnostic::error("second ambiguous shape").with_code(ErrorCode::E100),
        ];
        let err = DrawnetError::new_parse_error(ParseError::new(diagnostics), "");

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 2);
        assert_eq!(reportables[0].to_string(), "first ambiguous shape");
        assert_eq!(reportables[1].to_string(), "second ambiguous shape");
    }

    #[test]
    fn test_non_diagnostic_errors() {
        let err = DrawnetError::Config("router pattern is invalid".to_string());
        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        let reportable = &reportables[0];
        assert!(matches!(reportable, Reportable::Error(_)));
        assert_eq!(reportable.code().unwrap().to_string(), "drawnet::config");
        assert!(reportable.help().is_some());
        assert!(reportable.source_code().is_none());
        assert!(reportable.labels().is_none());
    }

    #[test]
    fn test_io_error_code() {
        let err = DrawnetError::Io(std::io::Error::other("disk full"));
        let reportables = to_reportables(&err);
        assert_eq!(reportables[0].code().unwrap().to_string(), "drawnet::io");
        assert!(reportables[0].help().is_none());
    }

    #[test]
    fn test_warning_severity() {
        let diag = Diagnostic::warning("subnet `10.0.0.300/24` ignored").with_code(ErrorCode::E303);
        let adapter = DiagnosticAdapter::new(&diag, "source");
        assert_eq!(adapter.severity(), Some(MietteSeverity::Warning));
    }

    #[test]
    fn test_primary_flag_on_labels() {
        let diag = Diagnostic::error("error with labels")
            .with_label(Span::new(0..5), "primary")
            .with_secondary_label(Span::new(10..15), "secondary");

        let adapter = DiagnosticAdapter::new(&diag, "some source code");

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].primary());
        assert!(!labels[1].primary());
        assert_eq!(labels[1].label(), Some("secondary"));
    }

    #[test]
    fn test_no_labels() {
        let diag = Diagnostic::warning("empty label");
        let adapter = DiagnosticAdapter::new(&diag, "");
        assert!(adapter.labels().is_none());
    }

    #[test]
    fn test_render_contains_message() {
        let err = DrawnetError::Config("bad pattern".to_string());
        let reportables = to_reportables(&err);
        let text = render(&reportables[0]).unwrap();
        assert!(text.contains("bad pattern"));
    }
}
