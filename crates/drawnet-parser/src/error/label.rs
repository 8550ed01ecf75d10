//! Labeled spans for diagnostic messages.
//!
//! A label attaches a short message to a cell of the diagram document.

use crate::span::Span;

/// A labeled span in the diagram document.
///
/// The primary label marks the cell the diagnostic is about. Secondary labels
/// point at related cells, e.g. the shape whose label collided with another
/// one, or the edge an edge-label was supposed to decorate.
///
/// ```text
/// warning[E200]: edge `e7` references missing cell `r9`
///    |
/// 41 | <mxCell id="e7" edge="1" source="r1" target="r9" style="...">
///    | ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^ dangling target
/// ```
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}
