//! Shape classification.
//!
//! Decides, for every [`RawElement`], which role it plays in the diagram. Router
//! and network shapes are recognised by caller-supplied [`ShapePatterns`];
//! edge-labels and edges by fixed rules.
//!
//! Roles are assigned once here and never change afterwards: the resulting
//! [`ClassifiedElement`] carries the role as an enum variant together with the
//! fields only that role has.

use std::fmt;

use log::debug;
use regex::Regex;
use thiserror::Error;

use drawnet_core::identifier::CellId;

use crate::{
    document::RawElement,
    error::{Diagnostic, ErrorCode},
    span::Span,
};

/// Fixed style prefix of edge-label cells.
const EDGE_LABEL_PATTERN: &str = "edgeLabel";

/// The two configurable shape roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeRole {
    Router,
    Network,
}

impl fmt::Display for ShapeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeRole::Router => write!(f, "router"),
            ShapeRole::Network => write!(f, "network"),
        }
    }
}

/// Errors raised while building [`ShapePatterns`].
#[derive(Debug, Error)]
pub enum ShapePatternError {
    #[error("invalid {role} pattern `{pattern}`: {source}")]
    InvalidPattern {
        role: ShapeRole,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{0} pattern configured more than once")]
    DuplicateRole(ShapeRole),

    #[error("router and network patterns are identical (`{0}`)")]
    IdenticalPatterns(String),

    #[error("no {0} pattern configured")]
    MissingRole(ShapeRole),
}

/// Ordered role-to-pattern mapping.
///
/// Patterns are regular expressions matched at the start of the style string.
/// When several patterns match, the first configured role wins, but the
/// classifier also reports the overlap as an error (see [`classify`]).
#[derive(Debug, Clone)]
pub struct ShapePatterns {
    patterns: Vec<(ShapeRole, Regex)>,
}

impl ShapePatterns {
    /// Build the mapping from `(role, pattern)` pairs in matching order.
    ///
    /// # Errors
    ///
    /// Fails if a pattern does not compile, a role appears twice or not at all,
    /// or the router and network patterns are the same text.
    pub fn new<'a>(
        patterns: impl IntoIterator<Item = (ShapeRole, &'a str)>,
    ) -> Result<Self, ShapePatternError> {
        let mut compiled: Vec<(ShapeRole, Regex)> = Vec::new();
        let mut sources: Vec<&str> = Vec::new();

        for (role, pattern) in patterns {
            if compiled.iter().any(|(existing, _)| *existing == role) {
                return Err(ShapePatternError::DuplicateRole(role));
            }
            if sources.contains(&pattern) {
                return Err(ShapePatternError::IdenticalPatterns(pattern.to_string()));
            }

            let regex = Regex::new(&format!("^(?:{pattern})")).map_err(|source| {
                ShapePatternError::InvalidPattern {
                    role,
                    pattern: pattern.to_string(),
                    source,
                }
            })?;
            compiled.push((role, regex));
            sources.push(pattern);
        }

        for role in [ShapeRole::Router, ShapeRole::Network] {
            if !compiled.iter().any(|(existing, _)| *existing == role) {
                return Err(ShapePatternError::MissingRole(role));
            }
        }

        Ok(Self { patterns: compiled })
    }

    /// All roles whose pattern matches `style`, in configured order.
    pub fn matching_roles(&self, style: &str) -> Vec<ShapeRole> {
        self.patterns
            .iter()
            .filter(|(_, regex)| regex.is_match(style))
            .map(|(role, _)| *role)
            .collect()
    }
}

impl Default for ShapePatterns {
    /// Ellipses are routers, hexagons are broadcast networks.
    fn default() -> Self {
        Self {
            patterns: vec![
                (
                    ShapeRole::Router,
                    Regex::new("^(?:ellipse)").expect("static pattern"),
                ),
                (
                    ShapeRole::Network,
                    Regex::new("^(?:shape=hexagon)").expect("static pattern"),
                ),
            ],
        }
    }
}

/// Role-specific payload of a classified element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// A router or network shape.
    Shape { role: ShapeRole, label: String },
    /// A connector between two cells.
    Edge {
        label: Option<String>,
        source: Option<CellId>,
        target: Option<CellId>,
    },
    /// Text decorating an edge.
    EdgeLabel {
        label: String,
        parent: Option<CellId>,
    },
    /// Anything else in the document.
    Other,
}

/// A raw element annotated with its role.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedElement {
    id: CellId,
    span: Span,
    kind: ElementKind,
}

impl ClassifiedElement {
    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub(crate) fn into_kind(self) -> ElementKind {
        self.kind
    }
}

/// Classify one element.
///
/// Shape patterns are tried first, in configured order. Otherwise a style
/// starting with `edgeLabel` makes an edge-label, a `source` or `target`
/// attribute makes an edge, and everything else is [`ElementKind::Other`].
///
/// A style matching more than one shape pattern is classified with the first
/// role and additionally returns an `E100` error diagnostic.
pub fn classify(
    element: &RawElement,
    patterns: &ShapePatterns,
) -> (ClassifiedElement, Option<Diagnostic>) {
    let style = element.style().unwrap_or_default();
    let matching = patterns.matching_roles(style);

    let ambiguity = (matching.len() > 1).then(|| {
        Diagnostic::error(format!(
            "style of cell `{}` matches both the {} and the {} pattern",
            element.id(),
            matching[0],
            matching[1]
        ))
        .with_code(ErrorCode::E100)
        .with_label(element.span(), "ambiguous shape")
        .with_help("make the router and network shape patterns disjoint")
    });

    let kind = if let Some(role) = matching.first() {
        ElementKind::Shape {
            role: *role,
            label: element.value().unwrap_or_default().to_string(),
        }
    } else if style.starts_with(EDGE_LABEL_PATTERN) {
        ElementKind::EdgeLabel {
            label: element.value().unwrap_or_default().to_string(),
            parent: element.parent(),
        }
    } else if element.source().is_some() || element.target().is_some() {
        ElementKind::Edge {
            label: element.value().map(str::to_string),
            source: element.source(),
            target: element.target(),
        }
    } else {
        ElementKind::Other
    };

    (
        ClassifiedElement {
            id: element.id(),
            span: element.span(),
            kind,
        },
        ambiguity,
    )
}

/// Classify every element, keeping document order.
pub fn classify_all(
    elements: &[RawElement],
    patterns: &ShapePatterns,
) -> (Vec<ClassifiedElement>, Vec<Diagnostic>) {
    let mut classified = Vec::with_capacity(elements.len());
    let mut diagnostics = Vec::new();

    for element in elements {
        let (element, diagnostic) = classify(element, patterns);
        classified.push(element);
        diagnostics.extend(diagnostic);
    }

    debug!(
        shapes = classified.iter().filter(|e| matches!(e.kind, ElementKind::Shape { .. })).count(),
        edges = classified.iter().filter(|e| matches!(e.kind, ElementKind::Edge { .. })).count();
        "Elements classified"
    );
    (classified, diagnostics)
}
