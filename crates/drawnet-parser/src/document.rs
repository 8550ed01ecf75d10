//! Diagram document loading.
//!
//! Reads an uncompressed mxGraph document and produces one [`RawElement`] per
//! styled `mxCell`, in document order. Nothing is interpreted here beyond
//! attribute extraction; classification happens in [`crate::classify`].

use log::{debug, trace};

use drawnet_core::identifier::CellId;

use crate::{
    error::{Diagnostic, ErrorCode},
    span::Span,
};

/// Wrapper elements draw.io uses for cells with custom properties.
const WRAPPER_TAGS: [&str; 2] = ["object", "UserObject"];

/// The atomic unit of a diagram document.
///
/// Immutable once read.
#[derive(Debug, Clone, PartialEq)]
pub struct RawElement {
    id: CellId,
    style: Option<String>,
    value: Option<String>,
    source: Option<CellId>,
    target: Option<CellId>,
    parent: Option<CellId>,
    span: Span,
}

impl RawElement {
    /// Create an element with only an identifier.
    pub fn new(id: impl Into<CellId>) -> Self {
        Self {
            id: id.into(),
            style: None,
            value: None,
            source: None,
            target: None,
            parent: None,
            span: Span::default(),
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<CellId>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<CellId>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<CellId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn source(&self) -> Option<CellId> {
        self.source
    }

    pub fn target(&self) -> Option<CellId> {
        self.target
    }

    pub fn parent(&self) -> Option<CellId> {
        self.parent
    }

    /// Location of the cell in the document.
    pub fn span(&self) -> Span {
        self.span
    }
}

/// Load every styled cell from an mxGraph document.
///
/// # Errors
///
/// - `E001` if the text is not well-formed XML
/// - `E003` if a `<diagram>` holds a compressed payload
/// - `E002` if no `mxCell` carries a `style` attribute
pub fn load_document(source: &str) -> Result<Vec<RawElement>, Diagnostic> {
    let doc = roxmltree::Document::parse(source).map_err(|err| {
        let pos = err.pos();
        let offset = offset_of(source, pos.row, pos.col);
        Diagnostic::error(format!("diagram is not well-formed XML: {err}"))
            .with_code(ErrorCode::E001)
            .with_label(Span::new(offset..offset + 1), "parsing stopped here")
    })?;

    for diagram in doc
        .descendants()
        .filter(|node| node.has_tag_name("diagram"))
    {
        let has_model = diagram.children().any(|child| child.is_element());
        let has_payload = diagram
            .text()
            .is_some_and(|text| !text.trim().is_empty());
        if !has_model && has_payload {
            return Err(Diagnostic::error("diagram payload is compressed")
                .with_code(ErrorCode::E003)
                .with_label(Span::new(diagram.range()), "encoded diagram")
                .with_help(
                    "export the diagram with compression disabled (File > Properties > Compressed)",
                ));
        }
    }

    let mut elements = Vec::new();
    for (position, cell) in doc
        .descendants()
        .filter(|node| node.has_tag_name("mxCell"))
        .enumerate()
    {
        let Some(style) = cell.attribute("style") else {
            continue;
        };

        let wrapper = cell
            .parent_element()
            .filter(|parent| WRAPPER_TAGS.contains(&parent.tag_name().name()));

        let (id, value, span) = match wrapper {
            Some(wrapper) => (
                wrapper.attribute("id"),
                wrapper.attribute("label"),
                Span::new(wrapper.range()),
            ),
            None => (
                cell.attribute("id"),
                cell.attribute("value"),
                Span::new(cell.range()),
            ),
        };

        let Some(id) = id else {
            debug!(position; "Skipping styled cell without an id");
            continue;
        };

        let mut element = RawElement::new(id).with_style(style).with_span(span);
        if let Some(value) = value {
            element = element.with_value(value);
        }
        if let Some(source) = cell.attribute("source") {
            element = element.with_source(source);
        }
        if let Some(target) = cell.attribute("target") {
            element = element.with_target(target);
        }
        if let Some(parent) = cell.attribute("parent") {
            element = element.with_parent(parent);
        }

        trace!(element:?; "Loaded cell");
        elements.push(element);
    }

    if elements.is_empty() {
        return Err(Diagnostic::error("document contains no styled cells")
            .with_code(ErrorCode::E002)
            .with_label(Span::new(doc.root_element().range()), "empty diagram")
            .with_help("draw at least one router shape connected by an edge"));
    }

    debug!(cells = elements.len(); "Document loaded");
    Ok(elements)
}

/// Convert a 1-based row/column position into a byte offset.
fn offset_of(source: &str, row: u32, col: u32) -> usize {
    let mut offset = 0;
    for (idx, line) in source.split_inclusive('\n').enumerate() {
        if idx + 1 == row as usize {
            let col_bytes: usize = line
                .chars()
                .take(col.saturating_sub(1) as usize)
                .map(char::len_utf8)
                .sum();
            return (offset + col_bytes).min(source.len().saturating_sub(1));
        }
        offset += line.len();
    }
    source.len().saturating_sub(1)
}
