//! Diagram graph and reference resolution.
//!
//! All classified elements live in one arena ([`DiagramGraph`]) addressed by
//! [`ElementIndex`]. Edge endpoints and edge-label parents start out as raw
//! cell identifiers and are resolved to arena indices in two passes:
//!
//! 1. Every edge endpoint is looked up by identifier. A hit records the index on
//!    the edge and appends the edge to the shape's incident edge list. A miss
//!    leaves an explicit [`Endpoint::Absent`] and a `E200` warning.
//! 2. Every edge-label parent is looked up. A hit on an edge overwrites the
//!    edge's label with the edge-label's text.
//!
//! Each pass first computes all lookups against the immutable arena and only
//! then applies them, so the result depends on identifiers alone, never on the
//! order edges are visited in.

use std::collections::HashMap;

use log::{debug, trace};

use drawnet_core::identifier::{CellId, ElementIndex};

use crate::{
    classify::{ClassifiedElement, ElementKind, ShapeRole},
    error::{Diagnostic, ErrorCode},
    span::Span,
};

/// A reference from one element to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// A raw identifier not yet looked up.
    Unresolved(CellId),
    /// A reference to an element in the same graph.
    Resolved(ElementIndex),
    /// No reference, or one that pointed at a missing cell.
    Absent,
}

impl Endpoint {
    fn from_id(id: Option<CellId>) -> Self {
        id.map_or(Endpoint::Absent, Endpoint::Unresolved)
    }

    /// Returns the resolved index, if any.
    pub fn index(&self) -> Option<ElementIndex> {
        match self {
            Endpoint::Resolved(idx) => Some(*idx),
            Endpoint::Unresolved(_) | Endpoint::Absent => None,
        }
    }
}

/// A router or network shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeNode {
    pub role: ShapeRole,
    pub label: String,
    /// Edges touching this shape, in document order.
    pub incident_edges: Vec<ElementIndex>,
}

/// An edge between two cells.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeNode {
    pub label: Option<String>,
    pub source: Endpoint,
    pub target: Endpoint,
}

/// Text attached to an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabelNode {
    pub label: String,
    pub parent: Endpoint,
}

/// Role-specific graph payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Shape(ShapeNode),
    Edge(EdgeNode),
    EdgeLabel(EdgeLabelNode),
    Other,
}

/// An element stored in the graph arena.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphElement {
    id: CellId,
    span: Span,
    node: Node,
}

impl GraphElement {
    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Returns the shape payload if this element is a shape.
    pub fn as_shape(&self) -> Option<&ShapeNode> {
        match &self.node {
            Node::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    /// Returns the edge payload if this element is an edge.
    pub fn as_edge(&self) -> Option<&EdgeNode> {
        match &self.node {
            Node::Edge(edge) => Some(edge),
            _ => None,
        }
    }
}

/// Which end of an edge a reference belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    Source,
    Target,
}

impl End {
    fn as_str(self) -> &'static str {
        match self {
            End::Source => "source",
            End::Target => "target",
        }
    }
}

/// Arena of classified elements with resolved references.
#[derive(Debug, Clone, Default)]
pub struct DiagramGraph {
    elements: Vec<GraphElement>,
    by_id: HashMap<CellId, ElementIndex>,
}

impl DiagramGraph {
    /// Build the graph and run both resolution passes.
    ///
    /// Returns the graph together with the warnings raised for dangling or
    /// misplaced references. After this call no [`Endpoint::Unresolved`]
    /// remains anywhere in the graph.
    pub fn build(classified: Vec<ClassifiedElement>) -> (Self, Vec<Diagnostic>) {
        let mut graph = Self::default();
        for element in classified {
            graph.insert(element);
        }

        let mut diagnostics = graph.resolve_edges();
        diagnostics.extend(graph.resolve_edge_labels());

        debug!(elements = graph.elements.len(); "Diagram graph resolved");
        (graph, diagnostics)
    }

    fn insert(&mut self, element: ClassifiedElement) {
        let id = element.id();
        let span = element.span();
        let node = match element.into_kind() {
            ElementKind::Shape { role, label } => Node::Shape(ShapeNode {
                role,
                label,
                incident_edges: Vec::new(),
            }),
            ElementKind::Edge {
                label,
                source,
                target,
            } => Node::Edge(EdgeNode {
                label,
                source: Endpoint::from_id(source),
                target: Endpoint::from_id(target),
            }),
            ElementKind::EdgeLabel { label, parent } => Node::EdgeLabel(EdgeLabelNode {
                label,
                parent: Endpoint::from_id(parent),
            }),
            ElementKind::Other => Node::Other,
        };

        let idx = ElementIndex::new(self.elements.len());
        // The first cell with a given identifier owns it.
        self.by_id.entry(id).or_insert(idx);
        self.elements.push(GraphElement { id, span, node });
    }

    /// Pass 1: resolve edge endpoints and record incidence on shapes.
    fn resolve_edges(&mut self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut resolutions: Vec<(ElementIndex, End, Option<ElementIndex>)> = Vec::new();

        for (pos, element) in self.elements.iter().enumerate() {
            let Node::Edge(edge) = &element.node else {
                continue;
            };
            for (end, endpoint) in [(End::Source, edge.source), (End::Target, edge.target)] {
                let Endpoint::Unresolved(id) = endpoint else {
                    continue;
                };
                let found = self.lookup(id);
                if found.is_none() {
                    diagnostics.push(
                        Diagnostic::warning(format!(
                            "edge `{}` references missing cell `{id}`",
                            element.id
                        ))
                        .with_code(ErrorCode::E200)
                        .with_label(element.span, format!("dangling {}", end.as_str()))
                        .with_help("connect both ends of the edge to a shape"),
                    );
                }
                resolutions.push((ElementIndex::new(pos), end, found));
            }
        }

        for (edge_idx, end, found) in resolutions {
            if let Node::Edge(edge) = &mut self.elements[edge_idx.get()].node {
                let endpoint = found.map_or(Endpoint::Absent, Endpoint::Resolved);
                match end {
                    End::Source => edge.source = endpoint,
                    End::Target => edge.target = endpoint,
                }
            }
            if let Some(target_idx) = found {
                if let Node::Shape(shape) = &mut self.elements[target_idx.get()].node {
                    if !shape.incident_edges.contains(&edge_idx) {
                        shape.incident_edges.push(edge_idx);
                    }
                }
            }
            trace!(edge = edge_idx.get(), end = end.as_str(), found:?; "Endpoint resolved");
        }

        diagnostics
    }

    /// Pass 2: resolve edge-label parents and move their text onto edges.
    fn resolve_edge_labels(&mut self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut resolutions: Vec<(ElementIndex, Option<ElementIndex>)> = Vec::new();

        for (pos, element) in self.elements.iter().enumerate() {
            let Node::EdgeLabel(label) = &element.node else {
                continue;
            };
            let Endpoint::Unresolved(id) = label.parent else {
                continue;
            };
            let found = self.lookup(id);
            match found {
                None => diagnostics.push(
                    Diagnostic::warning(format!(
                        "edge-label `{}` references missing cell `{id}`",
                        element.id
                    ))
                    .with_code(ErrorCode::E201)
                    .with_label(element.span, "dangling parent"),
                ),
                Some(parent) if self.elements[parent.get()].as_edge().is_none() => diagnostics
                    .push(
                        Diagnostic::warning(format!(
                            "edge-label `{}` is attached to `{id}`, which is not an edge",
                            element.id
                        ))
                        .with_code(ErrorCode::E202)
                        .with_label(element.span, "label ignored")
                        .with_secondary_label(self.elements[parent.get()].span, "parent cell"),
                    ),
                Some(_) => {}
            }
            resolutions.push((ElementIndex::new(pos), found));
        }

        // Applied in document order: the last label of an edge wins.
        for (label_idx, found) in resolutions {
            let text = match &mut self.elements[label_idx.get()].node {
                Node::EdgeLabel(label) => {
                    label.parent = found.map_or(Endpoint::Absent, Endpoint::Resolved);
                    label.label.clone()
                }
                _ => continue,
            };
            let Some(parent_idx) = found else {
                continue;
            };
            if let Node::Edge(edge) = &mut self.elements[parent_idx.get()].node {
                edge.label = Some(text);
            }
        }

        diagnostics
    }

    fn lookup(&self, id: CellId) -> Option<ElementIndex> {
        self.by_id.get(&id).copied()
    }

    /// Look up an element by cell identifier.
    pub fn find(&self, id: CellId) -> Option<(ElementIndex, &GraphElement)> {
        self.lookup(id).map(|idx| (idx, &self.elements[idx.get()]))
    }

    /// Element at `idx`.
    pub fn element(&self, idx: ElementIndex) -> Option<&GraphElement> {
        self.elements.get(idx.get())
    }

    /// All elements with their indices, in document order.
    pub fn elements(&self) -> impl Iterator<Item = (ElementIndex, &GraphElement)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(pos, element)| (ElementIndex::new(pos), element))
    }

    /// Shapes of `role`, in document order.
    pub fn shapes(
        &self,
        role: ShapeRole,
    ) -> impl Iterator<Item = (ElementIndex, &GraphElement, &ShapeNode)> {
        self.elements().filter_map(move |(idx, element)| match element.as_shape() {
            Some(shape) if shape.role == role => Some((idx, element, shape)),
            _ => None,
        })
    }

    /// Edges, in document order.
    pub fn edges(&self) -> impl Iterator<Item = (ElementIndex, &GraphElement, &EdgeNode)> {
        self.elements()
            .filter_map(|(idx, element)| element.as_edge().map(|edge| (idx, element, edge)))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
