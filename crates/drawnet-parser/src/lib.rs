//! # Drawnet Parser
//!
//! Extraction engine turning a draw.io network diagram into a
//! [`Topology`](drawnet_core::topology::Topology) of routers, links and
//! networks.
//!
//! ## Usage
//!
//! ```
//! # use drawnet_parser::{parse, ParseConfig, StageRequirements, error::ParseError};
//! # use drawnet_core::topology::Stage;
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"<mxGraphModel><root>
//!         <mxCell id="0"/><mxCell id="1" parent="0"/>
//!         <mxCell id="a" value="R" style="ellipse;" vertex="1" parent="1"/>
//!         <mxCell id="b" value="R" style="ellipse;" vertex="1" parent="1"/>
//!         <mxCell id="e" value="10.0.0.0/30" style="endArrow=none;" edge="1" parent="1" source="a" target="b"/>
//!     </root></mxGraphModel>"#;
//!
//!     let config = ParseConfig {
//!         stages: StageRequirements::allowing_empty([Stage::Networks]),
//!         ..ParseConfig::default()
//!     };
//!     let output = parse(source, &config)?;
//!     assert_eq!(output.topology.routers().len(), 2);
//!     assert_eq!(output.topology.links().len(), 1);
//!     Ok(())
//! }
//! ```

mod classify;
mod config;
mod document;
pub mod error;
mod graph;
pub mod label;
mod span;
mod topology;

pub use classify::{ShapePatternError, ShapePatterns, ShapeRole};
pub use config::{ParseConfig, StageRequirements};
pub use document::{RawElement, load_document};
pub use span::Span;
pub use topology::{Disambiguated, disambiguate};

use log::info;

use drawnet_core::topology::Topology;

use classify::classify_all;
use error::{Diagnostic, DiagnosticCollector, ParseError};
use graph::DiagramGraph;
use topology::TopologyBuilder;

/// A successfully built topology and the warnings raised while building it.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub topology: Topology,
    pub warnings: Vec<Diagnostic>,
}

/// Parse a diagram document into a topology.
///
/// This is the main entry point. It runs the complete pipeline:
///
/// 1. **Load** - Read styled cells from the mxGraph XML
/// 2. **Classify** - Assign each cell a role
/// 3. **Resolve** - Turn edge and edge-label references into arena indices
/// 4. **Build** - Derive routers, networks and links
///
/// # Errors
///
/// Returns a [`ParseError`] holding every diagnostic of the run when the
/// document cannot be loaded, the shape patterns are ambiguous for some cell,
/// or a required stage produced nothing.
pub fn parse(source: &str, config: &ParseConfig) -> Result<ParseOutput, ParseError> {
    // Step 1: Load
    let elements = load_document(source)?;
    build_topology(&elements, config)
}

/// Build a topology from already loaded elements.
///
/// Runs steps 2 to 4 of [`parse`].
///
/// # Errors
///
/// See [`parse`]. An empty element list is reported as an empty document.
pub fn build_topology(
    elements: &[RawElement],
    config: &ParseConfig,
) -> Result<ParseOutput, ParseError> {
    if elements.is_empty() {
        return Err(Diagnostic::error("document contains no styled cells")
            .with_code(error::ErrorCode::E002)
            .into());
    }

    // Step 2: Classify
    let (classified, ambiguities) = classify_all(elements, &config.shapes);
    if !ambiguities.is_empty() {
        return Err(ambiguities.into());
    }

    let mut diagnostics = DiagnosticCollector::new();

    // Step 3: Resolve
    let (graph, warnings) = DiagramGraph::build(classified);
    for diagnostic in warnings {
        diagnostics.emit(diagnostic);
    }

    // Step 4: Build
    let (topology, built) = TopologyBuilder::new(&graph, config.stages).build();
    for diagnostic in built {
        diagnostics.emit(diagnostic);
    }

    let warnings = diagnostics.finish()?;
    info!(
        routers = topology.routers().len(),
        links = topology.links().len(),
        networks = topology.networks().len(),
        warnings = warnings.len();
        "Topology extracted"
    );
    Ok(ParseOutput { topology, warnings })
}
