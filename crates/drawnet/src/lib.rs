//! Drawnet - turn draw.io network diagrams into container labs.
//!
//! A diagram of router shapes, broadcast network shapes and connecting edges
//! is extracted into a [`Topology`](topology::Topology) and rendered as a
//! compose document with one FRR container per router, plus a provisioning
//! script enabling routing daemons and VRFs.

pub mod config;

mod error;
mod export;

pub use drawnet_core::{identifier, subnet, topology};
pub use drawnet_parser::{ParseOutput, error::Diagnostic};

pub use error::DrawnetError;

use log::{debug, info, trace};

use config::AppConfig;
use export::{Exporter, compose::ComposeExporter, provision::ProvisionExporter};
use topology::Topology;

/// Builder for extracting and rendering container labs.
///
/// # Examples
///
/// ```rust,no_run
/// use drawnet::{LabBuilder, config::AppConfig};
///
/// let source = std::fs::read_to_string("lab.drawio").expect("Failed to read");
///
/// let builder = LabBuilder::new(AppConfig::default());
///
/// // Extract the topology
/// let lab = builder.parse(&source).expect("Failed to parse");
///
/// // Render the outputs
/// let compose = builder.render_compose(&lab.topology).expect("Failed to render");
/// let script = builder.render_provisioning(&lab.topology).expect("Failed to render");
/// ```
#[derive(Default)]
pub struct LabBuilder {
    config: AppConfig,
}

impl LabBuilder {
    /// Create a new lab builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// The configuration this builder uses.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Extract the topology of a draw.io document.
    ///
    /// Warnings about individual cells are returned alongside the topology.
    ///
    /// # Errors
    ///
    /// Returns `DrawnetError::Config` for invalid shape patterns and
    /// `DrawnetError::Parse` when the document is unusable or a required stage
    /// produced nothing.
    pub fn parse(&self, source: &str) -> Result<ParseOutput, DrawnetError> {
        info!("Parsing diagram");

        let parse_config = self.config.parse_config()?;
        let output = drawnet_parser::parse(source, &parse_config)
            .map_err(|err| DrawnetError::new_parse_error(err, source))?;

        debug!(warnings = output.warnings.len(); "Diagram parsed successfully");
        trace!(topology:? = output.topology; "Parsed topology");

        Ok(output)
    }

    /// Render the compose document for `topology`.
    ///
    /// # Errors
    ///
    /// Returns `DrawnetError::Export` if host ports run out or serialization
    /// fails.
    pub fn render_compose(&self, topology: &Topology) -> Result<String, DrawnetError> {
        let yaml = ComposeExporter::new(self.config.compose()).export(topology)?;
        Ok(yaml)
    }

    /// Render the provisioning script for `topology`.
    ///
    /// # Errors
    ///
    /// Returns `DrawnetError::Export` if rendering fails.
    pub fn render_provisioning(&self, topology: &Topology) -> Result<String, DrawnetError> {
        let script = ProvisionExporter::new(self.config.provisioning()).export(topology)?;
        Ok(script)
    }
}
