//! Output generators for extracted topologies.
//!
//! Each generator consumes a finished [`Topology`] and renders one text
//! artifact. Generators never change the topology.
//!
//! # Pipeline Position
//!
//! ```text
//! draw.io document
//!     ↓ parse
//! Topology
//!     ↓ export (this module)
//! docker-compose.yml, provision.sh
//! ```
//!
//! # Available Backends
//!
//! - [`compose`] - Compose document via [`compose::ComposeExporter`]
//! - [`provision`] - Shell provisioning script via [`provision::ProvisionExporter`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`], which converts into
//! [`DrawnetError::Export`](crate::DrawnetError::Export) at the crate boundary.

pub mod compose;
pub mod provision;

use thiserror::Error;

use drawnet_core::topology::Topology;

/// A generator turning a topology into one output document.
pub trait Exporter {
    /// Renders `topology`.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the topology cannot be expressed in the target
    /// format.
    fn export(&self, topology: &Topology) -> Result<String, Error>;
}

/// Errors that can occur while rendering output.
#[derive(Debug, Error)]
pub enum Error {
    /// The compose document could not be serialized.
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Writing the rendered text failed.
    #[error("rendering failed: {0}")]
    Render(#[from] std::fmt::Error),

    /// Sequential port allocation ran past the last port number.
    #[error("no host port left for router `{router}` (base port {base}, router #{index})")]
    PortExhausted {
        router: String,
        base: u16,
        index: usize,
    },
}
