//! Configuration types for drawnet conversions.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file. Every section and every field is optional; missing values fall
//! back to the defaults documented on each field.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`ShapesConfig`] - Style patterns recognising router and network shapes.
//! - [`TopologyConfig`] - Which build stages may come out empty.
//! - [`ComposeConfig`] - Settings for the generated compose document.
//! - [`ProvisioningConfig`] - Settings for the generated provisioning script.
//!
//! # Example
//!
//! ```
//! # use drawnet::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.compose().base_port(), 2000);
//! assert!(config.parse_config().is_ok());
//! ```

use serde::Deserialize;

use drawnet_core::topology::Stage;
use drawnet_parser::{ParseConfig, ShapePatternError, ShapePatterns, ShapeRole, StageRequirements};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    shapes: ShapesConfig,

    #[serde(default)]
    topology: TopologyConfig,

    #[serde(default)]
    compose: ComposeConfig,

    #[serde(default)]
    provisioning: ProvisioningConfig,
}

impl AppConfig {
    pub fn new(
        shapes: ShapesConfig,
        topology: TopologyConfig,
        compose: ComposeConfig,
        provisioning: ProvisioningConfig,
    ) -> Self {
        Self {
            shapes,
            topology,
            compose,
            provisioning,
        }
    }

    pub fn shapes(&self) -> &ShapesConfig {
        &self.shapes
    }

    pub fn topology(&self) -> &TopologyConfig {
        &self.topology
    }

    pub fn compose(&self) -> &ComposeConfig {
        &self.compose
    }

    pub fn provisioning(&self) -> &ProvisioningConfig {
        &self.provisioning
    }

    /// Replaces the compose section.
    pub fn with_compose(mut self, compose: ComposeConfig) -> Self {
        self.compose = compose;
        self
    }

    /// Builds the extraction settings.
    ///
    /// # Errors
    ///
    /// Returns [`ShapePatternError`] if the shape patterns are invalid or
    /// identical.
    pub fn parse_config(&self) -> Result<ParseConfig, ShapePatternError> {
        Ok(ParseConfig::new(
            self.shapes.patterns()?,
            self.topology.requirements(),
        ))
    }
}

/// Style patterns for the two shape roles.
///
/// Patterns are regular expressions matched at the start of a cell's style.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShapesConfig {
    /// Router shape pattern. Defaults to `ellipse`.
    router: String,

    /// Network shape pattern. Defaults to `shape=hexagon`.
    network: String,
}

impl ShapesConfig {
    pub fn new(router: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            router: router.into(),
            network: network.into(),
        }
    }

    pub fn router(&self) -> &str {
        &self.router
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    /// Compiles the patterns, router first.
    pub fn patterns(&self) -> Result<ShapePatterns, ShapePatternError> {
        ShapePatterns::new([
            (ShapeRole::Router, self.router.as_str()),
            (ShapeRole::Network, self.network.as_str()),
        ])
    }
}

impl Default for ShapesConfig {
    fn default() -> Self {
        Self::new("ellipse", "shape=hexagon")
    }
}

/// Build stage settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    /// Stages allowed to produce no entities, e.g. `["networks"]`.
    allow_empty: Vec<Stage>,
}

impl TopologyConfig {
    pub fn new(allow_empty: Vec<Stage>) -> Self {
        Self { allow_empty }
    }

    pub fn allow_empty(&self) -> &[Stage] {
        &self.allow_empty
    }

    pub fn requirements(&self) -> StageRequirements {
        StageRequirements::allowing_empty(self.allow_empty.iter().copied())
    }
}

/// Compose document settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    /// Value of the top-level `version` key. Defaults to `"3"`.
    version: String,

    /// Build context of every router service. Defaults to `./frr`.
    build_path: String,

    /// Host port of the first router. Defaults to 2000.
    base_port: u16,

    /// Container port each host port maps to. Defaults to 22.
    container_port: u16,

    /// Run router containers privileged. Defaults to `true`.
    privileged: bool,

    /// Enable IPv6 on every network, not only on those with IPv6 subnets.
    enable_ipv6: bool,
}

impl ComposeConfig {
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn build_path(&self) -> &str {
        &self.build_path
    }

    pub fn base_port(&self) -> u16 {
        self.base_port
    }

    pub fn container_port(&self) -> u16 {
        self.container_port
    }

    pub fn privileged(&self) -> bool {
        self.privileged
    }

    pub fn enable_ipv6(&self) -> bool {
        self.enable_ipv6
    }

    pub fn with_build_path(mut self, build_path: impl Into<String>) -> Self {
        self.build_path = build_path.into();
        self
    }

    pub fn with_base_port(mut self, base_port: u16) -> Self {
        self.base_port = base_port;
        self
    }

    pub fn with_enable_ipv6(mut self, enable_ipv6: bool) -> Self {
        self.enable_ipv6 = enable_ipv6;
        self
    }
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            version: "3".to_string(),
            build_path: "./frr".to_string(),
            base_port: 2000,
            container_port: 22,
            privileged: true,
            enable_ipv6: false,
        }
    }
}

/// Provisioning script settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProvisioningConfig {
    /// FRR daemons to enable in `/etc/frr/daemons`.
    daemons: Vec<String>,

    /// Enable MPLS forwarding on every router.
    mpls: bool,

    /// Size of the MPLS label table when MPLS is enabled.
    platform_labels: u32,

    /// Routing table of a router's first VRF; later VRFs count up from here.
    vrf_table_base: u32,
}

impl ProvisioningConfig {
    pub fn daemons(&self) -> &[String] {
        &self.daemons
    }

    pub fn mpls(&self) -> bool {
        self.mpls
    }

    pub fn platform_labels(&self) -> u32 {
        self.platform_labels
    }

    pub fn vrf_table_base(&self) -> u32 {
        self.vrf_table_base
    }

    pub fn with_daemons(mut self, daemons: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.daemons = daemons.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_mpls(mut self, mpls: bool) -> Self {
        self.mpls = mpls;
        self
    }
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            daemons: vec!["ospfd".to_string(), "bgpd".to_string()],
            mpls: false,
            platform_labels: 100_000,
            vrf_table_base: 10,
        }
    }
}
