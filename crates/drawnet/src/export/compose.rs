//! Compose document generation.
//!
//! Emits one service per router and one network per link and per broadcast
//! network:
//!
//! ```yaml
//! version: '3'
//! services:
//!   r-1:
//!     build: ./frr
//!     ports:
//!     - 2000:22
//!     privileged: true
//!     networks:
//!     - link:r-1:r-2:1
//! networks:
//!   link:r-1:r-2:1:
//!     driver: bridge
//!     ipam:
//!       driver: default
//!       config:
//!       - subnet: 10.0.0.0/30
//! ```
//!
//! Only parsed subnets reach the `ipam` section. A segment whose label held no
//! valid subnet gets no `ipam` key at all.

use indexmap::IndexMap;
use log::{debug, info};
use serde::Serialize;

use drawnet_core::topology::{NetworkSegment, Topology};

use super::{Error, Exporter};
use crate::config::ComposeConfig;

#[derive(Debug, Serialize)]
struct ComposeFile<'a> {
    version: &'a str,
    services: IndexMap<&'a str, Service<'a>>,
    networks: IndexMap<&'a str, NetworkDefinition>,
}

#[derive(Debug, Serialize)]
struct Service<'a> {
    build: &'a str,
    ports: Vec<String>,
    privileged: bool,
    networks: Vec<String>,
}

#[derive(Debug, Serialize)]
struct NetworkDefinition {
    driver: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    enable_ipv6: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ipam: Option<Ipam>,
}

#[derive(Debug, Serialize)]
struct Ipam {
    driver: &'static str,
    config: Vec<IpamPool>,
}

#[derive(Debug, Serialize)]
struct IpamPool {
    subnet: String,
}

/// Renders a topology as a compose document.
#[derive(Debug, Clone)]
pub struct ComposeExporter<'a> {
    config: &'a ComposeConfig,
}

impl<'a> ComposeExporter<'a> {
    pub fn new(config: &'a ComposeConfig) -> Self {
        Self { config }
    }

    fn network_definition(&self, segment: &impl NetworkSegment) -> NetworkDefinition {
        let pools: Vec<IpamPool> = segment
            .parsed_subnets()
            .map(|cidr| IpamPool {
                subnet: cidr.to_string(),
            })
            .collect();

        NetworkDefinition {
            driver: "bridge",
            enable_ipv6: (self.config.enable_ipv6() || segment.has_ipv6()).then_some(true),
            ipam: (!pools.is_empty()).then(|| Ipam {
                driver: "default",
                config: pools,
            }),
        }
    }
}

impl Exporter for ComposeExporter<'_> {
    fn export(&self, topology: &Topology) -> Result<String, Error> {
        let mut services = IndexMap::new();
        for (index, router) in topology.routers().iter().enumerate() {
            let host_port = u16::try_from(index)
                .ok()
                .and_then(|offset| self.config.base_port().checked_add(offset))
                .ok_or_else(|| Error::PortExhausted {
                    router: router.name().to_string(),
                    base: self.config.base_port(),
                    index,
                })?;

            let service = Service {
                build: self.config.build_path(),
                ports: vec![format!("{host_port}:{}", self.config.container_port())],
                privileged: self.config.privileged(),
                networks: topology.segment_names(router),
            };
            debug!(service = router.name(), port = host_port; "Service added");
            services.insert(router.name(), service);
        }

        let mut networks = IndexMap::new();
        for link in topology.links() {
            networks.insert(link.name(), self.network_definition(link));
        }
        for network in topology.networks() {
            networks.insert(network.name(), self.network_definition(network));
        }

        let file = ComposeFile {
            version: self.config.version(),
            services,
            networks,
        };
        let yaml = serde_yaml::to_string(&file)?;
        info!(
            services = file.services.len(),
            networks = file.networks.len();
            "Compose document rendered"
        );
        Ok(yaml)
    }
}
