//! Semantic network topology.
//!
//! This is the model produced by the extraction engine and read by every
//! generator: routers, point-to-point links and broadcast networks.
//!
//! # Ownership
//!
//! A [`Topology`] owns all three collections. Entities refer to each other
//! through typed indices ([`RouterIndex`], [`LinkIndex`], [`NetworkIndex`]) and
//! to the diagram through an [`ElementIndex`] back-reference, so there is no
//! shared mutable state between entities.
//!
//! Links and networks are independent types. What they have in common (a name,
//! an ordered subnet list, address-management output) is the
//! [`NetworkSegment`] capability.

use std::fmt;

use indexmap::IndexSet;
use serde::Deserialize;

use crate::{
    identifier::ElementIndex,
    subnet::{Cidr, SubnetSlot},
};

/// Index of a router inside its [`Topology`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouterIndex(pub usize);

/// Index of a link inside its [`Topology`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkIndex(pub usize);

/// Index of a network inside its [`Topology`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkIndex(pub usize);

/// A segment a router is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentRef {
    Link(LinkIndex),
    Network(NetworkIndex),
}

/// The three entity collections a conversion must produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Routers,
    Links,
    Networks,
}

impl Stage {
    /// Returns the stage name as used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Routers => "routers",
            Stage::Links => "links",
            Stage::Networks => "networks",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared capability of links and networks: something a compose network
/// definition can be emitted for.
pub trait NetworkSegment {
    /// Unique segment name.
    fn name(&self) -> &str;

    /// Ordered subnet slots, placeholders included.
    fn subnets(&self) -> &[SubnetSlot];

    /// The diagram element this segment was built from.
    fn element(&self) -> ElementIndex;

    /// Successfully parsed subnets, in label order.
    fn parsed_subnets(&self) -> impl Iterator<Item = &Cidr> {
        self.subnets().iter().filter_map(SubnetSlot::cidr)
    }

    /// Returns `true` if any parsed subnet is IPv6.
    fn has_ipv6(&self) -> bool {
        self.parsed_subnets().any(Cidr::is_ipv6)
    }
}

/// A router built from a router shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Router {
    name: String,
    vrfs: IndexSet<String>,
    segments: IndexSet<SegmentRef>,
    element: ElementIndex,
}

impl Router {
    /// Creates a router with no attached segments.
    pub fn new(name: impl Into<String>, vrfs: IndexSet<String>, element: ElementIndex) -> Self {
        Self {
            name: name.into(),
            vrfs,
            segments: IndexSet::new(),
            element,
        }
    }

    /// Unique, lower-cased router name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// VRF names parsed from the router label, in label order.
    pub fn vrfs(&self) -> impl Iterator<Item = &str> {
        self.vrfs.iter().map(String::as_str)
    }

    /// Number of VRFs.
    pub fn vrf_count(&self) -> usize {
        self.vrfs.len()
    }

    /// Segments this router is attached to: links first, then networks.
    pub fn segments(&self) -> impl Iterator<Item = SegmentRef> + '_ {
        self.segments.iter().copied()
    }

    /// The router shape this router was built from.
    pub fn element(&self) -> ElementIndex {
        self.element
    }

    /// Attaches a segment. Attaching the same segment twice is a no-op.
    pub fn attach(&mut self, segment: SegmentRef) {
        self.segments.insert(segment);
    }
}

/// How a link is anchored to routers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEnds {
    /// Both endpoints are routers.
    PointToPoint {
        source: RouterIndex,
        target: RouterIndex,
    },
    /// Only one endpoint resolved to a router.
    Stub { router: RouterIndex },
}

/// A point-to-point (or stub) connection built from a diagram edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    name: String,
    subnets: Vec<SubnetSlot>,
    ends: LinkEnds,
    element: ElementIndex,
}

impl Link {
    pub fn new(
        name: impl Into<String>,
        subnets: Vec<SubnetSlot>,
        ends: LinkEnds,
        element: ElementIndex,
    ) -> Self {
        Self {
            name: name.into(),
            subnets,
            ends,
            element,
        }
    }

    pub fn ends(&self) -> LinkEnds {
        self.ends
    }

    /// Returns `true` for links with a single router endpoint.
    pub fn is_stub(&self) -> bool {
        matches!(self.ends, LinkEnds::Stub { .. })
    }
}

impl NetworkSegment for Link {
    fn name(&self) -> &str {
        &self.name
    }

    fn subnets(&self) -> &[SubnetSlot] {
        &self.subnets
    }

    fn element(&self) -> ElementIndex {
        self.element
    }
}

/// A broadcast segment built from a network shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    name: String,
    subnets: Vec<SubnetSlot>,
    hosts: Vec<RouterIndex>,
    element: ElementIndex,
}

impl Network {
    /// Creates a network with no hosts.
    pub fn new(name: impl Into<String>, subnets: Vec<SubnetSlot>, element: ElementIndex) -> Self {
        Self {
            name: name.into(),
            subnets,
            hosts: Vec::new(),
            element,
        }
    }

    /// Routers attached to this network, in attachment order.
    pub fn hosts(&self) -> &[RouterIndex] {
        &self.hosts
    }

    /// Adds a host. Returns `false` if the router was already attached.
    pub fn add_host(&mut self, router: RouterIndex) -> bool {
        if self.hosts.contains(&router) {
            return false;
        }
        self.hosts.push(router);
        true
    }
}

impl NetworkSegment for Network {
    fn name(&self) -> &str {
        &self.name
    }

    fn subnets(&self) -> &[SubnetSlot] {
        &self.subnets
    }

    fn element(&self) -> ElementIndex {
        self.element
    }
}

/// The finished topology of one diagram.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    routers: Vec<Router>,
    links: Vec<Link>,
    networks: Vec<Network>,
}

impl Topology {
    pub fn new(routers: Vec<Router>, links: Vec<Link>, networks: Vec<Network>) -> Self {
        Self {
            routers,
            links,
            networks,
        }
    }

    pub fn routers(&self) -> &[Router] {
        &self.routers
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn networks(&self) -> &[Network] {
        &self.networks
    }

    pub fn router(&self, index: RouterIndex) -> Option<&Router> {
        self.routers.get(index.0)
    }

    pub fn link(&self, index: LinkIndex) -> Option<&Link> {
        self.links.get(index.0)
    }

    pub fn network(&self, index: NetworkIndex) -> Option<&Network> {
        self.networks.get(index.0)
    }

    /// Appends a router, returning its index.
    pub fn push_router(&mut self, router: Router) -> RouterIndex {
        self.routers.push(router);
        RouterIndex(self.routers.len() - 1)
    }

    /// Appends a link, returning its index.
    pub fn push_link(&mut self, link: Link) -> LinkIndex {
        self.links.push(link);
        LinkIndex(self.links.len() - 1)
    }

    /// Appends a network, returning its index.
    pub fn push_network(&mut self, network: Network) -> NetworkIndex {
        self.networks.push(network);
        NetworkIndex(self.networks.len() - 1)
    }

    pub fn router_mut(&mut self, index: RouterIndex) -> Option<&mut Router> {
        self.routers.get_mut(index.0)
    }

    pub fn network_mut(&mut self, index: NetworkIndex) -> Option<&mut Network> {
        self.networks.get_mut(index.0)
    }

    /// Name of the link or network behind `segment`.
    pub fn segment_name(&self, segment: SegmentRef) -> Option<&str> {
        match segment {
            SegmentRef::Link(idx) => self.link(idx).map(NetworkSegment::name),
            SegmentRef::Network(idx) => self.network(idx).map(NetworkSegment::name),
        }
    }

    /// Names of the segments `router` is attached to, in attachment order.
    pub fn segment_names(&self, router: &Router) -> Vec<String> {
        router
            .segments()
            .filter_map(|segment| self.segment_name(segment))
            .map(str::to_string)
            .collect()
    }

    /// Number of entities built for `stage`.
    pub fn stage_len(&self, stage: Stage) -> usize {
        match stage {
            Stage::Routers => self.routers.len(),
            Stage::Links => self.links.len(),
            Stage::Networks => self.networks.len(),
        }
    }
}
