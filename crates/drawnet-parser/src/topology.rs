//! Topology building.
//!
//! Turns a resolved [`DiagramGraph`] into a [`Topology`] in five steps, each
//! finishing before the next one starts:
//!
//! 1. Label disambiguation ([`disambiguate`])
//! 2. Router construction
//! 3. Network construction
//! 4. Edge classification into links, network hosts and stubs
//! 5. Incidence linking
//!
//! Every counter is derived from document order, so the same document always
//! yields the same names in the same order.

use std::collections::HashMap;

use log::{debug, info, trace};

use drawnet_core::{
    identifier::ElementIndex,
    subnet::{SubnetSlot, parse_subnet_list},
    topology::{
        Link, LinkEnds, LinkIndex, Network, NetworkIndex, NetworkSegment, Router, RouterIndex,
        SegmentRef, Stage, Topology,
    },
};

use crate::{
    classify::ShapeRole,
    config::StageRequirements,
    error::{Diagnostic, ErrorCode},
    graph::{DiagramGraph, Endpoint, GraphElement},
    label::{ParsedLabel, looks_like_ipv4, parse_label},
};

/// Fallback base name for routers without a visible label.
const DEFAULT_ROUTER_NAME: &str = "router";

/// Fallback label for networks without a visible label.
const DEFAULT_NETWORK_NAME: &str = "network";

/// A label after collision handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disambiguated {
    /// The effective label.
    pub label: String,
    /// Whether the label shared its name with another shape.
    pub collided: bool,
}

/// Append `-1`, `-2`, … to labels whose names collide case-insensitively.
///
/// Labels that start with an IPv4 literal and blank labels never collide.
/// The output is aligned with the input.
pub fn disambiguate<S: AsRef<str>>(names: &[S]) -> Vec<Disambiguated> {
    let key = |name: &str| -> Option<String> {
        let trimmed = name.trim();
        (!trimmed.is_empty() && !looks_like_ipv4(trimmed)).then(|| trimmed.to_lowercase())
    };

    let mut group_sizes: HashMap<String, usize> = HashMap::new();
    for name in names {
        if let Some(key) = key(name.as_ref()) {
            *group_sizes.entry(key).or_default() += 1;
        }
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            match key(name) {
                Some(key) if group_sizes.get(&key).copied().unwrap_or_default() > 1 => {
                    let nth = seen.entry(key).or_default();
                    *nth += 1;
                    Disambiguated {
                        label: format!("{}-{}", name.trim(), nth),
                        collided: true,
                    }
                }
                _ => Disambiguated {
                    label: name.to_string(),
                    collided: false,
                },
            }
        })
        .collect()
}

/// Lower-cased router base name with whitespace runs collapsed to `_`.
fn router_base(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Network label with separators replaced by `_`.
fn network_base(label: &str) -> String {
    label
        .trim()
        .chars()
        .map(|c| match c {
            ',' | '.' | '/' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect()
}

/// Returns `true` if `name` is `base` followed by `-` or `:` and a number.
fn is_numbered(name: &str, base: &str) -> bool {
    name.strip_prefix(base)
        .and_then(|rest| rest.strip_prefix(['-', ':']))
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

/// What an edge endpoint turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Router(RouterIndex),
    Network(NetworkIndex),
    Absent,
}

/// A router or network shape with its parsed label.
struct ShapeEntry<'g> {
    index: ElementIndex,
    element: &'g GraphElement,
    label: ParsedLabel,
}

/// Builds a [`Topology`] from a resolved graph.
pub struct TopologyBuilder<'g> {
    graph: &'g DiagramGraph,
    requirements: StageRequirements,
    diagnostics: Vec<Diagnostic>,
    topology: Topology,
    router_of: HashMap<ElementIndex, RouterIndex>,
    network_of: HashMap<ElementIndex, NetworkIndex>,
    link_of: HashMap<ElementIndex, LinkIndex>,
}

impl<'g> TopologyBuilder<'g> {
    pub fn new(graph: &'g DiagramGraph, requirements: StageRequirements) -> Self {
        Self {
            graph,
            requirements,
            diagnostics: Vec::new(),
            topology: Topology::default(),
            router_of: HashMap::new(),
            network_of: HashMap::new(),
            link_of: HashMap::new(),
        }
    }

    /// Run all steps.
    ///
    /// Returns the topology and every diagnostic raised along the way. When a
    /// required stage is empty, building stops after that stage and the
    /// diagnostics end with the stage's error; the topology is then partial
    /// and must not be used.
    pub fn build(mut self) -> (Topology, Vec<Diagnostic>) {
        let graph = self.graph;
        let shapes: Vec<(ShapeRole, ShapeEntry<'g>)> = graph
            .elements()
            .filter_map(|(index, element)| {
                element.as_shape().map(|shape| {
                    let entry = ShapeEntry {
                        index,
                        element,
                        label: parse_label(&shape.label),
                    };
                    (shape.role, entry)
                })
            })
            .collect();

        // Step 1: Disambiguate router and network labels together, in document order
        let names: Vec<&str> = shapes
            .iter()
            .map(|(_, entry)| entry.label.name.as_str())
            .collect();
        let labels = disambiguate(&names);
        debug!(shapes = names.len(); "Labels disambiguated");

        let (routers, networks): (Vec<_>, Vec<_>) = shapes
            .into_iter()
            .zip(labels)
            .partition(|((role, _), _)| *role == ShapeRole::Router);

        // Step 2: Routers
        for ((_, entry), label) in routers {
            self.build_router(entry, label);
        }
        info!(count = self.topology.stage_len(Stage::Routers); "Routers built");
        if !self.check_stage(Stage::Routers) {
            return self.finish();
        }

        // Step 3: Networks
        for ((_, entry), label) in networks {
            self.build_network(entry, label);
        }
        info!(count = self.topology.stage_len(Stage::Networks); "Networks built");
        if !self.check_stage(Stage::Networks) {
            return self.finish();
        }

        // Step 4: Edges
        for (index, element, _) in graph.edges() {
            self.classify_edge(index, element);
        }
        info!(count = self.topology.stage_len(Stage::Links); "Links built");
        if !self.check_stage(Stage::Links) {
            return self.finish();
        }

        // Step 5: Incidence
        self.link_incidence();
        self.finish()
    }

    fn finish(self) -> (Topology, Vec<Diagnostic>) {
        trace!(topology:? = self.topology; "Topology built");
        (self.topology, self.diagnostics)
    }

    fn push_warning(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Report an empty required stage. Returns `false` if building must stop.
    fn check_stage(&mut self, stage: Stage) -> bool {
        if self.topology.stage_len(stage) > 0 || !self.requirements.is_required(stage) {
            return true;
        }

        self.diagnostics.push(
            Diagnostic::error(format!("diagram produced no {stage}"))
                .with_code(ErrorCode::stage_empty(stage))
                .with_help(match stage {
                    Stage::Routers => "draw routers with the configured router shape",
                    Stage::Links => "connect two routers with an edge",
                    Stage::Networks => {
                        "draw a network shape or allow empty networks in the configuration"
                    }
                }),
        );
        false
    }

    fn name_taken(&self, name: &str) -> bool {
        self.topology
            .routers()
            .iter()
            .any(|router| router.name() == name)
    }

    fn router_name(&self, index: RouterIndex) -> &str {
        self.topology
            .router(index)
            .map(Router::name)
            .unwrap_or_default()
    }

    fn build_router(&mut self, entry: ShapeEntry<'g>, label: Disambiguated) {
        let mut base = router_base(&label.label);
        if base.is_empty() {
            self.push_warning(
                Diagnostic::warning(format!(
                    "router shape `{}` has no label; using `{DEFAULT_ROUTER_NAME}`",
                    entry.element.id()
                ))
                .with_code(ErrorCode::E101)
                .with_label(entry.element.span(), "unlabelled router"),
            );
            base = DEFAULT_ROUTER_NAME.to_string();
        }

        let name = if label.collided && !self.name_taken(&base) {
            base
        } else {
            let mut nth = 1 + self
                .topology
                .routers()
                .iter()
                .filter(|router| is_numbered(router.name(), &base))
                .count();
            while self.name_taken(&format!("{base}-{nth}")) {
                nth += 1;
            }
            format!("{base}-{nth}")
        };

        let router = Router::new(name, entry.label.vrfs, entry.index);
        debug!(name = router.name(), vrfs = router.vrf_count(); "Router built");
        let index = self.topology.push_router(router);
        self.router_of.insert(entry.index, index);
    }

    fn build_network(&mut self, entry: ShapeEntry<'g>, label: Disambiguated) {
        let mut base = network_base(&label.label);
        if base.is_empty() {
            self.push_warning(
                Diagnostic::warning(format!(
                    "network shape `{}` has no label; using `{DEFAULT_NETWORK_NAME}`",
                    entry.element.id()
                ))
                .with_code(ErrorCode::E101)
                .with_label(entry.element.span(), "unlabelled network"),
            );
            base = DEFAULT_NETWORK_NAME.to_string();
        }

        let mut name = format!("net:{base}");
        let mut nth = 1;
        while self
            .topology
            .networks()
            .iter()
            .any(|network| network.name() == name)
        {
            nth += 1;
            name = format!("net:{base}-{nth}");
        }

        let subnets = self.parse_subnets(&entry.label.name, entry.element);
        let network = Network::new(name, subnets, entry.index);
        debug!(name = network.name(), subnets = network.subnets().len(); "Network built");
        let index = self.topology.push_network(network);
        self.network_of.insert(entry.index, index);
    }

    /// Parse a subnet list, warning about every unparseable token.
    fn parse_subnets(&mut self, text: &str, owner: &GraphElement) -> Vec<SubnetSlot> {
        let slots = parse_subnet_list(text);
        for slot in &slots {
            if let SubnetSlot::Unparseable(token) = slot {
                self.push_warning(
                    Diagnostic::warning(format!(
                        "`{token}` on cell `{}` is not a subnet",
                        owner.id()
                    ))
                    .with_code(ErrorCode::E303)
                    .with_label(owner.span(), "label with unparseable subnet")
                    .with_help("write subnets in CIDR notation, e.g. `10.0.0.0/30`"),
                );
            }
        }
        slots
    }

    fn side(&self, endpoint: Endpoint) -> Side {
        let Some(index) = endpoint.index() else {
            return Side::Absent;
        };
        if let Some(router) = self.router_of.get(&index) {
            Side::Router(*router)
        } else if let Some(network) = self.network_of.get(&index) {
            Side::Network(*network)
        } else {
            Side::Absent
        }
    }

    fn classify_edge(&mut self, index: ElementIndex, element: &'g GraphElement) {
        let Some(edge) = element.as_edge() else {
            return;
        };
        let source = self.side(edge.source);
        let target = self.side(edge.target);
        let label = edge.label.as_deref().map(parse_label).unwrap_or_default();

        match (source, target) {
            (Side::Router(source), Side::Router(target)) => {
                let nth = 1 + self
                    .topology
                    .links()
                    .iter()
                    .filter(|link| match link.ends() {
                        LinkEnds::PointToPoint { source: s, target: t } => {
                            (s == source && t == target) || (s == target && t == source)
                        }
                        LinkEnds::Stub { .. } => false,
                    })
                    .count();
                let name = format!(
                    "link:{}:{}:{nth}",
                    self.router_name(source),
                    self.router_name(target)
                );
                self.push_link(
                    name,
                    &label,
                    LinkEnds::PointToPoint { source, target },
                    index,
                    element,
                );
            }
            (Side::Router(router), Side::Network(network))
            | (Side::Network(network), Side::Router(router)) => {
                let added = self
                    .topology
                    .network_mut(network)
                    .is_some_and(|net| net.add_host(router));
                if added {
                    debug!(
                        network = self
                            .topology
                            .segment_name(SegmentRef::Network(network))
                            .unwrap_or_default(),
                        host = self.router_name(router);
                        "Host attached"
                    );
                }
            }
            (Side::Router(router), Side::Absent) | (Side::Absent, Side::Router(router)) => {
                let nth = 1 + self
                    .topology
                    .links()
                    .iter()
                    .filter(|link| link.ends() == LinkEnds::Stub { router })
                    .count();
                let name = format!("link:stub:{}:{nth}", self.router_name(router));
                self.push_link(name, &label, LinkEnds::Stub { router }, index, element);
            }
            (Side::Network(_), Side::Network(_) | Side::Absent)
            | (Side::Absent, Side::Network(_)) => {
                self.push_warning(
                    Diagnostic::warning(format!(
                        "edge `{}` attaches a network to something other than a router",
                        element.id()
                    ))
                    .with_code(ErrorCode::E305)
                    .with_label(element.span(), "ignored network attachment"),
                );
            }
            (Side::Absent, Side::Absent) => {
                self.push_warning(
                    Diagnostic::warning(format!(
                        "edge `{}` connects no router or network; dropped",
                        element.id()
                    ))
                    .with_code(ErrorCode::E304)
                    .with_label(element.span(), "dropped edge"),
                );
            }
        }
    }

    fn push_link(
        &mut self,
        name: String,
        label: &ParsedLabel,
        ends: LinkEnds,
        index: ElementIndex,
        element: &GraphElement,
    ) {
        let subnets = self.parse_subnets(&label.name, element);
        let link = Link::new(name, subnets, ends, index);
        debug!(name = link.name(), stub = link.is_stub(); "Link built");
        let link = self.topology.push_link(link);
        self.link_of.insert(index, link);
    }

    /// Attach links through each router shape's incident edges, then the
    /// networks hosting the router.
    fn link_incidence(&mut self) {
        let graph = self.graph;
        let mut attachments: Vec<(RouterIndex, SegmentRef)> = Vec::new();
        for (pos, router) in self.topology.routers().iter().enumerate() {
            let router_index = RouterIndex(pos);
            let incident: &[ElementIndex] = graph
                .element(router.element())
                .and_then(GraphElement::as_shape)
                .map(|shape| shape.incident_edges.as_slice())
                .unwrap_or_default();

            let mut links: Vec<LinkIndex> = incident
                .iter()
                .filter_map(|edge| self.link_of.get(edge).copied())
                .collect();
            links.sort();
            attachments.extend(
                links
                    .into_iter()
                    .map(|link| (router_index, SegmentRef::Link(link))),
            );

            for (net_pos, network) in self.topology.networks().iter().enumerate() {
                if network.hosts().contains(&router_index) {
                    attachments.push((router_index, SegmentRef::Network(NetworkIndex(net_pos))));
                }
            }
        }

        for (router, segment) in attachments {
            if let Some(router) = self.topology.router_mut(router) {
                router.attach(segment);
            }
        }
        debug!(routers = self.topology.stage_len(Stage::Routers); "Incidence linked");
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{
        classify::{ShapePatterns, classify_all},
        document::RawElement,
    };

    fn label() -> impl Strategy<Value = String> {
        prop_oneof![
            "[A-Ca-c]{1,2}",
            "10\\.[0-9]\\.0\\.0/24",
            Just(String::new()),
            "<div>[A-C]</div>VRF: \\[[a-c], [a-c]\\]",
        ]
    }

    fn document() -> impl Strategy<Value = Vec<RawElement>> {
        (
            prop::collection::vec((any::<bool>(), label()), 1..8),
            prop::collection::vec((0usize..10, 0usize..10, "[0-9./a-z ]{0,12}"), 0..12),
        )
            .prop_map(|(shapes, edges)| {
                let mut elements: Vec<RawElement> = shapes
                    .into_iter()
                    .enumerate()
                    .map(|(pos, (is_router, label))| {
                        let style = if is_router { "ellipse;" } else { "shape=hexagon;" };
                        RawElement::new(format!("s{pos}").as_str())
                            .with_style(style)
                            .with_value(label)
                    })
                    .collect();
                for (pos, (source, target, value)) in edges.into_iter().enumerate() {
                    elements.push(
                        RawElement::new(format!("e{pos}").as_str())
                            .with_style("endArrow=none;")
                            .with_source(format!("s{source}").as_str())
                            .with_target(format!("s{target}").as_str())
                            .with_value(value),
                    );
                }
                elements
            })
    }

    fn run(elements: &[RawElement]) -> (Topology, Vec<Diagnostic>) {
        let (classified, _) = classify_all(elements, &ShapePatterns::default());
        let (graph, _) = DiagramGraph::build(classified);
        TopologyBuilder::new(&graph, StageRequirements::allowing_empty([
            Stage::Routers,
            Stage::Links,
            Stage::Networks,
        ]))
        .build()
    }

    proptest! {
        #[test]
        fn building_is_deterministic(elements in document()) {
            let (first, _) = run(&elements);
            let (second, _) = run(&elements);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn router_names_are_unique(elements in document()) {
            let (topology, _) = run(&elements);
            let mut names: Vec<&str> = topology.routers().iter().map(Router::name).collect();
            let total = names.len();
            names.sort_unstable();
            names.dedup();
            prop_assert_eq!(names.len(), total);
        }

        #[test]
        fn hosts_are_attached_both_ways(elements in document()) {
            let (topology, _) = run(&elements);
            for (pos, network) in topology.networks().iter().enumerate() {
                for host in network.hosts() {
                    let router = topology.router(*host).unwrap();
                    let segment = SegmentRef::Network(NetworkIndex(pos));
                    prop_assert!(router.segments().any(|s| s == segment));
                }
            }
        }
    }
}
