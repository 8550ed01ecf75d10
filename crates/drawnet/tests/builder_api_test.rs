//! Integration tests for the LabBuilder API

use drawnet::{
    DrawnetError, LabBuilder,
    config::AppConfig,
    topology::{NetworkSegment, Stage},
};
use serde_yaml::Value;

const TRIANGLE: &str = include_str!("../../../demos/triangle.drawio");
const MPLS_VPN: &str = include_str!("../../../demos/mpls-vpn.drawio");

#[test]
fn test_builder_api_exists() {
    let _builder = LabBuilder::default();
}

#[test]
fn test_parse_triangle() {
    let builder = LabBuilder::default();
    let lab = builder.parse(TRIANGLE).expect("Failed to parse triangle");

    let routers: Vec<&str> = lab.topology.routers().iter().map(|r| r.name()).collect();
    assert_eq!(routers, vec!["r-1", "r-2", "core-1"]);

    let links: Vec<&str> = lab.topology.links().iter().map(|l| l.name()).collect();
    assert_eq!(
        links,
        vec!["link:r-1:r-2:1", "link:r-2:core-1:1", "link:core-1:r-1:1"]
    );
    assert!(lab.warnings.is_empty(), "{:?}", lab.warnings);
}

#[test]
fn test_render_triangle_compose() {
    let builder = LabBuilder::default();
    let lab = builder.parse(TRIANGLE).expect("Failed to parse");
    let yaml = builder
        .render_compose(&lab.topology)
        .expect("Failed to render");
    let doc: Value = serde_yaml::from_str(&yaml).expect("Output should be valid YAML");

    let core = &doc["services"]["core-1"];
    assert_eq!(core["ports"][0], Value::from("2002:22"));
    let networks: Vec<&str> = core["networks"]
        .as_sequence()
        .expect("networks should be a list")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(
        networks,
        vec!["link:r-2:core-1:1", "link:core-1:r-1:1", "net:192_168_100_0_24"]
    );

    let label_link = &doc["networks"]["link:r-2:core-1:1"];
    assert_eq!(label_link["ipam"]["config"][0]["subnet"], Value::from("10.0.0.4/30"));
}

#[test]
fn test_parse_mpls_vpn() {
    let builder = LabBuilder::default();
    let lab = builder.parse(MPLS_VPN).expect("Failed to parse");
    let topology = &lab.topology;

    let routers: Vec<&str> = topology.routers().iter().map(|r| r.name()).collect();
    assert_eq!(routers, vec!["pe1-1", "p-1", "pe2-1"]);
    assert_eq!(
        topology.routers()[0].vrfs().collect::<Vec<_>>(),
        vec!["cust-a", "cust-b"]
    );

    let stub = topology.links().last().unwrap();
    assert!(stub.is_stub());
    assert_eq!(stub.name(), "link:stub:pe2-1:1");

    let core = &topology.networks()[0];
    assert_eq!(core.hosts().len(), 3);
    assert!(core.has_ipv6());
}

#[test]
fn test_render_mpls_vpn_provisioning() {
    let builder = LabBuilder::default();
    let lab = builder.parse(MPLS_VPN).expect("Failed to parse");
    let script = builder
        .render_provisioning(&lab.topology)
        .expect("Failed to render");

    assert!(script.contains("exec -T pe1-1 ip link add cust-b type vrf table 11"));
    assert!(script.contains("exec -T pe2-1 ip link add cust-a type vrf table 10"));
}

#[test]
fn test_builder_with_config() {
    let config: AppConfig = serde_yaml::from_str(
        "topology:\n  allow_empty: [networks]\ncompose:\n  base_port: 3000\n",
    )
    .expect("config should deserialize");
    assert_eq!(config.topology().allow_empty(), &[Stage::Networks]);

    let source = TRIANGLE.replace("shape=hexagon", "rounded=1");
    let builder = LabBuilder::new(config);
    let lab = builder.parse(&source).expect("networks are optional");
    assert!(lab.topology.networks().is_empty());

    let yaml = builder.render_compose(&lab.topology).unwrap();
    assert!(yaml.contains("3000:22"));
}

#[test]
fn test_missing_networks_is_stage_failure() {
    let source = TRIANGLE.replace("shape=hexagon", "rounded=1");
    let err = LabBuilder::default().parse(&source).unwrap_err();
    assert!(matches!(err, DrawnetError::Parse { .. }));
    assert_eq!(err.exit_code(), 12);
}

#[test]
fn test_parse_invalid_document_returns_error() {
    let err = LabBuilder::default()
        .parse("this is not a diagram")
        .unwrap_err();
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_builder_reusability() {
    let builder = LabBuilder::default();
    let first = builder.parse(TRIANGLE).expect("Failed to parse triangle");
    let second = builder.parse(MPLS_VPN).expect("Failed to parse mpls");
    assert_ne!(first.topology, second.topology);
    assert_eq!(first.topology, builder.parse(TRIANGLE).unwrap().topology);
}
