use drawnet_core::topology::{LinkEnds, NetworkSegment, RouterIndex, Stage};
use drawnet_parser::{
    ParseConfig, ShapePatterns, ShapeRole, StageRequirements,
    error::{ErrorCode, ParseError},
    parse,
};

fn document(cells: &str) -> String {
    format!(
        r#"<mxfile host="app.diagrams.net"><diagram id="page" name="Page-1"><mxGraphModel dx="1200" dy="800"><root>
<mxCell id="0"/>
<mxCell id="1" parent="0"/>
{cells}
</root></mxGraphModel></diagram></mxfile>"#
    )
}

fn relaxed() -> ParseConfig {
    ParseConfig {
        stages: StageRequirements::allowing_empty([Stage::Links, Stage::Networks]),
        ..ParseConfig::default()
    }
}

fn codes(err: &ParseError) -> Vec<ErrorCode> {
    err.diagnostics().iter().filter_map(|d| d.code()).collect()
}

const LAB: &str = r#"
<mxCell id="r1" value="&lt;div&gt;PE1&lt;/div&gt;VRF: [red, blue]" style="ellipse;whiteSpace=wrap;html=1;" vertex="1" parent="1"/>
<mxCell id="r2" value="P" style="ellipse;whiteSpace=wrap;html=1;" vertex="1" parent="1"/>
<mxCell id="r3" value="P" style="ellipse;whiteSpace=wrap;html=1;" vertex="1" parent="1"/>
<mxCell id="n1" value="192.168.10.0/24, fd00:10::/64" style="shape=hexagon;perimeter=hexagonPerimeter2;" vertex="1" parent="1"/>
<mxCell id="e1" style="endArrow=none;html=1;" edge="1" parent="1" source="r1" target="r2"/>
<mxCell id="e1l" value="10.0.0.0/30" style="edgeLabel;html=1;" vertex="1" connectable="0" parent="e1"/>
<mxCell id="e2" value="10.0.0.4/30" style="endArrow=none;html=1;" edge="1" parent="1" source="r2" target="r3"/>
<mxCell id="e3" style="endArrow=none;html=1;" edge="1" parent="1" source="r1" target="n1"/>
<mxCell id="e4" style="endArrow=none;html=1;" edge="1" parent="1" source="n1" target="r3"/>
<mxCell id="e5" value="upstream" style="endArrow=none;html=1;" edge="1" parent="1" source="r3" target="isp"/>
"#;

#[test]
fn test_full_lab() {
    let output = parse(&document(LAB), &ParseConfig::default()).expect("Failed to parse");
    let topology = &output.topology;

    let routers: Vec<&str> = topology.routers().iter().map(|r| r.name()).collect();
    assert_eq!(routers, vec!["pe1-1", "p-1", "p-2"]);
    assert_eq!(
        topology.routers()[0].vrfs().collect::<Vec<_>>(),
        vec!["red", "blue"]
    );

    let links: Vec<&str> = topology.links().iter().map(|l| l.name()).collect();
    assert_eq!(
        links,
        vec!["link:pe1-1:p-1:1", "link:p-1:p-2:1", "link:stub:p-2:1"]
    );
    assert_eq!(
        topology.links()[2].ends(),
        LinkEnds::Stub {
            router: RouterIndex(2)
        }
    );

    let network = &topology.networks()[0];
    assert_eq!(network.name(), "net:192_168_10_0_24__fd00:10::_64");
    assert_eq!(network.hosts(), &[RouterIndex(0), RouterIndex(2)]);
    assert!(network.has_ipv6());

    assert_eq!(
        topology.segment_names(&topology.routers()[2]),
        vec!["link:p-1:p-2:1", "link:stub:p-2:1", "net:192_168_10_0_24__fd00:10::_64"]
    );
}

#[test]
fn test_full_lab_warnings() {
    let output = parse(&document(LAB), &ParseConfig::default()).expect("Failed to parse");
    let codes: Vec<ErrorCode> = output.warnings.iter().filter_map(|d| d.code()).collect();
    // Dangling `isp` endpoint, then the stub's non-subnet label
    assert_eq!(codes, vec![ErrorCode::E200, ErrorCode::E303]);
    assert!(output.warnings.iter().all(|d| d.severity().is_warning()));
}

#[test]
fn test_edge_label_overrides_value() {
    let cells = r#"
<mxCell id="a" value="A" style="ellipse;" vertex="1" parent="1"/>
<mxCell id="b" value="B" style="ellipse;" vertex="1" parent="1"/>
<mxCell id="e" value="192.0.2.0/24" style="endArrow=none;" edge="1" parent="1" source="a" target="b"/>
<mxCell id="l" value="10.0.0.0/30" style="edgeLabel;" vertex="1" parent="e"/>
"#;
    let output = parse(&document(cells), &relaxed()).expect("Failed to parse");
    let link = &output.topology.links()[0];
    let subnets: Vec<String> = link.parsed_subnets().map(|c| c.to_string()).collect();
    assert_eq!(subnets, vec!["10.0.0.0/30"]);
}

#[test]
fn test_determinism() {
    let source = document(LAB);
    let first = parse(&source, &ParseConfig::default()).expect("Failed to parse");
    let second = parse(&source, &ParseConfig::default()).expect("Failed to parse");
    assert_eq!(first.topology, second.topology);
}

#[test]
fn test_document_without_styled_cells() {
    let err = parse(&document(""), &ParseConfig::default()).unwrap_err();
    assert_eq!(err.primary_code(), Some(ErrorCode::E002));
}

#[test]
fn test_malformed_document() {
    let err = parse("<mxfile><diagram>", &ParseConfig::default()).unwrap_err();
    assert_eq!(err.primary_code(), Some(ErrorCode::E001));
}

#[test]
fn test_stage_failures_are_distinguishable() {
    let no_routers = document(
        r#"<mxCell id="n" value="LAN" style="shape=hexagon;" vertex="1" parent="1"/>"#,
    );
    let err = parse(&no_routers, &ParseConfig::default()).unwrap_err();
    assert_eq!(err.primary_code(), Some(ErrorCode::E300));

    let no_networks = document(
        r#"<mxCell id="a" value="A" style="ellipse;" vertex="1" parent="1"/>
<mxCell id="b" value="B" style="ellipse;" vertex="1" parent="1"/>
<mxCell id="e" style="endArrow=none;" edge="1" parent="1" source="a" target="b"/>"#,
    );
    let err = parse(&no_networks, &ParseConfig::default()).unwrap_err();
    assert_eq!(err.primary_code(), Some(ErrorCode::E302));

    let no_links = document(
        r#"<mxCell id="a" value="A" style="ellipse;" vertex="1" parent="1"/>
<mxCell id="n" value="LAN" style="shape=hexagon;" vertex="1" parent="1"/>
<mxCell id="e" style="endArrow=none;" edge="1" parent="1" source="a" target="n"/>"#,
    );
    let err = parse(&no_links, &ParseConfig::default()).unwrap_err();
    assert_eq!(err.primary_code(), Some(ErrorCode::E301));
}

#[test]
fn test_stage_failure_keeps_warnings() {
    let cells = r#"
<mxCell id="n" value="LAN" style="shape=hexagon;" vertex="1" parent="1"/>
<mxCell id="e" style="endArrow=none;" edge="1" parent="1" source="n" target="ghost"/>
"#;
    let err = parse(&document(cells), &ParseConfig::default()).unwrap_err();
    assert_eq!(codes(&err), vec![ErrorCode::E200, ErrorCode::E300]);
    assert_eq!(err.primary_code(), Some(ErrorCode::E300));
}

#[test]
fn test_ambiguous_patterns_rejected() {
    let config = ParseConfig {
        shapes: ShapePatterns::new([
            (ShapeRole::Router, "ellipse"),
            (ShapeRole::Network, "ellipse;shape=cloud"),
        ])
        .unwrap(),
        ..relaxed()
    };
    let cells = r#"<mxCell id="c" value="WAN" style="ellipse;shape=cloud;" vertex="1" parent="1"/>"#;
    let err = parse(&document(cells), &config).unwrap_err();
    assert_eq!(codes(&err), vec![ErrorCode::E100]);
}

#[test]
fn test_custom_patterns() {
    let config = ParseConfig {
        shapes: ShapePatterns::new([
            (ShapeRole::Router, "shape=mxgraph\\.cisco\\.routers"),
            (ShapeRole::Network, "shape=cloud"),
        ])
        .unwrap(),
        ..ParseConfig::default()
    };
    let cells = r#"
<mxCell id="a" value="Edge" style="shape=mxgraph.cisco.routers.router;" vertex="1" parent="1"/>
<mxCell id="b" value="Core" style="shape=mxgraph.cisco.routers.router;" vertex="1" parent="1"/>
<mxCell id="c" value="Internet" style="shape=cloud;" vertex="1" parent="1"/>
<mxCell id="e1" style="endArrow=none;" edge="1" parent="1" source="a" target="b"/>
<mxCell id="e2" style="endArrow=none;" edge="1" parent="1" source="b" target="c"/>
"#;
    let output = parse(&document(cells), &config).expect("Failed to parse");
    let routers: Vec<&str> = output.topology.routers().iter().map(|r| r.name()).collect();
    assert_eq!(routers, vec!["edge-1", "core-1"]);
    assert_eq!(output.topology.networks()[0].name(), "net:Internet");
}
