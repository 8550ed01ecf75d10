//! CLI logic for the drawnet lab generator.
//!
//! This module contains the core CLI logic: load the configuration, extract the
//! topology of one draw.io file and write the compose document and the
//! provisioning script into the output directory.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs, path::Path};

use log::{info, warn};

use drawnet::{Diagnostic, DrawnetError, LabBuilder};

use error_adapter::{DiagnosticAdapter, render};

/// File name of the generated compose document.
pub const COMPOSE_FILE: &str = "docker-compose.yml";

/// File name of the generated provisioning script.
pub const PROVISION_FILE: &str = "provision.sh";

/// Run the drawnet CLI application
///
/// This function processes the input file through the drawnet pipeline and
/// writes the compose document and the provisioning script. Nothing is written
/// unless both outputs rendered.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `DrawnetError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Extraction errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), DrawnetError> {
    info!(
        input_path = args.input,
        output_dir = args.output;
        "Processing diagram"
    );

    // Load configuration
    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(build_path) = &args.build_path {
        let compose = app_config
            .compose()
            .clone()
            .with_build_path(build_path.as_str());
        app_config = app_config.with_compose(compose);
    }

    // Read input file
    let source = fs::read_to_string(&args.input)?;

    // Extract and render
    let builder = LabBuilder::new(app_config);
    let lab = builder.parse(&source)?;
    report_warnings(&lab.warnings, &source);

    let compose = builder.render_compose(&lab.topology)?;
    let script = builder.render_provisioning(&lab.topology)?;

    // Write output files
    let output_dir = Path::new(&args.output);
    fs::create_dir_all(output_dir)?;
    fs::write(output_dir.join(COMPOSE_FILE), compose)?;
    fs::write(output_dir.join(PROVISION_FILE), script)?;

    info!(
        routers = lab.topology.routers().len(),
        links = lab.topology.links().len(),
        networks = lab.topology.networks().len(),
        output_dir = args.output;
        "Lab exported successfully"
    );

    Ok(())
}

/// Log every extraction warning once, as a rendered miette report.
fn report_warnings(warnings: &[Diagnostic], source: &str) {
    for report in render_warnings(warnings, source) {
        warn!("{report}");
    }
}

fn render_warnings(warnings: &[Diagnostic], source: &str) -> Vec<String> {
    warnings
        .iter()
        .map(|diag| {
            render(&DiagnosticAdapter::new(diag, source))
                .unwrap_or_else(|_| diag.message().to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use drawnet::config::AppConfig;
    use drawnet_parser::error::ErrorCode;

    use super::*;

    #[test]
    fn test_each_warning_rendered_once() {
        let source = r#"<mxGraphModel><root>
<mxCell id="0"/><mxCell id="1" parent="0"/>
<mxCell id="a" value="" style="ellipse;" vertex="1" parent="1"/>
<mxCell id="b" value="B" style="ellipse;" vertex="1" parent="1"/>
<mxCell id="n" value="LAN" style="shape=hexagon;" vertex="1" parent="1"/>
<mxCell id="e1" value="10.0.0.0/30" style="endArrow=none;" edge="1" parent="1" source="a" target="b"/>
<mxCell id="e2" style="endArrow=none;" edge="1" parent="1" source="b" target="n"/>
<mxCell id="e3" style="endArrow=none;" edge="1" parent="1" source="b" target="gone"/>
</root></mxGraphModel>"#;
        let lab = LabBuilder::new(AppConfig::default())
            .parse(source)
            .expect("diagram should convert");

        let codes: Vec<ErrorCode> = lab.warnings.iter().filter_map(Diagnostic::code).collect();
        assert_eq!(codes, vec![ErrorCode::E200, ErrorCode::E101, ErrorCode::E303]);

        let reports = render_warnings(&lab.warnings, source);
        assert_eq!(reports.len(), 3);
        assert!(reports[2].contains("is not a subnet"));
    }
}
