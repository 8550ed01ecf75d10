//! Provisioning script generation.
//!
//! The script runs against a started compose project. For every router, in
//! topology order, it enables the configured FRR daemons, turns on MPLS when
//! configured, creates one VRF device per VRF named on the router label and
//! restarts FRR.

use std::fmt::Write as _;

use log::{debug, info};

use drawnet_core::topology::Topology;

use super::{Error, Exporter};
use crate::config::ProvisioningConfig;

const DAEMONS_FILE: &str = "/etc/frr/daemons";

/// Quote `word` for a POSIX shell.
fn shell_quote(word: &str) -> String {
    if !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=".contains(c))
    {
        return word.to_string();
    }
    format!("'{}'", word.replace('\'', r#"'\''"#))
}

/// Renders the provisioning shell script.
#[derive(Debug, Clone)]
pub struct ProvisionExporter<'a> {
    config: &'a ProvisioningConfig,
}

impl<'a> ProvisionExporter<'a> {
    pub fn new(config: &'a ProvisioningConfig) -> Self {
        Self { config }
    }
}

impl Exporter for ProvisionExporter<'_> {
    fn export(&self, topology: &Topology) -> Result<String, Error> {
        let mut script = String::new();
        writeln!(script, "#!/bin/sh")?;
        writeln!(script, "# Provisioning for {} routers", topology.routers().len())?;
        writeln!(script, "set -eu")?;

        for router in topology.routers() {
            let service = shell_quote(router.name());
            let exec = format!("docker compose exec -T {service}");

            writeln!(script)?;
            writeln!(script, "# {}", router.name())?;
            for daemon in self.config.daemons() {
                let expr = shell_quote(&format!("s/^{daemon}=no/{daemon}=yes/"));
                writeln!(script, "{exec} sed -i {expr} {DAEMONS_FILE}")?;
            }

            if self.config.mpls() {
                writeln!(
                    script,
                    "{exec} sysctl -w net.mpls.platform_labels={}",
                    self.config.platform_labels()
                )?;
                writeln!(
                    script,
                    "{exec} sh -c 'for f in /proc/sys/net/mpls/conf/*/input; do echo 1 > \"$f\"; done'"
                )?;
            }

            for (offset, vrf) in router.vrfs().enumerate() {
                let table = self.config.vrf_table_base() as usize + offset;
                let vrf = shell_quote(vrf);
                writeln!(script, "{exec} ip link add {vrf} type vrf table {table}")?;
                writeln!(script, "{exec} ip link set {vrf} up")?;
            }

            writeln!(script, "{exec} /usr/lib/frr/frrinit.sh restart")?;
            debug!(router = router.name(), vrfs = router.vrf_count(); "Router provisioning added");
        }

        info!(routers = topology.routers().len(); "Provisioning script rendered");
        Ok(script)
    }
}
