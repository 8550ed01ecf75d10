//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use drawnet::{DrawnetError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for DrawnetError {
    fn from(err: ConfigError) -> Self {
        DrawnetError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (drawnet/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// The loaded configuration is validated before it is returned.
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
/// - The shape patterns do not compile or are identical
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, DrawnetError> {
    let config = find_config(explicit_path)?;
    config
        .parse_config()
        .map_err(|err| ConfigError::Validation(err.to_string()))?;
    Ok(config)
}

fn find_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, DrawnetError> {
    // 1. Explicit path
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    // 2. Local project directory
    let local_config = Path::new("drawnet/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    // 3. Platform-specific config directory
    if let Some(proj_dirs) = ProjectDirs::from("com", "drawnet", "drawnet") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(
                path = system_config.display().to_string();
                "Loading configuration from system path"
            );
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    // 4. Defaults
    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, DrawnetError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use drawnet::topology::Stage;

    use super::*;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_full_config() {
        let (_dir, path) = write_config(
            r#"
[shapes]
router = "shape=mxgraph.cisco.routers"
network = "shape=cloud"

[topology]
allow_empty = ["networks", "links"]

[compose]
build_path = "/srv/frr"
base_port = 4000
enable_ipv6 = true

[provisioning]
daemons = ["bgpd", "ldpd"]
mpls = true
vrf_table_base = 100
"#,
        );
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.shapes().network(), "shape=cloud");
        assert_eq!(config.topology().allow_empty(), &[Stage::Networks, Stage::Links]);
        assert_eq!(config.compose().build_path(), "/srv/frr");
        assert_eq!(config.compose().base_port(), 4000);
        assert_eq!(config.compose().container_port(), 22);
        assert!(config.provisioning().mpls());
        assert_eq!(config.provisioning().vrf_table_base(), 100);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let (_dir, path) = write_config("[compose]\nprivileged = false\n");
        let config = load_config(Some(&path)).unwrap();
        assert!(!config.compose().privileged());
        assert_eq!(config.shapes().router(), "ellipse");
        assert_eq!(config.provisioning().daemons(), &["ospfd", "bgpd"]);
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = load_config(Some("/nonexistent/drawnet.toml")).unwrap_err();
        assert!(matches!(err, DrawnetError::Config(_)));
        assert!(err.to_string().contains("Missing configuration file"));
    }

    #[test]
    fn test_invalid_toml() {
        let (_dir, path) = write_config("[compose\nbase_port = 1");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"));
    }

    #[test]
    fn test_invalid_pattern_fails_validation() {
        let (_dir, path) = write_config("[shapes]\nrouter = \"ellipse(\"\n");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Validation error"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_unknown_stage_rejected() {
        let (_dir, path) = write_config("[topology]\nallow_empty = [\"switches\"]\n");
        assert!(load_config(Some(&path)).is_err());
    }
}
