//! Command-line argument definitions for the drawnet CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input diagram, the output directory,
//! configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the drawnet lab generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input draw.io file
    #[arg(help = "Path to the uncompressed .drawio file")]
    pub input: String,

    /// Directory receiving docker-compose.yml and provision.sh
    #[arg(short, long, default_value = ".")]
    pub output: String,

    /// Build context for router containers, overriding the configuration
    #[arg(short, long)]
    pub build_path: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
