//! Drawnet CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use drawnet_cli::{
    Args,
    error_adapter::{render, to_reportables},
};

fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    // Parse configuration first
    let args = Args::parse();

    // Initialize the logger with the specified log level
    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting drawnet");
    debug!(args:?; "Parsed arguments");

    // Run the application
    if let Err(err) = drawnet_cli::run(&args) {
        // Render each diagnostic independently
        for reportable in to_reportables(&err) {
            let report = render(&reportable).expect("Writing to String buffer is infallible");
            error!("{report}");
        }

        process::exit(i32::from(err.exit_code()));
    }

    info!("Completed successfully");
}
