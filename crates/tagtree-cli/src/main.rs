//! tagtree CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use tagtree_cli::{Args, error_adapter::ErrorAdapter};

fn main() {
    // Install miette's panic hook before anything can panic
    miette::set_panic_hook();

    // Parse arguments first, the log level comes from them
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

    info!(log_level:?; "Starting tagtree");
    debug!(args:?; "Parsed arguments");

    // Compile the table; a failed build leaves no output file behind
    if let Err(err) = tagtree_cli::run(&args) {
        let reporter = miette::GraphicalReportHandler::new();

        // A build stops at its first error, so there is one report to render
        let mut writer = String::new();
        reporter
            .render_report(&mut writer, &ErrorAdapter(&err))
            .expect("Writing to String buffer is infallible");

        error!("{writer}");
        process::exit(1);
    }

    info!("Completed successfully");
}
