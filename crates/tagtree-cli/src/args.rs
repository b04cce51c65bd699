//! Command-line argument definitions for the tagtree CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input table, template locations,
//! output path, configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the tagtree compiler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input tag table (CSV or .xlsx: tag, description)
    #[arg(help = "Path to the input tag table")]
    pub input: String,

    /// UDT template JSON files, or directories containing them
    #[arg(short, long, required = true, num_args = 1..)]
    pub templates: Vec<String>,

    /// Path to the output JSON file
    #[arg(short, long, default_value = "folder_structure.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
