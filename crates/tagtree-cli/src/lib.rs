//! tagtree CLI library
//!
//! This module contains the core CLI logic for the tagtree compiler.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{debug, info};

use tagtree::{TagTreeError, TreeBuilder};

/// Run the tagtree CLI application
///
/// This function reads the tag table (CSV or `.xlsx`) and templates,
/// compiles the tag tree, and writes the resulting JSON document to the
/// output file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `TagTreeError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Unreadable tag tables or workbooks
/// - Invalid or missing templates
/// - Serialization errors
pub fn run(args: &Args) -> Result<(), TagTreeError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing tag table"
    );

    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?;
    let builder = TreeBuilder::new(app_config);

    let template_config = builder.config().templates();
    debug!(
        numeric = template_config.numeric(),
        textual = template_config.textual(),
        namespace = template_config.namespace();
        "Template selection"
    );

    // Load templates
    let templates = builder.load_templates(&args.templates)?;

    // Read the tag table, CSV or workbook
    let rows = builder.read_table(&args.input)?;

    // Compile the tree using the TreeBuilder API
    let parsed = builder.parse(&rows);
    let forest = builder.build(&parsed.records, &templates)?;
    let json = builder.render_json(&forest)?;

    // Write output file
    fs::write(&args.output, json)?;

    info!(output_file = args.output; "Tag tree exported successfully");

    Ok(())
}
