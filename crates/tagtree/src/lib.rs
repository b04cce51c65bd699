//! tagtree - compiles flat industrial control tag tables into folder trees.
//!
//! Tags such as `Area1.Line2[3].Motor.Fault.1` are parsed into a prefix, an
//! instance name and a bit. Prefixes become a deduplicated folder hierarchy,
//! every distinct instance name becomes a copy of a UDT template, and the bit
//! descriptions of the table are written into the template's placeholders.

pub mod assemble;
pub mod config;
pub mod export;
pub mod input;
pub mod instantiate;
pub mod select;
pub mod templates;

mod error;

pub use tagtree_core::{record, template, tree};
pub use tagtree_parser::{ParseOutput, RawRow, SkipReason, SkippedRow};

pub use error::TagTreeError;

use std::{io, path::Path};

use log::{debug, info, trace};

use tagtree_core::{record::TagRecord, template::TemplateStore, tree::Forest};

use assemble::BuildStats;
use config::AppConfig;
use instantiate::Instantiator;
use select::TemplateSelector;

/// Builder for compiling tag tables into tag trees.
///
/// This provides an API for processing a tag table through reading, parsing,
/// assembly and export stages.
///
/// # Examples
///
/// ```rust
/// use tagtree::{TreeBuilder, RawRow, template::{TagDefinition, TemplateStore, UdtTemplate}};
///
/// let placeholders = TagDefinition::new("bitsDescription", "Folder")
///     .with_child(TagDefinition::new("1_description", "AtomicTag").with_field("value", ""));
/// let templates: TemplateStore = ["AlarmsDINT", "AlarmsDINT2"]
///     .into_iter()
///     .map(|id| UdtTemplate::new(id, vec![placeholders.clone()], "bitsDescription"))
///     .collect();
///
/// let builder = TreeBuilder::default();
/// let parsed = builder.parse(&[RawRow::new("Area1.M1.1", "Overload")]);
/// let forest = builder.build(&parsed.records, &templates).expect("templates are loaded");
/// let json = builder.render_json(&forest).expect("serializable");
///
/// assert!(json.contains("\"Overload\""));
/// ```
#[derive(Debug, Default)]
pub struct TreeBuilder {
    config: AppConfig,
}

impl TreeBuilder {
    /// Create a new tree builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration of this builder.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Read rows from a tag table file, CSV or Excel workbook by extension.
    ///
    /// # Errors
    ///
    /// Returns `TagTreeError::Io` if the file cannot be opened, and
    /// `TagTreeError::Input` or `TagTreeError::Workbook` if it cannot be read.
    pub fn read_table<P: AsRef<Path>>(&self, path: P) -> Result<Vec<RawRow>, TagTreeError> {
        input::read_table_file(path.as_ref(), self.config.input())
    }

    /// Read rows from a two-column CSV tag table.
    ///
    /// # Errors
    ///
    /// Returns `TagTreeError::Input` if the table cannot be read.
    pub fn read_rows<R: io::Read>(&self, reader: R) -> Result<Vec<RawRow>, TagTreeError> {
        input::read_rows(reader, self.config.input())
    }

    /// Load templates from template files or directories of template files.
    ///
    /// # Errors
    ///
    /// Returns `TagTreeError` for unreadable paths or invalid template JSON.
    pub fn load_templates<P: AsRef<Path>>(
        &self,
        paths: &[P],
    ) -> Result<TemplateStore, TagTreeError> {
        templates::load_templates(paths, self.config.templates())
    }

    /// Parse rows into tag records.
    ///
    /// Null and wildcard rows are dropped and reported in
    /// [`ParseOutput::skipped`]; parsing itself never fails.
    pub fn parse(&self, rows: &[RawRow]) -> ParseOutput {
        info!(rows = rows.len(); "Parsing tag rows");
        let output = tagtree_parser::parse_rows(rows, &self.config.input().parse_config());
        trace!(records:? = output.records; "Parsed records");
        output
    }

    /// Build the folder and instance tree for `records`.
    ///
    /// # Errors
    ///
    /// Returns `TagTreeError::MissingTemplate` if an instance needs a template
    /// that is not in `templates`.
    pub fn build(
        &self,
        records: &[TagRecord],
        templates: &TemplateStore,
    ) -> Result<Forest, TagTreeError> {
        self.build_with_stats(records, templates)
            .map(|(forest, _)| forest)
    }

    /// Build the tree and return the counters collected along the way.
    ///
    /// # Errors
    ///
    /// Same as [`TreeBuilder::build`].
    pub fn build_with_stats(
        &self,
        records: &[TagRecord],
        templates: &TemplateStore,
    ) -> Result<(Forest, BuildStats), TagTreeError> {
        let template_config = self.config.templates();
        info!(records = records.len(), templates = templates.len(); "Building tag tree");

        let instantiator = Instantiator::new(
            TemplateSelector::from_config(template_config),
            templates,
            template_config.namespace(),
        );
        let assembly = assemble::assemble(records, &instantiator)?;
        let stats = assembly.stats;

        info!(
            prefixes = stats.prefixes,
            folders = stats.folders,
            instances = stats.instances;
            "Tag tree built"
        );
        if stats.unmatched_bits > 0 {
            debug!(unmatched_bits = stats.unmatched_bits; "Descriptions without a template placeholder were dropped");
        }

        Ok((assembly.forest, stats))
    }

    /// Render a tree to the JSON import document.
    ///
    /// # Errors
    ///
    /// Returns `TagTreeError::Export` if serialization fails.
    pub fn render_json(&self, forest: &Forest) -> Result<String, TagTreeError> {
        let json = export::to_json(forest, self.config.output())?;
        debug!(bytes = json.len(); "Tag tree rendered");
        Ok(json)
    }
}
