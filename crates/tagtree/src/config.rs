//! Configuration types for tagtree builds.
//!
//! This module provides configuration structures that control how the input
//! table is read, which templates instances are built from, and how the
//! output is written. All types implement [`serde::Deserialize`] and every
//! field has a default, so a configuration file only needs to list what it
//! changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`InputConfig`] - Null markers and header handling of the tag table.
//! - [`TemplateConfig`] - Template names, UDT namespace and placeholder folder.
//! - [`OutputConfig`] - Output formatting.
//!
//! # Example
//!
//! ```
//! # use tagtree::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.templates().numeric(), "AlarmsDINT");
//! assert_eq!(config.templates().textual(), "AlarmsDINT2");
//! ```

use serde::Deserialize;

use tagtree_parser::ParseConfig;

/// Top-level configuration combining input, template and output settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Input table section.
    #[serde(default)]
    input: InputConfig,

    /// Template selection section.
    #[serde(default)]
    templates: TemplateConfig,

    /// Output section.
    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(input: InputConfig, templates: TemplateConfig, output: OutputConfig) -> Self {
        Self {
            input,
            templates,
            output,
        }
    }

    /// Returns the input configuration.
    pub fn input(&self) -> &InputConfig {
        &self.input
    }

    /// Returns the template configuration.
    pub fn templates(&self) -> &TemplateConfig {
        &self.templates
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }
}

/// How the tag table is read.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Cell contents treated as empty.
    null_markers: Vec<String>,

    /// Whether the first row of the table is a header.
    has_headers: bool,
}

impl InputConfig {
    /// Creates a new [`InputConfig`].
    ///
    /// # Arguments
    ///
    /// * `null_markers` - Cell contents treated as empty, e.g. `N/A`.
    /// * `has_headers` - Skip the first row of the table.
    pub fn new(null_markers: Vec<String>, has_headers: bool) -> Self {
        Self {
            null_markers,
            has_headers,
        }
    }

    pub fn null_markers(&self) -> &[String] {
        &self.null_markers
    }

    pub fn has_headers(&self) -> bool {
        self.has_headers
    }

    /// Returns the parser configuration derived from this section.
    pub fn parse_config(&self) -> ParseConfig {
        ParseConfig::new(self.null_markers.clone())
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::new(vec!["N/A".to_string()], false)
    }
}

/// Which templates instances are built from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Template for instance names made only of digits.
    numeric: String,

    /// Template for other instance names without brackets.
    textual: String,

    /// UDT type path prepended to the template name in `typeId`.
    namespace: String,

    /// Folder whose `<N>_description` children receive bit descriptions.
    placeholder_folder: String,
}

impl TemplateConfig {
    /// Creates a new [`TemplateConfig`] with the default placeholder folder.
    ///
    /// # Arguments
    ///
    /// * `numeric` - Template for digit-only instance names.
    /// * `textual` - Template for textual instance names.
    /// * `namespace` - UDT type path, e.g. `Plant/Alarms`.
    pub fn new(
        numeric: impl Into<String>,
        textual: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            numeric: numeric.into(),
            textual: textual.into(),
            namespace: namespace.into(),
            placeholder_folder: "bitsDescription".to_string(),
        }
    }

    /// Sets the placeholder folder name.
    pub fn with_placeholder_folder(mut self, folder: impl Into<String>) -> Self {
        self.placeholder_folder = folder.into();
        self
    }

    pub fn numeric(&self) -> &str {
        &self.numeric
    }

    pub fn textual(&self) -> &str {
        &self.textual
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn placeholder_folder(&self) -> &str {
        &self.placeholder_folder
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self::new("AlarmsDINT", "AlarmsDINT2", "AmazonUDTs/AlarmsUDTs")
    }
}

/// How the tree is written.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Indent the JSON output.
    pretty: bool,
}

impl OutputConfig {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn pretty(&self) -> bool {
        self.pretty
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new(true)
    }
}
