//! Error adapter for converting TagTreeError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error type
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use tagtree::TagTreeError;

/// Adapter rendering a [`TagTreeError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a TagTreeError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            TagTreeError::Io(_) => "tagtree::io",
            TagTreeError::Config(_) => "tagtree::config",
            TagTreeError::Input(_) => "tagtree::input",
            TagTreeError::Workbook(_) => "tagtree::workbook",
            TagTreeError::Template(_) => "tagtree::template",
            TagTreeError::MissingTemplate { .. } => "tagtree::missing_template",
            TagTreeError::Export(_) => "tagtree::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            TagTreeError::MissingTemplate { template, .. } => Some(Box::new(format!(
                "pass `{template}.json` with --templates, or change the `[templates]` section of the configuration"
            ))),
            TagTreeError::Input(_) => Some(Box::new(
                "the tag table must be UTF-8 CSV with the tag in the first column and its description in the second",
            )),
            TagTreeError::Workbook(_) => Some(Box::new(
                "only .xlsx workbooks are read; the tag is taken from column A and its description from column B of the first sheet",
            )),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}
