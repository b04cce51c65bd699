//! Error types for tagtree operations.
//!
//! This module provides the main error type [`TagTreeError`] which wraps
//! the error conditions that can occur while reading inputs, building the
//! tree, and writing the result.

use std::io;

use thiserror::Error;

use tagtree_core::template::{TemplateError, TemplateId};

/// The main error type for tagtree operations.
///
/// Data-quality problems in individual rows (null tags, wildcard rows,
/// irregular instance names, bits without a placeholder) are never errors.
/// Only I/O, malformed inputs, and configuration inconsistencies such as a
/// missing template end up here.
#[derive(Debug, Error)]
pub enum TagTreeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input error: {0}")]
    Input(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("template `{template}` required by instance `{instance}` is not loaded")]
    MissingTemplate {
        template: TemplateId,
        instance: String,
    },

    #[error("Export error: {0}")]
    Export(#[from] serde_json::Error),
}
