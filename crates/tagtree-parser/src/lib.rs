//! # tagtree Parser
//!
//! Parser for industrial control tag tables. This crate turns raw
//! `(tag, description)` rows into [`TagRecord`](tagtree_core::record::TagRecord)s
//! and groups them for tree assembly.
//!
//! ## Usage
//!
//! ```
//! # use tagtree_parser::{ParseConfig, PrefixGroups, RawRow, parse_rows};
//!
//! let rows = vec![
//!     RawRow::new("Area1.Line2[3].Motor.Fault.1", "Overload"),
//!     RawRow::new("Area1.Line2[3].Motor.Fault.2", "Jam"),
//! ];
//!
//! let output = parse_rows(&rows, &ParseConfig::default());
//! let groups = PrefixGroups::new(&output.records);
//! assert_eq!(groups.prefixes().collect::<Vec<_>>(), ["Area1.Line2"]);
//! ```

mod group;
mod rows;
mod tag;

pub use group::{PrefixGroups, group_by_instance};
pub use rows::{ParseConfig, ParseOutput, RawRow, SkipReason, SkippedRow, WILDCARD, parse_rows};
pub use tag::parse_tag;
