//! tagtree Core Types and Definitions
//!
//! This crate provides the foundational types shared by the tagtree parser,
//! compiler, and command-line tool. It includes:
//!
//! - **Records**: Parsed tag rows ([`record::TagRecord`])
//! - **Tree**: The output folder hierarchy ([`tree::Forest`], [`tree::Folder`], [`tree::UdtInstance`])
//! - **Templates**: UDT template definitions with typed bit slots ([`template`] module)

pub mod record;
pub mod template;
pub mod tree;
