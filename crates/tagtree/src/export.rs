//! Tree writer.
//!
//! Serializes a [`Forest`] into the import document accepted by the tag
//! database:
//!
//! ```text
//! {
//!     "tags": [ ...folders and instances... ],
//!     "type": "UdtType"
//! }
//! ```

use std::io;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use tagtree_core::tree::Forest;

use crate::{TagTreeError, config::OutputConfig};

/// Value of the document's top-level `type` field.
pub const DOCUMENT_TYPE: &str = "UdtType";

#[derive(Serialize)]
struct Document<'a> {
    tags: &'a Forest,
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Renders the import document for `forest`.
///
/// # Errors
///
/// Returns [`TagTreeError::Export`] if serialization fails.
pub fn to_json(forest: &Forest, config: &OutputConfig) -> Result<String, TagTreeError> {
    let document = Document {
        tags: forest,
        kind: DOCUMENT_TYPE,
    };

    if !config.pretty() {
        return Ok(serde_json::to_string(&document)?);
    }

    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    document.serialize(&mut serializer)?;

    let json = String::from_utf8(buffer)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    Ok(json)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn test_empty_forest() {
        let json = to_json(&Forest::new(), &OutputConfig::new(false)).unwrap();
        assert_eq!(json, r#"{"tags":[],"type":"UdtType"}"#);
    }

    #[test]
    fn test_pretty_uses_four_spaces() {
        let mut forest = Forest::new();
        forest.resolve("A");

        let json = to_json(&forest, &OutputConfig::default()).unwrap();

        assert!(json.starts_with("{\n    \"tags\": ["));
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            json!({
                "tags": [{ "name": "A", "tagType": "Folder", "tags": [] }],
                "type": "UdtType"
            })
        );
    }

    #[test]
    fn test_pretty_keeps_non_ascii_names() {
        let mut forest = Forest::new();
        forest.resolve("Förderband.Zone_Ä");

        let json = to_json(&forest, &OutputConfig::default()).unwrap();

        assert!(json.contains("\"name\": \"Förderband\""));
        assert!(json.contains("\"name\": \"Zone_Ä\""));
    }
}
