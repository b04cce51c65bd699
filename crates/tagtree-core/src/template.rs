//! UDT template definitions.
//!
//! A template is a read-only tree of [`TagDefinition`]s loaded from an
//! exported UDT JSON document. When a template is built, the description
//! placeholders inside its placeholder folder are marked with a typed
//! [`BitSlot`], so instantiation never has to match names again.
//!
//! A placeholder is a child of a `Folder` tag named after the configured
//! placeholder folder (usually `bitsDescription`) whose own name has the form
//! `<digits>_description`.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use tagtree_core::template::UdtTemplate;
//!
//! let json = r#"{
//!     "tags": [
//!         {
//!             "name": "bitsDescription",
//!             "tagType": "Folder",
//!             "tags": [
//!                 { "name": "1_description", "tagType": "AtomicTag", "value": "" }
//!             ]
//!         }
//!     ]
//! }"#;
//!
//! let template = UdtTemplate::from_json("AlarmsDINT", json, "bitsDescription").unwrap();
//! assert!(template.has_slot("1"));
//!
//! let descriptions = HashMap::from([("1".to_string(), "Overload".to_string())]);
//! let tags = template.instantiate_tags(&descriptions);
//! assert_eq!(tags[0].children()[0].value().and_then(|v| v.as_str()), Some("Overload"));
//! ```

use std::{
    borrow::Borrow,
    collections::{HashMap, HashSet},
    fmt,
};

use indexmap::IndexMap;
use log::debug;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::Error as _,
    ser::SerializeMap,
};
use serde_json::{Map, Value};
use thiserror::Error;

/// Suffix that marks a placeholder tag name, e.g. `3_description`.
pub const PLACEHOLDER_SUFFIX: &str = "_description";

/// Tag type string used for folders, both in templates and in the output tree.
pub const FOLDER_TAG_TYPE: &str = "Folder";

/// Errors raised while building templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("invalid template `{id}`: {source}")]
    Json {
        id: TemplateId,
        #[source]
        source: serde_json::Error,
    },
}

/// Identifier of a template in a [`TemplateStore`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateId(String);

impl TemplateId {
    /// Creates a new template identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TemplateId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TemplateId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for TemplateId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The bit number a placeholder tag receives its description from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitSlot(String);

impl BitSlot {
    /// Recognizes a placeholder name of the form `<digits>_description`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagtree_core::template::BitSlot;
    ///
    /// assert_eq!(BitSlot::from_placeholder_name("12_description").unwrap().number(), "12");
    /// assert!(BitSlot::from_placeholder_name("description").is_none());
    /// assert!(BitSlot::from_placeholder_name("x1_description").is_none());
    /// ```
    pub fn from_placeholder_name(name: &str) -> Option<Self> {
        let digits = name.strip_suffix(PLACEHOLDER_SUFFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self(digits.to_string()))
    }

    /// Returns the bit number as written in the placeholder name.
    pub fn number(&self) -> &str {
        &self.0
    }
}

/// Key of the nested tag list.
const TAGS_KEY: &str = "tags";

/// One node of a template tag tree.
///
/// Only `name`, `tagType` and nested `tags` are interpreted. Every key of the
/// source document, interpreted or not, is written back at its original
/// position.
#[derive(Debug, Clone, PartialEq)]
pub struct TagDefinition {
    name: String,
    tag_type: Option<String>,
    /// All keys in document order. The `tags` entry is a null marker whose
    /// content lives in `tags`.
    fields: Map<String, Value>,
    tags: Option<Vec<TagDefinition>>,
    slot: Option<BitSlot>,
}

impl TagDefinition {
    /// Creates a tag definition with no extra fields and no children.
    pub fn new(name: impl Into<String>, tag_type: impl Into<String>) -> Self {
        let name = name.into();
        let tag_type = tag_type.into();

        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::from(name.as_str()));
        fields.insert("tagType".to_string(), Value::from(tag_type.as_str()));

        Self {
            name,
            tag_type: Some(tag_type),
            fields,
            tags: None,
            slot: None,
        }
    }

    /// Adds a nested tag, builder style.
    pub fn with_child(mut self, child: TagDefinition) -> Self {
        self.fields
            .entry(TAGS_KEY.to_string())
            .or_insert(Value::Null);
        self.tags.get_or_insert_with(Vec::new).push(child);
        self
    }

    /// Sets an arbitrary field, builder style.
    ///
    /// `name`, `tagType` and `tags` are structural and cannot be set this way.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !matches!(key.as_str(), "name" | "tagType" | TAGS_KEY) {
            self.fields.insert(key, value.into());
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag_type(&self) -> Option<&str> {
        self.tag_type.as_deref()
    }

    /// Returns `true` if this tag is a folder.
    pub fn is_folder(&self) -> bool {
        self.tag_type() == Some(FOLDER_TAG_TYPE)
    }

    /// Returns the `value` field, if present.
    pub fn value(&self) -> Option<&Value> {
        self.fields.get("value")
    }

    /// Overwrites the `value` field.
    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.fields.insert("value".to_string(), value.into());
    }

    /// Returns a field as written in the document.
    ///
    /// Nested tags are not a field; use [`TagDefinition::children`].
    pub fn field(&self, key: &str) -> Option<&Value> {
        if key == TAGS_KEY {
            return None;
        }
        self.fields.get(key)
    }

    /// Returns the nested tags (empty for leaf tags).
    pub fn children(&self) -> &[TagDefinition] {
        self.tags.as_deref().unwrap_or_default()
    }

    /// Returns the nested tag with the given name.
    pub fn child(&self, name: &str) -> Option<&TagDefinition> {
        self.children().iter().find(|tag| tag.name == name)
    }

    /// Returns the bit slot of this tag, if it is a placeholder.
    pub fn slot(&self) -> Option<&BitSlot> {
        self.slot.as_ref()
    }

    fn children_mut(&mut self) -> &mut [TagDefinition] {
        self.tags.as_deref_mut().unwrap_or_default()
    }

    /// Marks placeholders below every folder named `placeholder_folder`.
    fn mark_slots(&mut self, placeholder_folder: &str, slots: &mut HashSet<String>) {
        let is_placeholder_folder = self.is_folder() && self.name == placeholder_folder;

        for child in self.children_mut() {
            if is_placeholder_folder {
                if let Some(slot) = BitSlot::from_placeholder_name(&child.name) {
                    slots.insert(slot.number().to_string());
                    child.slot = Some(slot);
                }
            }
            child.mark_slots(placeholder_folder, slots);
        }
    }

    /// Writes descriptions into the slots of this subtree.
    fn fill_slots(&mut self, descriptions: &HashMap<String, String>) {
        if let Some(description) = self
            .slot
            .as_ref()
            .and_then(|slot| descriptions.get(slot.number()))
        {
            let description = description.clone();
            self.set_value(description);
        }

        for child in self.children_mut() {
            child.fill_slots(descriptions);
        }
    }
}

impl Serialize for TagDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let null_tags = self.tags.is_none() && self.fields.contains_key(TAGS_KEY);
        let mut map = serializer.serialize_map(Some(self.fields.len() - usize::from(null_tags)))?;
        for (key, value) in &self.fields {
            if key != TAGS_KEY {
                map.serialize_entry(key, value)?;
            } else if let Some(tags) = &self.tags {
                map.serialize_entry(key, tags)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TagDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields: Map<String, Value> = Map::deserialize(deserializer)?;

        let name = fields
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| D::Error::missing_field("name"))?
            .to_string();
        let tag_type = fields
            .get("tagType")
            .and_then(Value::as_str)
            .map(str::to_string);

        let tags = match fields.get_mut(TAGS_KEY) {
            None | Some(Value::Null) => None,
            Some(nested) => {
                Some(Vec::<TagDefinition>::deserialize(nested.take()).map_err(D::Error::custom)?)
            }
        };

        Ok(Self {
            name,
            tag_type,
            fields,
            tags,
            slot: None,
        })
    }
}

#[derive(Deserialize)]
struct TemplateDocument {
    tags: Vec<TagDefinition>,
}

/// A named UDT template with its bit slots resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct UdtTemplate {
    id: TemplateId,
    tags: Vec<TagDefinition>,
    slots: HashSet<String>,
}

impl UdtTemplate {
    /// Builds a template from its top-level tags.
    ///
    /// # Arguments
    ///
    /// * `id` - Identifier the template is looked up by.
    /// * `tags` - Top-level tag definitions of the UDT.
    /// * `placeholder_folder` - Name of the folder whose `<N>_description`
    ///   children become bit slots.
    pub fn new(
        id: impl Into<TemplateId>,
        mut tags: Vec<TagDefinition>,
        placeholder_folder: &str,
    ) -> Self {
        let id = id.into();
        let mut slots = HashSet::new();

        for tag in &mut tags {
            tag.mark_slots(placeholder_folder, &mut slots);
        }

        debug!(template = id.as_str(), slots = slots.len(); "Template loaded");

        Self { id, tags, slots }
    }

    /// Parses a template from an exported UDT JSON document.
    ///
    /// The document must be an object with a `tags` array; all other
    /// top-level fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Json`] if the document is not valid JSON or
    /// lacks the `tags` array.
    pub fn from_json(
        id: impl Into<TemplateId>,
        json: &str,
        placeholder_folder: &str,
    ) -> Result<Self, TemplateError> {
        let id = id.into();
        let document: TemplateDocument =
            serde_json::from_str(json).map_err(|source| TemplateError::Json {
                id: id.clone(),
                source,
            })?;
        Ok(Self::new(id, document.tags, placeholder_folder))
    }

    pub fn id(&self) -> &TemplateId {
        &self.id
    }

    /// Returns the top-level tags of the template.
    pub fn tags(&self) -> &[TagDefinition] {
        &self.tags
    }

    /// Returns `true` if the template has a placeholder for `bit`.
    pub fn has_slot(&self, bit: &str) -> bool {
        self.slots.contains(bit)
    }

    /// Returns the number of bit slots in the template.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns an independent copy of the tag tree with descriptions written
    /// into matching bit slots.
    ///
    /// Descriptions for bits that have no slot are ignored. The template
    /// itself is never modified.
    pub fn instantiate_tags(&self, descriptions: &HashMap<String, String>) -> Vec<TagDefinition> {
        let mut tags = self.tags.clone();
        for tag in &mut tags {
            tag.fill_slots(descriptions);
        }
        tags
    }
}

/// Templates available to a build, keyed by [`TemplateId`].
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: IndexMap<TemplateId, UdtTemplate>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a template, returning the one it replaced, if any.
    pub fn insert(&mut self, template: UdtTemplate) -> Option<UdtTemplate> {
        self.templates.insert(template.id.clone(), template)
    }

    /// Looks up a template by identifier.
    pub fn get(&self, id: &str) -> Option<&UdtTemplate> {
        self.templates.get(id)
    }

    /// Returns the identifiers of all templates in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &TemplateId> {
        self.templates.keys()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl FromIterator<UdtTemplate> for TemplateStore {
    fn from_iter<I: IntoIterator<Item = UdtTemplate>>(iter: I) -> Self {
        let mut store = Self::new();
        for template in iter {
            store.insert(template);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn alarm_template() -> UdtTemplate {
        let json = json!({
            "name": "AlarmsDINT",
            "tagType": "UdtType",
            "tags": [
                {
                    "name": "bitsDescription",
                    "tagType": "Folder",
                    "tags": [
                        { "name": "1_description", "tagType": "AtomicTag", "valueSource": "memory", "value": "" },
                        { "name": "2_description", "tagType": "AtomicTag", "value": "" },
                        { "name": "enabled", "tagType": "AtomicTag", "value": true }
                    ]
                },
                { "name": "value", "tagType": "AtomicTag", "dataType": "Int4" }
            ]
        });
        UdtTemplate::from_json("AlarmsDINT", &json.to_string(), "bitsDescription")
            .expect("valid template")
    }

    #[test]
    fn test_slots_marked_inside_placeholder_folder() {
        let template = alarm_template();

        assert_eq!(template.slot_count(), 2);
        assert!(template.has_slot("1"));
        assert!(template.has_slot("2"));
        assert!(!template.has_slot("3"));

        let folder = &template.tags()[0];
        assert_eq!(folder.children()[0].slot().map(BitSlot::number), Some("1"));
        assert!(folder.children()[2].slot().is_none());
    }

    #[test]
    fn test_placeholder_outside_folder_is_not_a_slot() {
        let tags = vec![
            TagDefinition::new("1_description", "AtomicTag"),
            TagDefinition::new("bitsDescription", "AtomicTag")
                .with_child(TagDefinition::new("2_description", "AtomicTag")),
        ];
        let template = UdtTemplate::new("T", tags, "bitsDescription");

        assert_eq!(template.slot_count(), 0);
    }

    #[test]
    fn test_nested_placeholder_folder() {
        let tags = vec![
            TagDefinition::new("alarms", "Folder").with_child(
                TagDefinition::new("bitsDescription", "Folder")
                    .with_child(TagDefinition::new("7_description", "AtomicTag")),
            ),
        ];
        let template = UdtTemplate::new("T", tags, "bitsDescription");

        assert!(template.has_slot("7"));
    }

    #[test]
    fn test_instantiate_writes_only_matching_slots() {
        let template = alarm_template();
        let descriptions = HashMap::from([
            ("1".to_string(), "Overload".to_string()),
            ("9".to_string(), "Unused".to_string()),
        ]);

        let tags = template.instantiate_tags(&descriptions);
        let folder = &tags[0];

        assert_eq!(
            folder.child("1_description").and_then(|t| t.value()),
            Some(&json!("Overload"))
        );
        assert_eq!(
            folder.child("2_description").and_then(|t| t.value()),
            Some(&json!(""))
        );
        assert!(folder.child("9_description").is_none());
        assert_eq!(folder.children().len(), 3);
    }

    #[test]
    fn test_instantiate_leaves_template_untouched() {
        let template = alarm_template();
        let original = template.clone();
        let descriptions = HashMap::from([("2".to_string(), "Jam".to_string())]);

        let mut first = template.instantiate_tags(&descriptions);
        let second = template.instantiate_tags(&HashMap::new());
        first[0].tags.as_mut().unwrap()[1].set_value("changed");

        assert_eq!(template, original);
        assert_eq!(
            second[0].child("2_description").and_then(|t| t.value()),
            Some(&json!(""))
        );
    }

    #[test]
    fn test_round_trip_preserves_unknown_fields() {
        let template = alarm_template();
        let serialized = serde_json::to_value(template.tags()).unwrap();

        assert_eq!(
            serialized[0]["tags"][0],
            json!({ "name": "1_description", "tagType": "AtomicTag", "valueSource": "memory", "value": "" })
        );
        assert_eq!(
            serialized[1],
            json!({ "name": "value", "tagType": "AtomicTag", "dataType": "Int4" })
        );
    }

    #[test]
    fn test_field_order_is_kept() {
        let json = r#"{"tags":[{"tags":[{"value":"","tagType":"AtomicTag","name":"1_description"}],"name":"bitsDescription","tagType":"Folder"}]}"#;
        let template = UdtTemplate::from_json("T", json, "bitsDescription").unwrap();
        let descriptions = HashMap::from([("1".to_string(), "x".to_string())]);

        let tags = template.instantiate_tags(&descriptions);

        assert_eq!(
            serde_json::to_string(&tags).unwrap(),
            r#"[{"tags":[{"value":"x","tagType":"AtomicTag","name":"1_description"}],"name":"bitsDescription","tagType":"Folder"}]"#
        );
    }

    #[test]
    fn test_built_tags_serialize_name_first() {
        let tag = TagDefinition::new("bitsDescription", "Folder")
            .with_field("documentation", "bits")
            .with_child(TagDefinition::new("0_description", "AtomicTag").with_field("value", ""));

        assert_eq!(
            serde_json::to_string(&tag).unwrap(),
            r#"{"name":"bitsDescription","tagType":"Folder","documentation":"bits","tags":[{"name":"0_description","tagType":"AtomicTag","value":""}]}"#
        );
    }

    #[test]
    fn test_field_accessors() {
        let template = alarm_template();
        let folder = &template.tags()[0];
        let word = &template.tags()[1];

        assert!(folder.is_folder());
        assert_eq!(folder.tag_type(), Some("Folder"));
        assert!(folder.field("tags").is_none());
        assert_eq!(word.tag_type(), Some("AtomicTag"));
        assert_eq!(word.field("dataType"), Some(&json!("Int4")));
        assert_eq!(word.field("name"), Some(&json!("value")));
        assert!(word.field("valueSource").is_none());
    }

    #[test]
    fn test_structural_fields_cannot_be_overwritten() {
        let tag = TagDefinition::new("alarmWord", "AtomicTag")
            .with_field("name", "other")
            .with_field("tags", json!([]));

        assert_eq!(tag.name(), "alarmWord");
        assert_eq!(tag.field("name"), Some(&json!("alarmWord")));
        assert!(tag.children().is_empty());
    }

    #[test]
    fn test_tag_without_name_is_rejected() {
        let json = r#"{"tags":[{"tagType":"AtomicTag","value":1}]}"#;
        let err = UdtTemplate::from_json("Nameless", json, "bitsDescription").unwrap_err();

        assert!(err.to_string().contains("missing field `name`"));
    }

    #[test]
    fn test_null_tags_is_a_leaf() {
        let json = r#"{"tags":[{"name":"alarmWord","tagType":"AtomicTag","tags":null}]}"#;
        let template = UdtTemplate::from_json("T", json, "bitsDescription").unwrap();

        assert!(template.tags()[0].children().is_empty());
        assert_eq!(
            serde_json::to_string(template.tags()).unwrap(),
            r#"[{"name":"alarmWord","tagType":"AtomicTag"}]"#
        );
    }

    #[test]
    fn test_invalid_json_names_template() {
        let err = UdtTemplate::from_json("Broken", "{\"name\": 1}", "bitsDescription")
            .expect_err("missing tags");

        assert!(err.to_string().starts_with("invalid template `Broken`"));
    }

    #[test]
    fn test_store_lookup_by_str() {
        let store: TemplateStore = [alarm_template()].into_iter().collect();

        assert_eq!(store.len(), 1);
        assert!(store.get("AlarmsDINT").is_some());
        assert!(store.get("AlarmsDINT2").is_none());
    }
}
