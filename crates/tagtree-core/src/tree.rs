//! The output folder hierarchy.
//!
//! A [`Forest`] owns the top-level [`Children`] sequence. Every [`Folder`]
//! owns its own children, so the whole tree is a plain ownership tree with no
//! shared nodes.
//!
//! Each [`Children`] sequence keeps its nodes in insertion order and indexes
//! its folders by name, which gives:
//! - O(1) lookup of an existing folder while walking a prefix
//! - at most one folder per name within one parent
//! - instance nodes that are appended as-is and never merged
//!
//! # Serialization
//!
//! Nodes serialize to the tag database import shape:
//!
//! ```text
//! {"name": "Line2", "tagType": "Folder", "tags": [...]}
//! {"name": "3", "typeId": "Namespace/AlarmsDINT", "tagType": "UdtInstance", "tags": [...]}
//! ```

use std::collections::HashMap;

use log::debug;
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::template::{FOLDER_TAG_TYPE, TagDefinition, TemplateId};

/// Tag type string of instance nodes.
pub const INSTANCE_TAG_TYPE: &str = "UdtInstance";

/// Converts a prefix component into a folder name.
///
/// Brackets are not allowed in folder names, so every `[` and `]` becomes
/// `(` and `)`.
///
/// # Examples
///
/// ```
/// use tagtree_core::tree::folder_name;
///
/// assert_eq!(folder_name("Line[3]"), "Line(3)");
/// assert_eq!(folder_name("Area1"), "Area1");
/// ```
pub fn folder_name(component: &str) -> String {
    component.replace('[', "(").replace(']', ")")
}

/// A node of the output tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Folder(Folder),
    Instance(UdtInstance),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Folder(folder) => folder.name(),
            Node::Instance(instance) => instance.name(),
        }
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Node::Folder(folder) => Some(folder),
            Node::Instance(_) => None,
        }
    }

    pub fn as_instance(&self) -> Option<&UdtInstance> {
        match self {
            Node::Instance(instance) => Some(instance),
            Node::Folder(_) => None,
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Folder(folder) => folder.serialize(serializer),
            Node::Instance(instance) => instance.serialize(serializer),
        }
    }
}

/// An ordered sequence of nodes under one parent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Children {
    nodes: Vec<Node>,
    /// Folder name to position in `nodes`.
    folders: HashMap<String, usize>,
}

impl Children {
    /// Returns the nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the folder with the given name.
    pub fn folder(&self, name: &str) -> Option<&Folder> {
        self.folders
            .get(name)
            .and_then(|&idx| self.nodes[idx].as_folder())
    }

    /// Returns all folders in insertion order.
    pub fn folders(&self) -> impl Iterator<Item = &Folder> {
        self.nodes.iter().filter_map(Node::as_folder)
    }

    /// Returns all instances in insertion order.
    pub fn instances(&self) -> impl Iterator<Item = &UdtInstance> {
        self.nodes.iter().filter_map(Node::as_instance)
    }

    /// Appends an instance node.
    pub fn push_instance(&mut self, instance: UdtInstance) {
        self.nodes.push(Node::Instance(instance));
    }

    /// Returns the children of the folder named `name`, creating the folder
    /// at the end of this sequence if it does not exist yet.
    ///
    /// The second element is `true` if the folder was created.
    fn folder_children_or_insert(&mut self, name: String) -> (&mut Children, bool) {
        let (idx, created) = match self.folders.get(&name) {
            Some(&idx) => (idx, false),
            None => {
                let idx = self.nodes.len();
                self.nodes.push(Node::Folder(Folder::new(name.clone())));
                self.folders.insert(name, idx);
                (idx, true)
            }
        };

        let Node::Folder(folder) = &mut self.nodes[idx] else {
            unreachable!("folder index always points at a folder node");
        };
        (&mut folder.children, created)
    }
}

impl Serialize for Children {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.nodes.serialize(serializer)
    }
}

/// A named grouping node.
#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    name: String,
    children: Children,
}

impl Folder {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Children::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &Children {
        &self.children
    }
}

impl Serialize for Folder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("tagType", FOLDER_TAG_TYPE)?;
        map.serialize_entry("tags", &self.children)?;
        map.end()
    }
}

/// A template instantiated for one instance name.
///
/// The tag tree is an owned copy; nothing else refers to it.
#[derive(Debug, Clone, PartialEq)]
pub struct UdtInstance {
    name: String,
    template_id: TemplateId,
    type_id: String,
    tags: Vec<TagDefinition>,
}

impl UdtInstance {
    /// Creates an instance node.
    ///
    /// # Arguments
    ///
    /// * `name` - Instance name.
    /// * `template_id` - Template the tags were copied from.
    /// * `namespace` - UDT type path the template lives under; the instance
    ///   `typeId` is `<namespace>/<template_id>`, or just the template id when
    ///   the namespace is empty.
    /// * `tags` - The instantiated tag tree.
    pub fn new(
        name: impl Into<String>,
        template_id: TemplateId,
        namespace: &str,
        tags: Vec<TagDefinition>,
    ) -> Self {
        let namespace = namespace.trim_end_matches('/');
        let type_id = if namespace.is_empty() {
            template_id.to_string()
        } else {
            format!("{namespace}/{template_id}")
        };

        Self {
            name: name.into(),
            template_id,
            type_id,
            tags,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template_id(&self) -> &TemplateId {
        &self.template_id
    }

    /// Returns the full UDT type path written to `typeId`.
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    pub fn tags(&self) -> &[TagDefinition] {
        &self.tags
    }

    /// Returns the top-level tag with the given name.
    pub fn tag(&self, name: &str) -> Option<&TagDefinition> {
        self.tags.iter().find(|tag| tag.name() == name)
    }

    pub fn tags_mut(&mut self) -> &mut [TagDefinition] {
        &mut self.tags
    }
}

impl Serialize for UdtInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("typeId", &self.type_id)?;
        map.serialize_entry("tagType", INSTANCE_TAG_TYPE)?;
        map.serialize_entry("tags", &self.tags)?;
        map.end()
    }
}

/// The root of the output tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forest {
    root: Children,
    folder_count: usize,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the top-level nodes.
    pub fn root(&self) -> &Children {
        &self.root
    }

    /// Returns the total number of folders created so far.
    pub fn folder_count(&self) -> usize {
        self.folder_count
    }

    /// Walks `prefix` from the root, creating missing folders, and returns the
    /// children of the last folder on the path.
    ///
    /// Components are separated by `.`; empty components are skipped, so an
    /// empty prefix resolves to the root itself. Existing folders are reused,
    /// which makes overlapping prefixes such as `A.B` and `A.B.C` share the
    /// folders they have in common.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagtree_core::tree::Forest;
    ///
    /// let mut forest = Forest::new();
    /// forest.resolve("Area1.Line[2]");
    /// forest.resolve("Area1.Line[2].Cell");
    ///
    /// let area = forest.root().folder("Area1").unwrap();
    /// assert_eq!(area.children().len(), 1);
    /// assert!(area.children().folder("Line(2)").is_some());
    /// assert_eq!(forest.folder_count(), 3);
    /// ```
    pub fn resolve(&mut self, prefix: &str) -> &mut Children {
        let mut level = &mut self.root;

        for component in prefix.split('.').filter(|c| !c.is_empty()) {
            let name = folder_name(component);
            let (children, created) = level.folder_children_or_insert(name);
            if created {
                self.folder_count += 1;
                debug!(component, prefix; "Created folder");
            }
            level = children;
        }

        level
    }
}

impl Serialize for Forest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    fn instance(name: &str) -> UdtInstance {
        UdtInstance::new(name, TemplateId::new("AlarmsDINT"), "Alarms", Vec::new())
    }

    #[test]
    fn test_resolve_reuses_folders() {
        let mut forest = Forest::new();
        forest.resolve("A.B");
        forest.resolve("A.B.C");

        let root = forest.root();
        assert_eq!(root.len(), 1);

        let a = root.folder("A").unwrap();
        assert_eq!(a.children().len(), 1);
        assert_eq!(a.children().folders().filter(|f| f.name() == "B").count(), 1);

        let b = a.children().folder("B").unwrap();
        assert!(b.children().folder("C").is_some());
        assert_eq!(forest.folder_count(), 3);
    }

    #[test]
    fn test_resolve_preserves_insertion_order() {
        let mut forest = Forest::new();
        forest.resolve("P2").push_instance(instance("x"));
        forest.resolve("P1").push_instance(instance("y"));
        forest.resolve("P2").push_instance(instance("z"));

        let names: Vec<_> = forest.root().nodes().iter().map(Node::name).collect();
        assert_eq!(names, ["P2", "P1"]);

        let p2: Vec<_> = forest
            .root()
            .folder("P2")
            .unwrap()
            .children()
            .instances()
            .map(UdtInstance::name)
            .collect();
        assert_eq!(p2, ["x", "z"]);
    }

    #[test]
    fn test_resolve_normalizes_brackets() {
        let mut forest = Forest::new();
        forest.resolve("Area.Line[3]");

        let area = forest.root().folder("Area").unwrap();
        assert!(area.children().folder("Line(3)").is_some());
        assert!(area.children().folder("Line[3]").is_none());
    }

    #[test]
    fn test_resolve_empty_prefix_is_root() {
        let mut forest = Forest::new();
        forest.resolve("").push_instance(instance("M1"));

        assert_eq!(forest.folder_count(), 0);
        assert_eq!(forest.root().instances().count(), 1);
    }

    #[test]
    fn test_instances_never_merged() {
        let mut forest = Forest::new();
        forest.resolve("A").push_instance(instance("M1"));
        forest.resolve("A").push_instance(instance("M1"));

        let a = forest.root().folder("A").unwrap();
        assert_eq!(a.children().instances().count(), 2);
    }

    #[test]
    fn test_folder_and_instance_may_share_name() {
        let mut forest = Forest::new();
        forest.resolve("").push_instance(instance("A"));
        forest.resolve("A");

        assert_eq!(forest.root().len(), 2);
        assert!(forest.root().folder("A").is_some());
    }

    #[test]
    fn test_instance_type_id() {
        assert_eq!(instance("M1").type_id(), "Alarms/AlarmsDINT");

        let bare = UdtInstance::new("M1", TemplateId::new("T"), "", Vec::new());
        assert_eq!(bare.type_id(), "T");
    }

    #[test]
    fn test_serialize_shape() {
        let mut forest = Forest::new();
        let tags = vec![TagDefinition::new("value", "AtomicTag").with_field("value", 0)];
        forest.resolve("A").push_instance(UdtInstance::new(
            "M1",
            TemplateId::new("AlarmsDINT2"),
            "AmazonUDTs/AlarmsUDTs",
            tags,
        ));

        let value = serde_json::to_value(&forest).unwrap();
        assert_eq!(
            value,
            json!([{
                "name": "A",
                "tagType": "Folder",
                "tags": [{
                    "name": "M1",
                    "typeId": "AmazonUDTs/AlarmsUDTs/AlarmsDINT2",
                    "tagType": "UdtInstance",
                    "tags": [{ "name": "value", "tagType": "AtomicTag", "value": 0 }]
                }]
            }])
        );
    }

    fn assert_unique_folders(children: &Children) {
        let mut seen = std::collections::HashSet::new();
        for folder in children.folders() {
            assert!(seen.insert(folder.name().to_string()), "duplicate folder {}", folder.name());
            assert_unique_folders(folder.children());
        }
    }

    proptest! {
        #[test]
        fn prop_folder_names_unique_per_level(
            prefixes in prop::collection::vec("[ab](\\.[ab]){0,3}", 1..20)
        ) {
            let mut forest = Forest::new();
            for prefix in &prefixes {
                forest.resolve(prefix);
            }
            assert_unique_folders(forest.root());
        }
    }
}
