//! Config node tree structures

use serde::{Deserialize, Serialize};

use super::meta::MetaBlock;

/// A named container of values and child nodes.
///
/// Order of both sequences is significant and duplicate value names are
/// allowed. The root returned by the parser has an empty name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigNode {
    /// Node name without patch command or arguments.
    pub name: String,
    /// Key/value entries in source order.
    pub values: Vec<ConfigValue>,
    /// Child nodes in source order.
    pub nodes: Vec<ConfigNode>,
    /// Comments and patch syntax attached to the node's header and braces.
    #[serde(default, skip_serializing_if = "MetaBlock::is_empty")]
    pub meta: MetaBlock,
}

/// One `name = text` entry of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValue {
    /// Key name without patch command, arguments or operator.
    pub name: String,
    /// Unescaped payload.
    pub text: String,
    /// Formatting facts of the entry.
    #[serde(default, skip_serializing_if = "MetaBlock::is_empty")]
    pub meta: MetaBlock,
}

impl ConfigNode {
    /// Creates an empty node.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        ConfigNode {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Creates an unnamed root node.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_meta(mut self, meta: MetaBlock) -> Self {
        self.meta = meta;
        self
    }

    /// Appends a value. Existing values with the same name are kept.
    pub fn add_value(&mut self, name: impl Into<String>, text: impl Into<String>) -> &mut ConfigValue {
        self.push_value(ConfigValue::new(name, text))
    }

    /// Appends a fully built value.
    ///
    /// A placeholder at the end of the list is folded into what follows it:
    /// its leading lines move to the pushed value, or are merged with the
    /// pushed placeholder. The tree then has the shape the parser produces.
    pub fn push_value(&mut self, mut value: ConfigValue) -> &mut ConfigValue {
        if self.values.last().is_some_and(|v| v.meta.is_placeholder) {
            if let Some(mut trailing) = self.values.pop() {
                trailing.meta.leading_lines.append(&mut value.meta.leading_lines);
                value.meta.leading_lines = trailing.meta.leading_lines;
            }
        }
        self.values.push(value);
        let last = self.values.len() - 1;
        &mut self.values[last]
    }

    /// Appends a child node and returns it for further filling.
    pub fn add_node(&mut self, node: ConfigNode) -> &mut ConfigNode {
        self.nodes.push(node);
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    /// Text of the first real value named `name`.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.real_values()
            .find(|v| v.name == name)
            .map(|v| v.text.as_str())
    }

    /// Mutable access to the first real value named `name`.
    pub fn value_mut(&mut self, name: &str) -> Option<&mut ConfigValue> {
        self.values
            .iter_mut()
            .find(|v| !v.meta.is_placeholder && v.name == name)
    }

    /// All real values named `name`, in order.
    pub fn values_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ConfigValue> + 'a {
        self.real_values().filter(move |v| v.name == name)
    }

    /// Values that are rendered as data (placeholders skipped).
    pub fn real_values(&self) -> impl Iterator<Item = &ConfigValue> {
        self.values.iter().filter(|v| !v.meta.is_placeholder)
    }

    #[must_use]
    pub fn has_value(&self, name: &str) -> bool {
        self.value(name).is_some()
    }

    /// Overwrites the first value named `name`, or appends a new one.
    ///
    /// Metadata of an existing value is kept.
    pub fn set_value(&mut self, name: &str, text: impl Into<String>) {
        let text = text.into();
        match self.value_mut(name) {
            Some(value) => value.text = text,
            None => {
                self.add_value(name, text);
            }
        }
    }

    /// First child node named `name`.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&ConfigNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn node_mut(&mut self, name: &str) -> Option<&mut ConfigNode> {
        self.nodes.iter_mut().find(|n| n.name == name)
    }

    /// All child nodes named `name`, in order.
    pub fn nodes_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ConfigNode> + 'a {
        self.nodes.iter().filter(move |n| n.name == name)
    }

    /// Pretty-printed JSON view of the tree, metadata included.
    ///
    /// # Errors
    /// Returns [`crate::Error::JsonError`] if serialization fails.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// `true` when the node has neither values nor children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.nodes.is_empty()
    }
}

impl ConfigValue {
    #[must_use]
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        ConfigValue {
            name: name.into(),
            text: text.into(),
            meta: MetaBlock::new(),
        }
    }

    /// An entry that only carries leading lines.
    #[must_use]
    pub fn placeholder(meta: MetaBlock) -> Self {
        ConfigValue {
            name: String::new(),
            text: String::new(),
            meta: meta.placeholder(),
        }
    }

    #[must_use]
    pub fn with_meta(mut self, meta: MetaBlock) -> Self {
        self.meta = meta;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_names_are_kept() {
        let mut node = ConfigNode::new("PART");
        node.add_value("tags", "a");
        node.add_value("tags", "b");

        let all: Vec<_> = node.values_named("tags").map(|v| v.text.as_str()).collect();
        assert_eq!(all, vec!["a", "b"]);
        assert_eq!(node.value("tags"), Some("a"));
    }

    #[test]
    fn test_placeholders_are_not_values() {
        let mut node = ConfigNode::new("PART");
        node.push_value(ConfigValue::placeholder(MetaBlock::new().with_comment(" end")));
        assert_eq!(node.real_values().count(), 0);
        assert_eq!(node.value(""), None);
    }

    #[test]
    fn test_set_value_keeps_metadata() {
        let mut node = ConfigNode::new("PART");
        node.push_value(
            ConfigValue::new("title", "Old").with_meta(MetaBlock::new().with_inline_comment("c")),
        );
        node.set_value("title", "New");
        node.set_value("mass", "1.5");

        assert_eq!(node.value("title"), Some("New"));
        assert_eq!(node.values[0].meta.inline_comment.as_deref(), Some("c"));
        assert_eq!(node.value("mass"), Some("1.5"));
    }

    #[test]
    fn test_placeholder_folds_into_next_value() {
        let mut node = ConfigNode::new("PART");
        node.push_value(ConfigValue::placeholder(MetaBlock::new().with_comment(" a")));
        node.push_value(ConfigValue::placeholder(MetaBlock::new().with_blank_line()));
        assert_eq!(node.values.len(), 1);

        node.push_value(ConfigValue::new("name", "x").with_meta(MetaBlock::new().with_comment(" b")));
        assert_eq!(node.values.len(), 1);
        assert_eq!(
            node.values[0].meta,
            MetaBlock::new().with_comment(" a").with_blank_line().with_comment(" b")
        );
    }

    #[test]
    fn test_has_value_ignores_placeholders() {
        let mut node = ConfigNode::new("PART");
        node.add_value("mass", "1");
        node.push_value(ConfigValue::placeholder(MetaBlock::new().with_comment(" end")));
        assert!(node.has_value("mass"));
        assert!(!node.has_value(""));
        assert!(!node.has_value("cost"));
    }

    #[test]
    fn test_node_mut_edits_first_match() {
        let mut root = ConfigNode::root();
        root.add_node(ConfigNode::new("MODULE"));
        root.add_node(ConfigNode::new("MODULE"));

        root.node_mut("MODULE").unwrap().set_value("name", "Edited");
        assert_eq!(root.nodes[0].value("name"), Some("Edited"));
        assert!(root.nodes[1].is_empty());
        assert!(root.node_mut("RESOURCE").is_none());
    }

    #[test]
    fn test_to_json_skips_empty_metadata() {
        let mut part = ConfigNode::new("PART");
        part.push_value(
            ConfigValue::new("title", "Tank").with_meta(MetaBlock::new().with_inline_comment("c")),
        );
        part.add_value("mass", "1");

        let json = part.to_json().unwrap();
        assert!(json.contains("\"name\": \"PART\""), "{json}");
        assert!(json.contains("\"inline_comment\": \"c\""), "{json}");
        assert_eq!(json.matches("\"meta\"").count(), 1, "{json}");

        let back: ConfigNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, part);
    }

    #[test]
    fn test_child_lookup_preserves_order() {
        let mut root = ConfigNode::root();
        root.add_node(ConfigNode::new("MODULE")).add_value("name", "First");
        root.add_node(ConfigNode::new("RESOURCE"));
        root.add_node(ConfigNode::new("MODULE")).add_value("name", "Second");

        let names: Vec<_> = root
            .nodes_named("MODULE")
            .filter_map(|n| n.value("name"))
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
        assert_eq!(root.node("RESOURCE").map(ConfigNode::is_empty), Some(true));
    }
}
