//! Hierarchical rule configuration
//!
//! A [`Configuration`] is an arena of named nodes. Each node carries an
//! ordered attribute map and ordered children; the root's children are the
//! validators to build, in declaration order.

use indexmap::IndexMap;

use crate::error::ConfigError;

pub mod character_table;
pub mod loader;

pub use character_table::{load_character_table, load_character_table_file, Character, CharacterTable};
pub use loader::{load_configuration, load_configuration_file};

/// Index of a node inside its [`Configuration`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct NodeData {
    name: String,
    attributes: IndexMap<String, String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl NodeData {
    fn new(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            attributes: IndexMap::new(),
            children: Vec::new(),
            parent,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Configuration {
    nodes: Vec<NodeData>,
}

impl Configuration {
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![NodeData::new(root_name.into(), None)],
        }
    }

    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    pub fn root(&self) -> ConfigNode<'_> {
        self.node(self.root_id())
    }

    pub fn node(&self, id: NodeId) -> ConfigNode<'_> {
        ConfigNode { config: self, id }
    }

    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(name.into(), Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Later values for the same key replace earlier ones
    pub fn set_attribute(&mut self, id: NodeId, key: impl Into<String>, value: impl Into<String>) {
        self.nodes[id.0].attributes.insert(key.into(), value.into());
    }

    /// Total number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root().child_count() == 0
    }
}

/// Read-only view of one configuration node
#[derive(Debug, Clone, Copy)]
pub struct ConfigNode<'a> {
    config: &'a Configuration,
    id: NodeId,
}

impl<'a> ConfigNode<'a> {
    fn data(&self) -> &'a NodeData {
        &self.config.nodes[self.id.0]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    pub fn attribute(&self, key: &str) -> Option<&'a str> {
        self.data().attributes.get(key).map(String::as_str)
    }

    pub fn attributes(&self) -> &'a IndexMap<String, String> {
        &self.data().attributes
    }

    pub fn children(&self) -> impl Iterator<Item = ConfigNode<'a>> + 'a {
        let config = self.config;
        self.data()
            .children
            .iter()
            .map(move |&id| ConfigNode { config, id })
    }

    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    pub fn parent(&self) -> Option<ConfigNode<'a>> {
        let config = self.config;
        self.data().parent.map(|id| ConfigNode { config, id })
    }

    /// A required attribute; absence is a configuration error
    pub fn required(&self, key: &str) -> Result<&'a str, ConfigError> {
        self.attribute(key)
            .ok_or_else(|| ConfigError::MissingParameter {
                validator: self.name().to_string(),
                parameter: key.to_string(),
            })
    }

    /// A non-negative integer attribute with a default
    pub fn usize_or(&self, key: &str, default: usize) -> Result<usize, ConfigError> {
        match self.attribute(key) {
            Some(value) => self.parse_usize(key, value),
            None => Ok(default),
        }
    }

    /// A string attribute with a default
    pub fn str_or(&self, key: &str, default: &'a str) -> &'a str {
        self.attribute(key).unwrap_or(default)
    }

    fn parse_usize(&self, key: &str, value: &str) -> Result<usize, ConfigError> {
        value
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidParameter {
                validator: self.name().to_string(),
                parameter: key.to_string(),
                value: value.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Configuration {
        let mut config = Configuration::new("Validator");
        let root = config.root_id();
        let length = config.add_child(root, "SentenceLength");
        config.set_attribute(length, "max_length", "80");
        let words = config.add_child(root, "InvalidWord");
        config.set_attribute(words, "list", "foo,bar");
        config
    }

    #[test]
    fn test_tree_shape() {
        let config = sample();
        let root = config.root();

        assert_eq!(root.name(), "Validator");
        assert!(root.parent().is_none());
        let names: Vec<_> = root.children().map(|c| c.name()).collect();
        assert_eq!(names, vec!["SentenceLength", "InvalidWord"]);

        let length = root.children().next().unwrap();
        assert_eq!(length.parent().map(|p| p.name()), Some("Validator"));
        assert_eq!(length.attribute("max_length"), Some("80"));
        assert_eq!(config.len(), 3);
    }

    #[test]
    fn test_typed_attributes() {
        let mut config = Configuration::new("SentenceLength");
        let root = config.root_id();
        config.set_attribute(root, "max_length", " 42 ");
        config.set_attribute(root, "broken", "many");

        let node = config.root();
        assert_eq!(node.usize_or("max_length", 30).unwrap(), 42);
        assert_eq!(node.usize_or("missing", 30).unwrap(), 30);
        assert!(matches!(
            node.usize_or("broken", 1),
            Err(ConfigError::InvalidParameter { .. })
        ));
        assert!(matches!(
            node.required("list"),
            Err(ConfigError::MissingParameter { .. })
        ));
        assert_eq!(node.str_or("start_from", ""), "");
    }

    #[test]
    fn test_attribute_overwrite_keeps_position() {
        let mut config = Configuration::new("Rule");
        let root = config.root_id();
        config.set_attribute(root, "a", "1");
        config.set_attribute(root, "b", "2");
        config.set_attribute(root, "a", "3");

        let keys: Vec<_> = config.root().attributes().keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(config.root().attribute("a"), Some("3"));
    }
}
