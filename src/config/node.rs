//! Labeled configuration tree
//!
//! A [`ConfigNode`] has a name and an ordered list of children. A node
//! without children is a leaf and its name doubles as its scalar value, so
//! `NAME "people"` is a node `NAME` with a single leaf child `people`.
//!
//! JSON form: a string is a leaf, a single-key object is a node whose
//! value is the array of children.
//!
//! ```text
//! {"IF": [{"VALUE": ["age"]}, {"THEN": ["adult"]}, {"ELSE": ["minor"]}]}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::errors::{ConfigError, ConfigResult};

/// A node of the configuration tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NodeRepr", into = "NodeRepr")]
pub struct ConfigNode {
    name: String,
    children: Vec<ConfigNode>,
}

impl ConfigNode {
    /// Creates a node with children
    pub fn new(name: impl Into<String>, children: Vec<ConfigNode>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    /// Creates a leaf
    pub fn leaf(value: impl Into<String>) -> Self {
        Self::new(value, Vec::new())
    }

    /// Creates a node whose children are all leaves
    pub fn with_values<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, values.into_iter().map(ConfigNode::leaf).collect())
    }

    /// Parses a tree from its JSON form
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        serde_json::from_str(text).map_err(|e| ConfigError::parse(e.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[ConfigNode] {
        &self.children
    }

    /// Number of direct children
    pub fn count(&self) -> usize {
        self.children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn first_child(&self) -> Option<&ConfigNode> {
        self.children.first()
    }

    pub fn last_child(&self) -> Option<&ConfigNode> {
        self.children.last()
    }

    /// Direct children labeled `name`, in order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ConfigNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// The last direct child labeled `name`
    pub fn child(&self, name: &str) -> Option<&ConfigNode> {
        self.children.iter().rev().find(|c| c.name == name)
    }

    /// The scalar carried by this node: its own name for a leaf, the name
    /// of its only child when that child is a leaf.
    pub fn scalar(&self) -> Option<&str> {
        match self.children.as_slice() {
            [] => Some(&self.name),
            [only] if only.is_leaf() => Some(&only.name),
            _ => None,
        }
    }

    /// Scalar of the last direct child labeled `key`
    pub fn value_of(&self, key: &str) -> Option<&str> {
        self.child(key)
            .filter(|c| !c.is_leaf())
            .and_then(ConfigNode::scalar)
    }

    /// Scalar of `key`, failing with a missing-key error naming `owner`
    pub fn require(&self, key: &str, owner: &str) -> ConfigResult<&str> {
        self.value_of(key)
            .ok_or_else(|| ConfigError::missing_key(owner, key))
    }

    /// The names of all direct children
    pub fn child_names(&self) -> Vec<String> {
        self.children.iter().map(|c| c.name.clone()).collect()
    }
}

/// Serialized form of a [`ConfigNode`]
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum NodeRepr {
    Leaf(String),
    Number(serde_json::Number),
    Bool(bool),
    Node(BTreeMap<String, Vec<NodeRepr>>),
}

impl TryFrom<NodeRepr> for ConfigNode {
    type Error = String;

    fn try_from(repr: NodeRepr) -> Result<Self, Self::Error> {
        match repr {
            NodeRepr::Leaf(s) => Ok(ConfigNode::leaf(s)),
            NodeRepr::Number(n) => Ok(ConfigNode::leaf(n.to_string())),
            NodeRepr::Bool(b) => Ok(ConfigNode::leaf(b.to_string())),
            NodeRepr::Node(map) => {
                if map.len() != 1 {
                    return Err(format!(
                        "a configuration node must have exactly one label, found {}",
                        map.len()
                    ));
                }
                let (name, children) = map.into_iter().next().ok_or("empty node")?;
                let children = children
                    .into_iter()
                    .map(ConfigNode::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ConfigNode::new(name, children))
            }
        }
    }
}

impl From<ConfigNode> for NodeRepr {
    fn from(node: ConfigNode) -> Self {
        if node.children.is_empty() {
            return NodeRepr::Leaf(node.name);
        }
        let children = node.children.into_iter().map(NodeRepr::from).collect();
        let mut map = BTreeMap::new();
        map.insert(node.name, children);
        NodeRepr::Node(map)
    }
}
