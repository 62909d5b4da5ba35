//! Annotation tree: original declaration order and comments of a document.
//!
//! The decoder records one [`Node`] per dictionary key (and per string value
//! that carried an inline comment), nested the way the source was nested, plus
//! standalone [`Node::Comment`] entries for comment lines. The tree is kept
//! apart from the [`Value`] tree and correlated with it by key name only, so
//! the values can be edited freely between decode and encode.
//!
//! [`reconcile`] merges a dictionary's current contents with its original
//! sibling list to decide what gets written, and in which order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::value::{Dictionary, Value};

/// Root set of annotation nodes for one document.
///
/// `nodes[0]` is the document root; its children are the root dictionary's
/// siblings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub nodes: Vec<Node>,
}

impl Meta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a root set whose single root node has the given children.
    pub fn with_root(children: Vec<Node>) -> Self {
        let mut root = KeyedNode::new("");
        root.children = children;
        Self {
            nodes: vec![Node::Keyed(root)],
        }
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn root(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn root_mut(&mut self) -> Option<&mut Node> {
        self.nodes.first_mut()
    }

    /// Ordered sibling list of the root dictionary; empty when there is none.
    pub fn root_siblings(&self) -> &[Node] {
        self.root().map(Node::children).unwrap_or(&[])
    }
}

/// One element of the annotation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// A key (or string value) as it appeared in the source.
    Keyed(KeyedNode),
    /// A standalone comment with no associated data.
    Comment(String),
}

/// A named node with nested children and the inline comments that followed
/// its token in the source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyedNode {
    pub name: String,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub annotations: Vec<String>,
}

impl KeyedNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, text: impl Into<String>) -> Self {
        self.add_annotation(text);
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.push_child(child);
        self
    }

    pub fn add_annotation(&mut self, text: impl Into<String>) {
        self.annotations.push(text.into());
    }

    pub fn push_child(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// First keyed child called `name`.
    pub fn child(&self, name: &str) -> Option<&KeyedNode> {
        self.children
            .iter()
            .filter_map(Node::as_keyed)
            .find(|n| n.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut KeyedNode> {
        self.children.iter_mut().find_map(|n| match n {
            Node::Keyed(keyed) if keyed.name == name => Some(keyed),
            _ => None,
        })
    }

    /// Detach the first keyed child called `name`, e.g. after deleting that
    /// key from the value tree.
    pub fn remove_child(&mut self, name: &str) -> Option<KeyedNode> {
        let pos = self
            .children
            .iter()
            .position(|n| matches!(n, Node::Keyed(k) if k.name == name))?;
        match self.children.remove(pos) {
            Node::Keyed(keyed) => Some(keyed),
            Node::Comment(_) => None,
        }
    }
}

impl From<KeyedNode> for Node {
    fn from(node: KeyedNode) -> Self {
        Node::Keyed(node)
    }
}

impl Node {
    pub fn keyed(name: impl Into<String>) -> Self {
        Node::Keyed(KeyedNode::new(name))
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Node::Comment(text.into())
    }

    /// Key name for keyed nodes, literal text for comments.
    pub fn text(&self) -> &str {
        match self {
            Node::Keyed(keyed) => &keyed.name,
            Node::Comment(text) => text,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Keyed(keyed) => &keyed.children,
            Node::Comment(_) => &[],
        }
    }

    pub fn annotations(&self) -> &[String] {
        match self {
            Node::Keyed(keyed) => &keyed.annotations,
            Node::Comment(_) => &[],
        }
    }

    pub fn as_keyed(&self) -> Option<&KeyedNode> {
        match self {
            Node::Keyed(keyed) => Some(keyed),
            Node::Comment(_) => None,
        }
    }

    pub fn as_keyed_mut(&mut self) -> Option<&mut KeyedNode> {
        match self {
            Node::Keyed(keyed) => Some(keyed),
            Node::Comment(_) => None,
        }
    }
}

/// One item of a reconciled dictionary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entry<'a> {
    /// Print this comment text here.
    Comment(&'a str),
    /// Print this key/value pair here. `node` is `None` for keys the annotation
    /// tree does not know about.
    Pair {
        key: &'a str,
        value: &'a Value,
        node: Option<&'a KeyedNode>,
    },
}

/// Merge a dictionary's current contents with its original sibling nodes.
///
/// Nodes are walked in source order: comments are kept in place, keyed nodes
/// whose key still exists yield that key with its current value, and keyed
/// nodes whose key was deleted are dropped together with their annotations.
/// Keys with no node follow, in dictionary order; callers should treat that
/// order as unspecified.
pub fn reconcile<'a>(dict: &'a Dictionary, nodes: &'a [Node]) -> Vec<Entry<'a>> {
    let mut entries = Vec::with_capacity(nodes.len().max(dict.len()));
    let mut emitted: HashSet<&str> = HashSet::with_capacity(dict.len());

    for node in nodes {
        match node {
            Node::Comment(text) => entries.push(Entry::Comment(text)),
            Node::Keyed(keyed) => match dict.get(&keyed.name) {
                Some(value) if emitted.insert(keyed.name.as_str()) => entries.push(Entry::Pair {
                    key: &keyed.name,
                    value,
                    node: Some(keyed),
                }),
                Some(_) => {
                    tracing::trace!("duplicate annotation node for key {:?} ignored", keyed.name);
                }
                None => {
                    tracing::trace!("dropping annotation node for deleted key {:?}", keyed.name);
                }
            },
        }
    }

    for (key, value) in dict.iter() {
        if !emitted.contains(key) {
            entries.push(Entry::Pair {
                key,
                value,
                node: None,
            });
        }
    }

    entries
}

/// Node for a string value: the last keyed sibling whose name is exactly the
/// string.
pub(crate) fn node_for_string<'a>(nodes: &'a [Node], text: &str) -> Option<&'a KeyedNode> {
    nodes
        .iter()
        .rev()
        .filter_map(Node::as_keyed)
        .find(|n| n.name == text)
}
