// ABOUTME: Selection: an ordered, duplicate-free set of nodes that the fluent API operates on.
// ABOUTME: Readers live here; mutators, traversal and attribute helpers are split into submodules.

//! The fluent surface.
//!
//! A [`Selection`] may span several documents. Mutating operations insert
//! [`Content`] at every node of the selection; destinations after the first
//! receive clones so earlier destinations keep their copy.

mod attrs;
mod content;
mod manipulate;
mod traverse;

use std::collections::HashSet;
use std::fmt;

pub use content::Content;

use crate::dom::{Document, Node};
use crate::error::{DomError, Result};
use crate::options::ParseOptions;
use crate::parse;

#[derive(Clone, Default)]
pub struct Selection {
    nodes: Vec<Node>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection, dropping repeated nodes but keeping first-seen order.
    pub fn from_nodes<I: IntoIterator<Item = Node>>(nodes: I) -> Self {
        let mut seen = HashSet::new();
        let nodes = nodes
            .into_iter()
            .filter(|n| seen.insert(n.clone()))
            .collect();
        Self { nodes }
    }

    /// Parse an HTML fragment into a fresh document and select its
    /// top-level nodes.
    pub fn from_html(markup: &str) -> Self {
        parse::fragment(markup, ParseOptions::html()).unwrap_or_default()
    }

    /// Parse an XML fragment into a fresh document and select its top-level
    /// nodes.
    pub fn from_xml(markup: &str) -> Result<Self> {
        parse::fragment(markup, ParseOptions::xml())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// The document owning the first node.
    pub fn document(&self) -> Result<Document> {
        self.nodes
            .first()
            .map(|n| n.document().clone())
            .ok_or_else(|| DomError::no_document("document"))
    }

    /// Inner markup of the first node.
    pub fn html(&self) -> Option<String> {
        self.nodes.first().map(Node::inner_html)
    }

    /// Outer markup of the first node.
    pub fn outer_html(&self) -> Option<String> {
        self.nodes.first().map(Node::outer_html)
    }

    /// Combined text of every node.
    pub fn text(&self) -> String {
        self.nodes.iter().map(Node::text).collect()
    }
}

impl From<Node> for Selection {
    fn from(node: Node) -> Self {
        Self { nodes: vec![node] }
    }
}

impl From<Vec<Node>> for Selection {
    fn from(nodes: Vec<Node>) -> Self {
        Self::from_nodes(nodes)
    }
}

impl FromIterator<Node> for Selection {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self::from_nodes(iter)
    }
}

impl IntoIterator for Selection {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// Outer markup of every node, concatenated.
impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            f.write_str(&node.outer_html())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.nodes.iter()).finish()
    }
}
