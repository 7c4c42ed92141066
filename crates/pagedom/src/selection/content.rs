// ABOUTME: Content accepted by insertion operations: markup text or existing nodes.
// ABOUTME: Markup is parsed as a fragment matching the destination document kind.

use crate::dom::{Document, Node};
use crate::error::Result;
use crate::options::ParseOptions;
use crate::parse;

use super::Selection;

/// What an insertion operation inserts.
#[derive(Debug, Clone)]
pub enum Content {
    Markup(String),
    Nodes(Selection),
}

impl Content {
    /// Top-level nodes to insert next to or below nodes of `reference`.
    /// Document nodes stand for their children.
    pub(crate) fn resolve(&self, reference: &Document) -> Result<Vec<Node>> {
        let nodes = match self {
            Content::Markup(markup) => {
                let opts = ParseOptions {
                    kind: reference.kind(),
                    preserve_whitespace: true,
                };
                parse::fragment(markup, opts)?.into_iter().collect()
            }
            Content::Nodes(sel) => sel.nodes().to_vec(),
        };
        Ok(nodes
            .into_iter()
            .flat_map(|n| {
                if n.is_document() {
                    n.children()
                } else {
                    vec![n]
                }
            })
            .collect())
    }
}

impl From<&str> for Content {
    fn from(markup: &str) -> Self {
        Content::Markup(markup.to_string())
    }
}

impl From<String> for Content {
    fn from(markup: String) -> Self {
        Content::Markup(markup)
    }
}

impl From<&String> for Content {
    fn from(markup: &String) -> Self {
        Content::Markup(markup.clone())
    }
}

impl From<Selection> for Content {
    fn from(sel: Selection) -> Self {
        Content::Nodes(sel)
    }
}

impl From<&Selection> for Content {
    fn from(sel: &Selection) -> Self {
        Content::Nodes(sel.clone())
    }
}

impl From<Node> for Content {
    fn from(node: Node) -> Self {
        Content::Nodes(Selection::from(node))
    }
}

impl From<&Node> for Content {
    fn from(node: &Node) -> Self {
        Content::Nodes(Selection::from(node.clone()))
    }
}

impl From<&Document> for Content {
    fn from(doc: &Document) -> Self {
        Content::Nodes(Selection::from(doc.root()))
    }
}
