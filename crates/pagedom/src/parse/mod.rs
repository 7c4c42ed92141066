// ABOUTME: Markup parsing entry points for whole documents and fragments.
// ABOUTME: Dispatches to the HTML (scraper) or XML (quick-xml) front end by DocumentKind.

//! Parsing.
//!
//! Both front ends produce an `ego_tree::Tree<NodeData>` rooted at a
//! [`NodeData::Document`] node. Fragments are parsed inside a synthetic
//! wrapper and their top-level nodes are relocated to the root of a fresh
//! document, so fragment content is always foreign to every existing tree.

pub mod charset;
pub(crate) mod entities;
pub(crate) mod html;
pub(crate) mod xml;

use ego_tree::{NodeId, Tree};

use crate::dom::adopt::{self, Subtree};
use crate::dom::{Document, NodeData};
use crate::error::Result;
use crate::options::{DocumentKind, ParseOptions};
use crate::selection::Selection;

/// Parse a complete document.
pub(crate) fn document(markup: &str, opts: ParseOptions) -> Result<Document> {
    let preserve_whitespace = opts.preserve_whitespace;
    let doc = match opts.kind {
        DocumentKind::Html => html::parse_document(markup, opts),
        DocumentKind::Xml => xml::parse_document(markup, opts)?,
    };
    if !preserve_whitespace {
        adopt::strip_whitespace(&mut doc.borrow_mut().tree);
    }
    Ok(doc)
}

/// Parse a fragment into a new document and select its top-level nodes.
pub(crate) fn fragment(markup: &str, opts: ParseOptions) -> Result<Selection> {
    let mut tree = match opts.kind {
        DocumentKind::Html => html::parse_body_fragment(markup),
        DocumentKind::Xml => xml::parse_fragment(markup)?,
    };
    if !opts.preserve_whitespace {
        adopt::strip_whitespace(&mut tree);
    }
    log::debug!(
        "parsed {} fragment of {} bytes",
        opts.kind,
        markup.len()
    );
    let doc = Document::from_tree(tree, opts);
    Ok(Selection::from_nodes(doc.root().children()))
}

/// Build a tree whose root children are the children of `container`.
pub(crate) fn relocate_children(tree: &Tree<NodeData>, container: NodeId) -> Tree<NodeData> {
    let mut out = Tree::new(NodeData::Document);
    if let Some(node) = tree.get(container) {
        let mut root = out.root_mut();
        for child in node.children() {
            Subtree::capture(child).append_to(&mut root);
        }
    }
    out
}
