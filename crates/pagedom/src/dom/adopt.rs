// ABOUTME: Node adoption: decides whether inserted content is imported, cloned or moved as is.
// ABOUTME: Every insertion operation funnels through adopt() with its own reference node and repeat flag.

//! Ownership transfer between documents.
//!
//! A node can only be attached inside the document that owns it. Before any
//! insertion the candidate node is passed through [`adopt`], which returns a
//! node owned by the reference document:
//!
//! - content from another document is deep-copied in (an *import*);
//! - content inserted at a second or later destination of a fan-out
//!   operation is deep-cloned so earlier destinations keep their copy;
//! - anything else is returned untouched and will simply be moved.

use ego_tree::{NodeId, NodeMut, NodeRef, Tree};

use super::data::NodeData;
use super::document::Document;
use super::node::Node;

/// Elements whose whitespace is significant even when the destination
/// document drops whitespace-only text.
const WHITESPACE_SENSITIVE: &[&str] = &["pre", "textarea", "script", "style"];

/// Owned copy of a node and its descendants, independent of any arena.
#[derive(Debug, Clone)]
pub(crate) struct Subtree {
    pub(crate) data: NodeData,
    pub(crate) children: Vec<Subtree>,
}

impl Subtree {
    pub(crate) fn capture(node: NodeRef<'_, NodeData>) -> Self {
        Self {
            data: node.value().clone(),
            children: node.children().map(Subtree::capture).collect(),
        }
    }

    /// Drop whitespace-only text below this node, leaving whitespace
    /// sensitive elements alone.
    pub(crate) fn strip_whitespace(&mut self) {
        if is_whitespace_sensitive(&self.data) {
            return;
        }
        self.children.retain(|c| !c.data.is_whitespace_text());
        for child in &mut self.children {
            child.strip_whitespace();
        }
    }

    /// Create the subtree as an orphan in `tree`, returning its root id.
    pub(crate) fn plant(self, tree: &mut Tree<NodeData>) -> NodeId {
        let mut root = tree.orphan(self.data);
        graft(&mut root, self.children);
        root.id()
    }

    /// Append the subtree as the last child of `parent`.
    pub(crate) fn append_to(self, parent: &mut NodeMut<'_, NodeData>) {
        let mut node = parent.append(self.data);
        graft(&mut node, self.children);
    }
}

fn is_whitespace_sensitive(data: &NodeData) -> bool {
    data.as_element().is_some_and(|el| {
        WHITESPACE_SENSITIVE
            .iter()
            .any(|t| el.name.eq_ignore_ascii_case(t))
    })
}

/// Detach every whitespace-only text node of `tree` that is not inside a
/// whitespace sensitive element.
pub(crate) fn strip_whitespace(tree: &mut Tree<NodeData>) {
    let doomed: Vec<NodeId> = tree
        .root()
        .descendants()
        .filter(|n| n.value().is_whitespace_text())
        .filter(|n| !n.ancestors().any(|a| is_whitespace_sensitive(a.value())))
        .map(|n| n.id())
        .collect();
    log::trace!("dropping {} whitespace-only text node(s)", doomed.len());
    for id in doomed {
        if let Some(mut node) = tree.get_mut(id) {
            node.detach();
        }
    }
}

fn graft(parent: &mut NodeMut<'_, NodeData>, children: Vec<Subtree>) {
    for child in children {
        child.append_to(parent);
    }
}

/// Deep-copy `node` into `into`, applying the destination's whitespace policy.
///
/// Returns `None` when `node` is itself whitespace-only text that the
/// destination drops.
pub(crate) fn import(node: &Node, into: &Document) -> Option<Node> {
    let Some(mut subtree) = node.capture() else {
        return Some(into.orphan(NodeData::Text(String::new())));
    };
    if !into.options().preserve_whitespace {
        if subtree.data.is_whitespace_text() {
            log::trace!("dropping whitespace-only text on import");
            return None;
        }
        subtree.strip_whitespace();
    }
    log::trace!(
        "importing <{}> into document {:?}",
        subtree.data.node_name(),
        into
    );
    let id = subtree.plant(&mut into.borrow_mut().tree);
    Some(into.node(id))
}

/// Deep clone of `node` inside its own document.
pub(crate) fn clone_within(node: &Node) -> Node {
    let doc = node.document();
    let Some(subtree) = node.capture() else {
        return node.clone();
    };
    let id = subtree.plant(&mut doc.borrow_mut().tree);
    doc.node(id)
}

/// Return a node that is safe to attach next to or below `reference`.
///
/// `is_repeat` is true for the second and later destinations of a fan-out
/// insertion. A freshly imported node is already an independent copy, so it
/// is never cloned a second time.
///
/// `None` means the candidate was foreign whitespace-only text and the
/// reference document drops such text, so there is nothing to attach.
pub fn adopt(candidate: &Node, reference: &Node, is_repeat: bool) -> Option<Node> {
    if !candidate.document().same_document(reference.document()) {
        return import(candidate, reference.document());
    }
    if is_repeat {
        log::trace!("cloning {:?} for a repeated destination", candidate);
        return Some(clone_within(candidate));
    }
    Some(candidate.clone())
}
