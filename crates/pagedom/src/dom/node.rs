// ABOUTME: Node handle: a document plus a node id, with navigation, attribute and structural helpers.
// ABOUTME: Structural edits here stay inside one document; cross-document moves go through adoption.

use std::fmt;
use std::hash::{Hash, Hasher};

use ego_tree::NodeId;

use super::adopt::{self, Subtree};
use super::data::{Attribute, NodeData};
use super::document::Document;
use super::serialize;
use crate::error::{DomError, Result};
use crate::select::compiled::get_or_compile;
use crate::selection::Selection;

/// Where a node is attached relative to an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Position {
    Append,
    Prepend,
    Before,
    After,
}

/// Handle to one node of a [`Document`].
#[derive(Clone)]
pub struct Node {
    doc: Document,
    id: NodeId,
}

impl Node {
    pub(crate) fn new(doc: Document, id: NodeId) -> Self {
        Self { doc, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The document owning this node, attached or not.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    fn with_ref<R>(&self, f: impl FnOnce(ego_tree::NodeRef<'_, NodeData>) -> R) -> Option<R> {
        let inner = self.doc.borrow();
        inner.tree.get(self.id).map(f)
    }

    fn with_related(
        &self,
        f: impl FnOnce(ego_tree::NodeRef<'_, NodeData>) -> Option<ego_tree::NodeRef<'_, NodeData>>,
    ) -> Option<Node> {
        self.with_ref(|n| f(n).map(|r| r.id()))
            .flatten()
            .map(|id| self.doc.node(id))
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut NodeData) -> R) -> Option<R> {
        let mut inner = self.doc.borrow_mut();
        inner.tree.get_mut(self.id).map(|mut n| f(n.value()))
    }

    /// Snapshot of the node payload.
    pub fn data(&self) -> Option<NodeData> {
        self.with_ref(|n| n.value().clone())
    }

    pub fn node_name(&self) -> String {
        self.with_ref(|n| n.value().node_name()).unwrap_or_default()
    }

    pub fn tag_name(&self) -> Option<String> {
        self.with_ref(|n| n.value().as_element().map(|el| el.name.clone()))
            .flatten()
    }

    pub fn is_element(&self) -> bool {
        self.with_ref(|n| n.value().is_element()).unwrap_or(false)
    }

    pub fn is_text(&self) -> bool {
        self.with_ref(|n| matches!(n.value(), NodeData::Text(_)))
            .unwrap_or(false)
    }

    pub fn is_comment(&self) -> bool {
        self.with_ref(|n| matches!(n.value(), NodeData::Comment(_)))
            .unwrap_or(false)
    }

    pub fn is_document(&self) -> bool {
        self.with_ref(|n| matches!(n.value(), NodeData::Document))
            .unwrap_or(false)
    }

    pub fn parent(&self) -> Option<Node> {
        self.with_related(|n| n.parent())
    }

    /// The parent if it is an element (not the document root).
    pub fn parent_element(&self) -> Option<Node> {
        self.parent().filter(Node::is_element)
    }

    pub fn first_child(&self) -> Option<Node> {
        self.with_related(|n| n.first_child())
    }

    pub fn last_child(&self) -> Option<Node> {
        self.with_related(|n| n.last_child())
    }

    pub fn next_sibling(&self) -> Option<Node> {
        self.with_related(|n| n.next_sibling())
    }

    pub fn prev_sibling(&self) -> Option<Node> {
        self.with_related(|n| n.prev_sibling())
    }

    pub fn next_element_sibling(&self) -> Option<Node> {
        self.with_related(|n| n.next_siblings().find(|s| s.value().is_element()))
    }

    pub fn prev_element_sibling(&self) -> Option<Node> {
        self.with_related(|n| n.prev_siblings().find(|s| s.value().is_element()))
    }

    pub fn children(&self) -> Vec<Node> {
        self.collect_ids(|n| n.children().map(|c| c.id()).collect())
    }

    pub fn element_children(&self) -> Vec<Node> {
        self.collect_ids(|n| {
            n.children()
                .filter(|c| c.value().is_element())
                .map(|c| c.id())
                .collect()
        })
    }

    /// Ancestors from the parent upwards, document root included.
    pub fn ancestors(&self) -> Vec<Node> {
        self.collect_ids(|n| n.ancestors().map(|a| a.id()).collect())
    }

    fn collect_ids(&self, f: impl FnOnce(ego_tree::NodeRef<'_, NodeData>) -> Vec<NodeId>) -> Vec<Node> {
        self.with_ref(f)
            .unwrap_or_default()
            .into_iter()
            .map(|id| self.doc.node(id))
            .collect()
    }

    /// True if `other` is this node or one of its descendants.
    pub fn contains(&self, other: &Node) -> bool {
        if !self.doc.same_document(&other.doc) {
            return false;
        }
        other.id == self.id || other.ancestors().iter().any(|a| a.id == self.id)
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        self.with_ref(|n| {
            n.value()
                .as_element()
                .and_then(|el| el.attr(name))
                .map(str::to_string)
        })
        .flatten()
    }

    pub fn attrs(&self) -> Vec<Attribute> {
        self.with_ref(|n| {
            n.value()
                .as_element()
                .map(|el| el.attrs.clone())
                .unwrap_or_default()
        })
        .unwrap_or_default()
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.with_ref(|n| n.value().as_element().is_some_and(|el| el.has_attr(name)))
            .unwrap_or(false)
    }

    /// Set an attribute. No-op on non-element nodes.
    pub fn set_attr(&self, name: &str, value: &str) {
        self.update(|data| {
            if let Some(el) = data.as_element_mut() {
                el.set_attr(name, value);
            }
        });
    }

    pub fn remove_attr(&self, name: &str) {
        self.update(|data| {
            if let Some(el) = data.as_element_mut() {
                el.remove_attr(name);
            }
        });
    }

    /// Rename an element, keeping attributes and children.
    pub fn rename(&self, name: &str) {
        self.update(|data| {
            if let Some(el) = data.as_element_mut() {
                el.name = name.to_string();
            }
        });
    }

    /// Text content: own data for character nodes, concatenated descendant
    /// text for elements and documents.
    pub fn text(&self) -> String {
        self.with_ref(|n| match n.value() {
            NodeData::Text(t) | NodeData::CData(t) | NodeData::Comment(t) => t.clone(),
            NodeData::ProcessingInstruction { data, .. } => data.clone(),
            NodeData::Doctype { .. } => String::new(),
            NodeData::Document | NodeData::Element(_) => n
                .descendants()
                .filter_map(|d| d.value().as_text())
                .collect(),
        })
        .unwrap_or_default()
    }

    /// Replace the children with a single text node (or with nothing when
    /// `text` is empty). Character nodes get their data replaced instead.
    pub fn set_text(&self, text: &str) {
        let replaced = self
            .update(|data| match data {
                NodeData::Text(t) | NodeData::CData(t) | NodeData::Comment(t) => {
                    *t = text.to_string();
                    true
                }
                _ => false,
            })
            .unwrap_or(true);
        if replaced {
            return;
        }
        self.remove_children();
        if !text.is_empty() {
            let node = self.doc.create_text(text);
            self.attach_unchecked(&node, Position::Append);
        }
    }

    pub fn outer_html(&self) -> String {
        let inner = self.doc.borrow();
        let mut out = String::new();
        if let Some(n) = inner.tree.get(self.id) {
            serialize::outer(n, inner.options.kind, &mut out);
        }
        out
    }

    pub fn inner_html(&self) -> String {
        let inner = self.doc.borrow();
        let mut out = String::new();
        if let Some(n) = inner.tree.get(self.id) {
            serialize::inner(n, inner.options.kind, &mut out);
        }
        out
    }

    /// Elements below this node matching `css`, in document order.
    pub fn select(&self, css: &str) -> Result<Selection> {
        self.select_within(css, "select")
    }

    pub(crate) fn select_within(&self, css: &str, op: &str) -> Result<Selection> {
        let selector = get_or_compile(css).ok_or_else(|| DomError::selector(op, css))?;
        let html = self.doc.is_html();
        let ids = self
            .with_ref(|n| {
                n.descendants()
                    .skip(1)
                    .filter(|d| selector.matches(*d, html))
                    .map(|d| d.id())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        Ok(Selection::from_nodes(
            ids.into_iter().map(|id| self.doc.node(id)),
        ))
    }

    /// True if this node is an element matching `css`.
    pub fn is(&self, css: &str) -> Result<bool> {
        let selector = get_or_compile(css).ok_or_else(|| DomError::selector("is", css))?;
        let html = self.doc.is_html();
        Ok(self
            .with_ref(|n| selector.matches(n, html))
            .unwrap_or(false))
    }

    /// Detach from the parent. The node stays owned by its document.
    pub fn detach(&self) {
        let mut inner = self.doc.borrow_mut();
        if let Some(mut n) = inner.tree.get_mut(self.id) {
            n.detach();
        }
    }

    pub fn remove_children(&self) {
        for child in self.children() {
            child.detach();
        }
    }

    /// Deep copy of this node, detached, in the same document.
    pub fn deep_clone(&self) -> Node {
        adopt::clone_within(self)
    }

    /// Append `child` as the last child, adopting it first when it belongs
    /// to another document. `None` when the adopted child was whitespace
    /// this document drops.
    pub fn append_child(&self, child: &Node) -> Result<Option<Node>> {
        self.adopt_and_attach(child, Position::Append, "append_child")
    }

    pub fn prepend_child(&self, child: &Node) -> Result<Option<Node>> {
        self.adopt_and_attach(child, Position::Prepend, "prepend_child")
    }

    /// Insert `sibling` right before this node.
    pub fn insert_before(&self, sibling: &Node) -> Result<Option<Node>> {
        self.adopt_and_attach(sibling, Position::Before, "insert_before")
    }

    /// Insert `sibling` right after this node.
    pub fn insert_after(&self, sibling: &Node) -> Result<Option<Node>> {
        self.adopt_and_attach(sibling, Position::After, "insert_after")
    }

    fn adopt_and_attach(
        &self,
        node: &Node,
        position: Position,
        op: &str,
    ) -> Result<Option<Node>> {
        let Some(node) = adopt::adopt(node, self, false) else {
            return Ok(None);
        };
        self.attach(&node, position, op)?;
        Ok(Some(node))
    }

    /// Create an element as the last child of this node.
    pub fn append_element(&self, name: &str) -> Node {
        let el = self.doc.create_element(name);
        self.attach_unchecked(&el, Position::Append);
        el
    }

    /// Create an element as the first child of this node.
    pub fn prepend_element(&self, name: &str) -> Node {
        let el = self.doc.create_element(name);
        self.attach_unchecked(&el, Position::Prepend);
        el
    }

    /// Attach `node`, which must already belong to this document, relative
    /// to `self`.
    pub(crate) fn attach(&self, node: &Node, position: Position, op: &str) -> Result<()> {
        let parent = match position {
            Position::Append | Position::Prepend => self.clone(),
            Position::Before | Position::After => {
                self.parent().ok_or_else(|| DomError::no_parent(op))?
            }
        };
        if !self.doc.same_document(&node.doc) {
            return Err(DomError::hierarchy(op, "node belongs to another document"));
        }
        if node.is_document() {
            return Err(DomError::hierarchy(op, "cannot insert a document node"));
        }
        if matches!(position, Position::Before | Position::After) && node.id == self.id {
            return Ok(());
        }
        if node.contains(&parent) {
            return Err(DomError::hierarchy(
                op,
                "cannot insert a node into itself or its descendants",
            ));
        }
        self.attach_unchecked(node, position);
        Ok(())
    }

    fn attach_unchecked(&self, node: &Node, position: Position) {
        let mut inner = self.doc.borrow_mut();
        // Detach first so ego_tree never sees the node as its own neighbour.
        if let Some(mut n) = inner.tree.get_mut(node.id) {
            n.detach();
        }
        if let Some(mut anchor) = inner.tree.get_mut(self.id) {
            match position {
                Position::Append => {
                    anchor.append_id(node.id);
                }
                Position::Prepend => {
                    anchor.prepend_id(node.id);
                }
                Position::Before => {
                    anchor.insert_id_before(node.id);
                }
                Position::After => {
                    anchor.insert_id_after(node.id);
                }
            }
        }
    }

    pub(crate) fn capture(&self) -> Option<Subtree> {
        self.with_ref(Subtree::capture)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.doc.same_document(&other.doc)
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.doc.ptr_id().hash(state);
        self.id.hash(state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.node_name())
            .field("id", &self.id)
            .finish()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.outer_html())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::parse_html(r#"<div id="a"><p class="x">one</p><p>two</p></div><span>s</span>"#)
    }

    #[test]
    fn navigation() {
        let doc = doc();
        let div = doc.select_first("#a").unwrap().unwrap();
        let kids = div.element_children();
        assert_eq!(kids.len(), 2);
        assert_eq!(kids[0].next_element_sibling().unwrap(), kids[1]);
        assert_eq!(kids[1].prev_element_sibling().unwrap(), kids[0]);
        assert_eq!(kids[0].parent().unwrap(), div);
        assert!(div.contains(&kids[1]));
        assert!(!kids[1].contains(&div));
    }

    #[test]
    fn attribute_helpers() {
        let doc = doc();
        let p = doc.select_first("p.x").unwrap().unwrap();
        assert_eq!(p.attr("class").as_deref(), Some("x"));
        p.set_attr("title", "t");
        p.remove_attr("class");
        assert_eq!(p.outer_html(), r#"<p title="t">one</p>"#);
    }

    #[test]
    fn set_text_replaces_children() {
        let doc = doc();
        let div = doc.select_first("#a").unwrap().unwrap();
        div.set_text("a < b");
        assert_eq!(div.inner_html(), "a &lt; b");
        assert_eq!(div.text(), "a < b");
    }

    #[test]
    fn append_into_own_descendant_is_rejected() {
        let doc = doc();
        let div = doc.select_first("#a").unwrap().unwrap();
        let p = doc.select_first("p").unwrap().unwrap();
        let err = p.append_child(&div).unwrap_err();
        assert!(err.is_hierarchy());
    }

    #[test]
    fn insert_before_orphan_fails_with_no_parent() {
        let doc = doc();
        let orphan = doc.create_element("em");
        let err = orphan.insert_before(&doc.create_text("x")).unwrap_err();
        assert!(err.is_no_parent());
    }

    #[test]
    fn insert_after_next_sibling_keeps_tree_consistent() {
        let doc = doc();
        let ps = doc.select("p").unwrap();
        let first = ps.get(0).unwrap().clone();
        let second = ps.get(1).unwrap().clone();
        first.insert_after(&second).unwrap();
        let div = doc.select_first("#a").unwrap().unwrap();
        assert_eq!(div.inner_html(), r#"<p class="x">one</p><p>two</p>"#);
    }

    #[test]
    fn rename_keeps_attributes() {
        let doc = doc();
        let p = doc.select_first("p.x").unwrap().unwrap();
        p.rename("section");
        assert_eq!(p.outer_html(), r#"<section class="x">one</section>"#);
    }
}
