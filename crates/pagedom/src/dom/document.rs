// ABOUTME: Document handle owning one node arena and its parse options.
// ABOUTME: Cloning a Document clones the handle; equality is identity of the owned tree.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use ego_tree::{NodeId, Tree};

use super::data::{ElementData, NodeData};
use super::node::Node;
use super::serialize;
use crate::error::{DomError, Result};
use crate::options::{DocumentBuilder, DocumentKind, ParseOptions};
use crate::parse;
use crate::select::compiled::get_or_compile;
use crate::selection::Selection;

pub(crate) struct DocumentInner {
    pub(crate) tree: Tree<NodeData>,
    pub(crate) options: ParseOptions,
}

/// Shared handle to a document tree.
#[derive(Clone)]
pub struct Document {
    inner: Rc<RefCell<DocumentInner>>,
}

impl Document {
    pub(crate) fn from_tree(tree: Tree<NodeData>, options: ParseOptions) -> Self {
        Self {
            inner: Rc::new(RefCell::new(DocumentInner { tree, options })),
        }
    }

    /// An empty document holding only its root node.
    pub fn empty(options: ParseOptions) -> Self {
        Self::from_tree(Tree::new(NodeData::Document), options)
    }

    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::new()
    }

    /// Parse an HTML document. HTML parsing recovers from any input.
    pub fn parse_html(markup: &str) -> Self {
        parse::html::parse_document(markup, ParseOptions::html())
    }

    /// Parse an XML document.
    pub fn parse_xml(markup: &str) -> Result<Self> {
        parse::document(markup, ParseOptions::xml())
    }

    pub(crate) fn borrow(&self) -> Ref<'_, DocumentInner> {
        self.inner.borrow()
    }

    pub(crate) fn borrow_mut(&self) -> RefMut<'_, DocumentInner> {
        self.inner.borrow_mut()
    }

    pub fn options(&self) -> ParseOptions {
        self.borrow().options.clone()
    }

    pub fn kind(&self) -> DocumentKind {
        self.borrow().options.kind
    }

    pub fn is_html(&self) -> bool {
        self.kind() == DocumentKind::Html
    }

    /// True if both handles refer to the same tree.
    pub fn same_document(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn ptr_id(&self) -> usize {
        Rc::as_ptr(&self.inner) as *const () as usize
    }

    pub fn root(&self) -> Node {
        let id = self.borrow().tree.root().id();
        Node::new(self.clone(), id)
    }

    /// The top-level element (`<html>` for HTML documents).
    pub fn document_element(&self) -> Option<Node> {
        self.root().children().into_iter().find(Node::is_element)
    }

    /// Create a detached node owned by this document.
    pub(crate) fn orphan(&self, data: NodeData) -> Node {
        let id = self.borrow_mut().tree.orphan(data).id();
        Node::new(self.clone(), id)
    }

    pub fn create_element(&self, name: &str) -> Node {
        self.orphan(NodeData::Element(ElementData::new(name)))
    }

    pub fn create_text(&self, text: &str) -> Node {
        self.orphan(NodeData::Text(text.to_string()))
    }

    pub fn create_comment(&self, text: &str) -> Node {
        self.orphan(NodeData::Comment(text.to_string()))
    }

    /// Select every element of the document matching `css`.
    pub fn select(&self, css: &str) -> Result<Selection> {
        self.root().select_within(css, "select")
    }

    /// First element matching `css`, if any.
    pub fn select_first(&self, css: &str) -> Result<Option<Node>> {
        let selector = get_or_compile(css).ok_or_else(|| DomError::selector("select", css))?;
        let html = self.is_html();
        let found = {
            let inner = self.borrow();
            let root = inner.tree.root();
            root.descendants()
                .skip(1)
                .find(|n| selector.matches(*n, html))
                .map(|n| n.id())
        };
        Ok(found.map(|id| Node::new(self.clone(), id)))
    }

    pub(crate) fn node(&self, id: NodeId) -> Node {
        Node::new(self.clone(), id)
    }

    /// Render the whole document.
    pub fn html(&self) -> String {
        let inner = self.borrow();
        let mut out = String::new();
        serialize::outer(inner.tree.root(), inner.options.kind, &mut out);
        out
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.same_document(other)
    }
}

impl Eq for Document {}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html())
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("kind", &self.kind())
            .field("addr", &format_args!("{:#x}", self.ptr_id()))
            .finish()
    }
}
