// ABOUTME: Mutating selection operations: insertion, replacement, wrapping, removal and content setters.
// ABOUTME: Every insertion fans out over the selection and adopts content per destination.

use super::{Content, Selection};
use crate::dom::{adopt, Node, Position};
use crate::error::{DomError, Result};

impl Selection {
    fn require_parents(&self, op: &str) -> Result<()> {
        if self.nodes.iter().any(|n| n.parent().is_none()) {
            return Err(DomError::no_parent(op));
        }
        Ok(())
    }

    /// Insert `content` at `position` relative to every node of the
    /// selection and return everything that was inserted.
    fn fan_out(&self, op: &str, content: Content, position: Position) -> Result<Selection> {
        let Some(first) = self.nodes.first() else {
            return Ok(Selection::new());
        };
        if matches!(position, Position::Before | Position::After) {
            self.require_parents(op)?;
        }
        let source = content.resolve(first.document())?;
        let mut inserted = Vec::with_capacity(source.len() * self.nodes.len());
        for (i, target) in self.nodes.iter().enumerate() {
            let nodes: Vec<Node> = source
                .iter()
                .filter_map(|n| adopt::adopt(n, target, i > 0))
                .collect();
            place(target, &nodes, position, op)?;
            inserted.extend(nodes);
        }
        log::trace!(
            "{}: inserted {} node(s) at {} destination(s)",
            op,
            inserted.len(),
            self.nodes.len()
        );
        Ok(Selection::from_nodes(inserted))
    }

    /// Append content as the last children of every node.
    pub fn append(&self, content: impl Into<Content>) -> Result<&Self> {
        self.fan_out("append", content.into(), Position::Append)?;
        Ok(self)
    }

    /// Insert content, in order, before the first child of every node.
    pub fn prepend(&self, content: impl Into<Content>) -> Result<&Self> {
        self.fan_out("prepend", content.into(), Position::Prepend)?;
        Ok(self)
    }

    /// Insert content, in order, right after every node.
    pub fn after(&self, content: impl Into<Content>) -> Result<&Self> {
        self.fan_out("after", content.into(), Position::After)?;
        Ok(self)
    }

    /// Insert content, in order, right before every node.
    pub fn before(&self, content: impl Into<Content>) -> Result<&Self> {
        self.fan_out("before", content.into(), Position::Before)?;
        Ok(self)
    }

    /// Append this selection to every node of `target`. Returns the
    /// inserted nodes, clones included.
    pub fn append_to(&self, target: &Selection) -> Result<Selection> {
        target.fan_out("append_to", Content::Nodes(self.clone()), Position::Append)
    }

    pub fn prepend_to(&self, target: &Selection) -> Result<Selection> {
        target.fan_out("prepend_to", Content::Nodes(self.clone()), Position::Prepend)
    }

    pub fn insert_after(&self, target: &Selection) -> Result<Selection> {
        target.fan_out("insert_after", Content::Nodes(self.clone()), Position::After)
    }

    pub fn insert_before(&self, target: &Selection) -> Result<Selection> {
        target.fan_out("insert_before", Content::Nodes(self.clone()), Position::Before)
    }

    fn replace_targets(&self, op: &str, content: Content) -> Result<Selection> {
        let Some(first) = self.nodes.first() else {
            return Ok(Selection::new());
        };
        self.require_parents(op)?;
        let source = content.resolve(first.document())?;
        let mut inserted = Vec::new();
        for (i, target) in self.nodes.iter().enumerate() {
            let nodes: Vec<Node> = source
                .iter()
                .filter_map(|n| adopt::adopt(n, target, i > 0))
                .collect();
            place(target, &nodes, Position::Before, op)?;
            if !nodes.contains(target) {
                target.detach();
            }
            inserted.extend(nodes);
        }
        Ok(Selection::from_nodes(inserted))
    }

    /// Put content where each node was and detach the node.
    pub fn replace_with(&self, content: impl Into<Content>) -> Result<&Self> {
        self.replace_targets("replace_with", content.into())?;
        Ok(self)
    }

    /// Replace every node of `target` with this selection.
    pub fn replace_all(&self, target: &Selection) -> Result<Selection> {
        target.replace_targets("replace_all", Content::Nodes(self.clone()))
    }

    /// First element of `content`, used as the wrapper template.
    fn wrapper_template(&self, content: Content) -> Result<Option<Node>> {
        let Some(first) = self.nodes.first() else {
            return Ok(None);
        };
        Ok(content
            .resolve(first.document())?
            .into_iter()
            .find(Node::is_element))
    }

    /// Wrap each node in its own copy of the first element of `content`.
    /// The node ends up in the innermost first-element descendant of the
    /// wrapper.
    pub fn wrap(&self, content: impl Into<Content>) -> Result<&Self> {
        let Some(template) = self.wrapper_template(content.into())? else {
            return Ok(self);
        };
        self.require_parents("wrap")?;
        for target in &self.nodes {
            let Some(wrapper) = adopt::adopt(&template, target, true) else {
                continue;
            };
            target.attach(&wrapper, Position::Before, "wrap")?;
            innermost(&wrapper).attach(target, Position::Append, "wrap")?;
        }
        Ok(self)
    }

    /// Wrap all nodes in a single wrapper placed where the first node was.
    /// The nodes must share a parent.
    pub fn wrap_all(&self, content: impl Into<Content>) -> Result<&Self> {
        let Some(first) = self.nodes.first() else {
            return Ok(self);
        };
        let parent = first
            .parent()
            .ok_or_else(|| DomError::no_parent("wrap_all"))?;
        if self.nodes.iter().any(|n| n.parent().as_ref() != Some(&parent)) {
            return Err(DomError::hierarchy(
                "wrap_all",
                "selected nodes do not share a parent",
            ));
        }
        let Some(template) = self.wrapper_template(content.into())? else {
            return Ok(self);
        };
        let Some(wrapper) = adopt::adopt(&template, first, true) else {
            return Ok(self);
        };
        first.attach(&wrapper, Position::Before, "wrap_all")?;
        let inner = innermost(&wrapper);
        for node in &self.nodes {
            inner.attach(node, Position::Append, "wrap_all")?;
        }
        Ok(self)
    }

    /// Wrap the children of each element. A childless element gets the
    /// bare wrapper appended.
    pub fn wrap_inner(&self, content: impl Into<Content>) -> Result<&Self> {
        let Some(template) = self.wrapper_template(content.into())? else {
            return Ok(self);
        };
        for target in self.nodes.iter().filter(|n| n.is_element()) {
            let Some(wrapper) = adopt::adopt(&template, target, true) else {
                continue;
            };
            let children = target.children();
            target.attach(&wrapper, Position::Append, "wrap_inner")?;
            let inner = innermost(&wrapper);
            for child in &children {
                inner.attach(child, Position::Append, "wrap_inner")?;
            }
        }
        Ok(self)
    }

    /// Remove the parent elements of the selected nodes, leaving the
    /// parents' children in place.
    pub fn unwrap(&self) -> Result<&Self> {
        let parents = Selection::from_nodes(self.nodes.iter().filter_map(Node::parent_element));
        parents.require_parents("unwrap")?;
        for parent in &parents {
            hoist_children(parent, "unwrap")?;
        }
        Ok(self)
    }

    /// Replace each node with its own children.
    pub fn unwrap_inner(&self) -> Result<&Self> {
        if self.nodes.iter().any(|n| n.parent_element().is_none()) {
            return Err(DomError::no_parent("unwrap_inner"));
        }
        for node in &self.nodes {
            hoist_children(node, "unwrap_inner")?;
        }
        Ok(self)
    }

    /// Detach every node. Detached nodes stay usable and can be inserted
    /// again.
    pub fn remove(&self) -> &Self {
        for node in &self.nodes {
            node.detach();
        }
        self
    }

    /// Remove all children of every node.
    pub fn empty(&self) -> &Self {
        for node in &self.nodes {
            node.remove_children();
        }
        self
    }

    /// Detached deep copies, each in the document of its original.
    pub fn clone_nodes(&self) -> Selection {
        self.nodes.iter().map(Node::deep_clone).collect()
    }

    /// Replace the children of every node with parsed `markup`.
    pub fn set_html(&self, markup: &str) -> Result<&Self> {
        let Some(first) = self.nodes.first() else {
            return Ok(self);
        };
        let parsed = Content::from(markup).resolve(first.document())?;
        self.empty();
        self.fan_out(
            "set_html",
            Content::Nodes(Selection::from_nodes(parsed)),
            Position::Append,
        )?;
        Ok(self)
    }

    /// Replace the children of every node with a text node.
    pub fn set_text(&self, text: &str) -> &Self {
        for node in &self.nodes {
            node.set_text(text);
        }
        self
    }
}

fn place(target: &Node, nodes: &[Node], position: Position, op: &str) -> Result<()> {
    match position {
        Position::Append | Position::Before => {
            for node in nodes {
                target.attach(node, position, op)?;
            }
        }
        Position::Prepend => {
            for node in nodes.iter().rev() {
                target.attach(node, position, op)?;
            }
        }
        Position::After => {
            let mut anchor = target.clone();
            for node in nodes {
                anchor.attach(node, position, op)?;
                anchor = node.clone();
            }
        }
    }
    Ok(())
}

/// Follow first element children down to the deepest one.
fn innermost(node: &Node) -> Node {
    let mut current = node.clone();
    while let Some(child) = current.element_children().into_iter().next() {
        current = child;
    }
    current
}

/// Move the children of `node` in front of it, then detach it.
fn hoist_children(node: &Node, op: &str) -> Result<()> {
    for child in node.children() {
        node.attach(&child, Position::Before, op)?;
    }
    node.detach();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use pretty_assertions::assert_eq;

    fn body(doc: &Document) -> String {
        doc.select_first("body").unwrap().unwrap().inner_html()
    }

    #[test]
    fn append_fans_out_markup() {
        let doc = Document::parse_html("<div></div><div></div>");
        let divs = doc.select("div").unwrap();
        divs.append("<i>x</i>").unwrap();
        assert_eq!(body(&doc), "<div><i>x</i></div><div><i>x</i></div>");
    }

    #[test]
    fn prepend_keeps_content_order() {
        let doc = Document::parse_html("<ul><li>c</li></ul>");
        doc.select("ul").unwrap().prepend("<li>a</li><li>b</li>").unwrap();
        assert_eq!(body(&doc), "<ul><li>a</li><li>b</li><li>c</li></ul>");
    }

    #[test]
    fn prepend_into_empty_element() {
        let doc = Document::parse_html("<p></p>");
        doc.select("p").unwrap().prepend("a<b>b</b>").unwrap();
        assert_eq!(body(&doc), "<p>a<b>b</b></p>");
    }

    #[test]
    fn after_keeps_content_order() {
        let doc = Document::parse_html("<p>1</p><p>4</p>");
        doc.select("p").unwrap().eq(0).after("<p>2</p><p>3</p>").unwrap();
        assert_eq!(body(&doc), "<p>1</p><p>2</p><p>3</p><p>4</p>");
    }

    #[test]
    fn moving_existing_nodes_clones_for_later_destinations() {
        let doc = Document::parse_html(r#"<b>x</b><p id="a"></p><p id="b"></p>"#);
        let b = doc.select("b").unwrap();
        let inserted = b.append_to(&doc.select("p").unwrap()).unwrap();
        assert_eq!(inserted.len(), 2);
        assert_eq!(inserted.get(0).unwrap(), b.get(0).unwrap());
        assert_eq!(
            body(&doc),
            r#"<p id="a"><b>x</b></p><p id="b"><b>x</b></p>"#
        );
    }

    #[test]
    fn before_on_orphan_fails_without_mutation() {
        let doc = Document::parse_html("<p>a</p>");
        let orphan = doc.create_element("em");
        let sel = Selection::from_nodes(vec![doc.select_first("p").unwrap().unwrap(), orphan]);
        let err = sel.before("<hr>").unwrap_err();
        assert!(err.is_no_parent());
        assert_eq!(body(&doc), "<p>a</p>");
    }

    #[test]
    fn appending_ancestor_is_a_hierarchy_error() {
        let doc = Document::parse_html("<div><p></p></div>");
        let div = doc.select("div").unwrap();
        let err = div.append_to(&doc.select("p").unwrap()).unwrap_err();
        assert!(err.is_hierarchy());
    }

    #[test]
    fn replace_with_markup() {
        let doc = Document::parse_html("<p>a</p><span>s</span><p>b</p>");
        doc.select("p").unwrap().replace_with("<hr>").unwrap();
        assert_eq!(body(&doc), "<hr><span>s</span><hr>");
    }

    #[test]
    fn replace_all_moves_then_clones() {
        let doc = Document::parse_html("<i>n</i><p>a</p><p>b</p>");
        let i = doc.select("i").unwrap();
        let inserted = i.replace_all(&doc.select("p").unwrap()).unwrap();
        assert_eq!(inserted.len(), 2);
        assert_eq!(body(&doc), "<i>n</i><i>n</i>");
    }

    #[test]
    fn wrap_uses_innermost_element() {
        let doc = Document::parse_html("<b>1</b><b>2</b>");
        doc.select("b")
            .unwrap()
            .wrap(r#"<div class="w"><span></span><em></em></div>"#)
            .unwrap();
        assert_eq!(
            body(&doc),
            r#"<div class="w"><span><b>1</b></span><em></em></div><div class="w"><span><b>2</b></span><em></em></div>"#
        );
    }

    #[test]
    fn wrap_with_existing_element_copies_it() {
        let doc = Document::parse_html("<section></section><b>1</b>");
        let section = doc.select("section").unwrap();
        doc.select("b").unwrap().wrap(&section).unwrap();
        assert_eq!(body(&doc), "<section></section><section><b>1</b></section>");
    }

    #[test]
    fn wrap_all_requires_shared_parent() {
        let doc = Document::parse_html("<div><i>1</i></div><i>2</i>");
        let err = doc.select("i").unwrap().wrap_all("<p></p>").unwrap_err();
        assert!(err.is_hierarchy());
    }

    #[test]
    fn wrap_all_collects_siblings() {
        let doc = Document::parse_html("<i>1</i><span>x</span><i>2</i>");
        doc.select("i").unwrap().wrap_all("<p></p>").unwrap();
        assert_eq!(body(&doc), "<p><i>1</i><i>2</i></p><span>x</span>");
    }

    #[test]
    fn wrap_inner_handles_empty_targets() {
        let doc = Document::parse_html("<p>a<b>b</b></p><p></p>");
        doc.select("p").unwrap().wrap_inner("<q></q>").unwrap();
        assert_eq!(body(&doc), "<p><q>a<b>b</b></q></p><p><q></q></p>");
    }

    #[test]
    fn unwrap_removes_parents() {
        let doc = Document::parse_html("<div><p>a</p><p>b</p></div>");
        let paragraphs = doc.select("p").unwrap();
        paragraphs.unwrap().expect("parents removed");
        assert_eq!(body(&doc), "<p>a</p><p>b</p>");
    }

    #[test]
    fn unwrap_inner_replaces_with_children() {
        let doc = Document::parse_html("<div><span>a<b>b</b></span></div>");
        doc.select("span").unwrap().unwrap_inner().unwrap();
        assert_eq!(body(&doc), "<div>a<b>b</b></div>");
    }

    #[test]
    fn unwrap_inner_needs_element_parent() {
        let doc = Document::parse_html("<p>x</p>");
        let html = doc.select("html").unwrap();
        let err = html.unwrap_inner().unwrap_err();
        assert!(err.is_no_parent());
    }

    #[test]
    fn remove_and_empty() {
        let doc = Document::parse_html("<div><p>a</p></div><span>s</span>");
        doc.select("span").unwrap().remove();
        doc.select("div").unwrap().empty();
        assert_eq!(body(&doc), "<div></div>");
    }

    #[test]
    fn clone_nodes_are_detached_copies() {
        let doc = Document::parse_html("<p>a</p>");
        let clones = doc.select("p").unwrap().clone_nodes();
        let clone = clones.get(0).unwrap();
        assert!(clone.parent().is_none());
        clone.set_text("b");
        assert_eq!(body(&doc), "<p>a</p>");
    }

    #[test]
    fn set_html_and_set_text() {
        let doc = Document::parse_html("<p>a</p><p>b</p>");
        let ps = doc.select("p").unwrap();
        ps.set_html("<i>x</i>").unwrap();
        assert_eq!(body(&doc), "<p><i>x</i></p><p><i>x</i></p>");
        ps.set_text("<y>");
        assert_eq!(body(&doc), "<p>&lt;y&gt;</p><p>&lt;y&gt;</p>");
    }

    #[test]
    fn set_html_on_xml_rejects_malformed_markup() {
        let doc = Document::parse_xml("<r><a>keep</a></r>").unwrap();
        let a = doc.select("a").unwrap();
        assert!(a.set_html("<b>").unwrap_err().is_parse());
        assert_eq!(a.text(), "keep");
    }
}
