// ABOUTME: HtmlPage: whole-page helpers over an HTML document (head, body, title, meta, base).
// ABOUTME: Missing head and body elements are created on demand.

use std::fmt;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dom::{Document, Node};
use crate::error::Result;
use crate::selection::Selection;

const SKELETON: &str =
    r#"<!DOCTYPE html><html><head><meta charset="utf-8"><title></title></head><body></body></html>"#;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse newlines and whitespace runs to single spaces and trim.
pub fn trim_newlines(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// An HTML page.
#[derive(Clone)]
pub struct HtmlPage {
    doc: Document,
}

impl HtmlPage {
    /// A minimal page with an empty title and body.
    pub fn new() -> Self {
        Self::parse(SKELETON)
    }

    pub fn parse(markup: &str) -> Self {
        Self {
            doc: Document::parse_html(markup),
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    fn html_element(&self) -> Node {
        match self
            .doc
            .document_element()
            .filter(|n| is_named(n, "html"))
        {
            Some(html) => html,
            None => self.doc.root().append_element("html"),
        }
    }

    pub fn head(&self) -> Node {
        let html = self.html_element();
        let found = html
            .element_children()
            .into_iter()
            .find(|n| is_named(n, "head"));
        found.unwrap_or_else(|| html.prepend_element("head"))
    }

    pub fn body(&self) -> Node {
        let html = self.html_element();
        let found = html
            .element_children()
            .into_iter()
            .find(|n| is_named(n, "body"));
        found.unwrap_or_else(|| html.append_element("body"))
    }

    fn head_child(&self, name: &str) -> Option<Node> {
        self.head()
            .element_children()
            .into_iter()
            .find(|n| is_named(n, name))
    }

    /// Title text with whitespace collapsed, if the page has a title element.
    pub fn title(&self) -> Option<String> {
        self.head_child("title").map(|t| trim_newlines(&t.text()))
    }

    pub fn set_title(&self, title: &str) -> &Self {
        let el = match self.head_child("title") {
            Some(el) => el,
            None => self.head().append_element("title"),
        };
        el.set_text(title);
        self
    }

    fn find_meta(&self, name: &str) -> Option<Node> {
        self.head().element_children().into_iter().find(|n| {
            is_named(n, "meta")
                && ["name", "property", "http-equiv"].iter().any(|attr| {
                    n.attr(attr)
                        .is_some_and(|v| v.eq_ignore_ascii_case(name))
                })
        })
    }

    /// `content` of the meta element whose name, property or http-equiv is
    /// `name`.
    pub fn meta(&self, name: &str) -> Option<String> {
        self.find_meta(name).and_then(|m| m.attr("content"))
    }

    /// Update an existing meta element or append a new `<meta name>`.
    pub fn set_meta(&self, name: &str, content: &str) -> &Self {
        let el = match self.find_meta(name) {
            Some(el) => el,
            None => {
                let el = self.head().append_element("meta");
                el.set_attr("name", name);
                el
            }
        };
        el.set_attr("content", content);
        self
    }

    pub fn remove_meta(&self, name: &str) -> &Self {
        while let Some(el) = self.find_meta(name) {
            el.detach();
        }
        self
    }

    pub fn base_href(&self) -> Option<String> {
        self.head_child("base").and_then(|b| b.attr("href"))
    }

    pub fn set_base_href(&self, url: &str) -> &Self {
        let el = match self.head_child("base") {
            Some(el) => el,
            None => self.head().prepend_element("base"),
        };
        el.set_attr("href", url);
        self
    }

    pub fn element_by_id(&self, id: &str) -> Option<Node> {
        self.doc
            .select("[id]")
            .ok()?
            .into_iter()
            .find(|n| n.attr("id").as_deref() == Some(id))
    }

    /// Replace the children of the element with `id`. Returns false when no
    /// such element exists.
    pub fn set_html_by_id(&self, id: &str, markup: &str) -> Result<bool> {
        match self.element_by_id(id) {
            Some(el) => {
                Selection::from(el).set_html(markup)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Elements of the page matching `css`.
    pub fn filter(&self, css: &str) -> Result<Selection> {
        self.doc.select(css)
    }

    pub fn render(&self) -> String {
        self.doc.html()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let path = path.as_ref();
        log::debug!("writing page to {}", path.display());
        std::fs::write(path, self.render())
    }
}

fn is_named(node: &Node, name: &str) -> bool {
    node.tag_name()
        .is_some_and(|t| t.eq_ignore_ascii_case(name))
}

impl Default for HtmlPage {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Document> for HtmlPage {
    fn from(doc: Document) -> Self {
        Self { doc }
    }
}

impl fmt::Display for HtmlPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
