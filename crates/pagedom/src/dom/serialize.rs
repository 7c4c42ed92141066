// ABOUTME: HTML and XML serialization of the node arena back to markup.
// ABOUTME: Handles void elements, raw-text elements, escaping and the XML declaration.

use ego_tree::NodeRef;

use super::data::NodeData;
use crate::options::DocumentKind;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Elements whose text children are written without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script",
    "style",
    "xmp",
    "iframe",
    "noembed",
    "noframes",
    "plaintext",
    "noscript",
];

/// Check if tag is void element
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag.to_ascii_lowercase().as_str(),
        "area"
            | "base"
            | "basefont"
            | "bgsound"
            | "br"
            | "col"
            | "embed"
            | "frame"
            | "hr"
            | "img"
            | "input"
            | "keygen"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn is_raw_text_element(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|t| tag.eq_ignore_ascii_case(t))
}

/// Escape character data.
pub fn escape_text(s: &str, kind: DocumentKind) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' if kind == DocumentKind::Html => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape an attribute value for use inside double quotes.
pub fn escape_attr(s: &str, kind: DocumentKind) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' if kind == DocumentKind::Xml => out.push_str("&lt;"),
            '\u{a0}' if kind == DocumentKind::Html => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialize `node` itself and everything below it.
pub(crate) fn outer(node: NodeRef<'_, NodeData>, kind: DocumentKind, out: &mut String) {
    match node.value() {
        NodeData::Document => {
            if kind == DocumentKind::Xml {
                out.push_str(XML_DECLARATION);
                out.push('\n');
            }
            inner(node, kind, out);
        }
        NodeData::Doctype {
            name,
            public_id,
            system_id,
        } => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            if !public_id.is_empty() {
                out.push_str(&format!(" PUBLIC \"{}\"", public_id));
                if !system_id.is_empty() {
                    out.push_str(&format!(" \"{}\"", system_id));
                }
            } else if !system_id.is_empty() {
                out.push_str(&format!(" SYSTEM \"{}\"", system_id));
            }
            out.push('>');
        }
        NodeData::Element(el) => {
            out.push('<');
            out.push_str(&el.name);
            for attr in &el.attrs {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                out.push_str(&escape_attr(&attr.value, kind));
                out.push('"');
            }
            match kind {
                DocumentKind::Html if is_void_element(&el.name) => out.push('>'),
                DocumentKind::Xml if !node.has_children() => out.push_str("/>"),
                _ => {
                    out.push('>');
                    if kind == DocumentKind::Html && starts_with_newline(node, &el.name) {
                        out.push('\n');
                    }
                    inner(node, kind, out);
                    out.push_str("</");
                    out.push_str(&el.name);
                    out.push('>');
                }
            }
        }
        NodeData::Text(text) => {
            let raw = kind == DocumentKind::Html
                && node
                    .parent()
                    .and_then(|p| p.value().as_element())
                    .is_some_and(|el| is_raw_text_element(&el.name));
            if raw {
                out.push_str(text);
            } else {
                out.push_str(&escape_text(text, kind));
            }
        }
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeData::CData(text) => {
            out.push_str("<![CDATA[");
            out.push_str(text);
            out.push_str("]]>");
        }
        NodeData::ProcessingInstruction { target, data } => {
            out.push_str("<?");
            out.push_str(target);
            if !data.is_empty() {
                out.push(' ');
                out.push_str(data);
            }
            if kind == DocumentKind::Xml {
                out.push('?');
            }
            out.push('>');
        }
    }
}

/// Serialize the children of `node`.
pub(crate) fn inner(node: NodeRef<'_, NodeData>, kind: DocumentKind, out: &mut String) {
    for child in node.children() {
        outer(child, kind, out);
    }
}

/// The HTML parser eats one newline right after `<pre>`, `<textarea>` and
/// `<listing>`; write it back so the text survives a round trip.
fn starts_with_newline(node: NodeRef<'_, NodeData>, name: &str) -> bool {
    let sensitive = ["pre", "textarea", "listing"]
        .iter()
        .any(|t| name.eq_ignore_ascii_case(t));
    sensitive
        && node
            .first_child()
            .and_then(|c| match c.value() {
                NodeData::Text(t) => Some(t.starts_with('\n')),
                _ => None,
            })
            .unwrap_or(false)
}
