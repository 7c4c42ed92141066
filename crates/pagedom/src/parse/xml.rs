// ABOUTME: XML front end: streams quick-xml events into the pagedom arena.
// ABOUTME: Strict about tag balance; fragments are parsed inside a synthetic root element.

use ego_tree::{NodeId, Tree};
use once_cell::sync::Lazy;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;

use super::entities;
use crate::dom::{Attribute, Document, ElementData, NodeData};
use crate::error::{DomError, Result};
use crate::options::ParseOptions;

const FRAGMENT_ROOT: &str = "pagedom-fragment";

static DOCTYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)^\s*([^\s\[>]+)(?:\s+PUBLIC\s+["']([^"']*)["'](?:\s+["']([^"']*)["'])?|\s+SYSTEM\s+["']([^"']*)["'])?"#,
    )
    .unwrap()
});

/// Parse a complete XML document.
pub(crate) fn parse_document(markup: &str, opts: ParseOptions) -> Result<Document> {
    let tree = build_tree(markup, "parse_xml")?;
    Ok(Document::from_tree(tree, opts))
}

/// Parse a sequence of XML nodes that need not have a single root.
pub(crate) fn parse_fragment(markup: &str) -> Result<Tree<NodeData>> {
    let wrapped = format!("<{0}>{1}</{0}>", FRAGMENT_ROOT, markup);
    let tree = build_tree(&wrapped, "parse_fragment")?;
    let container = tree.root().first_child().map(|n| n.id());
    Ok(match container {
        Some(id) => super::relocate_children(&tree, id),
        None => Tree::new(NodeData::Document),
    })
}

fn build_tree(markup: &str, op: &str) -> Result<Tree<NodeData>> {
    let mut reader = Reader::from_str(markup);
    reader.config_mut().trim_text(false);

    let mut tree = Tree::new(NodeData::Document);
    let root = tree.root().id();
    let mut stack: Vec<NodeId> = vec![root];
    let mut text = String::new();

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) => {
                return Err(DomError::parse(
                    op,
                    Some(anyhow::anyhow!(
                        "at byte {}: {}",
                        reader.buffer_position(),
                        err
                    )),
                ))
            }
        };
        let parent = stack.last().copied().unwrap_or(root);
        match event {
            Event::Start(e) => {
                flush_text(&mut tree, parent, &mut text);
                let id = append(&mut tree, parent, NodeData::Element(element(&e)));
                stack.push(id);
            }
            Event::Empty(e) => {
                flush_text(&mut tree, parent, &mut text);
                append(&mut tree, parent, NodeData::Element(element(&e)));
            }
            Event::End(_) => {
                flush_text(&mut tree, parent, &mut text);
                if stack.len() <= 1 {
                    return Err(DomError::parse(
                        op,
                        Some(anyhow::anyhow!("unexpected end tag")),
                    ));
                }
                stack.pop();
            }
            Event::Text(e) => {
                text.push_str(&e.decode().map(|s| s.into_owned()).unwrap_or_default());
            }
            Event::GeneralRef(e) => {
                let name = String::from_utf8_lossy(&e).into_owned();
                match entities::resolve(&name) {
                    Some(resolved) => text.push_str(&resolved),
                    None => {
                        text.push('&');
                        text.push_str(&name);
                        text.push(';');
                    }
                }
            }
            Event::CData(e) => {
                flush_text(&mut tree, parent, &mut text);
                let data = String::from_utf8_lossy(&e).into_owned();
                append(&mut tree, parent, NodeData::CData(data));
            }
            Event::Comment(e) => {
                flush_text(&mut tree, parent, &mut text);
                let data = String::from_utf8_lossy(&e).into_owned();
                append(&mut tree, parent, NodeData::Comment(data));
            }
            Event::PI(e) => {
                flush_text(&mut tree, parent, &mut text);
                let raw = String::from_utf8_lossy(&e).into_owned();
                let (target, data) = match raw.split_once(char::is_whitespace) {
                    Some((target, data)) => (target.to_string(), data.trim().to_string()),
                    None => (raw.clone(), String::new()),
                };
                append(
                    &mut tree,
                    parent,
                    NodeData::ProcessingInstruction { target, data },
                );
            }
            Event::DocType(e) => {
                flush_text(&mut tree, parent, &mut text);
                let raw = String::from_utf8_lossy(&e).into_owned();
                append(&mut tree, parent, doctype(&raw));
            }
            Event::Decl(_) => {}
            Event::Eof => break,
        }
    }

    let parent = stack.last().copied().unwrap_or(root);
    flush_text(&mut tree, parent, &mut text);
    if stack.len() > 1 {
        return Err(DomError::parse(
            op,
            Some(anyhow::anyhow!("{} unclosed element(s) at end of input", stack.len() - 1)),
        ));
    }
    Ok(tree)
}

fn element(e: &BytesStart<'_>) -> ElementData {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let attrs = e
        .attributes()
        .flatten()
        .map(|attr| Attribute {
            name: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            value: entities::decode(&String::from_utf8_lossy(&attr.value)),
        })
        .collect();
    ElementData { name, attrs }
}

fn doctype(raw: &str) -> NodeData {
    let caps = DOCTYPE_RE.captures(raw);
    let group = |i: usize| {
        caps.as_ref()
            .and_then(|c| c.get(i))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    };
    let system_id = match group(3) {
        s if s.is_empty() => group(4),
        s => s,
    };
    NodeData::Doctype {
        name: group(1),
        public_id: group(2),
        system_id,
    }
}

fn append(tree: &mut Tree<NodeData>, parent: NodeId, data: NodeData) -> NodeId {
    if let Some(mut node) = tree.get_mut(parent) {
        return node.append(data).id();
    }
    tree.orphan(data).id()
}

fn flush_text(tree: &mut Tree<NodeData>, parent: NodeId, text: &mut String) {
    if !text.is_empty() {
        append(tree, parent, NodeData::Text(std::mem::take(text)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_all_node_kinds() {
        let doc = parse_document(
            r#"<?xml version="1.0"?><!DOCTYPE note SYSTEM "note.dtd"><?style href="a.css"?><note a="1 &amp; 2"><!--c--><![CDATA[<raw>]]>x &lt; y</note>"#,
            ParseOptions::xml(),
        )
        .unwrap();
        assert_eq!(
            doc.html(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE note SYSTEM \"note.dtd\"><?style href=\"a.css\"?><note a=\"1 &amp; 2\"><!--c--><![CDATA[<raw>]]>x &lt; y</note>"
        );
    }

    #[test]
    fn unknown_entity_is_kept() {
        let doc = parse_document("<a>&custom;</a>", ParseOptions::xml()).unwrap();
        let a = doc.document_element().unwrap();
        assert_eq!(a.text(), "&custom;");
    }

    #[test]
    fn mismatched_tags_fail() {
        let err = parse_document("<a><b></a>", ParseOptions::xml()).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn unclosed_tags_fail() {
        let err = parse_document("<a><b>", ParseOptions::xml()).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn public_doctype_is_split() {
        match doctype(r#" html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "strict.dtd""#) {
            NodeData::Doctype {
                name,
                public_id,
                system_id,
            } => {
                assert_eq!(name, "html");
                assert_eq!(public_id, "-//W3C//DTD XHTML 1.0 Strict//EN");
                assert_eq!(system_id, "strict.dtd");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn fragment_keeps_top_level_text() {
        let tree = parse_fragment("a<b/>c").unwrap();
        let names: Vec<String> = tree.root().children().map(|n| n.value().node_name()).collect();
        assert_eq!(names, vec!["#text", "b", "#text"]);
    }
}
