// ABOUTME: HTML front end: parses with scraper and converts its tree into the pagedom arena.
// ABOUTME: Also loads body fragments by wrapping them in a synthetic document.

use ego_tree::{NodeId, NodeMut, NodeRef, Tree};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

use crate::dom::{Attribute, Document, ElementData, NodeData};
use crate::options::ParseOptions;

const FRAGMENT_PREFIX: &str =
    r#"<!DOCTYPE html><html><head><meta charset="utf-8"></head><body>"#;
const FRAGMENT_SUFFIX: &str = "</body></html>";

/// Elements a fragment starting with the given table part is nested in, so
/// the parser does not drop the part for appearing outside a table.
const TABLE_CONTEXTS: &[(&str, &[&str])] = &[
    ("caption", &["table"]),
    ("colgroup", &["table"]),
    ("thead", &["table"]),
    ("tbody", &["table"]),
    ("tfoot", &["table"]),
    ("col", &["table", "colgroup"]),
    ("tr", &["table", "tbody"]),
    ("td", &["table", "tbody", "tr"]),
    ("th", &["table", "tbody", "tr"]),
];

static LEADING_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*<([a-zA-Z][a-zA-Z0-9]*)").unwrap());

/// Parse a full HTML document.
pub(crate) fn parse_document(markup: &str, opts: ParseOptions) -> Document {
    let html = Html::parse_document(markup);
    Document::from_tree(convert(&html), opts)
}

/// Parse `markup` as the content of a `<body>` and return a tree whose root
/// children are the parsed body children. Markup starting with a table part
/// such as `<tr>` is parsed inside the matching table context instead.
pub(crate) fn parse_body_fragment(markup: &str) -> Tree<NodeData> {
    let context = table_context(markup);
    let open: String = context.iter().map(|t| format!("<{}>", t)).collect();
    let close: String = context.iter().rev().map(|t| format!("</{}>", t)).collect();
    let wrapped = format!(
        "{}{}{}{}{}",
        FRAGMENT_PREFIX, open, markup, close, FRAGMENT_SUFFIX
    );
    let tree = convert(&Html::parse_document(&wrapped));

    let body = tree
        .root()
        .descendants()
        .find(|n| is_named(*n, "body"))
        .map(|n| n.id());
    let container = body.map(|id| descend(&tree, id, context));

    match container {
        Some(id) => super::relocate_children(&tree, id),
        None => Tree::new(NodeData::Document),
    }
}

fn table_context(markup: &str) -> &'static [&'static str] {
    let Some(caps) = LEADING_TAG_RE.captures(markup) else {
        return &[];
    };
    let tag = caps[1].to_ascii_lowercase();
    TABLE_CONTEXTS
        .iter()
        .find(|(leading, _)| *leading == tag)
        .map(|(_, path)| *path)
        .unwrap_or(&[])
}

/// Follow `path` down from `from` through first matching child elements,
/// stopping early where the parser did not build one.
fn descend(tree: &Tree<NodeData>, from: NodeId, path: &[&str]) -> NodeId {
    let mut current = from;
    for name in path {
        let next = tree
            .get(current)
            .and_then(|n| n.children().find(|c| is_named(*c, name)))
            .map(|c| c.id());
        match next {
            Some(id) => current = id,
            None => break,
        }
    }
    current
}

fn is_named(node: NodeRef<'_, NodeData>, name: &str) -> bool {
    node.value().as_element().is_some_and(|el| el.name == name)
}

fn convert(html: &Html) -> Tree<NodeData> {
    let mut tree = Tree::new(NodeData::Document);
    {
        let mut root = tree.root_mut();
        copy_children(html.tree.root(), &mut root);
    }
    tree
}

fn copy_children(src: ego_tree::NodeRef<'_, scraper::Node>, dest: &mut NodeMut<'_, NodeData>) {
    for child in src.children() {
        if let Some(data) = convert_node(child.value()) {
            let mut node = dest.append(data);
            copy_children(child, &mut node);
        }
    }
}

fn convert_node(node: &scraper::Node) -> Option<NodeData> {
    match node {
        scraper::Node::Doctype(doctype) => Some(NodeData::Doctype {
            name: doctype.name().to_string(),
            public_id: doctype.public_id().to_string(),
            system_id: doctype.system_id().to_string(),
        }),
        scraper::Node::Comment(comment) => Some(NodeData::Comment(String::from(&**comment))),
        scraper::Node::Text(text) => Some(NodeData::Text(String::from(&**text))),
        scraper::Node::Element(el) => Some(NodeData::Element(ElementData {
            name: el.name().to_string(),
            attrs: el
                .attrs()
                .map(|(name, value)| Attribute {
                    name: name.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        })),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_all_node_kinds() {
        let doc = parse_document(
            "<!DOCTYPE html><html><body><!--note--><p class=\"a\" id=\"b\">x &amp; y</p></body></html>",
            ParseOptions::html(),
        );
        assert_eq!(
            doc.html(),
            "<!DOCTYPE html><html><head></head><body><!--note--><p class=\"a\" id=\"b\">x &amp; y</p></body></html>"
        );
    }

    #[test]
    fn body_fragment_drops_wrapper() {
        let tree = parse_body_fragment("<p>one</p> <em>two</em>");
        let names: Vec<String> = tree.root().children().map(|n| n.value().node_name()).collect();
        assert_eq!(names, vec!["p", "#text", "em"]);
    }

    #[test]
    fn table_parts_parse_in_table_context() {
        let rows = parse_body_fragment("<tr><td>x</td></tr><tr><td>y</td></tr>");
        let names: Vec<String> = rows.root().children().map(|n| n.value().node_name()).collect();
        assert_eq!(names, vec!["tr", "tr"]);

        let cells = parse_body_fragment(" <TD>a</TD><th>b</th>");
        let names: Vec<String> = cells.root().children().map(|n| n.value().node_name()).collect();
        assert_eq!(names, vec!["#text", "td", "th"]);

        let head = parse_body_fragment("<thead><tr><th>h</th></tr></thead>");
        let names: Vec<String> = head.root().children().map(|n| n.value().node_name()).collect();
        assert_eq!(names, vec!["thead"]);
    }

    #[test]
    fn body_fragment_keeps_head_level_tags_in_place() {
        let tree = parse_body_fragment(r#"<meta name="x" content="y"><p>a</p>"#);
        let names: Vec<String> = tree.root().children().map(|n| n.value().node_name()).collect();
        assert_eq!(names, vec!["meta", "p"]);
    }
}
