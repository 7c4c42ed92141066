// ABOUTME: Read-only selection traversal: descendant search, filtering and tree navigation.
// ABOUTME: Results are new selections in document order of discovery, without duplicates.

use super::Selection;
use crate::dom::Node;
use crate::error::Result;

impl Selection {
    /// Descendant elements of every node matching `css`.
    pub fn find(&self, css: &str) -> Result<Selection> {
        let mut found = Vec::new();
        for node in &self.nodes {
            found.extend(node.select_within(css, "find")?);
        }
        Ok(Selection::from_nodes(found))
    }

    /// Nodes of this selection matching `css`.
    pub fn filter(&self, css: &str) -> Result<Selection> {
        let mut kept = Vec::new();
        for node in &self.nodes {
            if node.is(css)? {
                kept.push(node.clone());
            }
        }
        Ok(Selection::from_nodes(kept))
    }

    /// True if any node matches `css`.
    pub fn is(&self, css: &str) -> Result<bool> {
        for node in &self.nodes {
            if node.is(css)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Element children of every node.
    pub fn children(&self) -> Selection {
        self.nodes.iter().flat_map(Node::element_children).collect()
    }

    /// All children, text and comments included.
    pub fn contents(&self) -> Selection {
        self.nodes.iter().flat_map(Node::children).collect()
    }

    /// Parent elements.
    pub fn parent(&self) -> Selection {
        self.nodes.iter().filter_map(Node::parent_element).collect()
    }

    /// For each node, the node itself or its nearest ancestor matching `css`.
    pub fn closest(&self, css: &str) -> Result<Selection> {
        let mut found = Vec::new();
        for node in &self.nodes {
            let mut current = Some(node.clone());
            while let Some(candidate) = current {
                if candidate.is(css)? {
                    found.push(candidate);
                    break;
                }
                current = candidate.parent_element();
            }
        }
        Ok(Selection::from_nodes(found))
    }

    /// Following element siblings.
    pub fn next(&self) -> Selection {
        self.nodes
            .iter()
            .filter_map(Node::next_element_sibling)
            .collect()
    }

    /// Preceding element siblings.
    pub fn prev(&self) -> Selection {
        self.nodes
            .iter()
            .filter_map(Node::prev_element_sibling)
            .collect()
    }

    /// Element siblings of every node, the nodes themselves excluded.
    pub fn siblings(&self) -> Selection {
        let mut found = Vec::new();
        for node in &self.nodes {
            if let Some(parent) = node.parent() {
                found.extend(
                    parent
                        .element_children()
                        .into_iter()
                        .filter(|c| c != node),
                );
            }
        }
        Selection::from_nodes(found)
    }

    pub fn first(&self) -> Selection {
        self.eq(0)
    }

    pub fn last(&self) -> Selection {
        match self.nodes.len() {
            0 => Selection::new(),
            n => self.eq(n - 1),
        }
    }

    /// The node at `index`, as a selection. Out of range gives an empty
    /// selection.
    pub fn eq(&self, index: usize) -> Selection {
        self.nodes
            .get(index)
            .cloned()
            .map(Selection::from)
            .unwrap_or_default()
    }

    /// Union with `other`, this selection's nodes first.
    pub fn add(&self, other: &Selection) -> Selection {
        self.nodes.iter().chain(other.nodes.iter()).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::Document;
    use pretty_assertions::assert_eq;

    fn doc() -> Document {
        Document::parse_html(
            r#"<ul id="l"><li class="a">1</li><li>2<b>x</b></li><li class="a">3</li></ul><p>p</p>"#,
        )
    }

    #[test]
    fn find_and_filter() {
        let doc = doc();
        let ul = doc.select("ul").unwrap();
        assert_eq!(ul.find("li").unwrap().len(), 3);
        assert_eq!(ul.find("li").unwrap().filter(".a").unwrap().text(), "13");
        assert!(ul.find("li").unwrap().is("li:has-nothing").is_err());
        assert!(ul.is("#l").unwrap());
    }

    #[test]
    fn navigation() {
        let doc = doc();
        let lis = doc.select("li").unwrap();
        assert_eq!(lis.first().text(), "1");
        assert_eq!(lis.last().text(), "3");
        assert_eq!(lis.eq(1).next().text(), "3");
        assert_eq!(lis.eq(1).prev().text(), "1");
        assert_eq!(lis.eq(1).siblings().text(), "13");
        assert_eq!(lis.parent().len(), 1);
        assert_eq!(lis.eq(1).children().text(), "x");
        assert_eq!(lis.eq(1).contents().len(), 2);
        assert!(lis.eq(9).is_empty());
    }

    #[test]
    fn closest_includes_self() {
        let doc = doc();
        let b = doc.select("b").unwrap();
        assert_eq!(b.closest("b").unwrap().len(), 1);
        assert_eq!(b.closest("ul").unwrap().get(0).unwrap().attr("id").as_deref(), Some("l"));
        assert!(b.closest("table").unwrap().is_empty());
    }

    #[test]
    fn add_is_an_ordered_union() {
        let doc = doc();
        let p = doc.select("p").unwrap();
        let lis = doc.select("li").unwrap();
        let all = p.add(&lis).add(&p);
        assert_eq!(all.len(), 4);
        assert_eq!(all.text(), "p12x3");
    }
}
