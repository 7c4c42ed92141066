// ABOUTME: Attribute, class and inline style accessors on selections.
// ABOUTME: Getters read the first node; setters apply to every element of the selection.

use super::Selection;
use crate::classlist::ClassList;
use crate::dom::Node;
use crate::style::Style;

impl Selection {
    /// Attribute of the first node.
    pub fn attr(&self, name: &str) -> Option<String> {
        self.nodes.first().and_then(|n| n.attr(name))
    }

    pub fn set_attr(&self, name: &str, value: &str) -> &Self {
        for node in &self.nodes {
            node.set_attr(name, value);
        }
        self
    }

    pub fn remove_attr(&self, name: &str) -> &Self {
        for node in &self.nodes {
            node.remove_attr(name);
        }
        self
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n.has_attr(name))
    }

    /// True if any node carries every class in `names`.
    pub fn has_class(&self, names: &str) -> bool {
        self.nodes.iter().any(|n| class_list(n).contains(names))
    }

    pub fn add_class(&self, names: &str) -> &Self {
        self.edit_classes(|list| list.add(names))
    }

    pub fn remove_class(&self, names: &str) -> &Self {
        self.edit_classes(|list| list.remove(names))
    }

    pub fn toggle_class(&self, names: &str) -> &Self {
        self.edit_classes(|list| list.toggle(names))
    }

    fn edit_classes(&self, edit: impl Fn(&mut ClassList)) -> &Self {
        for node in self.nodes.iter().filter(|n| n.is_element()) {
            let mut list = class_list(node);
            edit(&mut list);
            match list.to_attr() {
                Some(value) => node.set_attr("class", &value),
                None => node.remove_attr("class"),
            }
        }
        self
    }

    /// Inline style property of the first node.
    pub fn css(&self, key: &str) -> Option<String> {
        self.nodes
            .first()
            .and_then(|n| style_of(n).get(key).map(str::to_string))
    }

    /// Set an inline style property on every element. An empty value
    /// removes the property.
    pub fn set_css(&self, key: &str, value: &str) -> &Self {
        for node in self.nodes.iter().filter(|n| n.is_element()) {
            let mut style = style_of(node);
            style.set(key, value);
            match style.to_attr() {
                Some(attr) => node.set_attr("style", &attr),
                None => node.remove_attr("style"),
            }
        }
        self
    }

    /// Parsed inline style of the first node.
    pub fn styles(&self) -> Style {
        self.nodes.first().map(style_of).unwrap_or_default()
    }
}

fn class_list(node: &Node) -> ClassList {
    ClassList::from_attr(node.attr("class").as_deref())
}

fn style_of(node: &Node) -> Style {
    Style::parse(&node.attr("style").unwrap_or_default())
}
