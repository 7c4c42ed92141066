// ABOUTME: Adapter exposing arena elements to the selectors crate matching engine.
// ABOUTME: Mirrors scraper's ElementRef impl, with tag names folded only in HTML documents.

use ego_tree::NodeRef;
use scraper::selector::{CssLocalName, CssString, NonTSPseudoClass, PseudoElement, Simple};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::bloom::BloomFilter;
use selectors::matching::{ElementSelectorFlags, MatchingContext};
use selectors::{Element, OpaqueElement, SelectorImpl};

use crate::dom::{ElementData, NodeData};

type Namespace = <Simple as SelectorImpl>::NamespaceUrl;

/// An element node plus the document kind it lives in.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ArenaElement<'a> {
    node: NodeRef<'a, NodeData>,
    data: &'a ElementData,
    html: bool,
}

impl<'a> ArenaElement<'a> {
    /// `None` unless `node` is an element.
    pub(crate) fn wrap(node: NodeRef<'a, NodeData>, html: bool) -> Option<Self> {
        node.value()
            .as_element()
            .map(|data| Self { node, data, html })
    }

    fn attr(&self, name: &str) -> Option<&'a str> {
        self.data.attr(name)
    }
}

/// Never matches non-tree-structural pseudo-classes; the selector dialect has none.
impl Element for ArenaElement<'_> {
    type Impl = Simple;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.node.value())
    }

    fn parent_element(&self) -> Option<Self> {
        self.node.parent().and_then(|p| Self::wrap(p, self.html))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.node
            .prev_siblings()
            .find_map(|s| Self::wrap(s, self.html))
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.node
            .next_siblings()
            .find_map(|s| Self::wrap(s, self.html))
    }

    fn first_element_child(&self) -> Option<Self> {
        self.node.children().find_map(|c| Self::wrap(c, self.html))
    }

    // Selectors lower-case their tag and attribute names for HTML elements,
    // which matches how the HTML parser stores them.
    fn is_html_element_in_html_document(&self) -> bool {
        self.html
    }

    fn has_local_name(&self, name: &CssLocalName) -> bool {
        self.data.name == *name.0
    }

    fn has_namespace(&self, ns: &Namespace) -> bool {
        ns.is_empty()
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.data.name == other.data.name
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&Namespace>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        if let NamespaceConstraint::Specific(url) = ns {
            if !url.is_empty() {
                return false;
            }
        }
        self.data
            .attrs
            .iter()
            .any(|a| a.name == *local_name.0 && operation.eval_str(&a.value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        _pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        false
    }

    fn match_pseudo_element(
        &self,
        _pe: &PseudoElement,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        false
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        false
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.attr("id")
            .is_some_and(|v| case_sensitivity.eq(id.0.as_bytes(), v.as_bytes()))
    }

    fn has_class(&self, name: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.attr("class").is_some_and(|classes| {
            classes
                .split_ascii_whitespace()
                .any(|c| case_sensitivity.eq(name.0.as_bytes(), c.as_bytes()))
        })
    }

    fn has_custom_state(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn imported_part(&self, _name: &CssLocalName) -> Option<CssLocalName> {
        None
    }

    fn is_part(&self, _name: &CssLocalName) -> bool {
        false
    }

    /// Comments and empty text do not count as content.
    fn is_empty(&self) -> bool {
        !self.node.children().any(|c| match c.value() {
            NodeData::Element(_) => true,
            NodeData::Text(t) | NodeData::CData(t) => !t.is_empty(),
            _ => false,
        })
    }

    fn is_root(&self) -> bool {
        self.node
            .parent()
            .is_some_and(|p| matches!(p.value(), NodeData::Document))
    }

    fn add_element_unique_hashes(&self, _filter: &mut BloomFilter) -> bool {
        false
    }
}
