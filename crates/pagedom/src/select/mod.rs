// ABOUTME: CSS selector support for arena nodes, backed by the selectors crate.
// ABOUTME: Parses with scraper's selector dialect and matches through an Element adapter.

//! CSS selectors over the pagedom arena.
//!
//! Selectors are parsed with the same dialect scraper uses (everything the
//! `selectors` crate understands apart from non-tree-structural
//! pseudo-classes such as `:hover`), so `:nth-child()`, `:not()`, `:is()`,
//! `:has()`, attribute operators and all combinators are available.
//!
//! Tag and attribute names compare ASCII case-insensitively in HTML
//! documents and exactly in XML documents.

pub mod compiled;
mod element;

use std::fmt;
use std::str::FromStr;

use cssparser::{ParserInput, ToCss};
use ego_tree::NodeRef;
use scraper::error::SelectorErrorKind;
use scraper::selector::{Parser as Dialect, Simple};
use selectors::matching::{
    self, MatchingContext, MatchingForInvalidation, MatchingMode, NeedsSelectorFlags, QuirksMode,
    SelectorCaches,
};
use selectors::parser::{ParseRelative, SelectorList};
use thiserror::Error;

use crate::dom::NodeData;
use element::ArenaElement;

/// A selector string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at column {column}")]
pub struct SelectorParseError {
    pub column: u32,
    pub message: String,
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    list: SelectorList<Simple>,
}

impl Selector {
    pub fn parse(css: &str) -> Result<Self, SelectorParseError> {
        let mut input = ParserInput::new(css);
        let mut parser = cssparser::Parser::new(&mut input);
        SelectorList::parse(&Dialect, &mut parser, ParseRelative::No)
            .map(|list| Self { list })
            .map_err(|err| SelectorParseError {
                column: err.location.column,
                message: SelectorErrorKind::from(err).to_string(),
            })
    }

    /// True if `node` is an element matched by any selector in the list.
    pub(crate) fn matches(&self, node: NodeRef<'_, NodeData>, html: bool) -> bool {
        let Some(element) = ArenaElement::wrap(node, html) else {
            return false;
        };
        let mut caches = SelectorCaches::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut caches,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            MatchingForInvalidation::No,
        );
        matching::matches_selector_list(&self.list, &element, &mut context)
    }
}

impl FromStr for Selector {
    type Err = SelectorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.list.to_css(f)
    }
}
