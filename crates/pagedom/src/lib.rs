// ABOUTME: Main library entry point for pagedom, a fluent HTML/XML tree manipulation API.
// ABOUTME: Re-exports the public API: Document, Node, Selection, Content, HtmlPage, DomError, ErrorCode, options.

//! pagedom - jQuery-style manipulation of in-memory HTML and XML trees.
//!
//! Documents are parsed with `scraper` (HTML) or `quick-xml` (XML) into an
//! arena owned by a [`Document`]. A [`Selection`] applies insertion,
//! wrapping, attribute and traversal operations to many nodes at once.
//! Content inserted at several places is cloned for every destination after
//! the first, and content from another document is imported first.
//!
//! # Example
//!
//! ```
//! use pagedom::{Document, DomError};
//!
//! fn main() -> Result<(), DomError> {
//!     let doc = Document::parse_html(r#"<ul><li>a</li><li>b</li></ul>"#);
//!     let items = doc.select("li")?;
//!     items.add_class("item").append("<em>!</em>")?;
//!     assert_eq!(
//!         doc.select("ul")?.html().unwrap(),
//!         r#"<li class="item">a<em>!</em></li><li class="item">b<em>!</em></li>"#
//!     );
//!     Ok(())
//! }
//! ```

pub mod classlist;
pub mod dom;
pub mod error;
pub mod options;
pub mod page;
pub mod parse;
pub mod select;
pub mod selection;
pub mod style;

pub use crate::classlist::ClassList;
pub use crate::dom::{adopt, Attribute, Document, ElementData, Node, NodeData};
pub use crate::error::{DomError, ErrorCode, Result};
pub use crate::options::{DocumentBuilder, DocumentKind, ParseOptions};
pub use crate::page::{trim_newlines, HtmlPage};
pub use crate::select::{Selector, SelectorParseError};
pub use crate::selection::{Content, Selection};
pub use crate::style::Style;
