// ABOUTME: Configuration options for pagedom documents including DocumentKind, ParseOptions and DocumentBuilder.
// ABOUTME: DocumentBuilder provides a fluent API for parsing or creating Documents with custom settings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dom::Document;
use crate::error::Result;
use crate::parse;
use crate::selection::Selection;

/// Markup flavour of a document. Decides which parser and serializer rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    #[default]
    Html,
    Xml,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocumentKind::Html => "html",
            DocumentKind::Xml => "xml",
        };
        write!(f, "{}", s)
    }
}

impl From<&str> for DocumentKind {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "xml" | "xhtml" | "svg" => DocumentKind::Xml,
            _ => DocumentKind::Html,
        }
    }
}

/// Per-document configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub kind: DocumentKind,
    /// When false, whitespace-only text nodes are dropped when the document
    /// is parsed and from content imported into it, except inside `pre`,
    /// `textarea`, `script` and `style`.
    pub preserve_whitespace: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            kind: DocumentKind::Html,
            preserve_whitespace: true,
        }
    }
}

impl ParseOptions {
    pub fn html() -> Self {
        Self::default()
    }

    pub fn xml() -> Self {
        Self {
            kind: DocumentKind::Xml,
            ..Self::default()
        }
    }
}

/// Builder for constructing Documents with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    opts: ParseOptions,
}

impl DocumentBuilder {
    /// Create a new DocumentBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: ParseOptions::default(),
        }
    }

    /// Set the document kind.
    pub fn kind(mut self, kind: DocumentKind) -> Self {
        self.opts.kind = kind;
        self
    }

    /// Keep or drop whitespace-only text in parsed and imported content.
    pub fn preserve_whitespace(mut self, preserve: bool) -> Self {
        self.opts.preserve_whitespace = preserve;
        self
    }

    /// Replace all options at once.
    pub fn options(mut self, opts: ParseOptions) -> Self {
        self.opts = opts;
        self
    }

    /// Build an empty document.
    pub fn build(self) -> Document {
        Document::empty(self.opts)
    }

    /// Parse a complete document from markup.
    pub fn parse(self, markup: &str) -> Result<Document> {
        parse::document(markup, self.opts)
    }

    /// Parse a complete document from raw bytes, decoding with `charset`
    /// when given or with a sniffed/detected encoding otherwise.
    pub fn parse_bytes(self, bytes: &[u8], charset: Option<&str>) -> Result<Document> {
        let markup = parse::charset::decode_markup(bytes, charset);
        parse::document(&markup, self.opts)
    }

    /// Parse a fragment into a fresh document and select its top-level nodes.
    pub fn fragment(self, markup: &str) -> Result<Selection> {
        parse::fragment(markup, self.opts)
    }
}
