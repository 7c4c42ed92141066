// ABOUTME: Error types for pagedom including the ErrorCode enum and the DomError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing the categories of DOM manipulation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NoParent,
    NoDocument,
    Hierarchy,
    Parse,
    Selector,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::NoParent => "no parent element",
            ErrorCode::NoDocument => "document not obtainable",
            ErrorCode::Hierarchy => "hierarchy request error",
            ErrorCode::Parse => "parse error",
            ErrorCode::Selector => "invalid selector",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for pagedom operations.
///
/// `op` names the fluent operation that failed (`"after"`, `"unwrap_inner"`,
/// ...). `source` carries extra detail where there is any.
#[derive(Debug, thiserror::Error)]
pub struct DomError {
    pub code: ErrorCode,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pagedom: {}: {}", self.op, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl DomError {
    fn new(code: ErrorCode, op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self {
            code,
            op: op.into(),
            source,
        }
    }

    /// Create a NoParent error.
    pub fn no_parent(op: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoParent, op, None)
    }

    /// Create a NoDocument error.
    pub fn no_document(op: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoDocument, op, None)
    }

    /// Create a Hierarchy error with a short explanation.
    pub fn hierarchy(op: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::Hierarchy,
            op,
            Some(anyhow::anyhow!(detail.into())),
        )
    }

    /// Create a Parse error.
    pub fn parse(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::new(ErrorCode::Parse, op, source)
    }

    /// Create a Selector error for the given selector text.
    pub fn selector(op: impl Into<String>, css: &str) -> Self {
        Self::new(
            ErrorCode::Selector,
            op,
            Some(anyhow::anyhow!("cannot parse selector {:?}", css)),
        )
    }

    /// Returns true if this is a NoParent error.
    pub fn is_no_parent(&self) -> bool {
        self.code == ErrorCode::NoParent
    }

    /// Returns true if this is a NoDocument error.
    pub fn is_no_document(&self) -> bool {
        self.code == ErrorCode::NoDocument
    }

    /// Returns true if this is a Hierarchy error.
    pub fn is_hierarchy(&self) -> bool {
        self.code == ErrorCode::Hierarchy
    }

    /// Returns true if this is a Parse error.
    pub fn is_parse(&self) -> bool {
        self.code == ErrorCode::Parse
    }

    /// Returns true if this is a Selector error.
    pub fn is_selector(&self) -> bool {
        self.code == ErrorCode::Selector
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, DomError>;
