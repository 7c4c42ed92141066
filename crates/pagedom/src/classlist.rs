// ABOUTME: Whitespace-separated class list editing for the class attribute.
// ABOUTME: Edits the raw attribute text in place so untouched separators and duplicates survive.

use std::fmt;

/// Value of a `class` attribute, `None` when the attribute is absent.
///
/// Names are appended as `" name"` and removed together with the one
/// separator next to them, so adding a name and then removing it gives back
/// the exact original text. A value that consisted of nothing but the
/// removed names goes back to being absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    value: Option<String>,
}

impl ClassList {
    pub fn parse(value: &str) -> Self {
        Self::from_attr(Some(value))
    }

    pub fn from_attr(value: Option<&str>) -> Self {
        Self {
            value: value.map(str::to_string),
        }
    }

    /// Add every whitespace separated name not already present.
    pub fn add(&mut self, names: &str) {
        for name in names.split_ascii_whitespace() {
            if self.has(name) {
                continue;
            }
            match &mut self.value {
                Some(value) => {
                    value.push(' ');
                    value.push_str(name);
                }
                None => self.value = Some(name.to_string()),
            }
        }
    }

    /// Remove every occurrence of each name.
    pub fn remove(&mut self, names: &str) {
        for name in names.split_ascii_whitespace() {
            while self.remove_one(name) {}
        }
    }

    /// Flip each name: remove it when present, append it otherwise.
    pub fn toggle(&mut self, names: &str) {
        for name in names.split_ascii_whitespace() {
            if self.has(name) {
                while self.remove_one(name) {}
            } else {
                self.add(name);
            }
        }
    }

    /// True if every name in `names` is present. An empty argument is never
    /// contained.
    pub fn contains(&self, names: &str) -> bool {
        let mut names = names.split_ascii_whitespace().peekable();
        names.peek().is_some() && names.all(|name| self.has(name))
    }

    fn has(&self, name: &str) -> bool {
        self.iter().any(|n| n == name)
    }

    fn remove_one(&mut self, name: &str) -> bool {
        let Some(value) = self.value.as_mut() else {
            return false;
        };
        let Some((start, end)) = token_span(value, name) else {
            return false;
        };
        let bytes = value.as_bytes();
        let span = if start > 0 && bytes[start - 1].is_ascii_whitespace() {
            start - 1..end
        } else if end < bytes.len() && bytes[end].is_ascii_whitespace() {
            start..end + 1
        } else {
            start..end
        };
        let bare = span == (start..end);
        value.replace_range(span, "");
        if bare && value.is_empty() {
            self.value = None;
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.value
            .as_deref()
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    /// Attribute value to store, `None` meaning the attribute should go.
    pub fn to_attr(&self) -> Option<String> {
        self.value.clone()
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value.as_deref().unwrap_or_default())
    }
}

/// Byte range of the first whitespace-delimited token equal to `name`.
fn token_span(value: &str, name: &str) -> Option<(usize, usize)> {
    let mut offset = 0;
    for token in value.split(|c: char| c.is_ascii_whitespace()) {
        if token == name {
            return Some((offset, offset + token.len()));
        }
        offset += token.len() + 1;
    }
    None
}
