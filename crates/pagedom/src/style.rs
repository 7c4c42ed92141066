// ABOUTME: Inline style attribute parsing and serialization as an ordered declaration list.
// ABOUTME: Semicolons inside quotes or parentheses do not end a declaration.

use std::fmt;

/// Ordered `property: value` declarations of a `style` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    decls: Vec<(String, String)>,
}

impl Style {
    pub fn parse(value: &str) -> Self {
        let mut style = Self::default();
        for decl in split_declarations(value) {
            if let Some((key, val)) = decl.split_once(':') {
                style.set(key.trim(), val.trim());
            }
        }
        style
    }

    /// Value of `key`, compared ASCII case-insensitively.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.decls
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Set `key` in place, or append it. An empty value removes the key.
    pub fn set(&mut self, key: &str, value: &str) {
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() {
            return;
        }
        if value.is_empty() {
            self.remove(key);
            return;
        }
        match self.decls.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
            Some((_, v)) => *v = value.to_string(),
            None => self.decls.push((key.to_string(), value.to_string())),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.decls.retain(|(k, _)| !k.eq_ignore_ascii_case(key));
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.decls.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Attribute value to store, `None` meaning the attribute should go.
    pub fn to_attr(&self) -> Option<String> {
        if self.decls.is_empty() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.decls.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}: {};", key, value)?;
        }
        Ok(())
    }
}

fn split_declarations(value: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in value.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                out.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&value[start..]);
    out
}
