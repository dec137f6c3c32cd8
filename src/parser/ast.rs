//! Abstract Syntax Tree types for parsed templates

use std::sync::Arc;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Key referencing a value in the rendering context
/// Examples: "name", "user.address.city", "." (the item under iteration)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    /// Path segments (identifiers separated by dots); empty for `.`
    pub segments: Vec<String>,
}

impl Key {
    /// Parse a trimmed tag body into a key
    ///
    /// Returns None for anything that is not a dot-separated identifier
    /// path, which covers malformed keys (`{{a b}}`, `{{.x}}`) as well as
    /// tag types this syntax does not support (`{{=<% %>=}}`).
    pub fn parse(raw: &str) -> Option<Self> {
        if raw == "." {
            return Some(Self { segments: vec![] });
        }
        if raw.is_empty() {
            return None;
        }
        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        for segment in &segments {
            if segment.is_empty() {
                return None;
            }
            if !segment
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
            {
                return None;
            }
        }
        Some(Self { segments })
    }

    /// True for `{{.}}`, which names the item under iteration itself
    pub fn is_implicit(&self) -> bool {
        self.segments.is_empty()
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_implicit() {
            write!(f, ".")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// Root AST node - one fully parsed template
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ast {
    pub nodes: Vec<Node>,
}

/// One piece of a template
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal text between tags
    Text { text: String, span: Span },
    /// Interpolation: `{{key}}`, or `{{&key}}` / `{{{key}}}` when `raw`
    Variable { key: Key, raw: bool, span: Span },
    /// Section: `{{#key}}...{{/key}}`, or `{{^key}}...{{/key}}` when `inverted`
    Section {
        key: Key,
        inverted: bool,
        children: Vec<Node>,
        span: Span,
    },
    /// Partial inclusion: `{{>name}}`
    ///
    /// `ast` is None only between parsing and partial resolution; every
    /// AST handed out by a repository has it populated.
    Partial {
        name: String,
        ast: Option<Arc<Ast>>,
        span: Span,
    },
}
