//! Error types for template parsing and loading

use std::path::PathBuf;

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::repository::loader::Encoding;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Errors produced while parsing a single template
#[derive(Error, Debug)]
pub enum ParseError {
    /// `{{` with no terminating `}}`
    #[error("Unterminated tag at {span:?}")]
    UnterminatedTag { span: Span },

    /// Tag body that is not a usable key, e.g. `{{}}` or `{{a b}}`.
    /// Unsupported tag types (set-delimiter tags and the like) land here too.
    #[error("Invalid key {key:?} at {span:?}")]
    InvalidKey { key: String, span: Span },

    /// `{{#name}}` or `{{^name}}` with no matching `{{/name}}`
    #[error("Unclosed section {{{{#{name}}}}} opened at {span:?}")]
    UnclosedSection { name: String, span: Span },

    /// `{{/name}}` closing a section other than the innermost open one
    #[error("Expected {{{{/{expected}}}}}, found {{{{/{found}}}}} at {span:?}")]
    MismatchedClose {
        expected: String,
        found: String,
        span: Span,
    },

    /// `{{/name}}` with no open section to close
    #[error("Closing tag {{{{/{name}}}}} at {span:?} has no matching open tag")]
    UnopenedClose { name: String, span: Span },
}

impl ParseError {
    /// Byte range of the offending tag
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnterminatedTag { span }
            | ParseError::InvalidKey { span, .. }
            | ParseError::UnclosedSection { span, .. }
            | ParseError::MismatchedClose { span, .. }
            | ParseError::UnopenedClose { span, .. } => span.clone(),
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = self.span();
        let mut buf = Vec::new();
        Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(self.to_string())
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf)
            .unwrap();
        String::from_utf8(buf).unwrap()
    }
}

/// Errors produced while resolving, loading, or linking templates
#[derive(Error, Debug)]
pub enum LoadError {
    /// Template name is empty, absolute, or escapes the base directory
    #[error("Invalid template name: {name:?}")]
    InvalidName { name: String },

    /// No file exists for the template name
    #[error("Template not found: {name} (looked for {})", path.display())]
    NotFound { name: String, path: PathBuf },

    /// The file exists but could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file's bytes are not valid in the configured encoding
    #[error("{} is not valid {encoding}", path.display())]
    Decoding { path: PathBuf, encoding: Encoding },

    /// The template's text failed to parse
    #[error("Parse error in template {name}: {source}")]
    Parse {
        name: String,
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// A partial includes itself, directly or through other partials
    #[error("Circular partial reference: {}", chain.join(" -> "))]
    Cycle { chain: Vec<String> },
}
