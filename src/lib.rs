//! whisker - a directory-backed Mustache template repository
//!
//! Templates live as files under one directory. Loading a template parses
//! it once into an AST, resolves every `{{>partial}}` it references against
//! sibling files, and caches the parsed form so later loads are lookups.
//!
//! # Example
//!
//! ```no_run
//! use whisker::{load_template, Encoding, Value};
//!
//! let template = load_template("views/greeting.mustache", Encoding::Utf8)?;
//! let context: Value = toml::from_str(r#"name = "World""#)?;
//! print!("{}", template.render(&context));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Parsing and rendering also work without a repository:
//!
//! ```rust
//! use whisker::{parse, render, Value};
//!
//! let ast = parse("Hello {{name}}!").unwrap();
//! let context: Value = toml::from_str(r#"name = "World""#).unwrap();
//! assert_eq!(render(&ast, &context), "Hello World!");
//! ```

pub mod error;
pub mod parser;
pub mod renderer;
pub mod repository;
pub mod template;

use std::path::Path;
use std::sync::Arc;

pub use error::{LoadError, ParseError};
pub use parser::{parse, Ast, Key, Node};
pub use renderer::{render, ContextError, Value};
pub use repository::{Encoding, TemplateId, TemplateRepository, UnknownEncoding};
pub use template::Template;

/// Load the template at `path`, deriving a repository from its location
///
/// The file's directory becomes the repository root (partials resolve
/// against it), its stem the template name, and its extension the
/// repository's extension. The repository outlives this call inside the
/// returned template, so partials and repeated renders keep working.
pub fn load_template(path: impl AsRef<Path>, encoding: Encoding) -> Result<Template, LoadError> {
    let path = path.as_ref();
    let directory = path.parent().unwrap_or_else(|| Path::new(""));
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| LoadError::InvalidName {
            name: path.display().to_string(),
        })?;
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
    let repository = Arc::new(TemplateRepository::new(directory, extension, encoding));
    repository.template(name)
}
