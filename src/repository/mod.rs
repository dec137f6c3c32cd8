//! Directory-backed template repository
//!
//! A repository resolves template names against one base directory, parses
//! the files it finds there, and caches the parsed form so each template is
//! read and parsed at most once per repository lifetime.

pub mod cache;
pub mod loader;
pub mod path;
mod resolver;

pub use cache::AstCache;
pub use loader::{Encoding, UnknownEncoding};
pub use path::TemplateId;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::LoadError;
use crate::parser::Ast;
use crate::renderer::Value;
use crate::template::Template;
use resolver::Resolver;

/// Loads, parses, and caches the templates under one directory
///
/// Configuration is fixed at construction. The repository is `Send + Sync`;
/// wrap it in an `Arc` and share it freely, templates keep a handle back to
/// it. Two repositories never share cached ASTs, even over the same
/// directory.
#[derive(Debug)]
pub struct TemplateRepository {
    directory: PathBuf,
    extension: String,
    encoding: Encoding,
    base: Value,
    cache: AstCache,
}

impl TemplateRepository {
    /// Create a repository over `directory` whose files carry `extension`
    ///
    /// An empty extension matches files with none. Partial names resolve
    /// against `directory` no matter how deep the including template sits.
    pub fn new(
        directory: impl Into<PathBuf>,
        extension: impl Into<String>,
        encoding: Encoding,
    ) -> Self {
        Self {
            directory: directory.into(),
            extension: extension.into(),
            encoding,
            base: Value::Null,
            cache: AstCache::new(),
        }
    }

    /// Provide fallback bindings consulted when a rendering context has no
    /// value for a key
    pub fn with_base_context(mut self, base: Value) -> Self {
        self.base = base;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn base_context(&self) -> &Value {
        &self.base
    }

    pub(crate) fn cache(&self) -> &AstCache {
        &self.cache
    }

    /// Fetch the parsed form of a named template, loading it on first use
    ///
    /// Every partial the template references, transitively, is resolved
    /// through this same repository before the AST is returned. Repeated
    /// calls for the same name return the identical `Arc`.
    pub fn template_ast(&self, name: &str) -> Result<Arc<Ast>, LoadError> {
        Resolver::new(self).resolve(name)
    }

    /// Fetch a renderable handle to a named template
    pub fn template(self: &Arc<Self>, name: &str) -> Result<Template, LoadError> {
        let ast = self.template_ast(name)?;
        Ok(Template::new(Arc::clone(self), ast, self.base.clone()))
    }
}
