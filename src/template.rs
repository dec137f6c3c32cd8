//! Renderable template handle

use std::sync::Arc;

use crate::parser::Ast;
use crate::renderer::{engine, Value};
use crate::repository::TemplateRepository;

/// A named template ready to render
///
/// Pairs the fully linked AST with the repository it came from and that
/// repository's base context. Clones share the AST and the repository.
#[derive(Debug, Clone)]
pub struct Template {
    repository: Arc<TemplateRepository>,
    ast: Arc<Ast>,
    base: Value,
}

impl Template {
    pub(crate) fn new(repository: Arc<TemplateRepository>, ast: Arc<Ast>, base: Value) -> Self {
        Self {
            repository,
            ast,
            base,
        }
    }

    /// Produce output text for one context
    ///
    /// Keys the context does not bind fall back to the repository's base
    /// context before rendering as nothing.
    pub fn render(&self, context: &Value) -> String {
        engine::render_with_base(&self.ast, &self.base, context)
    }

    pub fn ast(&self) -> &Arc<Ast> {
        &self.ast
    }

    pub fn repository(&self) -> &Arc<TemplateRepository> {
        &self.repository
    }

    pub fn base_context(&self) -> &Value {
        &self.base
    }
}
