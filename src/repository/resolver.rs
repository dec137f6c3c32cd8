//! Template resolution - turns names into fully linked ASTs

use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::LoadError;
use crate::parser::{self, Ast, Node};
use crate::repository::{loader, path::TemplateId, TemplateRepository};

/// One resolution pass rooted at a single repository lookup
///
/// `chain` lists the templates currently being resolved, outermost first.
/// A name reappearing on the chain means the partial graph has a cycle;
/// resolution stops there instead of recursing forever.
pub(crate) struct Resolver<'repo> {
    repository: &'repo TemplateRepository,
    chain: Vec<String>,
}

impl<'repo> Resolver<'repo> {
    pub(crate) fn new(repository: &'repo TemplateRepository) -> Self {
        Self {
            repository,
            chain: Vec::new(),
        }
    }

    /// Resolve a name to its AST, loading and parsing on cache miss
    pub(crate) fn resolve(&mut self, name: &str) -> Result<Arc<Ast>, LoadError> {
        let id = TemplateId::new(
            self.repository.directory(),
            name,
            self.repository.extension(),
        )?;

        if let Some(ast) = self.repository.cache().get(&id) {
            trace!(template = name, "cache hit");
            return Ok(ast);
        }

        if self.chain.iter().any(|active| active == name) {
            let mut chain = self.chain.clone();
            chain.push(name.to_string());
            return Err(LoadError::Cycle { chain });
        }

        debug!(template = name, "cache miss, parsing");
        let source = loader::load(&id, self.repository.encoding())?;
        let mut ast = parser::parse(&source).map_err(|err| LoadError::Parse {
            name: name.to_string(),
            path: id.path(),
            source: err,
        })?;

        self.chain.push(name.to_string());
        self.link_partials(&mut ast.nodes)?;
        self.chain.pop();

        Ok(self.repository.cache().insert(id, Arc::new(ast)))
    }

    /// Give every partial placeholder its own resolved AST
    ///
    /// Runs before the owning AST is cached, so a cached AST is always
    /// complete and rendering never goes back to disk.
    fn link_partials(&mut self, nodes: &mut [Node]) -> Result<(), LoadError> {
        for node in nodes {
            match node {
                Node::Partial { name, ast, .. } => {
                    *ast = Some(self.resolve(name)?);
                }
                Node::Section { children, .. } => self.link_partials(children)?,
                Node::Text { .. } | Node::Variable { .. } => {}
            }
        }
        Ok(())
    }
}
