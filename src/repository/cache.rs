//! Parsed template cache

use std::sync::Arc;

use dashmap::DashMap;

use crate::parser::Ast;
use crate::repository::path::TemplateId;

/// Concurrent map from template identity to its parsed form
///
/// Every AST inserted for a given id is semantically identical, so two
/// threads racing to populate the same entry is harmless: the last write
/// wins and readers see one of the equivalent values.
#[derive(Debug, Default)]
pub struct AstCache {
    inner: DashMap<TemplateId, Arc<Ast>>,
}

impl AstCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached AST; no side effects
    pub fn get(&self, id: &TemplateId) -> Option<Arc<Ast>> {
        self.inner.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Store an AST and hand it back for immediate use
    pub fn insert(&self, id: TemplateId, ast: Arc<Ast>) -> Arc<Ast> {
        self.inner.insert(id, Arc::clone(&ast));
        ast
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> TemplateId {
        TemplateId::new("/srv/views", name, "txt").expect("Should build id")
    }

    #[test]
    fn test_get_returns_the_inserted_arc() {
        let cache = AstCache::new();
        let ast = Arc::new(Ast::default());
        cache.insert(id("a"), Arc::clone(&ast));
        let hit = cache.get(&id("a")).expect("Should hit");
        assert!(Arc::ptr_eq(&hit, &ast));
    }

    #[test]
    fn test_get_miss_is_none() {
        let cache = AstCache::new();
        assert!(cache.get(&id("absent")).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_reinsert_overwrites_silently() {
        let cache = AstCache::new();
        cache.insert(id("a"), Arc::new(Ast::default()));
        let second = Arc::new(Ast::default());
        cache.insert(id("a"), Arc::clone(&second));
        assert_eq!(cache.len(), 1);
        let hit = cache.get(&id("a")).expect("Should hit");
        assert!(Arc::ptr_eq(&hit, &second));
    }
}
