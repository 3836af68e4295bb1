use rustc_hash::FxHashMap;

use super::shapes::{self, ShapeRenderer};
use crate::scene::ShapeKind;

/// Builds the renderer for a shape kind, or explains why it cannot.
pub type RendererFactory =
    fn(ShapeKind) -> Result<Box<dyn ShapeRenderer>, String>;

/// Explicit shape-kind to renderer-factory table.
#[derive(Debug, Clone, Default)]
pub struct RendererRegistry {
    factories: FxHashMap<ShapeKind, RendererFactory>,
}

impl RendererRegistry {
    /// Registry with no factories.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with the built-in renderer registered for every kind.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        for kind in ShapeKind::ALL {
            let _ = registry.register(kind, shapes::builtin);
        }
        registry
    }

    /// Register (or replace) the factory for `kind`. Returns the previous
    /// factory, if any.
    pub fn register(
        &mut self,
        kind: ShapeKind,
        factory: RendererFactory,
    ) -> Option<RendererFactory> {
        self.factories.insert(kind, factory)
    }

    /// Remove the factory for `kind`.
    pub fn unregister(&mut self, kind: ShapeKind) -> Option<RendererFactory> {
        self.factories.remove(&kind)
    }

    /// Factory registered for `kind`.
    #[must_use]
    pub fn factory(&self, kind: ShapeKind) -> Option<RendererFactory> {
        self.factories.get(&kind).copied()
    }

    /// Number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether no kind is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
