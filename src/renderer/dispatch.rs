use rustc_hash::{FxHashMap, FxHashSet};

use super::context::RenderContext;
use super::registry::RendererRegistry;
use super::shapes::ShapeRenderer;
use crate::error::ViewerError;
use crate::scene::{RenderLayer, ShapeKind};

/// Counters for one render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Shapes whose renderer ran.
    pub shapes_rendered: usize,
    /// Populated, visible shapes skipped because no renderer is available.
    pub shapes_skipped: usize,
    /// Draw requests issued to the rasterizer.
    pub draw_calls: usize,
    /// Snapshot generation the pass projected with.
    pub generation: u64,
}

/// Drives one render pass over a scene's populated shape slots.
///
/// Renderers are instantiated on first use and kept for the dispatcher's
/// lifetime. A kind whose factory is missing or fails is logged once and
/// skipped for the rest of the session; other shapes keep rendering.
pub struct RenderDispatcher {
    registry: RendererRegistry,
    cache: FxHashMap<ShapeKind, Box<dyn ShapeRenderer>>,
    failed: FxHashSet<ShapeKind>,
}

impl std::fmt::Debug for RenderDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut cached: Vec<_> = self.cache.keys().copied().collect();
        cached.sort();
        f.debug_struct("RenderDispatcher")
            .field("registry", &self.registry)
            .field("cached", &cached)
            .field("failed", &self.failed)
            .finish()
    }
}

impl Default for RenderDispatcher {
    fn default() -> Self {
        Self::new(RendererRegistry::with_builtin())
    }
}

impl RenderDispatcher {
    /// Dispatcher over `registry`; nothing is instantiated yet.
    #[must_use]
    pub fn new(registry: RendererRegistry) -> Self {
        Self {
            registry,
            cache: FxHashMap::default(),
            failed: FxHashSet::default(),
        }
    }

    /// Render every populated, visible shape of `ctx.scene` layer by
    /// layer, in priority order within each layer.
    pub fn render(&mut self, ctx: &mut RenderContext<'_>) -> RenderStats {
        let mut stats = RenderStats {
            generation: ctx.snapshot.generation(),
            ..RenderStats::default()
        };
        let scene = ctx.scene;
        for layer in RenderLayer::ALL {
            let shapes = scene
                .populated_shapes()
                .filter(|s| s.visible && s.kind().layer() == layer);
            for shape in shapes {
                let kind = shape.kind();
                match self.renderer(kind) {
                    Ok(renderer) => {
                        renderer.render(shape, ctx);
                        stats.shapes_rendered += 1;
                    }
                    Err(_) => stats.shapes_skipped += 1,
                }
            }
        }
        stats.draw_calls = ctx.draw_calls();
        log::trace!(
            "render pass (gen {}): {} shapes, {} skipped, {} draw calls",
            stats.generation,
            stats.shapes_rendered,
            stats.shapes_skipped,
            stats.draw_calls
        );
        stats
    }

    /// Cached renderer for `kind`, instantiating it on first use.
    ///
    /// # Errors
    ///
    /// [`ViewerError::RendererUnavailable`] when no factory is registered or
    /// the kind failed before; [`ViewerError::RendererInit`] when the
    /// factory fails now. Either way the kind is skipped from then on.
    pub fn renderer(
        &mut self,
        kind: ShapeKind,
    ) -> Result<&mut dyn ShapeRenderer, ViewerError> {
        if self.failed.contains(&kind) {
            return Err(ViewerError::RendererUnavailable(kind));
        }
        if !self.cache.contains_key(&kind) {
            let built = match self.registry.factory(kind) {
                None => Err(ViewerError::RendererUnavailable(kind)),
                Some(factory) => factory(kind)
                    .map_err(|reason| ViewerError::RendererInit { kind, reason }),
            };
            match built {
                Ok(renderer) => {
                    log::debug!("instantiated {kind} renderer");
                    let _ = self.cache.insert(kind, renderer);
                }
                Err(e) => {
                    log::error!("{e}; {kind} will not be drawn this session");
                    let _ = self.failed.insert(kind);
                    return Err(e);
                }
            }
        }
        match self.cache.get_mut(&kind) {
            Some(renderer) => Ok(renderer.as_mut()),
            None => Err(ViewerError::RendererUnavailable(kind)),
        }
    }

    /// Whether `kind` has been given up on for this session.
    #[must_use]
    pub fn has_failed(&self, kind: ShapeKind) -> bool {
        self.failed.contains(&kind)
    }

    /// Whether a renderer for `kind` has been instantiated.
    #[must_use]
    pub fn is_cached(&self, kind: ShapeKind) -> bool {
        self.cache.contains_key(&kind)
    }

    /// Drop all cached renderers and forget failures (new session).
    pub fn reset(&mut self) {
        self.cache.clear();
        self.failed.clear();
    }
}
