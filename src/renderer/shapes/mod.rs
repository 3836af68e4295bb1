//! Built-in shape renderers, one per [`ShapeKind`].

mod balls;
mod cartoon;
mod labels;
mod overlays;
mod primitives;
mod sticks;

pub use balls::BallsRenderer;
pub use cartoon::CartoonRenderer;
pub use labels::LabelsRenderer;
pub use overlays::{ClickMarkersRenderer, HalosRenderer};
pub use primitives::PrimitivesRenderer;
pub use sticks::SticksRenderer;

use super::context::RenderContext;
use crate::scene::{Shape, ShapeKind};

/// Trait shared by all shape renderers.
///
/// A renderer is instantiated once per kind and reused for every pass of
/// the viewer's lifetime. It may keep scratch buffers between passes but
/// never state belonging to a particular shape instance; everything it
/// draws comes from `shape` and `ctx`.
pub trait ShapeRenderer: Send {
    /// Kind this renderer draws.
    fn kind(&self) -> ShapeKind;

    /// Issue the draw requests for one populated, visible shape.
    fn render(&mut self, shape: &Shape, ctx: &mut RenderContext<'_>);
}

/// Build the built-in renderer for `kind`.
///
/// # Errors
///
/// Infallible today; the signature matches [`RendererFactory`](super::RendererFactory).
pub fn builtin(kind: ShapeKind) -> Result<Box<dyn ShapeRenderer>, String> {
    Ok(match kind {
        ShapeKind::Balls => Box::new(BallsRenderer::default()),
        ShapeKind::Sticks => Box::new(SticksRenderer::default()),
        ShapeKind::Cartoon => Box::new(CartoonRenderer::default()),
        ShapeKind::Primitives => Box::new(PrimitivesRenderer::default()),
        ShapeKind::Halos => Box::new(HalosRenderer),
        ShapeKind::ClickMarkers => Box::new(ClickMarkersRenderer),
        ShapeKind::Labels => Box::new(LabelsRenderer),
    })
}
