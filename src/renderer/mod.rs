//! Shape rendering for molecular scenes.
//!
//! A render pass walks the scene's populated shape slots in priority order
//! (opaque geometry, then screened overlays, then text) and hands each one
//! to the renderer registered for its kind. Renderers project through the
//! pass's finalized [`TransformSnapshot`](crate::camera::TransformSnapshot)
//! and issue abstract draw requests to a [`Rasterizer`].

mod color;
mod context;
mod dispatch;
mod rasterizer;
mod registry;
pub mod shapes;

pub use color::{Colix, Palette};
pub use context::{shape_colix, ClipRect, RenderContext};
pub use dispatch::{RenderDispatcher, RenderStats};
pub use rasterizer::{DrawCall, Rasterizer, RecordingRasterizer};
pub use registry::{RendererFactory, RendererRegistry};
pub use shapes::ShapeRenderer;
