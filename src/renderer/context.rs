//! Per-pass state handed to every shape renderer.

use glam::{IVec3, Vec3};

use super::color::{Colix, Palette};
use super::rasterizer::Rasterizer;
use crate::camera::TransformSnapshot;
use crate::options::DisplayOptions;
use crate::scene::{Frame, Scene};

/// Clip rectangle of a render pass, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

impl ClipRect {
    /// Rectangle with its top-left corner at `(x, y)`.
    #[must_use]
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whole viewport.
    #[must_use]
    pub fn from_viewport((width, height): (u32, u32)) -> Self {
        Self::new(
            0,
            0,
            i32::try_from(width).unwrap_or(i32::MAX),
            i32::try_from(height).unwrap_or(i32::MAX),
        )
    }

    /// Whether `(x, y)` lies within the rectangle grown by `margin` on
    /// every side.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32, margin: i32) -> bool {
        x >= self.x - margin
            && y >= self.y - margin
            && x < self.x.saturating_add(self.width).saturating_add(margin)
            && y < self.y.saturating_add(self.height).saturating_add(margin)
    }

    /// Whether the rectangle covers no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Everything a renderer may read during one pass, plus the rasterizer it
/// draws into.
///
/// All projection goes through the one snapshot finalized for the pass.
pub struct RenderContext<'a> {
    /// Finalized projection of this pass.
    pub snapshot: &'a TransformSnapshot,
    /// Scene being drawn.
    pub scene: &'a Scene,
    /// Displayed frame, if any frames are loaded.
    pub frame: Option<&'a Frame>,
    /// Pixels the pass may touch.
    pub clip: ClipRect,
    /// Color table.
    pub palette: &'a Palette,
    /// Overlay sizing.
    pub display: &'a DisplayOptions,
    rasterizer: &'a mut (dyn Rasterizer + 'a),
    draw_calls: usize,
}

impl<'a> RenderContext<'a> {
    /// Assemble a context for one pass.
    pub fn new(
        snapshot: &'a TransformSnapshot,
        scene: &'a Scene,
        frame: Option<&'a Frame>,
        clip: ClipRect,
        palette: &'a Palette,
        display: &'a DisplayOptions,
        rasterizer: &'a mut (dyn Rasterizer + 'a),
    ) -> Self {
        Self {
            snapshot,
            scene,
            frame,
            clip,
            palette,
            display,
            rasterizer,
            draw_calls: 0,
        }
    }

    /// Rasterizer for exactly one draw request.
    pub fn draw(&mut self) -> &mut (dyn Rasterizer + 'a) {
        self.draw_calls += 1;
        &mut *self.rasterizer
    }

    /// Draw requests issued so far in this pass.
    #[must_use]
    pub fn draw_calls(&self) -> usize {
        self.draw_calls
    }

    /// Project a world point to integer pixels, or `None` when it falls
    /// outside the slab/depth planes.
    #[must_use]
    pub fn project(&self, world: Vec3) -> Option<IVec3> {
        let s = self.snapshot.transform_point(world);
        if self.snapshot.is_clipped(s.z) {
            return None;
        }
        Some(IVec3::new(
            s.x.round() as i32,
            s.y.round() as i32,
            s.z.round() as i32,
        ))
    }

    /// Whether a projected point with the given pixel extent may touch the
    /// clip rectangle.
    #[must_use]
    pub fn on_screen(&self, p: IVec3, extent: i32) -> bool {
        self.clip.contains(p.x, p.y, extent.max(0))
    }

    /// Pixel diameter of a world diameter centered at depth `z`.
    #[must_use]
    pub fn diameter(&self, z: i32, world_diameter: f32) -> i32 {
        self.snapshot.screen_diameter(z as f32, world_diameter)
    }
}

/// Apply a shape's translucency flag to a color handle.
#[must_use]
pub fn shape_colix(colix: Colix, translucent: bool) -> Colix {
    colix.with_translucency(translucent)
}
