use glam::{IVec3, Mat4, Vec2, Vec3};

/// Perspective divisor floor, in pixels of depth. Points at or behind the
/// eye are projected as if they sat this close.
const MIN_PERSPECTIVE_Z: f32 = 1.0;

/// Immutable projection parameters captured by
/// [`TransformManager::finalize_transform_parameters`](super::TransformManager::finalize_transform_parameters).
///
/// Every projection in a render pass goes through one snapshot, so camera
/// edits made on other threads mid-pass cannot shift already-drawn geometry.
///
/// Screen convention: x to the right, y downward, z grows away from the
/// viewer (pixels of depth measured from the eye).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSnapshot {
    /// World → unperspective screen (rotation, scale, translation).
    pub(crate) matrix: Mat4,
    /// Inverse of `matrix`.
    pub(crate) inverse: Mat4,
    /// Pixel position of the rotation center on screen.
    pub(crate) screen_center: Vec2,
    /// Eye-to-center distance in pixels.
    pub(crate) camera_distance_px: f32,
    /// Pixels per world unit at the center plane.
    pub(crate) scale: f32,
    /// Whether perspective foreshortening applies.
    pub(crate) perspective: bool,
    /// Front clip plane z.
    pub(crate) slab: f32,
    /// Back clip plane z.
    pub(crate) depth: f32,
    /// Whether the clip planes are active.
    pub(crate) slab_enabled: bool,
    /// Viewport size in pixels.
    pub(crate) viewport: (u32, u32),
    /// Finalize counter this snapshot was produced by.
    pub(crate) generation: u64,
}

impl TransformSnapshot {
    /// Project a world point to sub-pixel screen coordinates.
    #[must_use]
    pub fn transform_point(&self, world: Vec3) -> Vec3 {
        let v = self.matrix.transform_point3(world);
        let factor = self.perspective_factor(v.z);
        Vec3::new(
            self.screen_center.x + (v.x - self.screen_center.x) * factor,
            self.screen_center.y + (v.y - self.screen_center.y) * factor,
            v.z,
        )
    }

    /// Project a world point and round to integer pixels.
    #[must_use]
    pub fn transform_point_px(&self, world: Vec3) -> IVec3 {
        let s = self.transform_point(world);
        IVec3::new(s.x.round() as i32, s.y.round() as i32, s.z.round() as i32)
    }

    /// Map sub-pixel screen coordinates back to world space.
    #[must_use]
    pub fn untransform_point(&self, screen: Vec3) -> Vec3 {
        let factor = self.perspective_factor(screen.z);
        let v = Vec3::new(
            self.screen_center.x + (screen.x - self.screen_center.x) / factor,
            self.screen_center.y + (screen.y - self.screen_center.y) / factor,
            screen.z,
        );
        self.inverse.transform_point3(v)
    }

    /// Screen size in pixels of a world length centered at depth `z`.
    #[must_use]
    pub fn scale_to_screen(&self, z: f32, world_length: f32) -> f32 {
        world_length * self.scale * self.perspective_factor(z)
    }

    /// Integer pixel diameter for a world diameter at depth `z` (min 1).
    #[must_use]
    pub fn screen_diameter(&self, z: f32, world_diameter: f32) -> i32 {
        (self.scale_to_screen(z, world_diameter).round() as i32).max(1)
    }

    /// Whether depth `z` falls outside the slab/depth planes.
    #[must_use]
    pub fn is_clipped(&self, z: f32) -> bool {
        self.slab_enabled && (z < self.slab || z > self.depth)
    }

    /// Front clip plane z (pixels from the eye).
    #[must_use]
    pub fn slab_value(&self) -> f32 {
        self.slab
    }

    /// Back clip plane z (pixels from the eye).
    #[must_use]
    pub fn depth_value(&self) -> f32 {
        self.depth
    }

    /// Pixels per world unit at the rotation-center plane.
    #[must_use]
    pub fn scale_pixels_per_unit(&self) -> f32 {
        self.scale
    }

    /// Eye-to-center distance in pixels.
    #[must_use]
    pub fn camera_distance_px(&self) -> f32 {
        self.camera_distance_px
    }

    /// Viewport `(width, height)` in pixels.
    #[must_use]
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Finalize counter that produced this snapshot.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn perspective_factor(&self, z: f32) -> f32 {
        if self.perspective {
            self.camera_distance_px / z.max(MIN_PERSPECTIVE_Z)
        } else {
            1.0
        }
    }
}
