//! Scene loading, primitives, and point queries for [`Viewer`].

use std::sync::Arc;

use glam::{IVec3, Vec2, Vec3};

use super::Viewer;
use crate::camera::lock_transform;
use crate::error::ViewerError;
use crate::primitive::{Primitive, PrimitivePick};
use crate::scene::{Frame, Scene};

impl Viewer {
    /// The scene being displayed.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene access. Any borrow marks the scene for repaint.
    pub fn scene_mut(&mut self) -> &mut Scene {
        self.request_repaint();
        &mut self.scene
    }

    /// Replace every frame (model load). Playback stops and the frame range
    /// resets to the new model.
    pub fn load_frames(&mut self, frames: Vec<Frame>) {
        let count = frames.len();
        self.scene.set_frames(frames);
        self.scheduler.set_frame_count(count);
        log::info!("loaded {count} frame(s)");
        self.request_repaint();
    }

    /// Append one frame. Returns its index.
    pub fn push_frame(&mut self, frame: Frame) -> usize {
        let index = self.scene.push_frame(frame);
        self.scheduler.set_frame_count(self.scene.frame_count());
        self.request_repaint();
        index
    }

    /// Add a primitive to the scene. Returns `false` if this exact
    /// primitive is already a member.
    pub fn add_primitive(&mut self, primitive: Arc<Primitive>) -> bool {
        let added = self.scene.primitives().add(primitive);
        if added {
            self.scene.force_dirty();
            self.request_repaint();
        }
        added
    }

    /// Remove a primitive. Returns `false` if it was not a member.
    pub fn remove_primitive(&mut self, primitive: &Arc<Primitive>) -> bool {
        let removed = self.scene.primitives().remove(primitive);
        if removed {
            self.scene.force_dirty();
            self.request_repaint();
        }
        removed
    }

    /// Drop a click marker at a world position.
    pub fn add_click_marker(&mut self, position: Vec3) {
        self.scene.add_click_marker(position);
        self.request_repaint();
    }

    /// Center the camera on the displayed frame plus all primitives and
    /// size the rotation sphere to enclose them. Returns `false` when there
    /// is nothing to fit.
    pub fn fit_to_scene(&mut self) -> bool {
        let frame = self.scheduler.current_frame();
        let bounds = self.scene.bounds(frame);
        if bounds.is_empty() {
            log::debug!("fit to scene skipped: empty scene");
            return false;
        }
        let center = bounds.center();
        let radius = self.scene.rotation_radius(frame, center);
        {
            let mut tm = lock_transform(&self.transform);
            tm.set_rotation_center(center);
            tm.set_rotation_radius(radius);
        }
        log::debug!("fit to scene: center {center}, radius {radius:.2}");
        self.request_repaint();
        true
    }

    /// Nearest primitive face under a screen point, using the projection of
    /// the last render pass.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::TransformNotFinalized`] before the first pass.
    pub fn pick_primitive(
        &self,
        point: Vec2,
        tolerance_px: f32,
    ) -> Result<Option<PrimitivePick>, ViewerError> {
        let tm = lock_transform(&self.transform);
        let snapshot = tm.snapshot()?;
        Ok(self.scene.primitives().pick(snapshot, point, tolerance_px))
    }

    /// Project a world point to integer screen pixels.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::TransformNotFinalized`] before the first pass.
    pub fn project(&self, world: Vec3) -> Result<IVec3, ViewerError> {
        lock_transform(&self.transform).transform_point_px(world)
    }

    /// Map a screen point (with depth) back to world space.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::TransformNotFinalized`] before the first pass.
    pub fn unproject(&self, screen: Vec3) -> Result<Vec3, ViewerError> {
        lock_transform(&self.transform).untransform_point(screen)
    }

    /// Remove every frame, shape, primitive, and marker.
    pub fn clear_scene(&mut self) {
        self.scene.clear();
        self.scheduler.set_frame_count(0);
        self.request_repaint();
    }
}
