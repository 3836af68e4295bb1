use glam::{IVec3, Mat3, Mat4, Quat, Vec2, Vec3};

use super::snapshot::TransformSnapshot;
use crate::error::ViewerError;
use crate::options::{CameraOptions, DisplayOptions};

/// Default viewport edge when no size has been reported yet.
const DEFAULT_VIEWPORT: u32 = 500;
/// Smallest rotation radius accepted (world units).
const MIN_ROTATION_RADIUS: f32 = 0.1;

/// Complete camera state, copied out for comparison and interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// World → camera rotation.
    pub rotation: Quat,
    /// Fixed rotation center (orbit mode).
    pub rotation_center: Vec3,
    /// Radius of the sphere the view is sized to.
    pub rotation_radius: f32,
    /// Zoom percent (100 = rotation sphere fits the viewport).
    pub zoom_percent: f32,
    /// Screen translation of the center, percent of viewport width/height
    /// (0 = centered).
    pub translate_percent: Vec2,
    /// Navigation-mode eye position.
    pub camera_position: Vec3,
    /// Whether navigation mode is active.
    pub navigation_mode: bool,
    /// Whether perspective foreshortening is applied.
    pub perspective_depth: bool,
}

/// World ↔ screen coordinate engine with camera navigation.
///
/// Camera edits mutate live state; projections only use the snapshot taken
/// by the last [`finalize_transform_parameters`](Self::finalize_transform_parameters)
/// call, which the render pass runs exactly once before drawing.
#[derive(Debug, Clone)]
pub struct TransformManager {
    options: CameraOptions,
    width: u32,
    height: u32,
    state: CameraState,
    camera_depth: f32,
    slab_enabled: bool,
    slab_percent: f32,
    depth_percent: f32,
    snapshot: Option<TransformSnapshot>,
    generation: u64,
}

impl Default for TransformManager {
    fn default() -> Self {
        Self::new(&CameraOptions::default(), &DisplayOptions::default())
    }
}

impl TransformManager {
    /// Engine with default orientation around the origin.
    #[must_use]
    pub fn new(options: &CameraOptions, display: &DisplayOptions) -> Self {
        Self {
            options: options.clone(),
            width: DEFAULT_VIEWPORT,
            height: DEFAULT_VIEWPORT,
            state: CameraState {
                rotation: Quat::IDENTITY,
                rotation_center: Vec3::ZERO,
                rotation_radius: 10.0,
                zoom_percent: options.default_zoom_percent,
                translate_percent: Vec2::ZERO,
                camera_position: Vec3::ZERO,
                navigation_mode: false,
                perspective_depth: options.perspective_depth,
            },
            camera_depth: options.camera_depth,
            slab_enabled: display.slab_enabled,
            slab_percent: display.slab_percent,
            depth_percent: display.depth_percent,
            snapshot: None,
            generation: 0,
        }
    }

    // -- Per-pass finalization --

    /// Recompute the transform matrix and slab/depth planes from the live
    /// state and lock them in for the current render pass.
    pub fn finalize_transform_parameters(&mut self) -> TransformSnapshot {
        self.generation += 1;
        let s = &self.state;
        let width = self.width.max(1) as f32;
        let height = self.height.max(1) as f32;

        let camera_distance = self.camera_distance();
        let scale = self.scale_pixels_per_unit();
        let camera_distance_px = camera_distance * scale;
        let screen_center = Vec2::new(
            width * (0.5 + s.translate_percent.x / 100.0),
            height * (0.5 + s.translate_percent.y / 100.0),
        );

        let matrix = Mat4::from_translation(Vec3::new(
            screen_center.x,
            screen_center.y,
            camera_distance_px,
        )) * Mat4::from_scale(Vec3::new(scale, -scale, scale))
            * Mat4::from_quat(s.rotation)
            * Mat4::from_translation(-self.view_center());

        let radius_px = s.rotation_radius * scale;
        let z_from_percent =
            |percent: f32| camera_distance_px + radius_px * (1.0 - percent / 50.0);

        let snapshot = TransformSnapshot {
            matrix,
            inverse: matrix.inverse(),
            screen_center,
            camera_distance_px,
            scale,
            perspective: s.perspective_depth,
            slab: z_from_percent(self.slab_percent),
            depth: z_from_percent(self.depth_percent),
            slab_enabled: self.slab_enabled,
            viewport: (self.width, self.height),
            generation: self.generation,
        };
        self.snapshot = Some(snapshot);
        log::trace!(
            "transform finalized (gen {}): scale {scale:.3} px/unit, camera {camera_distance_px:.1} px",
            self.generation
        );
        snapshot
    }

    /// Snapshot from the last finalize.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::TransformNotFinalized`] before the first
    /// finalize.
    pub fn snapshot(&self) -> Result<&TransformSnapshot, ViewerError> {
        self.snapshot
            .as_ref()
            .ok_or(ViewerError::TransformNotFinalized)
    }

    /// Whether a snapshot exists.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.snapshot.is_some()
    }

    // -- Projection (finalized snapshot only) --

    /// Project a world point to sub-pixel screen coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::TransformNotFinalized`] before the first
    /// finalize.
    pub fn transform_point(&self, world: Vec3) -> Result<Vec3, ViewerError> {
        Ok(self.snapshot()?.transform_point(world))
    }

    /// Project a world point to integer pixels.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::TransformNotFinalized`] before the first
    /// finalize.
    pub fn transform_point_px(&self, world: Vec3) -> Result<IVec3, ViewerError> {
        Ok(self.snapshot()?.transform_point_px(world))
    }

    /// Map sub-pixel screen coordinates back to world space.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::TransformNotFinalized`] before the first
    /// finalize.
    pub fn untransform_point(&self, screen: Vec3) -> Result<Vec3, ViewerError> {
        Ok(self.snapshot()?.untransform_point(screen))
    }

    // -- Rotation --

    /// Orbit by screen-space degrees: `dx` turns about the vertical screen
    /// axis, `dy` about the horizontal one.
    ///
    /// In navigation mode the turn is scaled down and the eye stays put
    /// (a head turn rather than a world spin).
    pub fn rotate_xy_by(&mut self, dx_degrees: f32, dy_degrees: f32) {
        let scale = if self.state.navigation_mode {
            self.options.navigation_rotation_scale
        } else {
            1.0
        };
        let turn = Quat::from_rotation_x(-(dy_degrees * scale).to_radians())
            * Quat::from_rotation_y(-(dx_degrees * scale).to_radians());
        self.state.rotation = (turn * self.state.rotation).normalize();
    }

    /// Rotate about the screen z axis (clockwise on screen for positive
    /// degrees).
    pub fn rotate_z_by(&mut self, degrees: f32) {
        let turn = Quat::from_rotation_z(-degrees.to_radians());
        self.state.rotation = (turn * self.state.rotation).normalize();
    }

    /// Rotate about a world-space axis.
    pub fn rotate_axis_angle_by(&mut self, axis: Vec3, degrees: f32) {
        let Some(axis) = axis.try_normalize() else {
            return;
        };
        let turn = Quat::from_axis_angle(axis, degrees.to_radians());
        self.state.rotation = (self.state.rotation * turn).normalize();
    }

    /// Replace the rotation with a rotation matrix.
    pub fn set_rotation(&mut self, matrix: Mat3) {
        self.state.rotation = Quat::from_mat3(&matrix).normalize();
    }

    /// Replace the rotation with an axis-angle rotation.
    pub fn set_rotation_axis_angle(&mut self, axis: Vec3, degrees: f32) {
        let axis = axis.try_normalize().unwrap_or(Vec3::Z);
        self.state.rotation = Quat::from_axis_angle(axis, degrees.to_radians());
    }

    /// Replace the rotation quaternion.
    pub fn set_rotation_quat(&mut self, rotation: Quat) {
        self.state.rotation = rotation;
    }

    /// Current rotation.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.state.rotation
    }

    /// Current rotation as a matrix.
    #[must_use]
    pub fn rotation_matrix(&self) -> Mat3 {
        Mat3::from_quat(self.state.rotation)
    }

    /// Current rotation as `(unit axis, degrees)`.
    #[must_use]
    pub fn rotation_axis_angle(&self) -> (Vec3, f32) {
        let (axis, angle) = self.state.rotation.to_axis_angle();
        (axis, angle.to_degrees())
    }

    // -- Zoom --

    /// Zoom by a wheel/drag delta in pixels.
    ///
    /// The delta is clamped to the configured per-event maximum. Outside
    /// navigation mode zoom changes by `zoom_step_factor` per pixel, so the
    /// change is proportional to the current zoom and `+k` then `-k`
    /// restores it. In navigation mode the eye moves forward/back instead.
    pub fn zoom_by(&mut self, pixels: i32) {
        let max = self.options.max_zoom_step_pixels.abs();
        let pixels = pixels.clamp(-max, max);
        if pixels == 0 {
            return;
        }
        if self.state.navigation_mode {
            let step = pixels as f32
                * self.options.navigation_step_fraction
                * self.state.rotation_radius;
            self.state.camera_position += self.forward() * step;
            return;
        }
        let factor = self.options.zoom_step_factor.powi(pixels);
        self.state.zoom_percent = self.clamp_zoom(self.state.zoom_percent * factor);
    }

    /// Set the zoom percent (clamped to the configured range).
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidOption`] for non-finite or non-positive
    /// values; the current zoom is kept.
    pub fn zoom_to_percent(&mut self, percent: f32) -> Result<(), ViewerError> {
        if !(percent.is_finite() && percent > 0.0) {
            return Err(ViewerError::invalid_option(
                "zoom",
                format!("{percent} is not a positive percent"),
            ));
        }
        self.state.zoom_percent = self.clamp_zoom(percent);
        Ok(())
    }

    /// Current zoom percent.
    #[must_use]
    pub fn zoom_percent(&self) -> f32 {
        self.state.zoom_percent
    }

    fn clamp_zoom(&self, percent: f32) -> f32 {
        percent.clamp(self.options.min_zoom_percent, self.options.max_zoom_percent)
    }

    // -- Pan --

    /// Shift the view by a pixel delta.
    pub fn translate_xy_by(&mut self, dx_px: f32, dy_px: f32) {
        self.state.translate_percent += Vec2::new(
            dx_px / self.width.max(1) as f32 * 100.0,
            dy_px / self.height.max(1) as f32 * 100.0,
        );
    }

    /// Place the rotation center at a screen offset, in percent of the
    /// viewport (0 = centered).
    pub fn translate_to_percent(&mut self, x_percent: f32, y_percent: f32) {
        self.state.translate_percent = Vec2::new(x_percent, y_percent);
    }

    /// Current screen translation in percent.
    #[must_use]
    pub fn translate_percent(&self) -> Vec2 {
        self.state.translate_percent
    }

    // -- Center, radius, viewport --

    /// Set the fixed rotation center.
    pub fn set_rotation_center(&mut self, center: Vec3) {
        self.state.rotation_center = center;
    }

    /// Fixed rotation center.
    #[must_use]
    pub fn rotation_center(&self) -> Vec3 {
        self.state.rotation_center
    }

    /// Set the rotation radius used to size the view.
    pub fn set_rotation_radius(&mut self, radius: f32) {
        if radius.is_finite() {
            self.state.rotation_radius = radius.max(MIN_ROTATION_RADIUS);
        }
    }

    /// Rotation radius.
    #[must_use]
    pub fn rotation_radius(&self) -> f32 {
        self.state.rotation_radius
    }

    /// Update the viewport size.
    pub fn set_screen_size(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    /// Viewport `(width, height)`.
    #[must_use]
    pub fn screen_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    // -- Perspective and clipping --

    /// Toggle perspective foreshortening.
    pub fn set_perspective_depth(&mut self, enabled: bool) {
        self.state.perspective_depth = enabled;
    }

    /// Whether perspective foreshortening is on.
    #[must_use]
    pub fn perspective_depth(&self) -> bool {
        self.state.perspective_depth
    }

    /// Set camera distance in rotation-sphere diameters.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidOption`] for non-positive depths.
    pub fn set_camera_depth(&mut self, depth: f32) -> Result<(), ViewerError> {
        if !(depth.is_finite() && depth > 0.0) {
            return Err(ViewerError::invalid_option(
                "camera.camera_depth",
                format!("{depth} must be positive"),
            ));
        }
        self.camera_depth = depth;
        Ok(())
    }

    /// Camera distance in rotation-sphere diameters.
    #[must_use]
    pub fn camera_depth(&self) -> f32 {
        self.camera_depth
    }

    /// Enable or disable slab/depth clipping.
    pub fn set_slab_enabled(&mut self, enabled: bool) {
        self.slab_enabled = enabled;
    }

    /// Front clip plane in percent of the rotation sphere (100 = front).
    pub fn set_slab_percent(&mut self, percent: f32) {
        self.slab_percent = percent.clamp(0.0, 100.0);
    }

    /// Back clip plane in percent of the rotation sphere (0 = back).
    pub fn set_depth_percent(&mut self, percent: f32) {
        self.depth_percent = percent.clamp(0.0, 100.0);
    }

    /// `(slab_percent, depth_percent)`.
    #[must_use]
    pub fn slab_depth_percent(&self) -> (f32, f32) {
        (self.slab_percent, self.depth_percent)
    }

    // -- Navigation --

    /// Enter or leave navigation (fly) mode.
    ///
    /// Entering places the navigation eye where the orbit eye currently is,
    /// so the view does not jump. Leaving moves the rotation center to the
    /// point the eye was looking at.
    pub fn set_navigation_mode(&mut self, enabled: bool) {
        if enabled == self.state.navigation_mode {
            return;
        }
        if enabled {
            self.state.camera_position = self.orbit_eye();
        } else {
            self.state.rotation_center = self.navigation_center();
        }
        self.state.navigation_mode = enabled;
    }

    /// Whether navigation mode is on.
    #[must_use]
    pub fn navigation_mode(&self) -> bool {
        self.state.navigation_mode
    }

    /// Navigation-mode eye position.
    #[must_use]
    pub fn camera_position(&self) -> Vec3 {
        self.state.camera_position
    }

    /// Set the navigation-mode eye position.
    pub fn set_camera_position(&mut self, position: Vec3) {
        self.state.camera_position = position;
    }

    /// Eye position for the current mode.
    #[must_use]
    pub fn eye_position(&self) -> Vec3 {
        if self.state.navigation_mode {
            self.state.camera_position
        } else {
            self.orbit_eye()
        }
    }

    /// World-space viewing direction (into the screen).
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.state.rotation.inverse() * Vec3::Z
    }

    /// Point the navigation eye is looking at, one camera distance ahead.
    #[must_use]
    pub fn navigation_center(&self) -> Vec3 {
        self.state.camera_position + self.forward() * self.camera_distance()
    }

    // -- Whole-state access --

    /// Copy of the live camera state.
    #[must_use]
    pub fn state(&self) -> CameraState {
        self.state
    }

    /// Camera options in effect.
    #[must_use]
    pub fn options(&self) -> &CameraOptions {
        &self.options
    }

    /// Swap in new camera and clipping options. Orientation, pan, and the
    /// rotation sphere are kept; zoom is re-clamped to the new limits.
    pub fn apply_options(
        &mut self,
        options: &CameraOptions,
        display: &DisplayOptions,
    ) {
        self.options = options.clone();
        self.camera_depth = options.camera_depth;
        self.state.perspective_depth = options.perspective_depth;
        self.state.zoom_percent = self.clamp_zoom(self.state.zoom_percent);
        self.slab_enabled = display.slab_enabled;
        self.set_slab_percent(display.slab_percent);
        self.set_depth_percent(display.depth_percent);
    }

    /// Camera distance from the view center in world units.
    #[must_use]
    pub fn camera_distance(&self) -> f32 {
        self.camera_depth * 2.0 * self.state.rotation_radius
    }

    /// Pixels per world unit at the center plane for the live state.
    #[must_use]
    pub fn scale_pixels_per_unit(&self) -> f32 {
        let pixels = self.width.min(self.height).max(1) as f32;
        let mut scale = pixels / 2.0 / self.state.rotation_radius;
        // Shrink so the near side of the rotation sphere still fits.
        if self.state.perspective_depth && self.camera_depth > 0.5 {
            scale *= (self.camera_depth - 0.5) / self.camera_depth;
        }
        scale * self.state.zoom_percent / 100.0
    }

    fn view_center(&self) -> Vec3 {
        if self.state.navigation_mode {
            self.navigation_center()
        } else {
            self.state.rotation_center
        }
    }

    fn orbit_eye(&self) -> Vec3 {
        self.state.rotation_center - self.forward() * self.camera_distance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(a: Vec3, b: Vec3, tol: f32) {
        assert!((a - b).length() <= tol, "{a:?} vs {b:?} (tol {tol})");
    }

    fn sample_points() -> Vec<Vec3> {
        vec![
            Vec3::ZERO,
            Vec3::new(5.0, -3.0, 2.0),
            Vec3::new(-8.0, 7.5, -6.0),
            Vec3::new(9.9, 0.1, 4.4),
            Vec3::new(-2.5, -9.0, 8.0),
        ]
    }

    fn tilted() -> TransformManager {
        let mut tm = TransformManager::default();
        tm.set_screen_size(640, 480);
        tm.set_rotation_center(Vec3::new(1.0, 2.0, 3.0));
        tm.set_rotation_axis_angle(Vec3::new(1.0, 1.0, 0.3), 37.0);
        tm.zoom_to_percent(180.0).unwrap();
        tm.translate_to_percent(10.0, -5.0);
        tm
    }

    #[test]
    fn projection_before_finalize_fails_fast() {
        let tm = TransformManager::default();
        assert!(matches!(
            tm.transform_point(Vec3::ZERO),
            Err(ViewerError::TransformNotFinalized)
        ));
        assert!(matches!(
            tm.untransform_point(Vec3::ZERO),
            Err(ViewerError::TransformNotFinalized)
        ));
    }

    #[test]
    fn round_trip_perspective() {
        let mut tm = tilted();
        tm.set_perspective_depth(true);
        let _ = tm.finalize_transform_parameters();
        for p in sample_points() {
            let screen = tm.transform_point(p).unwrap();
            let back = tm.untransform_point(screen).unwrap();
            assert_vec_close(back, p, 1e-3);
        }
    }

    #[test]
    fn round_trip_orthographic() {
        let mut tm = tilted();
        tm.set_perspective_depth(false);
        let _ = tm.finalize_transform_parameters();
        for p in sample_points() {
            let screen = tm.transform_point(p).unwrap();
            let back = tm.untransform_point(screen).unwrap();
            assert_vec_close(back, p, 1e-3);
        }
    }

    #[test]
    fn round_trip_navigation_mode() {
        let mut tm = tilted();
        tm.set_navigation_mode(true);
        tm.zoom_by(5);
        let _ = tm.finalize_transform_parameters();
        for p in sample_points() {
            let screen = tm.transform_point(p).unwrap();
            let back = tm.untransform_point(screen).unwrap();
            assert_vec_close(back, p, 1e-3);
        }
    }

    #[test]
    fn center_projects_to_viewport_middle() {
        let mut tm = TransformManager::default();
        tm.set_screen_size(400, 300);
        tm.set_rotation_center(Vec3::new(3.0, 3.0, 3.0));
        let snap = tm.finalize_transform_parameters();
        let s = snap.transform_point_px(Vec3::new(3.0, 3.0, 3.0));
        assert_eq!((s.x, s.y), (200, 150));
        assert_eq!(s.z, snap.camera_distance_px().round() as i32);
    }

    #[test]
    fn screen_y_grows_downward() {
        let mut tm = TransformManager::default();
        let _ = tm.finalize_transform_parameters();
        let up = tm.transform_point(Vec3::Y).unwrap();
        let center = tm.transform_point(Vec3::ZERO).unwrap();
        assert!(up.y < center.y);
    }

    #[test]
    fn perspective_enlarges_near_points() {
        let mut tm = TransformManager::default();
        let snap = tm.finalize_transform_parameters();
        let near = snap.transform_point(Vec3::new(0.0, 0.0, -5.0));
        let far = snap.transform_point(Vec3::new(0.0, 0.0, 5.0));
        assert!(near.z < far.z);
        assert!(snap.scale_to_screen(near.z, 1.0) > snap.scale_to_screen(far.z, 1.0));
    }

    #[test]
    fn snapshot_is_unaffected_by_later_edits() {
        let mut tm = TransformManager::default();
        let snap = tm.finalize_transform_parameters();
        let before = tm.transform_point(Vec3::X).unwrap();
        tm.set_rotation_center(Vec3::new(50.0, 0.0, 0.0));
        tm.zoom_by(20);
        assert_eq!(tm.transform_point(Vec3::X).unwrap(), before);
        assert_eq!(tm.snapshot().unwrap().generation(), snap.generation());
        let next = tm.finalize_transform_parameters();
        assert_eq!(next.generation(), snap.generation() + 1);
        assert_ne!(tm.transform_point(Vec3::X).unwrap(), before);
    }

    #[test]
    fn zoom_by_is_symmetric() {
        for k in -20..=20 {
            let mut tm = TransformManager::default();
            tm.zoom_to_percent(250.0).unwrap();
            tm.zoom_by(k);
            tm.zoom_by(-k);
            assert!(
                (tm.zoom_percent() - 250.0).abs() < 1e-2,
                "k={k}: {}",
                tm.zoom_percent()
            );
        }
    }

    #[test]
    fn zoom_delta_is_clamped_per_event() {
        let mut a = TransformManager::default();
        let mut b = TransformManager::default();
        a.zoom_by(20);
        b.zoom_by(500);
        assert_eq!(a.zoom_percent(), b.zoom_percent());
        assert!(a.zoom_percent() > 100.0);
    }

    #[test]
    fn zoom_respects_limits() {
        let mut tm = TransformManager::default();
        for _ in 0..200 {
            tm.zoom_by(-20);
        }
        assert_eq!(tm.zoom_percent(), tm.options().min_zoom_percent);
        assert!(tm.zoom_to_percent(-1.0).is_err());
        assert!(tm.zoom_to_percent(f32::NAN).is_err());
        assert_eq!(tm.zoom_percent(), tm.options().min_zoom_percent);
    }

    #[test]
    fn navigation_zoom_moves_camera_not_zoom() {
        let mut tm = TransformManager::default();
        tm.set_navigation_mode(true);
        let eye = tm.camera_position();
        tm.zoom_by(10);
        assert_eq!(tm.zoom_percent(), 100.0);
        let moved = tm.camera_position() - eye;
        assert!(moved.dot(tm.forward()) > 0.0);
        tm.zoom_by(-10);
        assert_vec_close(tm.camera_position(), eye, 1e-4);
    }

    #[test]
    fn navigation_rotation_is_scaled_down() {
        let mut orbit = TransformManager::default();
        let mut nav = TransformManager::default();
        nav.set_navigation_mode(true);
        orbit.rotate_xy_by(10.0, 0.0);
        nav.rotate_xy_by(10.0, 0.0);
        let (_, orbit_deg) = orbit.rotation_axis_angle();
        let (_, nav_deg) = nav.rotation_axis_angle();
        assert!((orbit_deg - 10.0).abs() < 1e-3);
        assert!((nav_deg - 1.0).abs() < 1e-3);
    }

    #[test]
    fn navigation_rotation_keeps_eye_fixed() {
        let mut tm = TransformManager::default();
        tm.set_navigation_mode(true);
        let eye = tm.camera_position();
        tm.rotate_xy_by(40.0, -25.0);
        assert_eq!(tm.camera_position(), eye);
    }

    #[test]
    fn entering_navigation_mode_does_not_jump() {
        let mut tm = tilted();
        let before = tm.finalize_transform_parameters();
        tm.set_navigation_mode(true);
        let after = tm.finalize_transform_parameters();
        for p in sample_points() {
            assert_vec_close(before.transform_point(p), after.transform_point(p), 1e-2);
        }
    }

    #[test]
    fn rotate_then_unrotate_restores_orientation() {
        let mut tm = TransformManager::default();
        tm.rotate_xy_by(30.0, 0.0);
        tm.rotate_xy_by(-30.0, 0.0);
        assert!(tm.rotation().abs_diff_eq(Quat::IDENTITY, 1e-5));
    }

    #[test]
    fn slab_clips_front_half() {
        let mut tm = TransformManager::default();
        tm.set_slab_enabled(true);
        tm.set_slab_percent(50.0);
        let snap = tm.finalize_transform_parameters();
        let near = snap.transform_point(Vec3::new(0.0, 0.0, -5.0));
        let far = snap.transform_point(Vec3::new(0.0, 0.0, 5.0));
        assert!(snap.is_clipped(near.z));
        assert!(!snap.is_clipped(far.z));
    }

    #[test]
    fn pan_moves_center_on_screen() {
        let mut tm = TransformManager::default();
        tm.translate_xy_by(50.0, -25.0);
        let snap = tm.finalize_transform_parameters();
        let c = snap.transform_point(Vec3::ZERO);
        assert!((c.x - 300.0).abs() < 1e-3);
        assert!((c.y - 225.0).abs() < 1e-3);
    }

    #[test]
    fn set_rotation_matrix_round_trips() {
        let mut tm = TransformManager::default();
        let m = Mat3::from_axis_angle(Vec3::new(0.0, 0.6, 0.8), 1.1);
        tm.set_rotation(m);
        assert!(tm.rotation_matrix().abs_diff_eq(m, 1e-5));
    }
}
