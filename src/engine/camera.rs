//! Camera methods for [`Viewer`].
//!
//! Each setter edits the live transform under its lock and asks the host
//! for a repaint; the change becomes visible at the next pass's
//! finalization. Programmatic moves run on a `camera-move` thread.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use glam::{Mat3, Vec3};

use super::{CameraMoveThread, Viewer};
use crate::camera::{
    lock_transform, CameraMove, CameraState, CameraTarget, MoveOutcome,
};
use crate::error::ViewerError;
use crate::util::cancel::CancelToken;

impl Viewer {
    /// Zoom by a scroll amount in pixels (positive zooms in).
    pub fn zoom_by(&mut self, pixels: i32) {
        lock_transform(&self.transform).zoom_by(pixels);
        self.request_repaint();
    }

    /// Set the zoom percent.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidOption`] for non-positive values.
    pub fn zoom_to_percent(&mut self, percent: f32) -> Result<(), ViewerError> {
        lock_transform(&self.transform).zoom_to_percent(percent)?;
        self.request_repaint();
        Ok(())
    }

    /// Replace the rotation with a matrix.
    pub fn set_rotation(&mut self, matrix: Mat3) {
        lock_transform(&self.transform).set_rotation(matrix);
        self.request_repaint();
    }

    /// Replace the rotation with `degrees` about `axis`.
    pub fn set_rotation_axis_angle(&mut self, axis: Vec3, degrees: f32) {
        lock_transform(&self.transform).set_rotation_axis_angle(axis, degrees);
        self.request_repaint();
    }

    /// Rotate about the screen axes (mouse drag).
    pub fn rotate_xy_by(&mut self, dx_degrees: f32, dy_degrees: f32) {
        lock_transform(&self.transform).rotate_xy_by(dx_degrees, dy_degrees);
        self.request_repaint();
    }

    /// Rotate about the viewing axis.
    pub fn rotate_z_by(&mut self, degrees: f32) {
        lock_transform(&self.transform).rotate_z_by(degrees);
        self.request_repaint();
    }

    /// Pan by a pixel delta.
    pub fn translate_xy_by(&mut self, dx_px: f32, dy_px: f32) {
        lock_transform(&self.transform).translate_xy_by(dx_px, dy_px);
        self.request_repaint();
    }

    /// Enter or leave navigation (fly-through) mode.
    pub fn set_navigation_mode(&mut self, enabled: bool) {
        lock_transform(&self.transform).set_navigation_mode(enabled);
        self.request_repaint();
    }

    /// Resize the viewport.
    pub fn set_screen_size(&mut self, width: u32, height: u32) {
        lock_transform(&self.transform).set_screen_size(width, height);
        self.request_repaint();
    }

    /// Copy of the live camera state.
    #[must_use]
    pub fn camera_state(&self) -> CameraState {
        lock_transform(&self.transform).state()
    }

    /// Animate the camera to `target` over `duration_secs`.
    ///
    /// A move already in flight is cancelled first. A non-positive
    /// duration applies the target immediately on the calling thread.
    /// Otherwise a `camera-move` thread steps the transform, waiting for
    /// each repaint before taking the next step; the final step applies
    /// the target exactly.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::ThreadSpawn`] if the thread cannot be
    /// created; the camera is left where the cancelled move stopped.
    pub fn move_to(
        &mut self,
        target: CameraTarget,
        duration_secs: f32,
    ) -> Result<(), ViewerError> {
        let _ = self.cancel_camera_move();
        let steps_per_second = self.options.camera.move_steps_per_second;
        let mut planned = {
            let tm = lock_transform(&self.transform);
            CameraMove::new(&tm, target, duration_secs, steps_per_second)
        };
        if planned.total_steps() == 0 {
            planned.apply_exact(&mut lock_transform(&self.transform));
            self.request_repaint();
            return Ok(());
        }

        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();
        let transform = Arc::clone(&self.transform);
        let repaint = Arc::clone(&self.repaint);
        let timeout =
            Duration::from_millis(self.options.animation.repaint_wait_timeout_ms);
        let handle = thread::Builder::new()
            .name("camera-move".into())
            .spawn(move || {
                planned.run(&transform, &repaint, &worker_cancel, timeout)
            })
            .map_err(|e| {
                log::error!("camera move thread failed to start: {e}");
                ViewerError::ThreadSpawn(e)
            })?;
        self.camera_move = Some(CameraMoveThread { cancel, handle });
        Ok(())
    }

    /// Cancel the move in flight and wait for its thread. Returns how it
    /// ended, or `None` if no move was running.
    pub fn cancel_camera_move(&mut self) -> Option<MoveOutcome> {
        let running = self.camera_move.take()?;
        running.cancel.cancel();
        join_move(running)
    }

    /// Block until the move in flight finishes on its own.
    ///
    /// The host must keep rendering (on another thread) while waiting, or
    /// each step waits out its repaint timeout.
    pub fn wait_camera_move(&mut self) -> Option<MoveOutcome> {
        let running = self.camera_move.take()?;
        join_move(running)
    }

    /// Whether a camera move thread is still stepping.
    #[must_use]
    pub fn is_camera_moving(&self) -> bool {
        self.camera_move
            .as_ref()
            .is_some_and(|m| !m.handle.is_finished())
    }
}

fn join_move(running: CameraMoveThread) -> Option<MoveOutcome> {
    match running.handle.join() {
        Ok(outcome) => Some(outcome),
        Err(_) => {
            log::error!("camera move thread panicked");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use glam::{Quat, Vec2};

    use super::*;
    use crate::animation::RepaintManager;

    fn target() -> CameraTarget {
        CameraTarget::from_axis_angle(Vec3::Y, 90.0, 250.0, Vec2::new(10.0, -5.0))
            .with_rotation_center(Vec3::new(1.0, 2.0, 3.0))
    }

    /// Stand-in render loop: acknowledge every repaint request until told
    /// to stop.
    fn spawn_render_loop(
        repaint: Arc<RepaintManager>,
        done: Arc<AtomicBool>,
    ) -> thread::JoinHandle<()> {
        thread::spawn(move || {
            while !done.load(Ordering::SeqCst) {
                if repaint.take_repaint_request() {
                    repaint.repaint_done();
                } else {
                    thread::sleep(Duration::from_millis(1));
                }
            }
        })
    }

    #[test]
    fn zero_duration_applies_the_target_exactly() {
        let mut viewer = Viewer::default();
        viewer.move_to(target(), 0.0).unwrap();
        assert!(!viewer.is_camera_moving());
        let state = viewer.camera_state();
        let expected = target();
        assert_eq!(state.rotation, expected.rotation);
        assert_eq!(state.zoom_percent, 250.0);
        assert_eq!(state.translate_percent, Vec2::new(10.0, -5.0));
        assert_eq!(state.rotation_center, Vec3::new(1.0, 2.0, 3.0));
        assert!(viewer.repaint_manager().repaint_pending());
    }

    #[test]
    fn threaded_move_lands_on_the_target() {
        let mut viewer = Viewer::default();
        let done = Arc::new(AtomicBool::new(false));
        let render =
            spawn_render_loop(Arc::clone(viewer.repaint_manager()), Arc::clone(&done));

        viewer.move_to(target(), 0.25).unwrap();
        assert_eq!(viewer.wait_camera_move(), Some(MoveOutcome::Completed));
        done.store(true, Ordering::SeqCst);
        render.join().unwrap();

        let state = viewer.camera_state();
        assert_eq!(state.rotation, target().rotation);
        assert_eq!(state.zoom_percent, 250.0);
        assert!(viewer.repaint_manager().completed_passes() >= 2);
    }

    #[test]
    fn new_move_cancels_the_previous_one() {
        let mut viewer = Viewer::default();
        // No render loop: the first move blocks on its first repaint wait.
        viewer.move_to(target(), 5.0).unwrap();
        assert!(viewer.is_camera_moving());
        let home = CameraTarget::from_axis_angle(Vec3::Z, 0.0, 100.0, Vec2::ZERO);
        viewer.move_to(home, 0.0).unwrap();
        assert!(!viewer.is_camera_moving());
        assert_eq!(viewer.camera_state().rotation, Quat::IDENTITY);
        assert_eq!(viewer.cancel_camera_move(), None);
    }

    #[test]
    fn setters_request_repaints() {
        let mut viewer = Viewer::default();
        let repaint = Arc::clone(viewer.repaint_manager());
        viewer.zoom_by(40);
        assert!(repaint.take_repaint_request());
        viewer.rotate_xy_by(10.0, 0.0);
        assert!(repaint.take_repaint_request());
        assert!(viewer.zoom_to_percent(-1.0).is_err());
        assert!(!repaint.take_repaint_request());
        viewer.set_screen_size(800, 600);
        assert_eq!(lock_transform(viewer.transform()).screen_size(), (800, 600));
    }
}
