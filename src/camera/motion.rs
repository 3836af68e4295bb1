//! Programmatic camera moves (`move_to`) with drift-free completion.
//!
//! A [`CameraMove`] is cooperatively steppable: each [`step`](CameraMove::step)
//! recomputes the rotation still needed to reach the target from wherever
//! the camera is now and applies an even share of it, while zoom, pan,
//! center, radius, and eye position are lerped. The last step writes the
//! exact target values so no interpolation error survives.
//!
//! [`CameraMove::run`] drives the steps on the calling thread at a fixed
//! rate, holding the transform lock only per step and waiting for each
//! repaint to land before moving on.

use std::time::Duration;

use glam::{Quat, Vec2, Vec3};
use web_time::Instant;

use super::transform::TransformManager;
use super::{lock_transform, SharedTransform};
use crate::animation::{RepaintManager, RepaintWait};
use crate::util::cancel::CancelToken;
use crate::util::pacing::{interval_for_rate, Pacer};

/// Where a camera move ends up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTarget {
    /// Final rotation.
    pub rotation: Quat,
    /// Final zoom percent. Clamped to the camera's zoom limits when the
    /// move lands; a clamped value is logged.
    pub zoom_percent: f32,
    /// Final screen translation in percent.
    pub translate_percent: Vec2,
    /// Final rotation center, if it changes.
    pub rotation_center: Option<Vec3>,
    /// Final rotation radius, if it changes.
    pub rotation_radius: Option<f32>,
    /// Final navigation eye position, if it changes.
    pub camera_position: Option<Vec3>,
}

impl CameraTarget {
    /// Target from an axis-angle orientation plus zoom and pan.
    #[must_use]
    pub fn from_axis_angle(
        axis: Vec3,
        degrees: f32,
        zoom_percent: f32,
        translate_percent: Vec2,
    ) -> Self {
        let axis = axis.try_normalize().unwrap_or(Vec3::Z);
        Self {
            rotation: Quat::from_axis_angle(axis, degrees.to_radians()),
            zoom_percent,
            translate_percent,
            rotation_center: None,
            rotation_radius: None,
            camera_position: None,
        }
    }

    /// Also move the navigation eye.
    #[must_use]
    pub fn with_camera_position(mut self, position: Vec3) -> Self {
        self.camera_position = Some(position);
        self
    }

    /// Also move the rotation center.
    #[must_use]
    pub fn with_rotation_center(mut self, center: Vec3) -> Self {
        self.rotation_center = Some(center);
        self
    }

    /// Also change the rotation radius.
    #[must_use]
    pub fn with_rotation_radius(mut self, radius: f32) -> Self {
        self.rotation_radius = Some(radius);
        self
    }
}

/// How a threaded move ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Every step ran and the exact target was applied.
    Completed,
    /// The cancel token fired first; the camera stays where it was.
    Cancelled,
}

/// Values captured when the move starts, used as lerp origins.
#[derive(Debug, Clone, Copy)]
struct MoveStart {
    zoom_percent: f32,
    translate_percent: Vec2,
    rotation_center: Vec3,
    rotation_radius: f32,
    camera_position: Vec3,
}

/// A single camera interpolation toward a [`CameraTarget`].
#[derive(Debug, Clone)]
pub struct CameraMove {
    target: CameraTarget,
    start: MoveStart,
    total_steps: u32,
    step: u32,
    steps_per_second: f32,
    finished: bool,
}

impl CameraMove {
    /// Plan a move from the engine's current state.
    ///
    /// The step count is `duration * steps_per_second` rounded; a zero (or
    /// negative) duration yields zero interpolation steps and the first
    /// [`step`](Self::step) applies the target immediately.
    #[must_use]
    pub fn new(
        transform: &TransformManager,
        target: CameraTarget,
        duration_secs: f32,
        steps_per_second: f32,
    ) -> Self {
        let state = transform.state();
        let total_steps = if duration_secs.is_finite() && duration_secs > 0.0 {
            (duration_secs * steps_per_second).round().max(0.0) as u32
        } else {
            0
        };
        Self {
            target,
            start: MoveStart {
                zoom_percent: state.zoom_percent,
                translate_percent: state.translate_percent,
                rotation_center: state.rotation_center,
                rotation_radius: state.rotation_radius,
                camera_position: state.camera_position,
            },
            total_steps,
            step: 0,
            steps_per_second,
            finished: false,
        }
    }

    /// Planned number of steps (the final exact step included).
    #[must_use]
    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    /// Whether the exact target has been applied.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The move's destination.
    #[must_use]
    pub fn target(&self) -> &CameraTarget {
        &self.target
    }

    /// Advance one step. Returns `true` while more steps remain.
    pub fn step(&mut self, transform: &mut TransformManager) -> bool {
        if self.finished {
            return false;
        }
        self.step += 1;
        if self.step >= self.total_steps {
            self.apply_exact(transform);
            return false;
        }

        let fraction = self.step as f32 / self.total_steps as f32;
        let steps_left = (self.total_steps - self.step + 1) as f32;

        // Remaining rotation from the live orientation, not a baked path.
        let current = transform.rotation();
        let mut remaining = self.target.rotation * current.inverse();
        if remaining.w < 0.0 {
            remaining = -remaining;
        }
        let (axis, angle) = remaining.to_axis_angle();
        if angle.abs() > f32::EPSILON {
            let partial = Quat::from_axis_angle(axis, angle / steps_left);
            transform.set_rotation_quat((partial * current).normalize());
        }

        let s = &self.start;
        let t = &self.target;
        let _ = transform.zoom_to_percent(lerp(s.zoom_percent, t.zoom_percent, fraction));
        let pan = s.translate_percent.lerp(t.translate_percent, fraction);
        transform.translate_to_percent(pan.x, pan.y);
        if let Some(center) = t.rotation_center {
            transform.set_rotation_center(s.rotation_center.lerp(center, fraction));
        }
        if let Some(radius) = t.rotation_radius {
            transform.set_rotation_radius(lerp(s.rotation_radius, radius, fraction));
        }
        if let Some(eye) = t.camera_position {
            transform.set_camera_position(s.camera_position.lerp(eye, fraction));
        }
        true
    }

    /// Jump straight to the target values.
    pub fn apply_exact(&mut self, transform: &mut TransformManager) {
        let t = self.target;
        transform.set_rotation_quat(t.rotation);
        if transform.zoom_to_percent(t.zoom_percent).is_err() {
            log::warn!("camera move target zoom {} rejected", t.zoom_percent);
        } else if transform.zoom_percent() != t.zoom_percent {
            log::warn!(
                "camera move target zoom {} clamped to {}",
                t.zoom_percent,
                transform.zoom_percent()
            );
        }
        transform.translate_to_percent(t.translate_percent.x, t.translate_percent.y);
        if let Some(center) = t.rotation_center {
            transform.set_rotation_center(center);
        }
        if let Some(radius) = t.rotation_radius {
            transform.set_rotation_radius(radius);
        }
        if let Some(eye) = t.camera_position {
            transform.set_camera_position(eye);
        }
        self.step = self.total_steps;
        self.finished = true;
    }

    /// Run every step on the current thread at the planned rate.
    ///
    /// The transform lock is taken per step only. After each step a repaint
    /// is requested and awaited (bounded by `repaint_timeout`) so the render
    /// consumer sees every intermediate view. Cancellation is checked before
    /// each step and during every wait.
    pub fn run(
        mut self,
        transform: &SharedTransform,
        repaint: &RepaintManager,
        cancel: &CancelToken,
        repaint_timeout: Duration,
    ) -> MoveOutcome {
        let interval = interval_for_rate(self.steps_per_second);
        let mut pacer = Pacer::new(Instant::now());
        log::debug!("camera move started: {} steps", self.total_steps);
        loop {
            if cancel.is_cancelled() {
                log::debug!("camera move cancelled at step {}", self.step);
                return MoveOutcome::Cancelled;
            }
            let more = {
                let mut tm = lock_transform(transform);
                self.step(&mut tm)
            };
            if repaint.request_repaint_and_wait(repaint_timeout, cancel)
                == RepaintWait::Cancelled
            {
                log::debug!("camera move cancelled waiting for repaint");
                return MoveOutcome::Cancelled;
            }
            if !more {
                log::debug!("camera move completed");
                return MoveOutcome::Completed;
            }
            let _ = pacer.advance(interval);
            if !cancel.sleep(pacer.remaining(Instant::now())) {
                log::debug!("camera move cancelled at step {}", self.step);
                return MoveOutcome::Cancelled;
            }
        }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::thread;

    use super::*;

    fn target() -> CameraTarget {
        CameraTarget::from_axis_angle(
            Vec3::new(0.3, 1.0, -0.2),
            135.0,
            340.0,
            Vec2::new(12.0, -7.5),
        )
        .with_camera_position(Vec3::new(4.0, -2.0, 30.0))
        .with_rotation_center(Vec3::new(1.0, 1.0, 1.0))
        .with_rotation_radius(22.0)
    }

    fn assert_exact(tm: &TransformManager, t: &CameraTarget) {
        let s = tm.state();
        assert_eq!(s.rotation, t.rotation);
        assert_eq!(s.zoom_percent, t.zoom_percent);
        assert_eq!(s.translate_percent, t.translate_percent);
        assert_eq!(Some(s.camera_position), t.camera_position);
        assert_eq!(Some(s.rotation_center), t.rotation_center);
        assert_eq!(Some(s.rotation_radius), t.rotation_radius);
    }

    #[test]
    fn zero_duration_applies_target_immediately() {
        let mut tm = TransformManager::default();
        let t = target();
        let mut mv = CameraMove::new(&tm, t, 0.0, 20.0);
        assert_eq!(mv.total_steps(), 0);
        assert!(!mv.step(&mut tm));
        assert!(mv.is_finished());
        assert_exact(&tm, &t);
    }

    #[test]
    fn stepping_to_completion_is_exact() {
        for duration in [0.05, 0.5, 1.0, 2.35] {
            let mut tm = TransformManager::default();
            tm.rotate_xy_by(20.0, -50.0);
            tm.set_navigation_mode(true);
            let t = target();
            let mut mv = CameraMove::new(&tm, t, duration, 20.0);
            let mut steps = 1;
            while mv.step(&mut tm) {
                steps += 1;
            }
            assert_eq!(steps, mv.total_steps().max(1));
            assert_exact(&tm, &t);
        }
    }

    #[test]
    fn step_count_follows_rate() {
        let tm = TransformManager::default();
        let mv = CameraMove::new(&tm, target(), 1.5, 20.0);
        assert_eq!(mv.total_steps(), 30);
    }

    #[test]
    fn intermediate_steps_approach_target_rotation() {
        let mut tm = TransformManager::default();
        let t = target();
        let mut mv = CameraMove::new(&tm, t, 1.0, 20.0);
        let mut last = tm.rotation().angle_between(t.rotation);
        while mv.step(&mut tm) {
            let now = tm.rotation().angle_between(t.rotation);
            assert!(now <= last + 1e-4);
            last = now;
        }
        assert_eq!(tm.rotation(), t.rotation);
    }

    #[test]
    fn zoom_is_lerped_halfway() {
        let mut tm = TransformManager::default();
        let t = CameraTarget::from_axis_angle(Vec3::Z, 0.0, 300.0, Vec2::ZERO);
        let mut mv = CameraMove::new(&tm, t, 1.0, 20.0);
        for _ in 0..10 {
            let _ = mv.step(&mut tm);
        }
        assert!((tm.zoom_percent() - 200.0).abs() < 1e-3);
    }

    #[test]
    fn out_of_range_zoom_lands_on_the_limit() {
        let mut tm = TransformManager::default();
        let max = tm.options().max_zoom_percent;
        let t = CameraTarget::from_axis_angle(Vec3::Z, 0.0, max * 2.0, Vec2::ZERO);
        let mut mv = CameraMove::new(&tm, t, 0.0, 20.0);
        mv.apply_exact(&mut tm);
        assert_eq!(tm.zoom_percent(), max);

        let t = CameraTarget::from_axis_angle(Vec3::Z, 0.0, 1.0, Vec2::ZERO);
        CameraMove::new(&tm, t, 0.0, 20.0).apply_exact(&mut tm);
        assert_eq!(tm.zoom_percent(), tm.options().min_zoom_percent);
    }

    #[test]
    fn threaded_run_completes_with_consumer() {
        let shared: SharedTransform =
            Arc::new(Mutex::new(TransformManager::default()));
        let repaint = Arc::new(RepaintManager::new());
        let cancel = CancelToken::new();
        let t = target();
        let mv = CameraMove::new(&lock_transform(&shared), t, 0.25, 20.0);

        let worker_shared = Arc::clone(&shared);
        let worker_repaint = Arc::clone(&repaint);
        let worker_cancel = cancel.clone();
        let handle = thread::spawn(move || {
            mv.run(
                &worker_shared,
                &worker_repaint,
                &worker_cancel,
                Duration::from_secs(2),
            )
        });
        while !handle.is_finished() {
            if repaint.wait_for_request(Duration::from_millis(5)) {
                repaint.repaint_done();
            }
        }
        assert_eq!(handle.join().unwrap(), MoveOutcome::Completed);
        assert_exact(&lock_transform(&shared), &t);
    }

    #[test]
    fn threaded_run_cancels_cleanly() {
        let shared: SharedTransform =
            Arc::new(Mutex::new(TransformManager::default()));
        let repaint = Arc::new(RepaintManager::new());
        let cancel = CancelToken::new();
        let mv = CameraMove::new(&lock_transform(&shared), target(), 30.0, 20.0);

        let worker_shared = Arc::clone(&shared);
        let worker_repaint = Arc::clone(&repaint);
        let worker_cancel = cancel.clone();
        let handle = thread::spawn(move || {
            mv.run(
                &worker_shared,
                &worker_repaint,
                &worker_cancel,
                Duration::from_secs(5),
            )
        });
        thread::sleep(Duration::from_millis(50));
        cancel.cancel();
        assert_eq!(handle.join().unwrap(), MoveOutcome::Cancelled);
    }
}
