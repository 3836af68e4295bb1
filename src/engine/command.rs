//! The viewer's complete programmatic vocabulary.
//!
//! Every host-facing operation, whether it comes from a script, a GUI
//! button, or a mouse gesture the host has already interpreted, can be
//! expressed as a [`ViewerCommand`] and passed to
//! [`Viewer::execute`](super::Viewer::execute).

use std::sync::Arc;

use glam::{Mat3, Vec2, Vec3};

use super::Viewer;
use crate::camera::CameraTarget;
use crate::error::ViewerError;
use crate::primitive::Primitive;
use crate::scene::ShapeKind;

/// A discrete or parameterized operation the viewer can perform.
///
/// ```ignore
/// viewer.execute(ViewerCommand::Zoom { pixels: 40 })?;
/// viewer.execute(ViewerCommand::SetFrame { index: 3 })?;
/// ```
#[derive(Debug, Clone)]
pub enum ViewerCommand {
    // ── Camera ──────────────────────────────────────────────────────
    /// Zoom by a scroll amount (positive = zoom in).
    Zoom {
        /// Scroll amount in pixels.
        pixels: i32,
    },

    /// Set the zoom percent.
    ZoomTo {
        /// Target zoom (100 = rotation sphere fits the viewport).
        percent: f32,
    },

    /// Replace the rotation with a matrix.
    SetRotation {
        /// World → camera rotation.
        matrix: Mat3,
    },

    /// Replace the rotation with an axis-angle pair.
    SetRotationAxisAngle {
        /// Rotation axis (normalized internally).
        axis: Vec3,
        /// Angle in degrees.
        degrees: f32,
    },

    /// Rotate about the screen axes.
    Rotate {
        /// Degrees about the screen y and x axes.
        degrees: Vec2,
    },

    /// Pan by a pixel delta.
    Pan {
        /// Horizontal and vertical delta in pixels.
        delta: Vec2,
    },

    /// Animate the camera to a target.
    MoveTo {
        /// Where the move ends.
        target: CameraTarget,
        /// Move duration in seconds (0 = immediate).
        duration_secs: f32,
    },

    /// Cancel the camera move in flight.
    CancelMove,

    /// Center and size the view on the displayed frame and primitives.
    FitToScene,

    /// Enter or leave navigation mode.
    SetNavigationMode {
        /// Whether navigation mode is on.
        enabled: bool,
    },

    // ── Playback ────────────────────────────────────────────────────
    /// Start frame playback.
    Play,
    /// Pause frame playback.
    Pause,
    /// Resume paused playback.
    Resume,
    /// Stop frame playback.
    Stop,
    /// Flip the playback direction.
    Reverse,
    /// Advance one frame by hand.
    StepFrame,

    /// Show a frame.
    SetFrame {
        /// Frame index.
        index: usize,
    },

    // ── Scene ───────────────────────────────────────────────────────
    /// Add a primitive.
    AddPrimitive(Arc<Primitive>),
    /// Remove a primitive.
    RemovePrimitive(Arc<Primitive>),

    /// Show or hide a shape.
    SetShapeVisible {
        /// Shape slot.
        kind: ShapeKind,
        /// Whether the shape is drawn.
        visible: bool,
    },

    /// Drop a click marker at a world position.
    AddClickMarker {
        /// World position.
        position: Vec3,
    },

    /// Remove every click marker.
    ClearClickMarkers,

    // ── Options ─────────────────────────────────────────────────────
    /// Set one option by dotted key.
    SetOption {
        /// Key such as `animation.fps`.
        key: String,
        /// New value.
        value: serde_json::Value,
    },
}

impl Viewer {
    /// Execute a command.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying operation; commands whose
    /// operation cannot fail always succeed.
    pub fn execute(&mut self, command: ViewerCommand) -> Result<(), ViewerError> {
        log::trace!("execute {command:?}");
        match command {
            ViewerCommand::Zoom { pixels } => self.zoom_by(pixels),
            ViewerCommand::ZoomTo { percent } => self.zoom_to_percent(percent)?,
            ViewerCommand::SetRotation { matrix } => self.set_rotation(matrix),
            ViewerCommand::SetRotationAxisAngle { axis, degrees } => {
                self.set_rotation_axis_angle(axis, degrees);
            }
            ViewerCommand::Rotate { degrees } => {
                self.rotate_xy_by(degrees.x, degrees.y);
            }
            ViewerCommand::Pan { delta } => {
                self.translate_xy_by(delta.x, delta.y);
            }
            ViewerCommand::MoveTo {
                target,
                duration_secs,
            } => self.move_to(target, duration_secs)?,
            ViewerCommand::CancelMove => {
                let _ = self.cancel_camera_move();
            }
            ViewerCommand::FitToScene => {
                let _ = self.fit_to_scene();
            }
            ViewerCommand::SetNavigationMode { enabled } => {
                self.set_navigation_mode(enabled);
            }
            ViewerCommand::Play => {
                let _ = self.play()?;
            }
            ViewerCommand::Pause => {
                let _ = self.pause();
            }
            ViewerCommand::Resume => {
                let _ = self.resume();
            }
            ViewerCommand::Stop => self.stop(),
            ViewerCommand::Reverse => self.reverse(),
            ViewerCommand::StepFrame => {
                let _ = self.step_once();
            }
            ViewerCommand::SetFrame { index } => self.set_frame(index)?,
            ViewerCommand::AddPrimitive(primitive) => {
                let _ = self.add_primitive(primitive);
            }
            ViewerCommand::RemovePrimitive(primitive) => {
                let _ = self.remove_primitive(&primitive);
            }
            ViewerCommand::SetShapeVisible { kind, visible } => {
                self.scene_mut().set_shape_visible(kind, visible);
            }
            ViewerCommand::AddClickMarker { position } => {
                self.add_click_marker(position);
            }
            ViewerCommand::ClearClickMarkers => {
                self.scene_mut().clear_click_markers();
            }
            ViewerCommand::SetOption { key, value } => {
                self.apply_option(&key, &value)?;
            }
        }
        Ok(())
    }
}
