use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection, zoom, and navigation parameters.
pub struct CameraOptions {
    /// Zoom percent applied on reset.
    #[schemars(title = "Default Zoom", range(min = 5.0, max = 200000.0))]
    pub default_zoom_percent: f32,
    /// Lower zoom clamp.
    #[schemars(skip)]
    pub min_zoom_percent: f32,
    /// Upper zoom clamp.
    #[schemars(skip)]
    pub max_zoom_percent: f32,
    /// Camera distance from the rotation center, in rotation-sphere
    /// diameters.
    #[schemars(title = "Camera Depth", range(min = 0.5, max = 20.0), extend("step" = 0.1))]
    pub camera_depth: f32,
    /// Whether perspective foreshortening is applied.
    #[schemars(title = "Perspective")]
    pub perspective_depth: bool,
    /// Rotation multiplier while in navigation mode.
    #[schemars(skip)]
    pub navigation_rotation_scale: f32,
    /// Largest per-event zoom delta in pixels.
    #[schemars(skip)]
    pub max_zoom_step_pixels: i32,
    /// Zoom multiplier per pixel of wheel/drag.
    #[schemars(title = "Zoom Speed", range(min = 1.001, max = 1.2), extend("step" = 0.001))]
    pub zoom_step_factor: f32,
    /// Camera travel per pixel in navigation mode, as a fraction of the
    /// rotation radius.
    #[schemars(skip)]
    pub navigation_step_fraction: f32,
    /// Interpolation steps per second for programmatic camera moves.
    #[schemars(skip)]
    pub move_steps_per_second: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            default_zoom_percent: 100.0,
            min_zoom_percent: 5.0,
            max_zoom_percent: 200_000.0,
            camera_depth: 3.0,
            perspective_depth: true,
            navigation_rotation_scale: 0.1,
            max_zoom_step_pixels: 20,
            zoom_step_factor: 1.02,
            navigation_step_fraction: 0.02,
            move_steps_per_second: 20.0,
        }
    }
}
