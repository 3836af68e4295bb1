use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::animation::ReplayMode;
use crate::error::ViewerError;

/// Lowest accepted playback rate.
pub const MIN_FPS: f32 = 1.0;
/// Highest accepted playback rate.
pub const MAX_FPS: f32 = 120.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Animation", inline)]
#[serde(default)]
/// Multi-frame playback parameters.
pub struct AnimationOptions {
    /// Frames advanced per second.
    #[schemars(title = "Frames per Second", range(min = 1.0, max = 120.0), extend("step" = 1.0))]
    pub fps: f32,
    /// Policy at the ends of the frame range.
    #[schemars(title = "Replay Mode")]
    pub replay_mode: ReplayMode,
    /// Extra hold on the first frame of the range, in seconds.
    #[schemars(title = "First Frame Delay", range(min = 0.0, max = 10.0), extend("step" = 0.1))]
    pub first_frame_delay_secs: f32,
    /// Extra hold on the last frame of the range, in seconds.
    #[schemars(title = "Last Frame Delay", range(min = 0.0, max = 10.0), extend("step" = 0.1))]
    pub last_frame_delay_secs: f32,
    /// Upper bound on a single repaint-and-wait handshake.
    #[schemars(skip)]
    pub repaint_wait_timeout_ms: u64,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            fps: 10.0,
            replay_mode: ReplayMode::Once,
            first_frame_delay_secs: 0.0,
            last_frame_delay_secs: 0.0,
            repaint_wait_timeout_ms: 1000,
        }
    }
}

/// Check a playback rate against the accepted range.
///
/// # Errors
///
/// Returns [`ViewerError::InvalidOption`] for non-finite or out-of-range
/// values.
pub fn validate_fps(fps: f32) -> Result<f32, ViewerError> {
    if fps.is_finite() && (MIN_FPS..=MAX_FPS).contains(&fps) {
        Ok(fps)
    } else {
        Err(ViewerError::invalid_option(
            "animation.fps",
            format!("{fps} is outside {MIN_FPS}..={MAX_FPS}"),
        ))
    }
}

/// Check a boundary dwell delay (finite, non-negative seconds).
///
/// # Errors
///
/// Returns [`ViewerError::InvalidOption`] for negative or non-finite delays.
pub fn validate_delay(key: &str, secs: f32) -> Result<f32, ViewerError> {
    if secs.is_finite() && secs >= 0.0 {
        Ok(secs)
    } else {
        Err(ViewerError::invalid_option(
            key,
            format!("{secs} must be a non-negative number of seconds"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_range_is_enforced() {
        assert_eq!(validate_fps(30.0).unwrap(), 30.0);
        assert!(validate_fps(0.0).is_err());
        assert!(validate_fps(-5.0).is_err());
        assert!(validate_fps(f32::NAN).is_err());
        assert!(validate_fps(500.0).is_err());
    }

    #[test]
    fn negative_delay_rejected() {
        assert!(validate_delay("animation.first_frame_delay_secs", -1.0)
            .is_err());
        assert_eq!(
            validate_delay("animation.last_frame_delay_secs", 0.5).unwrap(),
            0.5
        );
    }
}
