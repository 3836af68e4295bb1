//! Centralized viewer options with TOML preset support.
//!
//! Camera, animation, and display settings are consolidated here. Options
//! serialize to/from TOML so a viewer setup can be saved as a named preset.

mod animation;
mod camera;
mod display;

use std::path::Path;

pub use animation::{
    validate_delay, validate_fps, AnimationOptions, MAX_FPS, MIN_FPS,
};
pub use camera::CameraOptions;
pub use display::DisplayOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ViewerError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[animation]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Camera projection and navigation parameters.
    pub camera: CameraOptions,
    /// Multi-frame playback parameters.
    pub animation: AnimationOptions,
    /// Clipping and overlay parameters.
    pub display: DisplayOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Io`] if the file cannot be read and
    /// [`ViewerError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        let content = std::fs::read_to_string(path).map_err(ViewerError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::OptionsParse`] if the text is not valid
    /// options TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, ViewerError> {
        toml::from_str(content)
            .map_err(|e| ViewerError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError`] if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), ViewerError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ViewerError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ViewerError::Io)?;
        }
        std::fs::write(path, content).map_err(ViewerError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }

    /// Reject option combinations that would leave the viewer unusable.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidOption`] naming the first bad key.
    pub fn validate(&self) -> Result<(), ViewerError> {
        let _ = validate_fps(self.animation.fps)?;
        let _ = validate_delay(
            "animation.first_frame_delay_secs",
            self.animation.first_frame_delay_secs,
        )?;
        let _ = validate_delay(
            "animation.last_frame_delay_secs",
            self.animation.last_frame_delay_secs,
        )?;
        let cam = &self.camera;
        if !(cam.min_zoom_percent > 0.0
            && cam.min_zoom_percent <= cam.max_zoom_percent)
        {
            return Err(ViewerError::invalid_option(
                "camera.min_zoom_percent",
                "must be positive and not above max_zoom_percent",
            ));
        }
        if !(cam.camera_depth > 0.0 && cam.camera_depth.is_finite()) {
            return Err(ViewerError::invalid_option(
                "camera.camera_depth",
                "must be a positive number",
            ));
        }
        if cam.zoom_step_factor <= 1.0 {
            return Err(ViewerError::invalid_option(
                "camera.zoom_step_factor",
                "must be greater than 1",
            ));
        }
        if cam.move_steps_per_second <= 0.0 {
            return Err(ViewerError::invalid_option(
                "camera.move_steps_per_second",
                "must be positive",
            ));
        }
        Ok(())
    }
}
