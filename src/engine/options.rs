//! Options methods for [`Viewer`].

use std::path::Path;

use serde_json::Value;

use super::Viewer;
use crate::camera::lock_transform;
use crate::error::ViewerError;
use crate::options::Options;

impl Viewer {
    /// Replace every option and push the new values to all subsystems.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidOption`] when `options` fail
    /// validation; nothing changes in that case.
    pub fn set_options(&mut self, options: Options) -> Result<(), ViewerError> {
        options
            .validate()
            .inspect_err(|e| log::error!("rejected options: {e}"))?;
        self.options = options;
        self.apply_options()
    }

    /// Push current option values to the scheduler and transform engine.
    fn apply_options(&mut self) -> Result<(), ViewerError> {
        let anim = &self.options.animation;
        self.scheduler.set_fps(anim.fps)?;
        self.scheduler.set_replay_mode(anim.replay_mode);
        self.scheduler.set_boundary_delays(
            anim.first_frame_delay_secs,
            anim.last_frame_delay_secs,
        )?;
        lock_transform(&self.transform)
            .apply_options(&self.options.camera, &self.options.display);
        self.request_repaint();
        Ok(())
    }

    /// Set a single option by dotted key, e.g. `animation.fps`.
    ///
    /// The value is checked before anything changes; a rejected value
    /// leaves the previous one in effect.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidOption`] for unknown keys, values of
    /// the wrong type, or values outside the key's range, and
    /// [`ViewerError::UnknownReplayMode`] for unrecognized mode names.
    pub fn apply_option(
        &mut self,
        key: &str,
        value: &Value,
    ) -> Result<(), ViewerError> {
        match key {
            // The scheduler logs its own rejections.
            "animation.fps" => {
                let fps = number(key, value).inspect_err(log_rejected)?;
                self.scheduler.set_fps(fps)?;
                self.options.animation.fps = fps;
            }
            "animation.replay_mode" => {
                let name = text(key, value).inspect_err(log_rejected)?;
                self.scheduler.set_replay_mode_named(name)?;
                self.options.animation.replay_mode =
                    self.scheduler.snapshot().replay_mode();
            }
            "animation.first_frame_delay_secs" => {
                let secs = number(key, value).inspect_err(log_rejected)?;
                let last = self.options.animation.last_frame_delay_secs;
                self.scheduler.set_boundary_delays(secs, last)?;
                self.options.animation.first_frame_delay_secs = secs;
            }
            "animation.last_frame_delay_secs" => {
                let secs = number(key, value).inspect_err(log_rejected)?;
                let first = self.options.animation.first_frame_delay_secs;
                self.scheduler.set_boundary_delays(first, secs)?;
                self.options.animation.last_frame_delay_secs = secs;
            }
            _ => {
                self.apply_view_option(key, value)
                    .inspect_err(log_rejected)?;
            }
        }
        log::debug!("option {key} = {value}");
        self.request_repaint();
        Ok(())
    }

    /// Camera and display keys.
    fn apply_view_option(
        &mut self,
        key: &str,
        value: &Value,
    ) -> Result<(), ViewerError> {
        match key {
            "camera.camera_depth" => {
                let depth = number(key, value)?;
                lock_transform(&self.transform).set_camera_depth(depth)?;
                self.options.camera.camera_depth = depth;
            }
            "camera.perspective_depth" => {
                let enabled = flag(key, value)?;
                lock_transform(&self.transform).set_perspective_depth(enabled);
                self.options.camera.perspective_depth = enabled;
            }
            "display.slab_enabled" => {
                let enabled = flag(key, value)?;
                lock_transform(&self.transform).set_slab_enabled(enabled);
                self.options.display.slab_enabled = enabled;
            }
            "display.slab_percent" => {
                let percent = percent(key, value)?;
                lock_transform(&self.transform).set_slab_percent(percent);
                self.options.display.slab_percent = percent;
            }
            "display.depth_percent" => {
                let percent = percent(key, value)?;
                lock_transform(&self.transform).set_depth_percent(percent);
                self.options.display.depth_percent = percent;
            }
            "display.halo_scale" => {
                let scale = number(key, value)?;
                if scale < 1.0 {
                    return Err(ViewerError::invalid_option(
                        key,
                        format!("{scale} must be at least 1"),
                    ));
                }
                self.options.display.halo_scale = scale;
            }
            "display.marker_diameter_px" => {
                let diameter = value
                    .as_i64()
                    .and_then(|d| i32::try_from(d).ok())
                    .filter(|d| *d > 0)
                    .ok_or_else(|| {
                        ViewerError::invalid_option(
                            key,
                            format!("{value} is not a positive pixel count"),
                        )
                    })?;
                self.options.display.marker_diameter_px = diameter;
            }
            _ => {
                return Err(ViewerError::invalid_option(key, "unknown option"));
            }
        }
        Ok(())
    }

    /// Load a named preset from `presets_dir` and apply it.
    ///
    /// # Errors
    ///
    /// Returns the load or validation error; current options are kept.
    pub fn load_preset(
        &mut self,
        name: &str,
        presets_dir: &Path,
    ) -> Result<(), ViewerError> {
        let path = presets_dir.join(format!("{name}.toml"));
        let options = Options::load(&path)
            .inspect_err(|e| log::error!("failed to load preset '{name}': {e}"))?;
        self.set_options(options)?;
        log::info!("loaded preset '{name}'");
        Ok(())
    }

    /// Save the current options as a named preset in `presets_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Io`] or [`ViewerError::OptionsParse`] when
    /// the preset cannot be written.
    pub fn save_preset(
        &self,
        name: &str,
        presets_dir: &Path,
    ) -> Result<(), ViewerError> {
        let path = presets_dir.join(format!("{name}.toml"));
        self.options
            .save(&path)
            .inspect_err(|e| log::error!("failed to save preset '{name}': {e}"))?;
        log::info!("saved preset '{name}'");
        Ok(())
    }
}

fn log_rejected(e: &ViewerError) {
    log::error!("{e}");
}

fn number(key: &str, value: &Value) -> Result<f32, ViewerError> {
    value
        .as_f64()
        .map(|v| v as f32)
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            ViewerError::invalid_option(key, format!("{value} is not a number"))
        })
}

fn percent(key: &str, value: &Value) -> Result<f32, ViewerError> {
    let p = number(key, value)?;
    if (0.0..=100.0).contains(&p) {
        Ok(p)
    } else {
        Err(ViewerError::invalid_option(key, format!("{p} is outside 0..=100")))
    }
}

fn flag(key: &str, value: &Value) -> Result<bool, ViewerError> {
    value.as_bool().ok_or_else(|| {
        ViewerError::invalid_option(key, format!("{value} is not a boolean"))
    })
}

fn text<'v>(key: &str, value: &'v Value) -> Result<&'v str, ViewerError> {
    value.as_str().ok_or_else(|| {
        ViewerError::invalid_option(key, format!("{value} is not a string"))
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::animation::ReplayMode;

    #[test]
    fn fps_is_applied_and_recorded() {
        let mut viewer = Viewer::default();
        viewer.apply_option("animation.fps", &json!(24)).unwrap();
        assert_eq!(viewer.options().animation.fps, 24.0);
        assert_eq!(viewer.animation_state().fps(), 24.0);
    }

    #[test]
    fn rejected_values_keep_the_previous_one() {
        let mut viewer = Viewer::default();
        let before = viewer.options().clone();
        for (key, value) in [
            ("animation.fps", json!(0)),
            ("animation.fps", json!("fast")),
            ("animation.first_frame_delay_secs", json!(-1.0)),
            ("camera.camera_depth", json!(-2.0)),
            ("display.slab_percent", json!(140)),
            ("display.slab_enabled", json!(1)),
            ("display.halo_scale", json!(0.5)),
            ("display.marker_diameter_px", json!(0)),
        ] {
            assert!(
                matches!(
                    viewer.apply_option(key, &value),
                    Err(ViewerError::InvalidOption { .. })
                ),
                "{key} = {value} should be rejected"
            );
        }
        assert_eq!(viewer.options(), &before);
    }

    #[test]
    fn unknown_keys_and_modes_are_rejected() {
        let mut viewer = Viewer::default();
        assert!(matches!(
            viewer.apply_option("camera.fov", &json!(45)),
            Err(ViewerError::InvalidOption { .. })
        ));
        assert!(matches!(
            viewer.apply_option("animation.replay_mode", &json!("shuffle")),
            Err(ViewerError::UnknownReplayMode(_))
        ));
        viewer
            .apply_option("animation.replay_mode", &json!("palindrome"))
            .unwrap();
        assert_eq!(viewer.options().animation.replay_mode, ReplayMode::Palindrome);
    }

    #[test]
    fn slab_options_reach_the_transform() {
        let mut viewer = Viewer::default();
        viewer.apply_option("display.slab_enabled", &json!(true)).unwrap();
        viewer.apply_option("display.slab_percent", &json!(40)).unwrap();
        let tm = lock_transform(viewer.transform());
        assert_eq!(tm.slab_depth_percent().0, 40.0);
    }

    #[test]
    fn set_options_validates_first() {
        let mut viewer = Viewer::default();
        let mut bad = Options::default();
        bad.camera.camera_depth = 0.0;
        assert!(viewer.set_options(bad).is_err());
        assert_eq!(viewer.options(), &Options::default());

        let mut good = Options::default();
        good.camera.camera_depth = 5.0;
        good.animation.replay_mode = ReplayMode::Loop;
        viewer.set_options(good).unwrap();
        assert_eq!(lock_transform(viewer.transform()).camera_depth(), 5.0);
        assert_eq!(viewer.animation_state().replay_mode(), ReplayMode::Loop);
    }

    #[test]
    fn presets_round_trip_through_disk() {
        let dir = std::env::temp_dir()
            .join(format!("molscope-engine-presets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut viewer = Viewer::default();
        viewer.apply_option("animation.fps", &json!(12)).unwrap();
        viewer.save_preset("slow", &dir).unwrap();

        let mut other = Viewer::default();
        other.load_preset("slow", &dir).unwrap();
        assert_eq!(other.options().animation.fps, 12.0);
        assert!(other.load_preset("missing", &dir).is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
