use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Clipping planes and overlay sizing.
pub struct DisplayOptions {
    /// Whether slab/depth clipping is active.
    #[schemars(title = "Slab Clipping")]
    pub slab_enabled: bool,
    /// Front clip plane, percent of the rotation sphere (100 = front).
    #[schemars(title = "Slab", range(min = 0.0, max = 100.0), extend("step" = 1.0))]
    pub slab_percent: f32,
    /// Back clip plane, percent of the rotation sphere (0 = back).
    #[schemars(title = "Depth", range(min = 0.0, max = 100.0), extend("step" = 1.0))]
    pub depth_percent: f32,
    /// Halo diameter relative to the atom diameter.
    #[schemars(title = "Halo Scale", range(min = 1.0, max = 4.0), extend("step" = 0.1))]
    pub halo_scale: f32,
    /// Label offset from the atom center, in pixels.
    #[schemars(skip)]
    pub label_offset_px: [i32; 2],
    /// Click marker diameter in pixels.
    #[schemars(skip)]
    pub marker_diameter_px: i32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            slab_enabled: false,
            slab_percent: 100.0,
            depth_percent: 0.0,
            halo_scale: 1.6,
            label_offset_px: [4, 4],
            marker_diameter_px: 8,
        }
    }
}
