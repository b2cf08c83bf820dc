/*!
Tunable walker and camera parameters.

Defaults come from [`crate::constants`]. Both structs deserialize with `#[serde(default)]`, so
a config file only needs the fields it overrides:

```toml
[walker]
forward_speed = 6.0

[camera]
search_probes = 18
```

Notes
- Distances are in scene units, time in seconds, angles in degrees.
- Call `validate()` after loading; the update loops assume positive, finite values.
*/

use serde::Deserialize;

use crate::constants::{
    BACKWARD_SPEED, CAMERA_SEARCH_PROBES, CAMERA_SEARCH_STEP_DEG, DEFAULT_VIEW_OFFSET,
    EXTENDED_PROBE_DISTANCE, FALL_SPEED, FALLING_CAMERA_DAMPING, FLOATER_HEIGHT, FORWARD_SPEED,
    GROUND_CLEARANCE, GROUND_PROBE_DISTANCE, INITIAL_CAMERA_OFFSET, ORBIT_DRAG_THRESHOLD,
    ORBIT_SPEED_DEG, SWEEP_RADIUS, TURN_SPEED_DEG,
};
use crate::error::SettingsError;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WalkerSettings {
    pub forward_speed: f32,
    pub backward_speed: f32,
    pub turn_speed_deg: f32,
    pub fall_speed: f32,
    pub ground_clearance: f32,
    pub probe_distance: f32,
    pub extended_probe_distance: f32,
    pub sweep_radius: f32,
}

impl Default for WalkerSettings {
    fn default() -> Self {
        Self {
            forward_speed: FORWARD_SPEED,
            backward_speed: BACKWARD_SPEED,
            turn_speed_deg: TURN_SPEED_DEG,
            fall_speed: FALL_SPEED,
            ground_clearance: GROUND_CLEARANCE,
            probe_distance: GROUND_PROBE_DISTANCE,
            extended_probe_distance: EXTENDED_PROBE_DISTANCE,
            sweep_radius: SWEEP_RADIUS,
        }
    }
}

impl WalkerSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        positive("forward_speed", self.forward_speed)?;
        positive("backward_speed", self.backward_speed)?;
        positive("turn_speed_deg", self.turn_speed_deg)?;
        positive("fall_speed", self.fall_speed)?;
        positive("ground_clearance", self.ground_clearance)?;
        positive("probe_distance", self.probe_distance)?;
        positive("extended_probe_distance", self.extended_probe_distance)?;
        positive("sweep_radius", self.sweep_radius)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Look target height above the avatar.
    pub floater_height: f32,
    /// Heading-relative view tried first by the occlusion search.
    pub default_view_offset: [f32; 3],
    /// Follow offset used before any search has run.
    pub initial_offset: [f32; 3],
    pub search_step_deg: f32,
    pub search_probes: usize,
    pub falling_damping: f32,
    pub orbit_speed_deg: f32,
    pub orbit_drag_threshold: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            floater_height: FLOATER_HEIGHT,
            default_view_offset: DEFAULT_VIEW_OFFSET,
            initial_offset: INITIAL_CAMERA_OFFSET,
            search_step_deg: CAMERA_SEARCH_STEP_DEG,
            search_probes: CAMERA_SEARCH_PROBES,
            falling_damping: FALLING_CAMERA_DAMPING,
            orbit_speed_deg: ORBIT_SPEED_DEG,
            orbit_drag_threshold: ORBIT_DRAG_THRESHOLD,
        }
    }
}

impl CameraSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        positive("floater_height", self.floater_height)?;
        positive("search_step_deg", self.search_step_deg)?;
        positive("falling_damping", self.falling_damping)?;
        positive("orbit_speed_deg", self.orbit_speed_deg)?;
        if !self.orbit_drag_threshold.is_finite() || self.orbit_drag_threshold < 0.0 {
            return Err(SettingsError::NotPositive {
                name: "orbit_drag_threshold",
                value: self.orbit_drag_threshold,
            });
        }
        if self.search_probes == 0 {
            return Err(SettingsError::NoCameraProbes);
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::NotPositive { name, value })
    }
}
