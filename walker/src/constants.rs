/// Distance the avatar's origin is kept above the ground hit (scene units).
///
/// The avatar capsule is 3 units tall and centered on its origin, so this puts its feet on
/// the ground.
pub const GROUND_CLEARANCE: f32 = 1.5;

/// Default downward probe length for ground and sensor rays.
pub const GROUND_PROBE_DISTANCE: f32 = 5.0;

/// Longer probe used when searching a deeper layer (e.g. a basement under a hole).
pub const EXTENDED_PROBE_DISTANCE: f32 = 10.0;

/// Vertical speed while descending through a hole (units per second).
pub const FALL_SPEED: f32 = 20.0;

/// Turning speed in degrees per second.
pub const TURN_SPEED_DEG: f32 = 100.0;

/// Speed when moving forward (units per second).
pub const FORWARD_SPEED: f32 = 5.0;

/// Speed when backing up (units per second).
pub const BACKWARD_SPEED: f32 = 10.0;

/// Radius of the sphere swept ahead of the avatar to detect blocking geometry.
pub const SWEEP_RADIUS: f32 = 0.5;

/// Avatar capsule dimensions (radius, half length of the cylindrical section).
pub const AVATAR_RADIUS: f32 = 0.6;
pub const AVATAR_HALF_HEIGHT: f32 = 0.9;

/// Height of the camera's look target above the avatar origin.
pub const FLOATER_HEIGHT: f32 = 3.0;

/// Heading-relative default view, in the avatar's facing frame.
pub const DEFAULT_VIEW_OFFSET: [f32; 3] = [0.0, 5.0, 1.0];

/// Initial remembered camera offset from the avatar (world frame), behind it at heading 0.
pub const INITIAL_CAMERA_OFFSET: [f32; 3] = [0.0, 5.0, 1.0];

/// Angular step between occlusion search candidates (degrees).
pub const CAMERA_SEARCH_STEP_DEG: f32 = 10.0;

/// Number of candidates tried by the occlusion search (default view plus 35 rotations).
pub const CAMERA_SEARCH_PROBES: usize = 36;

/// Rate at which the falling camera pulls in horizontally (per second).
pub const FALLING_CAMERA_DAMPING: f32 = 10.0;

/// Orbit speed while the camera is being dragged (degrees per second).
pub const ORBIT_SPEED_DEG: f32 = 90.0;

/// Drag time before orbiting kicks in (seconds).
pub const ORBIT_DRAG_THRESHOLD: f32 = 0.2;

/// Highest/lowest Z of the vertical ray used to find a spawn position.
pub const SPAWN_RAY_HEIGHT: f32 = 30.0;
