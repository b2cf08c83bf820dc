pub mod animation;
pub mod bitmask_flags;
pub mod camera;
pub mod constants;
pub mod error;
pub mod intent;
pub mod physics;
pub mod scene;
pub mod sensor;
pub mod settings;
pub mod simulation;
pub mod transform;
pub mod walker;

pub use animation::{AnimationCue, AnimationPlayer, CueTracker, select_cue};
pub use camera::CameraRig;
pub use error::{SceneError, SettingsError};
pub use intent::{Action, InputSource, Motion, MotionIntents, decode};
pub use physics::{
    BodyDef, BodyId, Category, CollisionMask, PhysicsQueries, RapierWorld, RayHit, ShapeDef,
    SweepHit,
};
pub use scene::{Scene, SceneDef};
pub use sensor::{LocationKind, Sensor, SensorDef, SensorId, SensorRegistry};
pub use settings::{CameraSettings, WalkerSettings};
pub use simulation::Simulation;
pub use transform::{NodeId, TransformTree};
pub use walker::{Status, Walker, facing};
