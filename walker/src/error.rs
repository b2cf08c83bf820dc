//! Setup-time errors.
//!
//! Nothing in the per-frame update returns an error: a missing hit means "don't move".
//! Broken scene data is caught here instead, while the world is being built.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("duplicate body id {0}")]
    DuplicateBodyId(u32),

    #[error("duplicate body name `{0}`")]
    DuplicateBodyName(String),

    #[error("duplicate sensor name `{0}`")]
    DuplicateSensor(String),

    #[error("sensor `{sensor}` refers to unknown destination `{destination}`")]
    UnknownDestination { sensor: String, destination: String },

    #[error("sensor `{0}` uses itself as its destination")]
    SelfDestination(String),

    #[error("sensor `{0}` leads into a room but its destination has no room camera anchor")]
    MissingRoomCamera(String),

    #[error("sensor `{0}` has no body in the physics world")]
    MissingSensorBody(String),

    #[error("sensor `{sensor}` must carry exactly one sensor category, found {bits:#b}")]
    InvalidSensorMask { sensor: String, bits: u32 },

    #[error("body `{body}` has unknown category `{category}`")]
    UnknownCategory { body: String, category: String },

    #[error("body `{0}` has no categories")]
    NoCategories(String),

    #[error("node `{0}` is declared more than once")]
    DuplicateNode(String),

    #[error("node `{node}` has unknown parent `{parent}`")]
    UnknownParent { node: String, parent: String },

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("`{name}` must be finite and greater than zero, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("camera search needs at least one probe")]
    NoCameraProbes,
}
