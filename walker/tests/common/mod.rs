#![allow(dead_code)]

use walker::scene::{BodySpec, NodeDef, SensorSpec, SpawnDef};
use walker::{AnimationCue, AnimationPlayer, LocationKind, SceneDef, ShapeDef};

pub const DT: f32 = 0.05;

/// Swallows animation cues.
pub struct NullPlayer;

impl AnimationPlayer for NullPlayer {
    fn play(&mut self, _cue: AnimationCue) {}
}

pub fn cuboid(name: &str, pos: [f32; 3], half_extents: [f32; 3], categories: &[&str]) -> BodySpec {
    BodySpec {
        name: name.into(),
        node: None,
        pos,
        hpr: [0.0; 3],
        shape: ShapeDef::Cuboid { half_extents },
        categories: categories.iter().map(|c| c.to_string()).collect(),
    }
}

/// Flat ground whose top face is at z = 0.
pub fn flat_ground() -> BodySpec {
    cuboid("ground", [0.0, 0.0, -0.5], [50.0, 50.0, 0.5], &["ground"])
}

pub fn sensor(name: &str, kind: LocationKind, body: &str, destination: Option<&str>) -> SensorSpec {
    SensorSpec {
        name: name.into(),
        kind,
        body: body.into(),
        destination: destination.map(Into::into),
        room_camera: None,
    }
}

pub fn spawn_at(x: f32, y: f32) -> SpawnDef {
    SpawnDef {
        x,
        y,
        z: None,
        heading: 0.0,
    }
}

/// Surface ground (top at z = 0) with a 4x4 gap centered on (0, -10), a hole trigger in the
/// gap and a landing platform far below whose destination kind is `kind`.
///
/// The landing sensor's top face is at z = -19.5 and the platform's top at z = -20.
pub fn hole_scene(kind: LocationKind) -> SceneDef {
    let mut landing = sensor("landing", kind, "landing_trigger", None);
    if kind == LocationKind::Steps {
        landing.room_camera = Some([0.0, -10.0, -12.0]);
    }
    let floor_category = if kind == LocationKind::Steps {
        "room_floor"
    } else {
        "ground"
    };

    SceneDef {
        nodes: vec![NodeDef {
            name: "below".into(),
            parent: None,
            pos: [0.0, -10.0, -20.0],
            hpr: [0.0; 3],
        }],
        bodies: vec![
            cuboid("north", [0.0, 21.0, -0.5], [50.0, 29.0, 0.5], &["ground"]),
            cuboid("south", [0.0, -31.0, -0.5], [50.0, 19.0, 0.5], &["ground"]),
            cuboid("west", [-26.0, -10.0, -0.5], [24.0, 2.0, 0.5], &["ground"]),
            cuboid("east", [26.0, -10.0, -0.5], [24.0, 2.0, 0.5], &["ground"]),
            cuboid("hole_trigger", [0.0, -10.0, -1.0], [2.0, 2.0, 0.25], &["hole_sensor"]),
            BodySpec {
                node: Some("below".into()),
                ..cuboid("platform", [0.0, 0.0, -0.5], [10.0, 10.0, 0.5], &[floor_category])
            },
            BodySpec {
                node: Some("below".into()),
                ..cuboid("landing_trigger", [0.0, 0.0, 0.25], [10.0, 10.0, 0.25], &["landing_sensor"])
            },
        ],
        sensors: vec![
            sensor("hole", LocationKind::Hole, "hole_trigger", Some("landing")),
            landing,
        ],
        spawn: spawn_at(0.0, -6.1),
    }
}
