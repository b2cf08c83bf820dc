mod common;

use common::{DT, NullPlayer, cuboid, flat_ground, spawn_at};
use nalgebra::{UnitQuaternion, Vector3};
use walker::{CameraSettings, MotionIntents, SceneDef, Simulation, WalkerSettings};

fn simulation(scene: SceneDef) -> Simulation {
    Simulation::new(
        scene.build().unwrap(),
        WalkerSettings::default(),
        CameraSettings::default(),
    )
    .unwrap()
}

#[test]
fn clear_view_keeps_following() {
    let mut sim = simulation(SceneDef {
        bodies: vec![flat_ground()],
        spawn: spawn_at(0.0, 0.0),
        ..Default::default()
    });

    sim.step(DT, &MotionIntents::empty(), &mut NullPlayer);
    let expected = sim.walker().position() + Vector3::new(0.0, 5.0, 1.0);
    assert!((sim.camera().position() - expected).norm() < 1.0e-4);
    assert!((sim.camera().look_at() - (sim.walker().position() + Vector3::z() * 3.0)).norm() < 1.0e-4);
}

#[test]
fn blocked_view_rotates_to_first_clear_candidate() {
    let mut sim = simulation(SceneDef {
        bodies: vec![
            flat_ground(),
            // Narrow post between the avatar and the default camera position.
            cuboid("post", [0.0, 3.0, 5.0], [0.3, 0.5, 5.0], &["cliff"]),
        ],
        spawn: spawn_at(0.0, 0.0),
        ..Default::default()
    });

    sim.step(DT, &MotionIntents::empty(), &mut NullPlayer);

    let expected = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 10.0f32.to_radians())
        * Vector3::new(0.0, 5.0, 1.0);
    assert!(
        (sim.camera().offset() - expected).norm() < 1.0e-3,
        "offset {:?}",
        sim.camera().offset()
    );
    let avatar = sim.walker().position();
    assert!((sim.camera().position() - (avatar + expected)).norm() < 1.0e-3);
}

#[test]
fn enclosed_avatar_keeps_remembered_offset() {
    let mut sim = simulation(SceneDef {
        bodies: vec![
            flat_ground(),
            cuboid("wall_n", [0.0, 2.0, 5.0], [3.0, 0.2, 5.0], &["cliff"]),
            cuboid("wall_s", [0.0, -2.0, 5.0], [3.0, 0.2, 5.0], &["cliff"]),
            cuboid("wall_e", [2.0, 0.0, 5.0], [0.2, 3.0, 5.0], &["cave_wall"]),
            cuboid("wall_w", [-2.0, 0.0, 5.0], [0.2, 3.0, 5.0], &["cave_wall"]),
        ],
        spawn: spawn_at(0.0, 0.0),
        ..Default::default()
    });
    let before = sim.camera().offset();

    sim.step(DT, &MotionIntents::empty(), &mut NullPlayer);

    assert_eq!(sim.camera().offset(), before);
    let avatar = sim.walker().position();
    assert!((sim.camera().position() - (avatar + before)).norm() < 1.0e-4);
}
