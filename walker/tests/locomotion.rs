mod common;

use common::{DT, NullPlayer, cuboid, flat_ground, hole_scene, sensor, spawn_at};
use walker::scene::{BodySpec, SpawnDef};
use walker::{
    Action, AnimationCue, CameraSettings, LocationKind, MotionIntents, SceneDef, Simulation,
    Status, WalkerSettings,
};

fn simulation(scene: SceneDef) -> Simulation {
    Simulation::new(
        scene.build().unwrap(),
        WalkerSettings::default(),
        CameraSettings::default(),
    )
    .unwrap()
}

fn forward() -> MotionIntents {
    MotionIntents::from_flags(&[Action::Forward])
}

/// Step until `done` holds, returning how many frames it took.
fn run_until(
    sim: &mut Simulation,
    intents: MotionIntents,
    max_frames: usize,
    done: impl Fn(&Simulation) -> bool,
) -> Option<usize> {
    for frame in 1..=max_frames {
        sim.step(DT, &intents, &mut NullPlayer);
        if done(sim) {
            return Some(frame);
        }
    }
    None
}

#[test]
fn spawns_and_walks_at_fixed_clearance() {
    let mut sim = simulation(SceneDef {
        bodies: vec![flat_ground()],
        spawn: spawn_at(0.0, 0.0),
        ..Default::default()
    });
    assert!((sim.walker().position().z - 1.5).abs() < 1.0e-4);

    let cue = sim.step(DT, &forward(), &mut NullPlayer);
    let pos = sim.walker().position();
    assert!((pos.y - -0.25).abs() < 1.0e-4);
    assert!((pos.z - 1.5).abs() < 1.0e-4);
    assert_eq!(cue, AnimationCue::Run { rate: 1.0 });
}

#[test]
fn step_without_ground_is_dropped() {
    let mut sim = simulation(SceneDef {
        spawn: SpawnDef {
            z: Some(5.0),
            ..spawn_at(1.0, 1.0)
        },
        ..Default::default()
    });
    let start = sim.walker().position();

    sim.step(DT, &forward(), &mut NullPlayer);
    assert_eq!(sim.walker().position(), start);
    assert_eq!(sim.walker().status(), Status::Moving);
}

#[test]
fn cliff_blocks_unless_over_a_tunnel() {
    let cliff = cuboid("cliff", [0.0, -1.2, 1.5], [5.0, 0.2, 1.5], &["cliff"]);

    let mut blocked = simulation(SceneDef {
        bodies: vec![flat_ground(), cliff.clone()],
        spawn: spawn_at(0.0, 0.0),
        ..Default::default()
    });
    run_until(&mut blocked, forward(), 20, |_| false);
    let y = blocked.walker().position().y;
    assert!((-0.5 - 1.0e-3..=-0.25 + 1.0e-3).contains(&y), "y = {y}");

    let mut tunnel = simulation(SceneDef {
        bodies: vec![
            flat_ground(),
            cliff,
            cuboid("tunnel_trigger", [0.0, -1.5, -1.0], [5.0, 2.0, 0.25], &["tunnel_sensor"]),
        ],
        sensors: vec![sensor("tunnel", LocationKind::Tunnel, "tunnel_trigger", None)],
        spawn: spawn_at(0.0, 0.0),
        ..Default::default()
    });
    run_until(&mut tunnel, forward(), 20, |_| false);
    assert!(tunnel.walker().position().y < -4.0);
}

#[test]
fn falls_through_hole_onto_mid_ground() {
    let mut sim = simulation(hole_scene(LocationKind::MidGround));
    let hole = sim.sensors().find_sensor_by_name("hole").unwrap();

    run_until(&mut sim, forward(), 20, |s| s.walker().status().is_descending())
        .expect("never reached the hole");
    assert_eq!(sim.walker().status(), Status::Falling { sensor: hole });
    let y = sim.walker().position().y;
    assert!(y < -8.0 && y > -8.6, "y = {y}");

    // Input is ignored until the avatar touches the landing sensor.
    let cue = sim.step(DT, &forward(), &mut NullPlayer);
    assert_eq!(cue, AnimationCue::Idle { pose_frame: 5 });
    assert_eq!(sim.walker().position().y, y);

    run_until(&mut sim, MotionIntents::empty(), 60, |s| {
        s.walker().status() == Status::Moving
    })
    .expect("never landed");
    let z = sim.walker().position().z;
    assert!((-19.6..=-17.9).contains(&z), "z = {z}");

    sim.step(DT, &forward(), &mut NullPlayer);
    assert!((sim.walker().position().z - -18.5).abs() < 1.0e-3);
}

#[test]
fn steps_lead_into_a_room_with_its_own_camera() {
    let mut sim = simulation(hole_scene(LocationKind::Steps));
    let landing = sim.sensors().find_sensor_by_name("landing").unwrap();

    run_until(&mut sim, forward(), 20, |s| s.walker().status().is_descending())
        .expect("never reached the hole");
    assert!(matches!(sim.walker().status(), Status::IntoRoom { .. }));

    run_until(&mut sim, MotionIntents::empty(), 60, |s| {
        s.walker().status() == Status::InRoom { room: landing }
    })
    .expect("never entered the room");

    // The surface hid the avatar on the way down.
    let anchor = nalgebra::Point3::new(0.0, -10.0, -12.0);
    assert!((sim.camera().position() - anchor).norm() < 1.0e-4);

    // Room floors count as ground inside.
    sim.step(DT, &forward(), &mut NullPlayer);
    assert!((sim.walker().position().z - -18.5).abs() < 1.0e-3);
    assert!(matches!(sim.walker().status(), Status::InRoom { .. }));
}

#[test]
fn walking_out_of_a_room_keeps_the_room_floor_underfoot() {
    let mut scene = hole_scene(LocationKind::Steps);
    // Way out on the room floor, 1 to 3 units past where the avatar lands.
    scene.bodies.push(BodySpec {
        node: Some("below".into()),
        ..cuboid("exit_trigger", [0.0, -2.0, 0.25], [2.0, 1.0, 0.25], &["hole_sensor"])
    });
    scene
        .sensors
        .push(sensor("exit", LocationKind::Hole, "exit_trigger", None));
    let mut sim = simulation(scene);

    run_until(&mut sim, forward(), 20, |s| s.walker().status().is_descending())
        .expect("never reached the hole");
    run_until(&mut sim, MotionIntents::empty(), 60, |s| {
        matches!(s.walker().status(), Status::InRoom { .. })
    })
    .expect("never entered the room");

    run_until(&mut sim, forward(), 30, |s| s.walker().status() == Status::Moving)
        .expect("never left the room");
    let y = sim.walker().position().y;
    assert!((-13.0..=-11.0).contains(&y), "left the room at y = {y}");

    // The avatar keeps walking across the room floor to its far edge.
    run_until(&mut sim, forward(), 40, |_| false);
    let pos = sim.walker().position();
    assert_eq!(sim.walker().status(), Status::Moving);
    assert!(pos.y < -19.5 && pos.y >= -20.0, "y = {}", pos.y);
    assert!((pos.z - -18.5).abs() < 1.0e-3, "z = {}", pos.z);
}

#[test]
fn sensor_pairing_round_trips_through_scene() {
    let scene = hole_scene(LocationKind::MidGround).build().unwrap();
    let hole = scene.sensors.find_sensor_by_name("hole").unwrap();
    let (dest, sensor) = scene.sensors.destination(hole).unwrap();

    assert_eq!(scene.sensors.find_sensor_by_name(&sensor.name), Some(dest));
    assert_eq!(
        scene.sensors.sensor_for_body(sensor.body),
        Some(dest)
    );
    assert_eq!(scene.world.body_by_name("landing_trigger"), Some(sensor.body));
}
