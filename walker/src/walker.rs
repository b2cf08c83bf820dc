/*!
Avatar locomotion.

One [`Walker::update`] per frame moves the avatar across the terrain, following these rules:

- On the surface (`Moving`), a candidate step is snapped onto the floor below it and then
  checked for walls with a sphere sweep. Holes found under the candidate either lead to a
  destination within the extended probe (the step lands on it) or start a descent.
- While descending (`Falling`, `EnteringTransition`, `IntoRoom`) input is ignored and the
  avatar drops at a constant speed until it touches the destination sensor of the hole it
  fell through.
- Inside a room (`InRoom`), steps never trigger holes, and standing over a hole sensor
  returns the avatar to `Moving`. Floors and walls are the same in both states, so the
  avatar keeps walking on the room floor after the switch.

Absence of a hit is never an error: no ground means the step is dropped for this frame.
*/

use nalgebra::{Point3, Vector3};

use crate::animation::{AnimationCue, select_cue};
use crate::intent::{MotionIntents, decode};
use crate::physics::{BodyId, CollisionMask, PhysicsQueries, mask};
use crate::sensor::{LocationKind, SensorId, SensorRegistry};
use crate::settings::WalkerSettings;

/// Locomotion state. Descent states remember the hole sensor that started them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Moving,
    /// Descending toward a destination that is neither mid ground nor a room.
    EnteringTransition { sensor: SensorId },
    Falling { sensor: SensorId },
    IntoRoom { sensor: SensorId },
    InRoom { room: SensorId },
}

impl Status {
    /// True while the avatar drops through a hole and ignores input.
    pub fn is_descending(&self) -> bool {
        matches!(
            self,
            Status::EnteringTransition { .. } | Status::Falling { .. } | Status::IntoRoom { .. }
        )
    }

    /// The hole sensor currently being responded to, if any.
    pub fn responded_sensor(&self) -> Option<SensorId> {
        match *self {
            Status::EnteringTransition { sensor }
            | Status::Falling { sensor }
            | Status::IntoRoom { sensor } => Some(sensor),
            Status::Moving | Status::InRoom { .. } => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Walker {
    position: Point3<f32>,
    /// Degrees about +Z. 0 faces -Y.
    heading: f32,
    status: Status,
    body: BodyId,
    settings: WalkerSettings,
}

impl Walker {
    pub fn new(body: BodyId, position: Point3<f32>, heading: f32, settings: WalkerSettings) -> Self {
        Self {
            position,
            heading,
            status: Status::Moving,
            body,
            settings,
        }
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn body(&self) -> BodyId {
        self.body
    }

    pub fn settings(&self) -> &WalkerSettings {
        &self.settings
    }

    /// Unit vector the avatar faces, in the XY plane.
    pub fn facing(&self) -> Vector3<f32> {
        facing(self.heading)
    }

    /// Advance one frame and return the animation cue for it.
    pub fn update(
        &mut self,
        physics: &impl PhysicsQueries,
        sensors: &SensorRegistry,
        dt: f32,
        intents: MotionIntents,
    ) -> AnimationCue {
        let dt = dt.max(0.0);
        let decoded = decode(intents);

        let motion = match self.status {
            Status::Moving => {
                self.turn(decoded.turn, dt);
                self.move_outside(physics, sensors, decoded.advance, dt);
                decoded.motion
            }
            Status::InRoom { .. } => {
                self.turn(decoded.turn, dt);
                self.move_inside(physics, sensors, decoded.advance, dt);
                decoded.motion
            }
            Status::EnteringTransition { sensor }
            | Status::Falling { sensor }
            | Status::IntoRoom { sensor } => {
                self.descend(physics, sensors, sensor, dt);
                None
            }
        };

        select_cue(motion)
    }

    /// Drop the avatar onto whatever `mask` finds under `(x, y)`.
    ///
    /// Casts from high above the scene to far below it. Returns the new position, or `None`
    /// (leaving the avatar untouched) if nothing is there.
    pub fn spawn_on_ground(
        &mut self,
        physics: &impl PhysicsQueries,
        x: f32,
        y: f32,
        mask: CollisionMask,
    ) -> Option<Point3<f32>> {
        let height = crate::constants::SPAWN_RAY_HEIGHT;
        let from = Point3::new(x, y, height);
        let to = Point3::new(x, y, -height);
        let hit = physics.raycast_closest(from, to, mask)?;

        self.position = Point3::new(x, y, hit.point.z + self.settings.ground_clearance);
        self.status = Status::Moving;
        log::info!("avatar spawned at {:?}", self.position);
        Some(self.position)
    }

    /// Debug helper: shift the avatar vertically without any checks.
    pub fn nudge_vertical(&mut self, dz: f32) {
        self.position.z += dz;
    }

    fn set_status(&mut self, status: Status) {
        if self.status != status {
            log::debug!("walker status {:?} -> {:?}", self.status, status);
            self.status = status;
        }
    }

    fn turn(&mut self, axis: f32, dt: f32) {
        if axis != 0.0 {
            self.heading = (self.heading + self.settings.turn_speed_deg * axis * dt) % 360.0;
        }
    }

    fn candidate(&self, advance: f32, dt: f32) -> Point3<f32> {
        let speed = if advance < 0.0 {
            self.settings.forward_speed
        } else {
            self.settings.backward_speed
        };
        self.position + self.facing() * (-advance) * speed * dt
    }

    fn move_outside(
        &mut self,
        physics: &impl PhysicsQueries,
        sensors: &SensorRegistry,
        advance: f32,
        dt: f32,
    ) {
        if advance == 0.0 {
            return;
        }

        let probe = self.settings.probe_distance;
        let mut candidate = self.candidate(advance, dt);
        let mut ground_z = None;

        // 1) A hole under the step either leads somewhere within reach or starts a descent.
        if let Some(hole) = sensors.check_downward_for_sensor(physics, candidate, probe, mask::HOLE)
        {
            match sensors.destination(hole) {
                Some((dest_id, dest)) => {
                    let reach = self.settings.extended_probe_distance;
                    match sensors.probe_sensor(physics, dest_id, candidate, reach) {
                        Some(hit) => ground_z = Some(hit.z),
                        None => {
                            self.position = candidate;
                            self.set_status(descent_for(dest.kind, hole));
                            return;
                        }
                    }
                }
                None => log::warn!("hole sensor {hole:?} has no destination, treating as ground"),
            }
        }

        // 2) Snap onto a floor; nothing below means no step this frame.
        let ground_z = match ground_z {
            Some(z) => z,
            None => match cast_down(physics, candidate, probe, mask::FLOORS) {
                Some(z) => z,
                None => return,
            },
        };
        candidate.z = ground_z + self.settings.ground_clearance;

        // 3) Walls stop the step unless it is a tunnel entrance.
        let blocked = physics
            .sweep_closest(
                self.settings.sweep_radius,
                self.position,
                candidate,
                mask::WALLS,
            )
            .is_some();
        if blocked
            && sensors
                .check_downward_for_sensor(physics, candidate, probe, mask::TUNNEL)
                .is_none()
        {
            return;
        }

        self.position = candidate;
    }

    fn move_inside(
        &mut self,
        physics: &impl PhysicsQueries,
        sensors: &SensorRegistry,
        advance: f32,
        dt: f32,
    ) {
        if advance == 0.0 {
            return;
        }

        let probe = self.settings.probe_distance;
        let mut candidate = self.candidate(advance, dt);
        let Some(ground_z) = cast_down(physics, candidate, probe, mask::FLOORS) else {
            return;
        };

        // Standing over the way out.
        if sensors
            .check_downward_for_sensor(physics, self.position, probe, mask::HOLE)
            .is_some()
        {
            self.set_status(Status::Moving);
        }

        candidate.z = ground_z + self.settings.ground_clearance;
        let blocked = physics
            .sweep_closest(
                self.settings.sweep_radius,
                self.position,
                candidate,
                mask::WALLS,
            )
            .is_some();
        if blocked {
            return;
        }

        self.position = candidate;
    }

    fn descend(
        &mut self,
        physics: &impl PhysicsQueries,
        sensors: &SensorRegistry,
        hole: SensorId,
        dt: f32,
    ) {
        let Some((dest_id, _)) = sensors.destination(hole) else {
            log::warn!("lost destination of {hole:?} while descending");
            self.set_status(Status::Moving);
            return;
        };

        if sensors.is_touching(physics, dest_id, self.body) {
            let next = match self.status {
                Status::IntoRoom { .. } => Status::InRoom { room: dest_id },
                _ => Status::Moving,
            };
            self.set_status(next);
            return;
        }

        self.position.z -= self.settings.fall_speed * dt;
    }
}

/// Facing direction for a heading in degrees. Heading 0 faces -Y; positive turns left.
pub fn facing(heading_deg: f32) -> Vector3<f32> {
    let (sin, cos) = heading_deg.to_radians().sin_cos();
    Vector3::new(sin, -cos, 0.0)
}

fn descent_for(kind: LocationKind, hole: SensorId) -> Status {
    match kind {
        LocationKind::MidGround => Status::Falling { sensor: hole },
        LocationKind::Steps => Status::IntoRoom { sensor: hole },
        _ => Status::EnteringTransition { sensor: hole },
    }
}

fn cast_down(
    physics: &impl PhysicsQueries,
    from: Point3<f32>,
    distance: f32,
    mask: CollisionMask,
) -> Option<f32> {
    physics
        .raycast_closest(from, from - Vector3::z() * distance, mask)
        .map(|hit| hit.point.z)
}
