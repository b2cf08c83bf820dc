/*!
Follow camera.

The camera always looks at the floater, a point a few units above the avatar. How it moves
depends on the walker's status:

- Moving: follow at the remembered offset. If terrain hides the avatar, try the default view
  behind the avatar and then the current offset rotated about +Z in widening steps
  (+10, -10, +20, ...). The first unobstructed candidate becomes the new offset.
- Falling / entering a transition: keep the height and pull in horizontally over the avatar.
- Into / inside a room: stay put; if the view gets blocked, jump to the room's camera anchor.
*/

use nalgebra::{Isometry3, Point3, UnitQuaternion, Vector3};

use crate::physics::{BodyId, PhysicsQueries, mask};
use crate::sensor::{SensorId, SensorRegistry};
use crate::settings::CameraSettings;
use crate::walker::{Status, Walker};

#[derive(Clone, Debug)]
pub struct CameraRig {
    position: Point3<f32>,
    look_at: Point3<f32>,
    /// Offset from the avatar used while following outdoors.
    offset: Vector3<f32>,
    /// Seconds the current drag has been held.
    drag_time: f32,
    settings: CameraSettings,
}

impl CameraRig {
    pub fn new(avatar: Point3<f32>, settings: CameraSettings) -> Self {
        let offset = Vector3::from(settings.initial_offset);
        let look_at = avatar + Vector3::z() * settings.floater_height;
        Self {
            position: avatar + offset,
            look_at,
            offset,
            drag_time: 0.0,
            settings,
        }
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn look_at(&self) -> Point3<f32> {
        self.look_at
    }

    pub fn offset(&self) -> Vector3<f32> {
        self.offset
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Right-handed view transform (world to camera) looking at the floater with +Z up.
    pub fn view(&self) -> Isometry3<f32> {
        let dir = self.look_at - self.position;
        // Looking straight down: +Z is degenerate as an up vector.
        let up = if dir.xy().norm_squared() < 1.0e-8 {
            Vector3::y()
        } else {
            Vector3::z()
        };
        Isometry3::look_at_rh(&self.position, &self.look_at, &up)
    }

    /// Camera orientation in world space.
    pub fn rotation(&self) -> UnitQuaternion<f32> {
        self.view().rotation.inverse()
    }

    pub fn update(
        &mut self,
        physics: &impl PhysicsQueries,
        sensors: &SensorRegistry,
        walker: &Walker,
        dt: f32,
    ) {
        let avatar = walker.position();

        match walker.status() {
            Status::Moving => self.follow(physics, walker),
            Status::Falling { .. } | Status::EnteringTransition { .. } => {
                self.watch_falling(avatar, dt.max(0.0))
            }
            Status::IntoRoom { sensor } => {
                let anchor = sensors.destination(sensor).map(|(id, _)| id);
                self.stay_in_room(physics, sensors, walker, anchor);
            }
            Status::InRoom { room } => self.stay_in_room(physics, sensors, walker, Some(room)),
        }

        self.look_at = avatar + Vector3::z() * self.settings.floater_height;
    }

    /// Rotate the remembered offset while the camera is being dragged.
    ///
    /// `delta_x` / `delta_y` are pointer movements since the last call; only their sign
    /// matters. Nothing happens until the drag has been held for the threshold time.
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32, dt: f32) -> bool {
        self.drag_time += dt.max(0.0);
        if self.drag_time < self.settings.orbit_drag_threshold {
            return false;
        }

        let step = (self.settings.orbit_speed_deg * dt).to_radians();
        let yaw = if delta_x < 0.0 {
            -step
        } else if delta_x > 0.0 {
            step
        } else {
            0.0
        };
        let pitch = if delta_y < -0.01 {
            step
        } else if delta_y > 0.01 {
            -step
        } else {
            0.0
        };

        let mut offset = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), yaw) * self.offset;
        if pitch != 0.0 {
            if let Some(axis) = Vector3::z().cross(&offset).try_normalize(1.0e-6) {
                let pitched = UnitQuaternion::from_scaled_axis(axis * pitch) * offset;
                // Stay off the vertical so the horizontal axis stays defined.
                if pitched.xy().norm() > 0.1 * pitched.norm() {
                    offset = pitched;
                }
            }
        }

        self.offset = offset;
        true
    }

    /// End the current drag.
    pub fn release(&mut self) {
        self.drag_time = 0.0;
    }

    /// First unobstructed candidate position for the camera, if any.
    pub fn search(&self, physics: &impl PhysicsQueries, walker: &Walker) -> Option<Point3<f32>> {
        let avatar = walker.position();
        let heading = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), walker.heading().to_radians());
        search_candidates(
            avatar + heading * Vector3::from(self.settings.default_view_offset),
            avatar,
            self.offset,
            self.settings.search_step_deg,
        )
        .take(self.settings.search_probes)
        .find(|candidate| has_line_of_sight(physics, *candidate, avatar, walker.body()))
    }

    fn follow(&mut self, physics: &impl PhysicsQueries, walker: &Walker) {
        let avatar = walker.position();
        let wanted = avatar + self.offset;

        if !has_line_of_sight(physics, wanted, avatar, walker.body()) {
            if let Some(next) = self.search(physics, walker) {
                log::debug!("camera view blocked, moved to {next:?}");
                self.position = next;
                self.offset = next - avatar;
                return;
            }
            log::debug!("camera view blocked and no clear position found");
        }

        self.position = wanted;
    }

    fn watch_falling(&mut self, avatar: Point3<f32>, dt: f32) {
        let pull = (dt * self.settings.falling_damping).min(1.0);
        let diff = self.position.xy() - avatar.xy();
        self.position.x -= diff.x * pull;
        self.position.y -= diff.y * pull;
    }

    fn stay_in_room(
        &mut self,
        physics: &impl PhysicsQueries,
        sensors: &SensorRegistry,
        walker: &Walker,
        room: Option<SensorId>,
    ) {
        if has_line_of_sight(physics, self.position, walker.position(), walker.body()) {
            return;
        }

        match room.and_then(|id| sensors.get(id)).and_then(|s| s.room_camera) {
            Some(anchor) => {
                log::debug!("camera view blocked in room, snapping to {anchor:?}");
                self.position = anchor;
            }
            None => log::warn!("camera view blocked in room without a camera anchor"),
        }
    }
}

/// True when nothing but the avatar lies between `from` and the avatar.
fn has_line_of_sight(
    physics: &impl PhysicsQueries,
    from: Point3<f32>,
    avatar: Point3<f32>,
    avatar_body: BodyId,
) -> bool {
    physics
        .raycast_closest(from, avatar, mask::CAMERA_OCCLUDERS)
        .is_none_or(|hit| hit.body == avatar_body)
}

/// Candidate camera positions: the default view, then `current` rotated about +Z around the
/// avatar by +step, -step, +2 step, -2 step, ...
fn search_candidates(
    default_view: Point3<f32>,
    avatar: Point3<f32>,
    current: Vector3<f32>,
    step_deg: f32,
) -> impl Iterator<Item = Point3<f32>> {
    let rotated = (0usize..).map(move |i| {
        let n = (i / 2 + 1) as f32;
        let angle = if i % 2 == 0 { step_deg * n } else { -step_deg * n };
        avatar + UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angle.to_radians()) * current
    });
    std::iter::once(default_view).chain(rotated)
}
