//! Named trigger zones and their pairings.
//!
//! A sensor is a body in the physics world tagged with exactly one sensor category (hole,
//! tunnel or landing). Hole sensors point at a destination sensor, which tells the walker
//! where a descent ends and what happens when it gets there. Pairings are index handles
//! resolved once at build time.

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};
use serde::Deserialize;

use crate::error::SceneError;
use crate::physics::{BodyId, CollisionMask, PhysicsQueries, mask};

/// What kind of place a sensor marks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Hole,
    Basement,
    Tunnel,
    MidGround,
    Steps,
}

/// Index of a sensor inside its [`SensorRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SensorId(pub usize);

#[derive(Clone, Debug, PartialEq)]
pub struct Sensor {
    pub name: String,
    pub kind: LocationKind,
    pub body: BodyId,
    /// The single sensor category carried by `body`.
    pub mask: CollisionMask,
    pub destination: Option<SensorId>,
    /// Where the camera parks once the avatar is inside the room this sensor leads to.
    pub room_camera: Option<Point3<f32>>,
}

/// Unresolved sensor description, as produced by the scene builder.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorDef {
    pub name: String,
    pub kind: LocationKind,
    pub body: BodyId,
    pub destination: Option<String>,
    pub room_camera: Option<Point3<f32>>,
}

#[derive(Debug, Default)]
pub struct SensorRegistry {
    sensors: Vec<Sensor>,
    by_name: HashMap<String, SensorId>,
    by_body: HashMap<BodyId, SensorId>,
}

impl SensorRegistry {
    /// Resolve and validate sensor definitions.
    ///
    /// `categories` reports the categories of a registered body, or `None` if the body is not
    /// in the physics world.
    pub fn build<F>(defs: Vec<SensorDef>, categories: F) -> Result<Self, SceneError>
    where
        F: Fn(BodyId) -> Option<CollisionMask>,
    {
        let sensor_bits = mask::HOLE | mask::TUNNEL | mask::LANDING;
        let mut registry = Self::default();

        for def in &defs {
            if registry.by_name.contains_key(&def.name) {
                return Err(SceneError::DuplicateSensor(def.name.clone()));
            }

            let body_categories = categories(def.body)
                .ok_or_else(|| SceneError::MissingSensorBody(def.name.clone()))?;
            let sensor_mask = CollisionMask::new(body_categories.bits & sensor_bits.bits);
            if sensor_mask.bits.count_ones() != 1 {
                return Err(SceneError::InvalidSensorMask {
                    sensor: def.name.clone(),
                    bits: body_categories.bits,
                });
            }

            let id = SensorId(registry.sensors.len());
            registry.by_name.insert(def.name.clone(), id);
            registry.by_body.insert(def.body, id);
            registry.sensors.push(Sensor {
                name: def.name.clone(),
                kind: def.kind,
                body: def.body,
                mask: sensor_mask,
                destination: None,
                room_camera: def.room_camera,
            });
        }

        // Second pass: every name is known now.
        for (index, def) in defs.iter().enumerate() {
            let Some(target) = &def.destination else {
                continue;
            };
            let destination = registry.find_sensor_by_name(target).ok_or_else(|| {
                SceneError::UnknownDestination {
                    sensor: def.name.clone(),
                    destination: target.clone(),
                }
            })?;
            if destination.0 == index {
                return Err(SceneError::SelfDestination(def.name.clone()));
            }

            let dest = &registry.sensors[destination.0];
            if dest.kind == LocationKind::Steps && dest.room_camera.is_none() {
                return Err(SceneError::MissingRoomCamera(def.name.clone()));
            }
            registry.sensors[index].destination = Some(destination);
        }

        log::debug!("sensor registry built with {} sensors", registry.len());
        Ok(registry)
    }

    pub fn find_sensor_by_name(&self, name: &str) -> Option<SensorId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, id: SensorId) -> Option<&Sensor> {
        self.sensors.get(id.0)
    }

    /// Sensor owning `body`, if any.
    pub fn sensor_for_body(&self, body: BodyId) -> Option<SensorId> {
        self.by_body.get(&body).copied()
    }

    /// The paired destination of `id`.
    pub fn destination(&self, id: SensorId) -> Option<(SensorId, &Sensor)> {
        let dest = self.get(id)?.destination?;
        Some((dest, self.get(dest)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (SensorId, &Sensor)> {
        self.sensors
            .iter()
            .enumerate()
            .map(|(index, sensor)| (SensorId(index), sensor))
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// Cast straight down from `from` and return the sensor owning the nearest hit body.
    pub fn check_downward_for_sensor(
        &self,
        physics: &impl PhysicsQueries,
        from: Point3<f32>,
        distance: f32,
        mask: CollisionMask,
    ) -> Option<SensorId> {
        let to = from - Vector3::z() * distance;
        let hit = physics.raycast_closest(from, to, mask)?;
        self.sensor_for_body(hit.body)
    }

    /// Cast straight down and report the hit point only if it lands on this sensor's own body.
    pub fn probe_sensor(
        &self,
        physics: &impl PhysicsQueries,
        id: SensorId,
        from: Point3<f32>,
        distance: f32,
    ) -> Option<Point3<f32>> {
        let sensor = self.get(id)?;
        let to = from - Vector3::z() * distance;
        let hit = physics.raycast_closest(from, to, sensor.mask)?;
        (hit.body == sensor.body).then_some(hit.point)
    }

    /// Whether `body` currently overlaps the sensor's trigger volume.
    pub fn is_touching(&self, physics: &impl PhysicsQueries, id: SensorId, body: BodyId) -> bool {
        self.get(id)
            .is_some_and(|sensor| physics.contact_test(body, sensor.body))
    }
}
