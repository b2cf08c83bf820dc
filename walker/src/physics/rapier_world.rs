//! Rapier-based physics world.
//!
//! Builds an in-memory Rapier scene from body definitions and answers the
//! [`PhysicsQueries`](super::PhysicsQueries) contract against it.
//!
//! Design goals
//! - Deterministic: given the same inputs (sorted by `id`), build identical in-memory sets.
//! - Query-focused: no dynamics are simulated. Bodies are colliders placed directly in world
//!   space; the avatar is moved kinematically with [`RapierWorld::set_body_position`].
//! - Category masks live in each collider's `user_data`, so query filtering never needs a
//!   side lookup.

// Re-export Rapier so downstream crates can reach Rapier types without depending on it.
pub use rapier3d;

use std::collections::HashMap;

use rapier3d::na::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use rapier3d::parry::query::{self, ShapeCastOptions};
use rapier3d::prelude::*;
use serde::Deserialize;

use super::{BodyId, CollisionMask, PhysicsQueries, RayHit, SweepHit};
use crate::error::SceneError;

/// Canonical definition of a body to place in the world.
///
/// Conventions
/// - Units are scene units (the avatar is 3 units tall).
/// - Z is up.
/// - For planes, the normal is derived from the pose as `rotation * +Z`.
#[derive(Clone, Debug)]
pub struct BodyDef {
    /// Stable unique identifier used to ensure deterministic insertion order.
    pub id: u32,
    /// Unique name, used by scene data to refer to the body.
    pub name: String,
    pub translation: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub shape: ShapeDef,
    /// Categories this body belongs to.
    pub categories: CollisionMask,
}

impl BodyDef {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        pose: Isometry3<f32>,
        shape: ShapeDef,
        categories: CollisionMask,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            translation: pose.translation.vector,
            rotation: pose.rotation,
            shape,
            categories,
        }
    }
}

/// Supported collider shapes. Axis-aligned variants run along local +Z.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeDef {
    /// Infinite plane (half-space), offset along its normal.
    Plane {
        #[serde(default)]
        offset_along_normal: f32,
    },

    /// Oriented cuboid with given half-extents.
    Cuboid { half_extents: [f32; 3] },

    Ball { radius: f32 },

    /// Z-aligned capsule. `half_height` is half the length of the cylindrical section.
    CapsuleZ { radius: f32, half_height: f32 },

    /// Z-aligned cylinder.
    CylinderZ { radius: f32, half_height: f32 },

    /// Rounded cuboid; `border_radius` rounds all edges/corners.
    RoundCuboid {
        half_extents: [f32; 3],
        border_radius: f32,
    },
}

/// In-memory Rapier structures needed for scene queries.
///
/// This stores:
/// - `ColliderSet` holding every body (terrain pieces, sensors, the avatar).
/// - `BroadPhaseBvh` and `NarrowPhase` used to create a borrowed `QueryPipeline`.
/// - Two-way maps between [`BodyId`] and Rapier's `ColliderHandle`.
pub struct RapierWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    handles: HashMap<BodyId, ColliderHandle>,
    ids: HashMap<ColliderHandle, BodyId>,
    names: HashMap<String, BodyId>,
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            handles: HashMap::new(),
            ids: HashMap::new(),
            names: HashMap::new(),
        }
    }
}

impl RapierWorld {
    /// Build a world from a list of body definitions.
    ///
    /// The input is sorted by `id` before insertion. Duplicate ids or names are rejected.
    pub fn build(mut defs: Vec<BodyDef>) -> Result<Self, SceneError> {
        defs.sort_by_key(|d| d.id);

        let mut world = Self::default();
        let mut inserted = Vec::with_capacity(defs.len());
        for def in defs {
            inserted.push(world.insert(def)?);
        }
        world.refresh(&inserted, &[]);

        log::info!("physics world built with {} bodies", world.len());
        Ok(world)
    }

    /// Register a new body after the world was built.
    pub fn attach(&mut self, def: BodyDef) -> Result<BodyId, SceneError> {
        let id = BodyId(def.id);
        let handle = self.insert(def)?;
        self.refresh(&[handle], &[]);
        Ok(id)
    }

    /// Remove a body. Returns false if it was not registered.
    pub fn detach(&mut self, id: BodyId) -> bool {
        let Some(handle) = self.handles.remove(&id) else {
            return false;
        };
        self.ids.remove(&handle);
        self.names.retain(|_, v| *v != id);
        self.colliders
            .remove(handle, &mut self.islands, &mut self.bodies, false);
        self.refresh(&[], &[handle]);
        true
    }

    /// Move a body (typically the avatar) to a new world position, keeping its rotation.
    pub fn set_body_position(&mut self, id: BodyId, position: Point3<f32>) {
        let Some(&handle) = self.handles.get(&id) else {
            log::warn!("set_body_position: unknown body {id:?}");
            return;
        };
        if let Some(collider) = self.colliders.get_mut(handle) {
            collider.set_translation(position.coords);
        }
        self.refresh(&[handle], &[]);
    }

    pub fn body_by_name(&self, name: &str) -> Option<BodyId> {
        self.names.get(name).copied()
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.handles.contains_key(&id)
    }

    pub fn categories(&self, id: BodyId) -> Option<CollisionMask> {
        self.collider(id).map(categories_of)
    }

    pub fn position(&self, id: BodyId) -> Option<Point3<f32>> {
        self.collider(id)
            .map(|co| Point3::from(co.position().translation.vector))
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    fn collider(&self, id: BodyId) -> Option<&Collider> {
        self.handles
            .get(&id)
            .and_then(|handle| self.colliders.get(*handle))
    }

    fn insert(&mut self, def: BodyDef) -> Result<ColliderHandle, SceneError> {
        let id = BodyId(def.id);
        if self.handles.contains_key(&id) {
            return Err(SceneError::DuplicateBodyId(def.id));
        }
        if self.names.contains_key(&def.name) {
            return Err(SceneError::DuplicateBodyName(def.name));
        }

        let handle = self.colliders.insert(collider_from_def(&def));
        self.handles.insert(id, handle);
        self.ids.insert(handle, id);
        self.names.insert(def.name, id);
        Ok(handle)
    }

    /// Push collider changes into the broad phase so the next query sees them.
    fn refresh(&mut self, modified: &[ColliderHandle], removed: &[ColliderHandle]) {
        let mut events = Vec::new();
        self.broad_phase.update(
            &IntegrationParameters::default(),
            &self.colliders,
            &self.bodies,
            modified,
            removed,
            &mut events,
        );
    }

    /// Create a borrowed `QueryPipeline` view restricted by `filter`.
    fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }
}

impl PhysicsQueries for RapierWorld {
    fn raycast_closest(
        &self,
        from: Point3<f32>,
        to: Point3<f32>,
        mask: CollisionMask,
    ) -> Option<RayHit> {
        let dir = to - from;
        if dir.norm_squared() <= f32::EPSILON {
            return None;
        }

        let predicate = |_: ColliderHandle, co: &Collider| categories_of(co).intersects(mask);
        let pipeline = self.query_pipeline(QueryFilter::default().predicate(&predicate));

        // Unnormalized direction: time of impact is the fraction of the segment.
        let ray = Ray::new(from, dir);
        let (handle, toi) = pipeline.cast_ray(&ray, 1.0, true)?;
        let body = *self.ids.get(&handle)?;
        let collider = self.colliders.get(handle)?;

        Some(RayHit {
            point: ray.point_at(toi),
            body,
            mask: categories_of(collider),
        })
    }

    fn sweep_closest(
        &self,
        radius: f32,
        from: Point3<f32>,
        to: Point3<f32>,
        mask: CollisionMask,
    ) -> Option<SweepHit> {
        let predicate = |_: ColliderHandle, co: &Collider| categories_of(co).intersects(mask);
        let pipeline = self.query_pipeline(QueryFilter::default().predicate(&predicate));

        let probe = Ball::new(radius);
        let start = Isometry3::from_parts(Translation3::from(from.coords), UnitQuaternion::identity());
        let vel = to - from;

        let mut options = ShapeCastOptions::with_max_time_of_impact(1.0);
        options.stop_at_penetration = true;

        let (handle, hit) = pipeline.cast_shape(&start, &vel, &probe, options)?;
        let body = *self.ids.get(&handle)?;

        Some(SweepHit {
            body,
            fraction: hit.time_of_impact,
        })
    }

    fn contact_test(&self, a: BodyId, b: BodyId) -> bool {
        let (Some(first), Some(second)) = (self.collider(a), self.collider(b)) else {
            return false;
        };

        query::intersection_test(
            first.position(),
            first.shape(),
            second.position(),
            second.shape(),
        )
        .unwrap_or(false)
    }
}

fn categories_of(collider: &Collider) -> CollisionMask {
    CollisionMask::new(collider.user_data as u32)
}

/// Build a Rapier collider from a `BodyDef`, placed directly in world space.
fn collider_from_def(def: &BodyDef) -> Collider {
    let pose = Isometry3::from_parts(Translation3::from(def.translation), def.rotation);
    // Rapier's round/cylinder primitives run along +Y; this turns +Y onto +Z.
    let y_to_z = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), std::f32::consts::FRAC_PI_2);

    let (builder, pose) = match &def.shape {
        ShapeDef::Plane {
            offset_along_normal,
        } => {
            // World-space normal n = R * +Z. The half-space sits at the pose translation,
            // pushed along n by the offset. Its local normal is already in world space.
            let n = def.rotation * Vector3::z();
            // Rapier's half-space expects a `UnitVector<Real>`, not a raw vector.
            let unit_n = UnitVector::new_normalize(n);
            let origin = def.translation + unit_n.into_inner() * *offset_along_normal;
            (
                ColliderBuilder::new(SharedShape::new(HalfSpace::new(unit_n))),
                Isometry3::from_parts(Translation3::from(origin), UnitQuaternion::identity()),
            )
        }

        ShapeDef::Cuboid { half_extents } => (
            ColliderBuilder::cuboid(half_extents[0], half_extents[1], half_extents[2]),
            pose,
        ),

        ShapeDef::Ball { radius } => (ColliderBuilder::ball(*radius), pose),

        ShapeDef::CapsuleZ {
            radius,
            half_height,
        } => (ColliderBuilder::capsule_z(*half_height, *radius), pose),

        ShapeDef::CylinderZ {
            radius,
            half_height,
        } => (
            ColliderBuilder::cylinder(*half_height, *radius),
            pose * y_to_z,
        ),

        ShapeDef::RoundCuboid {
            half_extents,
            border_radius,
        } => (
            ColliderBuilder::round_cuboid(
                half_extents[0],
                half_extents[1],
                half_extents[2],
                *border_radius,
            ),
            pose,
        ),
    };

    let mut collider = builder.user_data(def.categories.bits as u128).build();
    collider.set_position(pose);
    collider
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::mask::{self, Category};

    fn slab(id: u32, name: &str, z: f32, categories: CollisionMask) -> BodyDef {
        BodyDef::new(
            id,
            name,
            Isometry3::translation(0.0, 0.0, z),
            ShapeDef::Cuboid {
                half_extents: [20.0, 20.0, 0.5],
            },
            categories,
        )
    }

    #[test]
    fn build_rejects_duplicate_ids_and_names() {
        let dup_id = RapierWorld::build(vec![
            slab(1, "a", 0.0, mask::WALKABLE),
            slab(1, "b", 0.0, mask::WALKABLE),
        ]);
        assert!(matches!(dup_id, Err(SceneError::DuplicateBodyId(1))));

        let dup_name = RapierWorld::build(vec![
            slab(1, "a", 0.0, mask::WALKABLE),
            slab(2, "a", 0.0, mask::WALKABLE),
        ]);
        assert!(matches!(dup_name, Err(SceneError::DuplicateBodyName(_))));
    }

    #[test]
    fn raycast_only_sees_matching_categories() {
        let world = RapierWorld::build(vec![
            slab(1, "upper", 0.0, mask::BLOCKING),
            slab(2, "lower", -10.0, mask::WALKABLE),
        ])
        .unwrap();

        let from = Point3::new(0.0, 0.0, 5.0);
        let to = Point3::new(0.0, 0.0, -20.0);

        let hit = world.raycast_closest(from, to, mask::WALKABLE).unwrap();
        assert_eq!(hit.body, BodyId(2));
        assert!((hit.point.z - -9.5).abs() < 1.0e-4);
        assert!(hit.mask.has(Category::Ground));

        let hit = world.raycast_closest(from, to, mask::BLOCKING).unwrap();
        assert_eq!(hit.body, BodyId(1));
        assert!((hit.point.z - 0.5).abs() < 1.0e-4);

        assert!(world.raycast_closest(from, to, mask::HOLE).is_none());
    }

    #[test]
    fn plane_sits_at_offset_along_normal() {
        let plane = BodyDef::new(
            1,
            "floor",
            Isometry3::translation(0.0, 0.0, -2.0),
            ShapeDef::Plane {
                offset_along_normal: 0.5,
            },
            mask::WALKABLE,
        );
        let world = RapierWorld::build(vec![plane]).unwrap();

        let hit = world
            .raycast_closest(
                Point3::new(3.0, 4.0, 5.0),
                Point3::new(3.0, 4.0, -10.0),
                mask::WALKABLE,
            )
            .unwrap();
        assert!((hit.point.z - -1.5).abs() < 1.0e-4);
    }

    #[test]
    fn raycast_stops_at_segment_end() {
        let world = RapierWorld::build(vec![slab(1, "floor", -10.0, mask::WALKABLE)]).unwrap();
        let short = world.raycast_closest(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, -5.0),
            mask::WALKABLE,
        );
        assert!(short.is_none());
    }

    #[test]
    fn sweep_reports_first_blocking_body() {
        let wall = BodyDef::new(
            7,
            "wall",
            Isometry3::translation(0.0, -3.0, 0.0),
            ShapeDef::Cuboid {
                half_extents: [5.0, 0.5, 5.0],
            },
            mask::BLOCKING,
        );
        let world = RapierWorld::build(vec![wall]).unwrap();

        let hit = world
            .sweep_closest(
                0.5,
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, -5.0, 0.0),
                mask::BLOCKING,
            )
            .unwrap();
        assert_eq!(hit.body, BodyId(7));
        assert!(hit.fraction > 0.0 && hit.fraction < 1.0);

        let miss = world.sweep_closest(
            0.5,
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, -5.0, 0.0),
            mask::ROOM_BLOCKING,
        );
        assert!(miss.is_none());
    }

    #[test]
    fn contact_test_follows_moved_body() {
        let sensor = BodyDef::new(
            1,
            "pad",
            Isometry3::translation(0.0, 0.0, -10.0),
            ShapeDef::Cuboid {
                half_extents: [2.0, 2.0, 0.5],
            },
            mask::LANDING,
        );
        let avatar = BodyDef::new(
            2,
            "avatar",
            Isometry3::translation(0.0, 0.0, 0.0),
            ShapeDef::CapsuleZ {
                radius: 0.6,
                half_height: 0.9,
            },
            mask::AVATAR,
        );
        let mut world = RapierWorld::build(vec![sensor, avatar]).unwrap();

        assert!(!world.contact_test(BodyId(2), BodyId(1)));
        world.set_body_position(BodyId(2), Point3::new(0.0, 0.0, -8.5));
        assert!(world.contact_test(BodyId(2), BodyId(1)));
        assert!(!world.contact_test(BodyId(2), BodyId(99)));
    }

    #[test]
    fn attached_body_is_visible_to_queries() {
        let mut world = RapierWorld::build(vec![slab(1, "floor", -2.0, mask::WALKABLE)]).unwrap();
        let from = Point3::new(0.0, 0.0, 5.0);
        let to = Point3::new(0.0, 0.0, -5.0);
        assert!(world.raycast_closest(from, to, mask::ROOM_WALKABLE).is_none());

        let id = world
            .attach(slab(2, "room_floor", 1.0, mask::ROOM_WALKABLE))
            .unwrap();
        assert_eq!(id, BodyId(2));
        assert_eq!(world.len(), 2);
        assert_eq!(world.body_by_name("room_floor"), Some(id));

        let hit = world.raycast_closest(from, to, mask::ROOM_WALKABLE).unwrap();
        assert_eq!(hit.body, id);
        assert!((hit.point.z - 1.5).abs() < 1.0e-4);

        assert!(matches!(
            world.attach(slab(2, "other", 0.0, mask::WALKABLE)),
            Err(SceneError::DuplicateBodyId(2))
        ));
    }

    #[test]
    fn detach_removes_body_from_queries() {
        let mut world = RapierWorld::build(vec![slab(1, "floor", -2.0, mask::WALKABLE)]).unwrap();
        let from = Point3::new(0.0, 0.0, 0.0);
        let to = Point3::new(0.0, 0.0, -5.0);
        assert!(world.raycast_closest(from, to, mask::WALKABLE).is_some());

        assert!(world.detach(BodyId(1)));
        assert!(!world.detach(BodyId(1)));
        assert!(world.raycast_closest(from, to, mask::WALKABLE).is_none());
        assert!(world.body_by_name("floor").is_none());
    }
}
