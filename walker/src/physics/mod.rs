/*!
Physics query facade.

The walker and the camera never talk to the physics engine directly. They go through
[`PhysicsQueries`], a small synchronous contract over an externally owned world:

- ray cast:     nearest hit along a segment
- sweep:        first blocking contact of a small sphere moved between two points
- contact test: do two registered bodies currently overlap

Every query is mask-selective (see [`mask`]). None of them mutate the world; absence of a hit
is a normal answer, never an error.
*/

pub mod mask;
pub mod rapier_world;

use nalgebra::Point3;

pub use mask::{Category, CollisionMask};
pub use rapier_world::{BodyDef, RapierWorld, ShapeDef};

/// Stable identity of a body registered with the physics world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// Nearest intersection returned by [`PhysicsQueries::raycast_closest`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// World-space impact point.
    pub point: Point3<f32>,
    /// Body that was struck.
    pub body: BodyId,
    /// Categories of the struck body.
    pub mask: CollisionMask,
}

/// First blocking contact returned by [`PhysicsQueries::sweep_closest`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepHit {
    pub body: BodyId,
    /// Fraction (0..1) of the swept segment travelled before contact.
    pub fraction: f32,
}

/// Synchronous, read-only queries against the physics world.
pub trait PhysicsQueries {
    /// Nearest hit on the segment `from -> to` against bodies whose categories intersect `mask`.
    fn raycast_closest(
        &self,
        from: Point3<f32>,
        to: Point3<f32>,
        mask: CollisionMask,
    ) -> Option<RayHit>;

    /// Move a sphere of `radius` from `from` to `to` and report the first blocking contact.
    fn sweep_closest(
        &self,
        radius: f32,
        from: Point3<f32>,
        to: Point3<f32>,
        mask: CollisionMask,
    ) -> Option<SweepHit>;

    /// True if the two bodies currently overlap. Unknown bodies never overlap.
    fn contact_test(&self, a: BodyId, b: BodyId) -> bool;
}
