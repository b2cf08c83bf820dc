/*!
Scene description and world building.

A [`SceneDef`] is plain data (usually deserialized from TOML) describing:
- `nodes`: a transform hierarchy used to group bodies (terrain pieces, rooms),
- `bodies`: collider shapes placed under those nodes with their categories,
- `sensors`: trigger zones referring to bodies by name, with destination pairings,
- `spawn`: where the avatar starts.

[`SceneDef::build`] turns it into a [`Scene`]: a Rapier world (avatar capsule included), a
validated sensor registry and the resolved spawn point. All scene defects surface here as
[`SceneError`]s.
*/

use nalgebra::{Isometry3, Point3};
use serde::Deserialize;

use crate::constants::{AVATAR_HALF_HEIGHT, AVATAR_RADIUS};
use crate::error::SceneError;
use crate::physics::{BodyDef, BodyId, Category, CollisionMask, RapierWorld, ShapeDef, mask};
use crate::sensor::{LocationKind, SensorDef, SensorRegistry};
use crate::transform::{NodeId, TransformTree, pose_from_pos_hpr};

/// Name given to the avatar's body.
pub const AVATAR_BODY_NAME: &str = "avatar";

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SceneDef {
    pub nodes: Vec<NodeDef>,
    pub bodies: Vec<BodySpec>,
    pub sensors: Vec<SensorSpec>,
    pub spawn: SpawnDef,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NodeDef {
    pub name: String,
    /// Defaults to the root node.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub pos: [f32; 3],
    /// Heading, pitch, roll in degrees.
    #[serde(default)]
    pub hpr: [f32; 3],
}

#[derive(Clone, Debug, Deserialize)]
pub struct BodySpec {
    pub name: String,
    /// Node the body is placed under; defaults to the root node.
    #[serde(default)]
    pub node: Option<String>,
    #[serde(default)]
    pub pos: [f32; 3],
    #[serde(default)]
    pub hpr: [f32; 3],
    pub shape: ShapeDef,
    pub categories: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SensorSpec {
    pub name: String,
    pub kind: LocationKind,
    /// Name of the body acting as trigger volume.
    pub body: String,
    #[serde(default)]
    pub destination: Option<String>,
    /// World-space camera anchor for the room this sensor marks.
    #[serde(default)]
    pub room_camera: Option<[f32; 3]>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SpawnDef {
    pub x: f32,
    pub y: f32,
    /// When absent the avatar is dropped onto the ground below `(x, y)`.
    pub z: Option<f32>,
    pub heading: f32,
}

impl Default for SpawnDef {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: None,
            heading: 0.0,
        }
    }
}

/// A built scene, ready to be simulated.
pub struct Scene {
    pub world: RapierWorld,
    pub sensors: SensorRegistry,
    pub tree: TransformTree,
    pub avatar: BodyId,
    pub spawn: SpawnDef,
}

impl SceneDef {
    pub fn build(&self) -> Result<Scene, SceneError> {
        let tree = self.build_tree()?;

        let mut defs = Vec::with_capacity(self.bodies.len() + 1);
        for (index, spec) in self.bodies.iter().enumerate() {
            let parent = resolve_node(&tree, spec.node.as_deref(), &spec.name)?;
            let pose = tree.world(parent).unwrap_or_else(Isometry3::identity)
                * pose_from_pos_hpr(spec.pos, spec.hpr);
            let categories = parse_categories(&spec.name, &spec.categories)?;
            defs.push(BodyDef::new(
                index as u32 + 1,
                spec.name.clone(),
                pose,
                spec.shape.clone(),
                categories,
            ));
        }

        let avatar = BodyId(self.bodies.len() as u32 + 1);
        let start = Point3::new(self.spawn.x, self.spawn.y, self.spawn.z.unwrap_or(0.0));
        defs.push(BodyDef::new(
            avatar.0,
            AVATAR_BODY_NAME,
            Isometry3::translation(start.x, start.y, start.z),
            ShapeDef::CapsuleZ {
                radius: AVATAR_RADIUS,
                half_height: AVATAR_HALF_HEIGHT,
            },
            mask::AVATAR,
        ));

        let world = RapierWorld::build(defs)?;

        let mut sensor_defs = Vec::with_capacity(self.sensors.len());
        for spec in &self.sensors {
            let body = world
                .body_by_name(&spec.body)
                .ok_or_else(|| SceneError::MissingSensorBody(spec.name.clone()))?;
            sensor_defs.push(SensorDef {
                name: spec.name.clone(),
                kind: spec.kind,
                body,
                destination: spec.destination.clone(),
                room_camera: spec.room_camera.map(Point3::from),
            });
        }
        let sensors = SensorRegistry::build(sensor_defs, |id| world.categories(id))?;

        log::info!(
            "scene built: {} nodes, {} bodies, {} sensors",
            tree.len(),
            world.len(),
            sensors.len()
        );

        Ok(Scene {
            world,
            sensors,
            tree,
            avatar,
            spawn: self.spawn.clone(),
        })
    }

    fn build_tree(&self) -> Result<TransformTree, SceneError> {
        let mut tree = TransformTree::new();
        for node in &self.nodes {
            if tree.find(&node.name).is_some() {
                return Err(SceneError::DuplicateNode(node.name.clone()));
            }
            let parent = resolve_node(&tree, node.parent.as_deref(), &node.name)?;
            tree.add_child(parent, node.name.clone(), pose_from_pos_hpr(node.pos, node.hpr))
                .ok_or_else(|| SceneError::DuplicateNode(node.name.clone()))?;
        }
        Ok(tree)
    }
}

fn resolve_node(tree: &TransformTree, name: Option<&str>, owner: &str) -> Result<NodeId, SceneError> {
    match name {
        None => Ok(NodeId::ROOT),
        Some(parent) => tree.find(parent).ok_or_else(|| SceneError::UnknownParent {
            node: owner.to_string(),
            parent: parent.to_string(),
        }),
    }
}

fn parse_categories(body: &str, names: &[String]) -> Result<CollisionMask, SceneError> {
    let mut categories = CollisionMask::empty();
    for name in names {
        let category = Category::from_name(name).ok_or_else(|| SceneError::UnknownCategory {
            body: body.to_string(),
            category: name.clone(),
        })?;
        categories.add(category);
    }
    if categories.is_empty() {
        return Err(SceneError::NoCategories(body.to_string()));
    }
    Ok(categories)
}
