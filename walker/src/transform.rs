//! Scene transform hierarchy.
//!
//! An arena of named nodes, each holding a pose relative to its parent. Nodes can only be
//! created under an existing node, so the hierarchy is always a tree rooted at [`NodeId::ROOT`].

use std::collections::HashMap;

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

#[derive(Clone, Debug)]
struct Node {
    name: String,
    local: Isometry3<f32>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct TransformTree {
    nodes: Vec<Node>,
    names: HashMap<String, NodeId>,
}

impl Default for TransformTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformTree {
    pub const ROOT_NAME: &'static str = "render";

    pub fn new() -> Self {
        let root = Node {
            name: Self::ROOT_NAME.to_string(),
            local: Isometry3::identity(),
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            names: HashMap::from([(Self::ROOT_NAME.to_string(), NodeId::ROOT)]),
        }
    }

    /// Add a node under `parent`. Returns `None` if `parent` is not part of this tree or the
    /// name is already taken.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        local: Isometry3<f32>,
    ) -> Option<NodeId> {
        let name = name.into();
        if parent.0 >= self.nodes.len() || self.names.contains_key(&name) {
            return None;
        }

        let id = NodeId(self.nodes.len());
        self.nodes[parent.0].children.push(id);
        self.names.insert(name.clone(), id);
        self.nodes.push(Node {
            name,
            local,
            parent: Some(parent),
            children: Vec::new(),
        });
        Some(id)
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.0).map(|n| n.name.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn local(&self, id: NodeId) -> Option<Isometry3<f32>> {
        self.nodes.get(id.0).map(|n| n.local)
    }

    /// World pose of `id`: the composition of every ancestor's local pose, root first.
    pub fn world(&self, id: NodeId) -> Option<Isometry3<f32>> {
        let mut node = self.nodes.get(id.0)?;
        let mut pose = node.local;
        while let Some(parent) = node.parent {
            node = &self.nodes[parent.0];
            pose = node.local * pose;
        }
        Some(pose)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root always exists.
        false
    }
}

/// Rotation from heading/pitch/roll in degrees (heading about +Z, pitch about +X, roll about +Y).
pub fn rotation_from_hpr(hpr_deg: [f32; 3]) -> UnitQuaternion<f32> {
    let [h, p, r] = hpr_deg.map(f32::to_radians);
    UnitQuaternion::from_axis_angle(&Vector3::z_axis(), h)
        * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), p)
        * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), r)
}

/// Pose from a position and heading/pitch/roll in degrees.
pub fn pose_from_pos_hpr(pos: [f32; 3], hpr_deg: [f32; 3]) -> Isometry3<f32> {
    Isometry3::from_parts(
        Translation3::new(pos[0], pos[1], pos[2]),
        rotation_from_hpr(hpr_deg),
    )
}
