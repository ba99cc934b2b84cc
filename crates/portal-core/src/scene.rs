//! Flat scene graph holding the loaded model.
//!
//! Geometry is stored already transformed into world space; the scene is
//! static once loaded, so picking and drawing never need node transforms.

use glam::{Mat4, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }
        if points.is_empty() {
            return Self {
                min: Vec3::ZERO,
                max: Vec3::ZERO,
            };
        }
        Self { min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Triangle-list geometry in world space.
#[derive(Clone, Debug)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    pub aabb: Aabb,
}

impl MeshData {
    /// Missing UVs are padded with zeros; missing indices mean a plain
    /// triangle list over the positions.
    pub fn new(positions: Vec<Vec3>, mut uvs: Vec<[f32; 2]>, indices: Option<Vec<u32>>) -> Self {
        uvs.resize(positions.len(), [0.0, 0.0]);
        let indices = indices.unwrap_or_else(|| (0..positions.len() as u32).collect());
        let aabb = Aabb::from_points(&positions);
        Self {
            positions,
            uvs,
            indices,
            aabb,
        }
    }

    pub fn transformed(mut self, world: Mat4) -> Self {
        if world != Mat4::IDENTITY {
            for p in &mut self.positions {
                *p = world.transform_point3(*p);
            }
            self.aabb = Aabb::from_points(&self.positions);
        }
        self
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Which effect a node is drawn with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MaterialSlot {
    #[default]
    Unassigned,
    Baked,
    PoleLight,
    Portal,
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub world: Mat4,
    pub mesh: Option<MeshData>,
    pub material: MaterialSlot,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            world: Mat4::IDENTITY,
            mesh: None,
            material: MaterialSlot::Unassigned,
        }
    }

    pub fn with_mesh(mut self, mesh: MeshData) -> Self {
        self.mesh = Some(mesh);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level node.
    pub fn add(&mut self, mut node: SceneNode) -> NodeId {
        node.parent = None;
        self.push(node)
    }

    pub fn add_child(&mut self, parent: NodeId, mut node: SceneNode) -> NodeId {
        node.parent = Some(parent);
        self.push(node)
    }

    fn push(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Move every node of `other` under this scene, keeping its hierarchy.
    pub fn attach(&mut self, other: SceneGraph) {
        let base = self.nodes.len();
        self.nodes.extend(other.nodes.into_iter().map(|mut n| {
            n.parent = n.parent.map(|p| NodeId(p.0 + base));
            n
        }));
    }

    /// First node with `name`. Non-recursive lookup only considers
    /// top-level nodes.
    pub fn find_by_name(&self, name: &str, recursive: bool) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name == name && (recursive || n.parent.is_none()))
            .map(NodeId)
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
