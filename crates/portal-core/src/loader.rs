//! GLB parsing into the scene graph, and material wiring by node name.

use crate::constants::{BAKED_NODE, POLE_LIGHT_A_NODE, POLE_LIGHT_B_NODE, PORTAL_NODE};
use crate::scene::{MaterialSlot, MeshData, NodeId, SceneGraph, SceneNode};
use glam::{Mat4, Quat, Vec3};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("glTF parse error: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("model contains no scene")]
    NoScene,
    #[error("buffer {uri:?} is external; only self-contained .glb files are supported")]
    ExternalBuffer { uri: String },
}

/// Named node → material. Applied after the model is parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaterialBinding {
    pub node: &'static str,
    pub material: MaterialSlot,
}

pub const DEFAULT_BINDINGS: [MaterialBinding; 4] = [
    MaterialBinding {
        node: BAKED_NODE,
        material: MaterialSlot::Baked,
    },
    MaterialBinding {
        node: PORTAL_NODE,
        material: MaterialSlot::Portal,
    },
    MaterialBinding {
        node: POLE_LIGHT_A_NODE,
        material: MaterialSlot::PoleLight,
    },
    MaterialBinding {
        node: POLE_LIGHT_B_NODE,
        material: MaterialSlot::PoleLight,
    },
];

/// Parse a binary glTF. Nodes keep their hierarchy; the default scene's
/// root nodes become top-level nodes of the returned graph.
pub fn load_glb(bytes: &[u8]) -> Result<SceneGraph, LoadError> {
    let gltf = gltf::Gltf::from_slice(bytes)?;
    let blob = gltf.blob.as_deref().unwrap_or_default();
    let document = &gltf.document;
    if let Some(uri) = document.buffers().find_map(|b| match b.source() {
        gltf::buffer::Source::Uri(uri) => Some(uri.to_string()),
        gltf::buffer::Source::Bin => None,
    }) {
        return Err(LoadError::ExternalBuffer { uri });
    }
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(LoadError::NoScene)?;

    let mut graph = SceneGraph::new();
    for node in scene.nodes() {
        visit(&mut graph, &node, None, Mat4::IDENTITY, blob);
    }
    log::info!(
        "[assets] model parsed: {} nodes, {} with geometry",
        graph.len(),
        graph.iter().filter(|(_, n)| n.mesh.is_some()).count()
    );
    Ok(graph)
}

fn visit(
    graph: &mut SceneGraph,
    node: &gltf::Node<'_>,
    parent: Option<NodeId>,
    parent_world: Mat4,
    blob: &[u8],
) {
    let (t, r, s) = node.transform().decomposed();
    let local = Mat4::from_scale_rotation_translation(
        Vec3::from(s),
        Quat::from_array(r),
        Vec3::from(t),
    );
    let world = parent_world * local;

    let mut scene_node = SceneNode::new(node.name().unwrap_or_default());
    scene_node.world = world;
    if let Some(mesh) = node.mesh() {
        scene_node.mesh = read_mesh(&mesh, blob).map(|m| m.transformed(world));
    }
    let id = match parent {
        Some(p) => graph.add_child(p, scene_node),
        None => graph.add(scene_node),
    };
    for child in node.children() {
        visit(graph, &child, Some(id), world, blob);
    }
}

/// Concatenate all triangle primitives of a mesh into one index space.
fn read_mesh(mesh: &gltf::Mesh<'_>, blob: &[u8]) -> Option<MeshData> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::debug!("[assets] skipping non-triangle primitive in {:?}", mesh.name());
            continue;
        }
        let reader = primitive.reader(|buffer| match buffer.source() {
            gltf::buffer::Source::Bin => Some(blob),
            gltf::buffer::Source::Uri(_) => None,
        });
        let Some(prim_positions) = reader.read_positions() else {
            continue;
        };
        let base = positions.len() as u32;
        let prim_positions: Vec<Vec3> = prim_positions.map(Vec3::from).collect();
        let count = prim_positions.len();
        let mut prim_uvs: Vec<[f32; 2]> = reader
            .read_tex_coords(0)
            .map(|tc| tc.into_f32().collect())
            .unwrap_or_default();
        prim_uvs.resize(count, [0.0, 0.0]);
        match reader.read_indices() {
            Some(idx) => indices.extend(idx.into_u32().map(|i| i + base)),
            None => indices.extend(base..base + count as u32),
        }
        positions.extend(prim_positions);
        uvs.extend(prim_uvs);
    }

    if positions.is_empty() {
        return None;
    }
    Some(MeshData::new(positions, uvs, Some(indices)))
}

/// Assign materials by node name. Names missing from the model are logged
/// and skipped; the count of applied bindings is returned.
pub fn assign_materials(scene: &mut SceneGraph, bindings: &[MaterialBinding]) -> usize {
    let mut applied = 0;
    for binding in bindings {
        match scene
            .find_by_name(binding.node, true)
            .and_then(|id| scene.get_mut(id))
        {
            Some(node) => {
                node.material = binding.material;
                applied += 1;
            }
            None => log::warn!(
                "[assets] node {:?} not found; {:?} material not assigned",
                binding.node,
                binding.material
            ),
        }
    }
    applied
}
