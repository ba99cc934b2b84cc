// Host-side tests for GLB parsing and material wiring. Fixtures are built
// in memory: a JSON chunk from serde_json plus a little-endian BIN chunk.

use portal_core::loader::{assign_materials, load_glb, LoadError, DEFAULT_BINDINGS};
use portal_core::{MaterialSlot, SceneGraph};
use serde_json::json;

fn glb(json: serde_json::Value, bin: &[u8]) -> Vec<u8> {
    let mut json_bytes = serde_json::to_vec(&json).unwrap();
    while json_bytes.len() % 4 != 0 {
        json_bytes.push(b' ');
    }
    let mut bin = bin.to_vec();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }
    let has_bin = !bin.is_empty();
    let total = 12 + 8 + json_bytes.len() + if has_bin { 8 + bin.len() } else { 0 };

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json_bytes.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json_bytes);
    if has_bin {
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(b"BIN\0");
        out.extend_from_slice(&bin);
    }
    out
}

/// Unit quad in the XY plane: 4 positions then 6 u16 indices.
fn quad_bin() -> Vec<u8> {
    let positions: [[f32; 3]; 4] = [
        [-0.5, -0.5, 0.0],
        [0.5, -0.5, 0.0],
        [0.5, 0.5, 0.0],
        [-0.5, 0.5, 0.0],
    ];
    let indices: [u16; 6] = [0, 1, 2, 0, 2, 3];
    let mut bin = Vec::new();
    for p in positions.iter().flatten() {
        bin.extend_from_slice(&p.to_le_bytes());
    }
    for i in indices {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    bin
}

fn document(nodes: serde_json::Value, roots: serde_json::Value) -> serde_json::Value {
    json!({
        "asset": { "version": "2.0" },
        "buffers": [{ "byteLength": 60 }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 48 },
            { "buffer": 0, "byteOffset": 48, "byteLength": 12 }
        ],
        "accessors": [
            {
                "bufferView": 0, "componentType": 5126, "count": 4, "type": "VEC3",
                "min": [-0.5, -0.5, 0.0], "max": [0.5, 0.5, 0.0]
            },
            { "bufferView": 1, "componentType": 5123, "count": 6, "type": "SCALAR" }
        ],
        "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }] }],
        "nodes": nodes,
        "scenes": [{ "nodes": roots }],
        "scene": 0
    })
}

fn portal_model() -> Vec<u8> {
    let nodes = json!([
        { "name": "baked", "mesh": 0 },
        { "name": "portalLight", "mesh": 0, "translation": [0.0, 0.0, -2.0] },
        { "name": "poleLightA", "mesh": 0, "scale": [2.0, 2.0, 2.0] },
        { "name": "lights", "children": [1, 2], "translation": [0.0, 1.0, 0.0] }
    ]);
    glb(document(nodes, json!([0, 3])), &quad_bin())
}

fn load() -> SceneGraph {
    load_glb(&portal_model()).expect("fixture parses")
}

#[test]
fn parses_named_nodes_and_hierarchy() {
    let g = load();
    assert_eq!(g.len(), 4);
    let lights = g.find_by_name("lights", false).unwrap();
    let portal = g.find_by_name("portalLight", true).unwrap();
    assert_eq!(g.get(portal).unwrap().parent, Some(lights));
    assert!(g.get(lights).unwrap().mesh.is_none());
}

#[test]
fn non_recursive_lookup_only_sees_roots() {
    let g = load();
    assert!(g.find_by_name("baked", false).is_some());
    assert!(g.find_by_name("portalLight", false).is_none());
    assert!(g.find_by_name("portalLight", true).is_some());
    assert!(g.find_by_name("nope", true).is_none());
}

#[test]
fn geometry_is_baked_into_world_space() {
    let g = load();
    let portal = g.get(g.find_by_name("portalLight", true).unwrap()).unwrap();
    let mesh = portal.mesh.as_ref().unwrap();
    assert_eq!(mesh.positions.len(), 4);
    assert_eq!(mesh.indices, [0, 1, 2, 0, 2, 3]);
    // Parent lifts by 1, child pushes back by 2.
    assert!((mesh.aabb.min.z - -2.0).abs() < 1e-6);
    assert!((mesh.aabb.center().y - 1.0).abs() < 1e-6);

    let pole = g.get(g.find_by_name("poleLightA", true).unwrap()).unwrap();
    let pole_mesh = pole.mesh.as_ref().unwrap();
    assert!((pole_mesh.aabb.max.x - 1.0).abs() < 1e-6);
    assert_eq!(pole_mesh.uvs.len(), 4);
}

#[test]
fn materials_assigned_by_name_and_missing_names_skipped() {
    let mut g = load();
    let applied = assign_materials(&mut g, &DEFAULT_BINDINGS);
    // poleLightB is absent from the fixture.
    assert_eq!(applied, 3);
    let slot = |g: &SceneGraph, name: &str| g.get(g.find_by_name(name, true).unwrap()).unwrap().material;
    assert_eq!(slot(&g, "baked"), MaterialSlot::Baked);
    assert_eq!(slot(&g, "portalLight"), MaterialSlot::Portal);
    assert_eq!(slot(&g, "poleLightA"), MaterialSlot::PoleLight);
    assert_eq!(slot(&g, "lights"), MaterialSlot::Unassigned);
}

#[test]
fn garbage_bytes_are_a_parse_error() {
    let err = load_glb(b"definitely not a model").unwrap_err();
    assert!(matches!(err, LoadError::Gltf(_)));
}

#[test]
fn external_buffers_are_rejected() {
    let mut doc = document(json!([{ "name": "baked", "mesh": 0 }]), json!([0]));
    doc["buffers"] = json!([{ "byteLength": 60, "uri": "quad.bin" }]);
    let err = load_glb(&glb(doc, &[])).unwrap_err();
    match err {
        LoadError::ExternalBuffer { uri } => assert_eq!(uri, "quad.bin"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn model_without_scenes_is_rejected() {
    let mut doc = document(json!([{ "name": "baked", "mesh": 0 }]), json!([0]));
    let obj = doc.as_object_mut().unwrap();
    obj.remove("scenes");
    obj.remove("scene");
    let err = load_glb(&glb(doc, &quad_bin())).unwrap_err();
    assert!(matches!(err, LoadError::NoScene));
}

#[test]
fn attached_model_keeps_its_hierarchy() {
    let mut host = SceneGraph::new();
    host.add(portal_core::scene::SceneNode::new("camera-rig"));
    host.attach(load());
    assert_eq!(host.len(), 5);
    let lights = host.find_by_name("lights", false).unwrap();
    let portal = host.find_by_name("portalLight", true).unwrap();
    assert_eq!(host.get(portal).unwrap().parent, Some(lights));
    assert!(host.find_by_name("portalLight", false).is_none());
}
