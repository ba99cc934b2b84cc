//! Ray casting from the pointer through the camera into the scene.

use crate::camera::Camera;
use crate::scene::{Aabb, MeshData, NodeId, SceneGraph};
use glam::{Vec2, Vec3, Vec4};
use smallvec::SmallVec;

const EPSILON: f32 = 1e-7;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub node: NodeId,
    pub distance: f32,
    pub point: Vec3,
}

/// Hits ordered by ascending distance. Picking only ever looks at emptiness,
/// so a handful of inline slots covers the common case.
pub type Hits = SmallVec<[Hit; 4]>;

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// World-space ray through a normalized device coordinate
    /// (`x`, `y` in \[-1, 1\], `y` up), starting at the camera eye.
    pub fn from_camera(ndc: Vec2, camera: &Camera) -> Self {
        let inv = camera.view_proj().inverse();
        let p_far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let far: Vec3 = p_far.truncate() / p_far.w;
        Self::new(camera.eye, far - camera.eye)
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Slab test. Returns the entry distance, or 0 when the origin is inside.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let inv = ray.direction.recip();
    let t1 = (aabb.min - ray.origin) * inv;
    let t2 = (aabb.max - ray.origin) * inv;
    let t_min = t1.min(t2).max_element();
    let t_max = t1.max(t2).min_element();
    if t_max < 0.0 || t_min > t_max {
        return None;
    }
    Some(t_min.max(0.0))
}

/// Möller–Trumbore, double sided. Returns the hit distance along the ray.
pub fn ray_triangle(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);
    if a.abs() < EPSILON {
        return None;
    }
    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = f * edge2.dot(q);
    (t > EPSILON).then_some(t)
}

/// Every triangle of `mesh` the ray crosses, nearest first.
pub fn intersect_mesh(ray: &Ray, node: NodeId, mesh: &MeshData) -> Hits {
    let mut hits = Hits::new();
    if ray_aabb(ray, &mesh.aabb).is_none() {
        return hits;
    }
    for tri in mesh.indices.chunks_exact(3) {
        let (Some(&a), Some(&b), Some(&c)) = (
            mesh.positions.get(tri[0] as usize),
            mesh.positions.get(tri[1] as usize),
            mesh.positions.get(tri[2] as usize),
        ) else {
            continue;
        };
        if let Some(t) = ray_triangle(ray, a, b, c) {
            hits.push(Hit {
                node,
                distance: t,
                point: ray.at(t),
            });
        }
    }
    hits.sort_by(|x, y| x.distance.total_cmp(&y.distance));
    hits
}

/// Test a single scene node (no descendants). Nodes without geometry never hit.
pub fn intersect_node(ray: &Ray, scene: &SceneGraph, node: NodeId) -> Hits {
    match scene.get(node).and_then(|n| n.mesh.as_ref()) {
        Some(mesh) => intersect_mesh(ray, node, mesh),
        None => Hits::new(),
    }
}
