use portal_core::fireflies::FireflyInstance;
use portal_core::{MaterialSlot, SceneGraph};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct MeshVertex {
    position: [f32; 3],
    uv: [f32; 2],
}

impl MeshVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

const FIREFLY_ATTRIBS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32];

pub(crate) fn firefly_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<FireflyInstance>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &FIREFLY_ATTRIBS,
    }
}

pub(crate) struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub material: MaterialSlot,
}

/// Upload every mesh-bearing node. Positions are already in world space.
pub(crate) fn upload_scene(device: &wgpu::Device, scene: &SceneGraph) -> Vec<GpuMesh> {
    let mut out = Vec::new();
    for (_, node) in scene.iter() {
        let Some(mesh) = &node.mesh else { continue };
        if mesh.indices.is_empty() {
            continue;
        }
        let vertices: Vec<MeshVertex> = mesh
            .positions
            .iter()
            .zip(mesh.uvs.iter())
            .map(|(p, uv)| MeshVertex {
                position: p.to_array(),
                uv: *uv,
            })
            .collect();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(node.name.as_str()),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(node.name.as_str()),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        out.push(GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            material: node.material,
        });
    }
    log::info!("[gpu] uploaded {} meshes", out.len());
    out
}

pub(crate) fn upload_fireflies(
    device: &wgpu::Device,
    instances: &[FireflyInstance],
) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("firefly_instances"),
        contents: bytemuck::cast_slice(instances),
        usage: wgpu::BufferUsages::VERTEX,
    })
}
