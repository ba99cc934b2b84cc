use portal_core::uniforms::{
    CameraUniformsRaw, FireflyUniformsRaw, FlatColorRaw, PortalUniformsRaw,
};
use portal_core::{FrameData, MaterialSlot};
use web_sys as web;

mod helpers;
mod meshes;
use helpers::PipelineSpec;
use meshes::GpuMesh;

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,

    camera_buffer: wgpu::Buffer,
    camera_bg: wgpu::BindGroup,

    texture_bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    baked_bg: wgpu::BindGroup,
    baked_pipeline: wgpu::RenderPipeline,

    flat_buffer: wgpu::Buffer,
    flat_bg: wgpu::BindGroup,
    flat_pipeline: wgpu::RenderPipeline,

    portal_buffer: wgpu::Buffer,
    portal_bg: wgpu::BindGroup,
    portal_pipeline: wgpu::RenderPipeline,

    fireflies_buffer: wgpu::Buffer,
    fireflies_bg: wgpu::BindGroup,
    fireflies_pipeline: wgpu::RenderPipeline,
    firefly_instances: Option<(wgpu::Buffer, u32)>,

    // Filled the first frame a scene is present.
    meshes: Option<Vec<GpuMesh>>,

    width: u32,
    height: u32,
}

fn uniform_buffer<T>(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<T>() as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

impl GpuState {
    pub async fn new(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU/WebGL adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // WebGL2 fallback cannot satisfy the WebGPU defaults
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("[gpu] surface {}x{} {:?}", width, height, format);

        let (_, depth_view) = helpers::create_depth_texture(&device, width, height);

        let uniform_bgl = helpers::uniform_layout(&device, "uniform_bgl");
        let camera_buffer = uniform_buffer::<CameraUniformsRaw>(&device, "camera_ub");
        let camera_bg = helpers::uniform_bind_group(&device, "camera_bg", &uniform_bgl, &camera_buffer);

        let texture_bgl = helpers::texture_layout(&device);
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("baked_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let placeholder = helpers::placeholder_texture(&device, &queue);
        let placeholder_view = placeholder.create_view(&wgpu::TextureViewDescriptor::default());
        let baked_bg = helpers::texture_bind_group(&device, &texture_bgl, &placeholder_view, &sampler);

        let flat_buffer = uniform_buffer::<FlatColorRaw>(&device, "flat_ub");
        let flat_bg = helpers::uniform_bind_group(&device, "flat_bg", &uniform_bgl, &flat_buffer);
        let portal_buffer = uniform_buffer::<PortalUniformsRaw>(&device, "portal_ub");
        let portal_bg = helpers::uniform_bind_group(&device, "portal_bg", &uniform_bgl, &portal_buffer);
        let fireflies_buffer = uniform_buffer::<FireflyUniformsRaw>(&device, "fireflies_ub");
        let fireflies_bg =
            helpers::uniform_bind_group(&device, "fireflies_bg", &uniform_bgl, &fireflies_buffer);

        let textured_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("textured_layout"),
            bind_group_layouts: &[&uniform_bgl, &texture_bgl],
            push_constant_ranges: &[],
        });
        let uniform_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("uniform_layout"),
            bind_group_layouts: &[&uniform_bgl, &uniform_bgl],
            push_constant_ranges: &[],
        });

        let shader = |label: &str, src: &'static str| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(std::borrow::Cow::Borrowed(src)),
            })
        };
        let baked_shader = shader("baked_wgsl", portal_core::BAKED_WGSL);
        let flat_shader = shader("flat_wgsl", portal_core::FLAT_WGSL);
        let portal_shader = shader("portal_wgsl", portal_core::PORTAL_WGSL);
        let fireflies_shader = shader("fireflies_wgsl", portal_core::FIREFLIES_WGSL);

        let mesh_buffers = [meshes::MeshVertex::layout()];
        let baked_pipeline = helpers::make_scene_pipeline(
            &device,
            PipelineSpec {
                label: "baked_pipeline",
                layout: &textured_layout,
                shader: &baked_shader,
                buffers: &mesh_buffers,
                color_format: format,
                blend: None,
                depth_write: true,
            },
        );
        let flat_pipeline = helpers::make_scene_pipeline(
            &device,
            PipelineSpec {
                label: "flat_pipeline",
                layout: &uniform_layout,
                shader: &flat_shader,
                buffers: &mesh_buffers,
                color_format: format,
                blend: None,
                depth_write: true,
            },
        );
        let portal_pipeline = helpers::make_scene_pipeline(
            &device,
            PipelineSpec {
                label: "portal_pipeline",
                layout: &uniform_layout,
                shader: &portal_shader,
                buffers: &mesh_buffers,
                color_format: format,
                blend: None,
                depth_write: true,
            },
        );
        let fireflies_pipeline = helpers::make_scene_pipeline(
            &device,
            PipelineSpec {
                label: "fireflies_pipeline",
                layout: &uniform_layout,
                shader: &fireflies_shader,
                buffers: &[meshes::firefly_layout()],
                color_format: format,
                blend: Some(helpers::ADDITIVE_BLEND),
                depth_write: false,
            },
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            camera_buffer,
            camera_bg,
            texture_bgl,
            sampler,
            baked_bg,
            baked_pipeline,
            flat_buffer,
            flat_bg,
            flat_pipeline,
            portal_buffer,
            portal_bg,
            portal_pipeline,
            fireflies_buffer,
            fireflies_bg,
            fireflies_pipeline,
            firefly_instances: None,
            meshes: None,
            width,
            height,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            let (_, depth_view) = helpers::create_depth_texture(&self.device, width, height);
            self.depth_view = depth_view;
        }
    }

    /// Replace the placeholder with the decoded baked image.
    pub fn set_baked_texture(&mut self, bitmap: &web::ImageBitmap) {
        let size = wgpu::Extent3d {
            width: bitmap.width().max(1),
            height: bitmap.height().max(1),
            depth_or_array_layers: 1,
        };
        let tex = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("baked"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        // glTF UVs have v pointing down, same as the image rows.
        self.queue.copy_external_image_to_texture(
            &wgpu::CopyExternalImageSourceInfo {
                source: wgpu::ExternalImageSource::ImageBitmap(bitmap.clone()),
                origin: wgpu::Origin2d::ZERO,
                flip_y: false,
            },
            wgpu::CopyExternalImageDestInfo {
                texture: &tex,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
                color_space: wgpu::PredefinedColorSpace::Srgb,
                premultiplied_alpha: false,
            },
            size,
        );
        let view = tex.create_view(&wgpu::TextureViewDescriptor::default());
        self.baked_bg =
            helpers::texture_bind_group(&self.device, &self.texture_bgl, &view, &self.sampler);
        log::info!("[gpu] baked texture {}x{}", size.width, size.height);
    }

    fn pipeline_for(&self, material: MaterialSlot) -> (&wgpu::RenderPipeline, &wgpu::BindGroup) {
        match material {
            MaterialSlot::Baked | MaterialSlot::Unassigned => (&self.baked_pipeline, &self.baked_bg),
            MaterialSlot::PoleLight => (&self.flat_pipeline, &self.flat_bg),
            MaterialSlot::Portal => (&self.portal_pipeline, &self.portal_bg),
        }
    }

    pub fn render(&mut self, frame: &FrameData<'_>) -> Result<(), wgpu::SurfaceError> {
        if self.meshes.is_none() {
            if let Some(scene) = frame.scene {
                self.meshes = Some(meshes::upload_scene(&self.device, scene));
            }
        }
        if self.firefly_instances.is_none() && !frame.firefly_field.is_empty() {
            let instances = frame.firefly_field.instances();
            let buf = meshes::upload_fireflies(&self.device, &instances);
            self.firefly_instances = Some((buf, instances.len() as u32));
        }

        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&frame.camera));
        self.queue
            .write_buffer(&self.portal_buffer, 0, bytemuck::bytes_of(&frame.portal));
        self.queue
            .write_buffer(&self.fireflies_buffer, 0, bytemuck::bytes_of(&frame.fireflies));
        self.queue
            .write_buffer(&self.flat_buffer, 0, bytemuck::bytes_of(&frame.pole_light));

        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let [r, g, b] = frame.clear_color.to_linear();
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.camera_bg, &[]);

            if let Some(meshes) = &self.meshes {
                for mesh in meshes {
                    let (pipeline, bg) = self.pipeline_for(mesh.material);
                    rpass.set_pipeline(pipeline);
                    rpass.set_bind_group(1, bg, &[]);
                    rpass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    rpass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
                }
            }

            // Fireflies last: additive, depth-tested, no depth writes.
            if let Some((buf, count)) = &self.firefly_instances {
                rpass.set_pipeline(&self.fireflies_pipeline);
                rpass.set_bind_group(1, &self.fireflies_bg, &[]);
                rpass.set_vertex_buffer(0, buf.slice(..));
                rpass.draw(0..6, 0..*count);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}
