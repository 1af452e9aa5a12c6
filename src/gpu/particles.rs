use bytemuck::{Pod, Zeroable};
use wgpu::{
    BindGroup, BindGroupLayout, Buffer, Device, Queue, RenderPipeline, Sampler, TextureFormat,
    TextureView,
};

use crate::assets::Sprite;
use crate::config::WINDOW_BACKGROUND;
use crate::layout::ContainerRect;
use crate::render::{FrameBatch, Layer, LineInstance, ShapeInstance};

/// Vertices per instanced quad
const QUAD_VERTICES: u32 = 6;

/// Instances allocated up front for each layer
const INITIAL_INSTANCES: u64 = 256;

const SHAPE_ATTRIBUTES: [wgpu::VertexAttribute; 8] = wgpu::vertex_attr_array![
    0 => Float32x2, // center
    1 => Float32x2, // half_size
    2 => Float32x4, // fill
    3 => Float32x4, // stroke
    4 => Float32,   // stroke_width
    5 => Uint32,    // kind
    6 => Uint32,    // sides
    7 => Float32    // inner
];

const LINE_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    0 => Float32x2, // point_a
    1 => Float32x2, // point_b
    2 => Float32x4, // color
    3 => Float32    // width
];

/// Target size in pixels, matches `Viewport` in the shader
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct ViewportUniform {
    size: [f32; 2],
    srgb_target: u32,
    padding: u32,
}

/// Vertex buffer that grows to the largest frame seen
struct InstanceBuffer {
    label: &'static str,
    buffer: Buffer,
    capacity: u64,
}

impl InstanceBuffer {
    fn new(device: &Device, label: &'static str, capacity: u64) -> Self {
        Self {
            label,
            buffer: create_instance_buffer(device, label, capacity),
            capacity,
        }
    }

    fn write(&mut self, device: &Device, queue: &Queue, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let needed = bytes.len() as u64;
        if needed > self.capacity {
            let capacity = needed.next_power_of_two();
            log::debug!("Growing {} to {} bytes", self.label, capacity);
            self.buffer = create_instance_buffer(device, self.label, capacity);
            self.capacity = capacity;
        }
        queue.write_buffer(&self.buffer, 0, bytes);
    }
}

/// Instanced shape and line pipelines drawing a [`FrameBatch`] into the container viewport
pub struct ParticlePipeline {
    shape_pipeline: RenderPipeline,
    line_pipeline: RenderPipeline,
    bind_group_layout: BindGroupLayout,
    bind_group: BindGroup,
    sampler: Sampler,
    uniform_buffer: Buffer,
    shapes: InstanceBuffer,
    lines: InstanceBuffer,
    srgb_target: bool,
}

impl ParticlePipeline {
    pub fn new(device: &Device, queue: &Queue, format: TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("particle-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/particles.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("particle-bind-group-layout"),
            entries: &[
                // Viewport size and target encoding
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Sprite for image particles
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("particle-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shape_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            "shape-pipeline",
            ("vs_shape", "fs_shape"),
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<ShapeInstance>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &SHAPE_ATTRIBUTES,
            },
            format,
        );
        let line_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            "line-pipeline",
            ("vs_line", "fs_line"),
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<LineInstance>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &LINE_ATTRIBUTES,
            },
            format,
        );

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("viewport-uniform"),
            size: std::mem::size_of::<ViewportUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprite-sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        // Opaque white until an image shape finishes loading
        let placeholder = create_sprite_view(device, queue, &Sprite::from_rgba(1, 1, vec![[255; 4]]));
        let bind_group = create_bind_group(device, &bind_group_layout, &uniform_buffer, &placeholder, &sampler);

        Self {
            shape_pipeline,
            line_pipeline,
            bind_group_layout,
            bind_group,
            sampler,
            uniform_buffer,
            shapes: InstanceBuffer::new(
                device,
                "shape-instances",
                INITIAL_INSTANCES * std::mem::size_of::<ShapeInstance>() as u64,
            ),
            lines: InstanceBuffer::new(
                device,
                "line-instances",
                INITIAL_INSTANCES * std::mem::size_of::<LineInstance>() as u64,
            ),
            srgb_target: format.is_srgb(),
        }
    }

    /// Bind a decoded image for `image` particles. Returns false when the image does not fit a texture
    pub fn set_sprite(&mut self, device: &Device, queue: &Queue, sprite: &Sprite) -> bool {
        let limit = device.limits().max_texture_dimension_2d;
        if sprite.width() > limit || sprite.height() > limit {
            log::warn!(
                "Image of {}x{} exceeds the texture limit {}, keeping circles",
                sprite.width(),
                sprite.height(),
                limit
            );
            return false;
        }
        let view = create_sprite_view(device, queue, sprite);
        self.bind_group = create_bind_group(
            device,
            &self.bind_group_layout,
            &self.uniform_buffer,
            &view,
            &self.sampler,
        );
        true
    }

    /// Copy the batch's instances and target size to the GPU
    pub fn upload(&mut self, device: &Device, queue: &Queue, batch: &FrameBatch) {
        let uniform = ViewportUniform {
            size: [batch.width() as f32, batch.height() as f32],
            srgb_target: self.srgb_target as u32,
            padding: 0,
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
        self.shapes.write(device, queue, bytemuck::cast_slice(batch.shapes()));
        self.lines.write(device, queue, bytemuck::cast_slice(batch.lines()));
    }

    /// Clear the window and replay the batch's runs into `viewport` (physical pixels)
    pub fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &TextureView,
        viewport: ContainerRect,
        batch: &FrameBatch,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("particle-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(WINDOW_BACKGROUND),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if !(viewport.width >= 1.0) || !(viewport.height >= 1.0) {
            return;
        }
        pass.set_viewport(viewport.x, viewport.y, viewport.width, viewport.height, 0.0, 1.0);
        pass.set_bind_group(0, &self.bind_group, &[]);

        for run in batch.runs() {
            match run.layer {
                Layer::Shapes => {
                    pass.set_pipeline(&self.shape_pipeline);
                    pass.set_vertex_buffer(0, self.shapes.buffer.slice(..));
                }
                Layer::Lines => {
                    pass.set_pipeline(&self.line_pipeline);
                    pass.set_vertex_buffer(0, self.lines.buffer.slice(..));
                }
            }
            pass.draw(0..QUAD_VERTICES, run.instances.clone());
        }
    }
}

fn create_pipeline(
    device: &Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    label: &str,
    (vertex_entry, fragment_entry): (&str, &str),
    instances: wgpu::VertexBufferLayout,
    format: TextureFormat,
) -> RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vertex_entry),
            buffers: &[instances],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_instance_buffer(device: &Device, label: &str, size: u64) -> Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Texture holding `sprite`. The sRGB decode happens in the shader, alongside the instance colors.
fn create_sprite_view(device: &Device, queue: &Queue, sprite: &Sprite) -> TextureView {
    let size = wgpu::Extent3d {
        width: sprite.width(),
        height: sprite.height(),
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("sprite-texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        sprite.as_bytes(),
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * sprite.width()),
            rows_per_image: Some(sprite.height()),
        },
        size,
    );

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_bind_group(
    device: &Device,
    layout: &BindGroupLayout,
    uniform_buffer: &Buffer,
    sprite: &TextureView,
    sampler: &Sampler,
) -> BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("particle-bind-group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(sprite),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}
