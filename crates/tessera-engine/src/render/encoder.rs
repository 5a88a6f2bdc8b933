use std::collections::HashMap;
use std::num::NonZeroU64;

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::binder::{AttributeBinding, CIRCLE_ATTRIBUTE_COUNT, CIRCLE_ATTRIBUTE_FORMATS};
use crate::bucket::CircleVertex;
use crate::buffer::TextureId;
use crate::geometry::EXTENT;
use crate::state::{ProgramKind, StateCommand, MAX_TEXTURE_UNITS};

use super::ctx::{RenderTarget, DEPTH_STENCIL_FORMAT};
use super::frame::{DrawCall, DrawGeometry, Frame, FrameCommand, PipelineKey};
use super::resources::GpuResourceStore;
use super::uniforms::uniform_size;

/// Largest uniform block of any program.
const MAX_UNIFORM_SIZE: u64 = 96;

/// Replays recorded frames onto a wgpu render pass.
///
/// Fixed-function state arrives folded into each draw's [`PipelineKey`];
/// pipelines are built on first use and cached. Dynamic state (stencil
/// reference, scissor, depth range, texture bindings) is replayed from the
/// frame's state commands in order.
pub struct FrameEncoder {
    color_format: wgpu::TextureFormat,
    uniform_stride: u64,

    circle: ProgramResources,
    raster: ProgramResources,
    clipping: ProgramResources,

    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    texture_bind_groups: HashMap<TextureId, wgpu::BindGroup>,

    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,

    uniform_buffer: Option<wgpu::Buffer>,
    uniform_capacity: u64,
    constant_buffer: Option<wgpu::Buffer>,
    constant_capacity: u64,

    tile_quad_vbo: wgpu::Buffer,
    tile_quad_ibo: wgpu::Buffer,
}

struct ProgramResources {
    kind: ProgramKind,
    shader: wgpu::ShaderModule,
    uniform_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    /// Rebuilt whenever the shared uniform buffer is reallocated.
    uniform_bind_group: Option<wgpu::BindGroup>,
}

/// Counters for one encoded frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct EncodeStats {
    pub draws: usize,
    pub state_commands: usize,
    pub pipelines_created: usize,
}

/// Per-draw offsets into the shared uniform and constant buffers.
struct DrawSlots {
    uniform_offset: u32,
    constants: [u64; CIRCLE_ATTRIBUTE_COUNT],
}

impl FrameEncoder {
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let uniform_stride = MAX_UNIFORM_SIZE.div_ceil(alignment) * alignment;

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tessera raster texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("tessera raster sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let circle = ProgramResources::new(
            device,
            ProgramKind::Circle,
            include_str!("shaders/circle.wgsl"),
            None,
        );
        let raster = ProgramResources::new(
            device,
            ProgramKind::Raster,
            include_str!("shaders/raster.wgsl"),
            Some(&texture_layout),
        );
        let clipping = ProgramResources::new(
            device,
            ProgramKind::ClippingMask,
            include_str!("shaders/clipping_mask.wgsl"),
            None,
        );

        let tile_quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tessera tile quad vbo"),
            contents: bytemuck::cast_slice(&TILE_QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let tile_quad_ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tessera tile quad ibo"),
            contents: bytemuck::cast_slice(&TILE_QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            color_format,
            uniform_stride,
            circle,
            raster,
            clipping,
            texture_layout,
            sampler,
            texture_bind_groups: HashMap::new(),
            pipelines: HashMap::new(),
            uniform_buffer: None,
            uniform_capacity: 0,
            constant_buffer: None,
            constant_capacity: 0,
            tile_quad_vbo,
            tile_quad_ibo,
        }
    }

    #[inline]
    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    /// Encodes `frame` as one render pass clearing the target to `clear`.
    ///
    /// Fails if the frame references a buffer or texture missing from `resources`.
    pub fn encode(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        resources: &GpuResourceStore,
        target: &mut RenderTarget<'_>,
        frame: &Frame,
        clear: wgpu::Color,
    ) -> Result<EncodeStats> {
        let mut stats = EncodeStats::default();

        // ── prepare ────────────────────────────────────────────────────────

        for command in frame.commands() {
            match command {
                FrameCommand::Draw(draw) if !self.pipelines.contains_key(&draw.pipeline) => {
                    let pipeline = self.create_pipeline(device, &draw.pipeline);
                    self.pipelines.insert(draw.pipeline, pipeline);
                    stats.pipelines_created += 1;
                }
                FrameCommand::State(StateCommand::BindTexture { texture: Some(id), .. }) => {
                    self.ensure_texture_bind_group(device, resources, *id)?;
                }
                _ => {}
            }
        }

        let (slots, uniform_bytes, constant_bytes) = self.pack_draw_data(frame);
        self.ensure_uniform_buffer(device, uniform_bytes.len() as u64);
        self.ensure_constant_buffer(device, constant_bytes.len() as u64);

        let (Some(uniform_buffer), Some(constant_buffer)) =
            (self.uniform_buffer.as_ref(), self.constant_buffer.as_ref())
        else {
            anyhow::bail!("frame buffers were not allocated");
        };
        if !uniform_bytes.is_empty() {
            queue.write_buffer(uniform_buffer, 0, &uniform_bytes);
        }
        if !constant_bytes.is_empty() {
            queue.write_buffer(constant_buffer, 0, &constant_bytes);
        }

        // ── replay ─────────────────────────────────────────────────────────

        let (width, height) = target.size;
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessera frame pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_stencil_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(0),
                    store: wgpu::StoreOp::Discard,
                }),
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let mut textures: [Option<TextureId>; MAX_TEXTURE_UNITS] = [None; MAX_TEXTURE_UNITS];
        let mut draws = slots.iter();

        for command in frame.commands() {
            match command {
                FrameCommand::State(state) => {
                    stats.state_commands += 1;
                    match *state {
                        StateCommand::StencilReference(reference) => {
                            rpass.set_stencil_reference(reference);
                        }
                        StateCommand::Scissor(Some(rect)) => {
                            let (x, y, w, h) = clamp_scissor(rect, (width, height));
                            rpass.set_scissor_rect(x, y, w, h);
                        }
                        StateCommand::Scissor(None) => rpass.set_scissor_rect(0, 0, width, height),
                        StateCommand::DepthRange(range) => rpass.set_viewport(
                            0.0,
                            0.0,
                            width as f32,
                            height as f32,
                            range.min,
                            range.max,
                        ),
                        StateCommand::BindTexture { unit, texture } => {
                            textures[unit as usize] = texture;
                        }
                        // Baked into pipeline keys.
                        _ => {}
                    }
                }
                FrameCommand::Draw(draw) => {
                    let slot = draws.next().context("draw slots out of sync with frame")?;
                    self.replay_draw(&mut rpass, resources, constant_buffer, draw, slot, &textures)?;
                    stats.draws += 1;
                }
            }
        }

        drop(rpass);
        log::trace!(
            "encoded frame: {} draws, {} state commands, {} new pipelines",
            stats.draws,
            stats.state_commands,
            stats.pipelines_created
        );
        Ok(stats)
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn program(&self, kind: ProgramKind) -> &ProgramResources {
        match kind {
            ProgramKind::Circle => &self.circle,
            ProgramKind::Raster => &self.raster,
            ProgramKind::ClippingMask => &self.clipping,
        }
    }

    /// Lays out every draw's uniform block at `uniform_stride` and every
    /// constant attribute back to back.
    fn pack_draw_data(&self, frame: &Frame) -> (Vec<DrawSlots>, Vec<u8>, Vec<u8>) {
        let mut slots = Vec::new();
        let mut uniforms = Vec::new();
        let mut constants = Vec::new();

        for (index, draw) in frame.draws().enumerate() {
            let uniform_offset = index as u64 * self.uniform_stride;
            uniforms.resize(uniform_offset as usize, 0);
            uniforms.extend_from_slice(draw.uniforms.as_bytes());

            let mut offsets = [0u64; CIRCLE_ATTRIBUTE_COUNT];
            for (offset, binding) in offsets.iter_mut().zip(&draw.attributes) {
                if let AttributeBinding::Constant { bytes, .. } = binding {
                    *offset = constants.len() as u64;
                    constants.extend_from_slice(bytes);
                }
            }

            slots.push(DrawSlots { uniform_offset: uniform_offset as u32, constants: offsets });
        }

        (slots, uniforms, constants)
    }

    fn ensure_uniform_buffer(&mut self, device: &wgpu::Device, required: u64) {
        if self.uniform_buffer.is_some() && required <= self.uniform_capacity {
            return;
        }
        let capacity = required.max(self.uniform_stride * 64).next_power_of_two();
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessera uniform buffer"),
            size: capacity,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        for program in [&mut self.circle, &mut self.raster, &mut self.clipping] {
            program.bind_uniforms(device, &buffer);
        }
        self.uniform_buffer = Some(buffer);
        self.uniform_capacity = capacity;
    }

    fn ensure_constant_buffer(&mut self, device: &wgpu::Device, required: u64) {
        if self.constant_buffer.is_some() && required <= self.constant_capacity {
            return;
        }
        let capacity = required.max(1024).next_power_of_two();
        self.constant_buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessera constant attributes"),
            size: capacity,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.constant_capacity = capacity;
    }

    fn ensure_texture_bind_group(
        &mut self,
        device: &wgpu::Device,
        resources: &GpuResourceStore,
        id: TextureId,
    ) -> Result<()> {
        if self.texture_bind_groups.contains_key(&id) {
            return Ok(());
        }
        let view = resources
            .texture_view(id)
            .with_context(|| format!("frame binds unknown texture {id:?}"))?;
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera raster texture bind group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&self.sampler) },
            ],
        });
        self.texture_bind_groups.insert(id, bind_group);
        Ok(())
    }

    fn replay_draw(
        &self,
        rpass: &mut wgpu::RenderPass<'_>,
        resources: &GpuResourceStore,
        constant_buffer: &wgpu::Buffer,
        draw: &DrawCall,
        slot: &DrawSlots,
        textures: &[Option<TextureId>; MAX_TEXTURE_UNITS],
    ) -> Result<()> {
        let pipeline = self
            .pipelines
            .get(&draw.pipeline)
            .context("draw pipeline was not prepared")?;
        let program = self.program(draw.pipeline.program);
        let uniforms = program
            .uniform_bind_group
            .as_ref()
            .context("uniform bind group missing")?;

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, uniforms, &[slot.uniform_offset]);

        if draw.pipeline.program == ProgramKind::Raster {
            let texture = textures[0].context("raster draw without a bound texture")?;
            let bind_group = self
                .texture_bind_groups
                .get(&texture)
                .with_context(|| format!("no bind group for texture {texture:?}"))?;
            rpass.set_bind_group(1, bind_group, &[]);
        }

        match &draw.geometry {
            DrawGeometry::Indexed { vertex_buffer, index_buffer, base_vertex, indices } => {
                let vertices = resources
                    .buffer(*vertex_buffer)
                    .with_context(|| format!("unknown vertex buffer {vertex_buffer:?}"))?;
                let index = resources
                    .buffer(*index_buffer)
                    .with_context(|| format!("unknown index buffer {index_buffer:?}"))?;

                rpass.set_vertex_buffer(0, vertices.slice(..));
                for (location, (binding, &offset)) in
                    (1u32..).zip(draw.attributes.iter().zip(&slot.constants))
                {
                    match binding {
                        AttributeBinding::Constant { bytes, .. } => {
                            let end = offset + bytes.len() as u64;
                            rpass.set_vertex_buffer(location, constant_buffer.slice(offset..end));
                        }
                        AttributeBinding::PerVertex { buffer, .. } => {
                            let buffer = resources
                                .buffer(*buffer)
                                .with_context(|| format!("unknown attribute buffer {buffer:?}"))?;
                            rpass.set_vertex_buffer(location, buffer.slice(..));
                        }
                    }
                }
                rpass.set_index_buffer(index.slice(..), wgpu::IndexFormat::Uint16);
                rpass.draw_indexed(indices.clone(), *base_vertex, 0..1);
            }
            DrawGeometry::TileQuad => {
                rpass.set_vertex_buffer(0, self.tile_quad_vbo.slice(..));
                rpass.set_index_buffer(self.tile_quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
                rpass.draw_indexed(0..TILE_QUAD_INDICES.len() as u32, 0, 0..1);
            }
        }
        Ok(())
    }

    fn create_pipeline(&self, device: &wgpu::Device, key: &PipelineKey) -> wgpu::RenderPipeline {
        log::debug!("creating pipeline for {key:?}");
        let program = self.program(key.program);

        let paint_attributes: [[wgpu::VertexAttribute; 1]; CIRCLE_ATTRIBUTE_COUNT] =
            std::array::from_fn(|slot| {
                [wgpu::VertexAttribute {
                    format: CIRCLE_ATTRIBUTE_FORMATS[slot],
                    offset: 0,
                    shader_location: slot as u32 + 1,
                }]
            });

        let buffers: Vec<wgpu::VertexBufferLayout<'_>> = match key.program {
            ProgramKind::Circle => std::iter::once(circle_vertex_layout())
                .chain(paint_attributes.iter().enumerate().map(|(slot, attributes)| {
                    let step_mode = if key.data_driven & (1u8 << slot) != 0 {
                        wgpu::VertexStepMode::Vertex
                    } else {
                        wgpu::VertexStepMode::Instance
                    };
                    wgpu::VertexBufferLayout {
                        array_stride: CIRCLE_ATTRIBUTE_FORMATS[slot].size(),
                        step_mode,
                        attributes,
                    }
                }))
                .collect(),
            ProgramKind::Raster | ProgramKind::ClippingMask => vec![tile_quad_layout()],
        };

        let stencil_face = match (key.program, key.stencil_test) {
            (ProgramKind::ClippingMask, _) => wgpu::StencilFaceState {
                compare: wgpu::CompareFunction::Always,
                fail_op: wgpu::StencilOperation::Keep,
                depth_fail_op: wgpu::StencilOperation::Keep,
                pass_op: wgpu::StencilOperation::Replace,
            },
            (_, true) => wgpu::StencilFaceState {
                compare: wgpu::CompareFunction::Equal,
                fail_op: wgpu::StencilOperation::Keep,
                depth_fail_op: wgpu::StencilOperation::Keep,
                pass_op: wgpu::StencilOperation::Keep,
            },
            (_, false) => wgpu::StencilFaceState::IGNORE,
        };
        let stencil_write_mask = if key.program == ProgramKind::ClippingMask { 0xff } else { 0 };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tessera pipeline"),
            layout: Some(&program.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &program.shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &buffers,
            },
            fragment: Some(wgpu::FragmentState {
                module: &program.shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.color_format,
                    blend: key.blend.then(premul_alpha_blend),
                    write_mask: key.color_mask,
                })],
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
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_STENCIL_FORMAT,
                depth_write_enabled: key.depth_test && key.depth_mask,
                depth_compare: if key.depth_test {
                    key.depth_func
                } else {
                    wgpu::CompareFunction::Always
                },
                stencil: wgpu::StencilState {
                    front: stencil_face,
                    back: stencil_face,
                    read_mask: 0xff,
                    write_mask: stencil_write_mask,
                },
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }
}

impl ProgramResources {
    fn new(
        device: &wgpu::Device,
        kind: ProgramKind,
        source: &str,
        texture_layout: Option<&wgpu::BindGroupLayout>,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tessera shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tessera uniform bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(uniform_size(kind)),
                },
                count: None,
            }],
        });

        let mut bind_group_layouts = vec![&uniform_layout];
        bind_group_layouts.extend(texture_layout);
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tessera pipeline layout"),
            bind_group_layouts: &bind_group_layouts,
            immediate_size: 0,
        });

        Self { kind, shader, uniform_layout, pipeline_layout, uniform_bind_group: None }
    }

    fn bind_uniforms(&mut self, device: &wgpu::Device, buffer: &wgpu::Buffer) {
        self.uniform_bind_group = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera uniform bind group"),
            layout: &self.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer,
                    offset: 0,
                    size: NonZeroU64::new(uniform_size(self.kind)),
                }),
            }],
        }));
    }
}

// ── blend ─────────────────────────────────────────────────────────────────

fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── vertex layouts ────────────────────────────────────────────────────────

const CIRCLE_VERTEX_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Sint16x4];

fn circle_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<CircleVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &CIRCLE_VERTEX_ATTRS,
    }
}

/// Tile quad corner in tile units.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct TileQuadVertex {
    pos: [i16; 2],
}

const TILE_QUAD_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Sint16x2];

fn tile_quad_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<TileQuadVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &TILE_QUAD_ATTRS,
    }
}

const TILE_QUAD_VERTICES: [TileQuadVertex; 4] = {
    let e = EXTENT as i16;
    [
        TileQuadVertex { pos: [0, 0] },
        TileQuadVertex { pos: [e, 0] },
        TileQuadVertex { pos: [e, e] },
        TileQuadVertex { pos: [0, e] },
    ]
};

const TILE_QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

// ── scissor ───────────────────────────────────────────────────────────────

/// Clamps `[x, y, w, h]` into a `size` target; wgpu rejects rects past the edge.
fn clamp_scissor(rect: [u32; 4], size: (u32, u32)) -> (u32, u32, u32, u32) {
    let [x, y, w, h] = rect;
    let x = x.min(size.0);
    let y = y.min(size.1);
    (x, y, w.min(size.0 - x), h.min(size.1 - y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scissor_is_clamped_to_target() {
        assert_eq!(clamp_scissor([10, 10, 50, 50], (100, 100)), (10, 10, 50, 50));
        assert_eq!(clamp_scissor([90, 95, 50, 50], (100, 100)), (90, 95, 10, 5));
        assert_eq!(clamp_scissor([200, 0, 5, 5], (100, 100)), (100, 0, 0, 5));
    }

    #[test]
    fn uniform_blocks_fit_the_stride() {
        for kind in [ProgramKind::Circle, ProgramKind::Raster, ProgramKind::ClippingMask] {
            assert!(uniform_size(kind) <= MAX_UNIFORM_SIZE);
        }
    }
}
