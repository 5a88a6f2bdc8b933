use std::ops::Range;

use crate::binder::AttributeBinding;
use crate::buffer::BufferId;
use crate::state::{GpuStateSnapshot, ProgramKind, StateCommand};

use super::uniforms::Uniforms;

/// Fixed-function state a wgpu pipeline bakes in.
///
/// Built from the state snapshot at draw time, so two draws share a pipeline
/// exactly when their cached state agrees.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PipelineKey {
    pub program: ProgramKind,
    pub stencil_test: bool,
    pub depth_test: bool,
    pub depth_mask: bool,
    pub depth_func: wgpu::CompareFunction,
    pub blend: bool,
    pub color_mask: wgpu::ColorWrites,
    /// Bit `i` set when paint attribute slot `i` is per-vertex.
    pub data_driven: u8,
}

impl PipelineKey {
    pub fn new(program: ProgramKind, state: &GpuStateSnapshot, data_driven: u8) -> Self {
        Self {
            program,
            stencil_test: state.stencil_test,
            depth_test: state.depth_test,
            depth_mask: state.depth_mask,
            depth_func: state.depth_func,
            blend: state.blend,
            color_mask: state.color_mask,
            data_driven,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawGeometry {
    /// Bucket geometry; `indices` index the whole index buffer and are offset
    /// by `base_vertex`.
    Indexed {
        vertex_buffer: BufferId,
        index_buffer: BufferId,
        base_vertex: i32,
        indices: Range<u32>,
    },
    /// The encoder's static `0..EXTENT` tile quad.
    TileQuad,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub pipeline: PipelineKey,
    pub geometry: DrawGeometry,
    /// Paint attribute slots in shader location order, starting at location 1.
    pub attributes: Vec<AttributeBinding>,
    pub uniforms: Uniforms,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameCommand {
    State(StateCommand),
    Draw(DrawCall),
}

/// Everything the painter recorded for one frame, in submission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub(super) commands: Vec<FrameCommand>,
}

impl Frame {
    #[inline]
    pub fn commands(&self) -> &[FrameCommand] {
        &self.commands
    }

    pub fn draws(&self) -> impl Iterator<Item = &DrawCall> {
        self.commands.iter().filter_map(|c| match c {
            FrameCommand::Draw(d) => Some(d),
            FrameCommand::State(_) => None,
        })
    }

    pub fn state_commands(&self) -> impl Iterator<Item = &StateCommand> {
        self.commands.iter().filter_map(|c| match c {
            FrameCommand::State(s) => Some(s),
            FrameCommand::Draw(_) => None,
        })
    }

    #[inline]
    pub fn draw_count(&self) -> usize {
        self.draws().count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
