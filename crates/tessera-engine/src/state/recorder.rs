use crate::buffer::TextureId;

use super::kinds::{DepthRangeValue, ProgramKind, ScissorValue, MAX_TEXTURE_UNITS};

/// One submitted state change.
#[derive(Debug, Clone, PartialEq)]
pub enum StateCommand {
    StencilTest(bool),
    DepthTest(bool),
    DepthMask(bool),
    DepthFunc(wgpu::CompareFunction),
    DepthRange(DepthRangeValue),
    Blend(bool),
    ColorMask(wgpu::ColorWrites),
    StencilReference(u32),
    Program(Option<ProgramKind>),
    Scissor(ScissorValue),
    BindTexture { unit: u8, texture: Option<TextureId> },
}

/// Real (submitted) value of every state kind.
///
/// Fixed-function fields feed the encoder's pipeline key; the rest are replayed
/// as dynamic render-pass state.
#[derive(Debug, Clone, PartialEq)]
pub struct GpuStateSnapshot {
    pub stencil_test: bool,
    pub depth_test: bool,
    pub depth_mask: bool,
    pub depth_func: wgpu::CompareFunction,
    pub depth_range: DepthRangeValue,
    pub blend: bool,
    pub color_mask: wgpu::ColorWrites,
    pub stencil_reference: u32,
    pub program: Option<ProgramKind>,
    pub scissor: ScissorValue,
    pub textures: [Option<TextureId>; MAX_TEXTURE_UNITS],
}

impl Default for GpuStateSnapshot {
    fn default() -> Self {
        Self {
            stencil_test: false,
            depth_test: false,
            depth_mask: true,
            depth_func: wgpu::CompareFunction::Less,
            depth_range: DepthRangeValue::FULL,
            blend: false,
            color_mask: wgpu::ColorWrites::ALL,
            stencil_reference: 0,
            program: None,
            scissor: None,
            textures: [None; MAX_TEXTURE_UNITS],
        }
    }
}

impl GpuStateSnapshot {
    fn apply(&mut self, command: &StateCommand) {
        match *command {
            StateCommand::StencilTest(v) => self.stencil_test = v,
            StateCommand::DepthTest(v) => self.depth_test = v,
            StateCommand::DepthMask(v) => self.depth_mask = v,
            StateCommand::DepthFunc(v) => self.depth_func = v,
            StateCommand::DepthRange(v) => self.depth_range = v,
            StateCommand::Blend(v) => self.blend = v,
            StateCommand::ColorMask(v) => self.color_mask = v,
            StateCommand::StencilReference(v) => self.stencil_reference = v,
            StateCommand::Program(v) => self.program = v,
            StateCommand::Scissor(v) => self.scissor = v,
            StateCommand::BindTexture { unit, texture } => self.textures[unit as usize] = texture,
        }
    }
}

/// Submission backend for the state cache.
///
/// `submit` is the opaque "set state" primitive: it appends to the pending
/// command list and updates the snapshot the `get` side reads from.
#[derive(Debug, Default)]
pub struct StateRecorder {
    snapshot: GpuStateSnapshot,
    pending: Vec<StateCommand>,
    submitted: usize,
}

impl StateRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, command: StateCommand) {
        self.snapshot.apply(&command);
        self.pending.push(command);
        self.submitted += 1;
    }

    #[inline]
    pub fn snapshot(&self) -> &GpuStateSnapshot {
        &self.snapshot
    }

    /// Commands submitted since the last drain, in submission order.
    #[inline]
    pub fn pending(&self) -> &[StateCommand] {
        &self.pending
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, StateCommand> {
        self.pending.drain(..)
    }

    /// Total submissions over the recorder's lifetime.
    #[inline]
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Forgets tracked values, e.g. when a fresh render pass starts with default
    /// dynamic state. Pending commands are kept.
    pub fn reset_snapshot(&mut self) {
        self.snapshot = GpuStateSnapshot::default();
    }
}
