//! Concrete state kinds used by the painter.

use crate::buffer::TextureId;

use super::cache::{State, StateKind};
use super::recorder::{GpuStateSnapshot, StateCommand, StateRecorder};

/// Number of texture binding slots tracked by [`StateContext`].
pub const MAX_TEXTURE_UNITS: usize = 4;

/// Shader program bound for subsequent draws.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ProgramKind {
    Circle,
    Raster,
    /// Writes tile clip references into the stencil buffer.
    ClippingMask,
}

/// Depth sub-range used to layer draws without depth fighting.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DepthRangeValue {
    pub min: f32,
    pub max: f32,
}

impl DepthRangeValue {
    pub const FULL: Self = Self { min: 0.0, max: 1.0 };
}

/// Scissor box in physical pixels (`[x, y, width, height]`); `None` disables it.
pub type ScissorValue = Option<[u32; 4]>;

/// Texture slot argument for [`BindTexture`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TextureUnit {
    pub unit: u8,
}

macro_rules! recorded_state {
    ($(#[$doc:meta])* $name:ident, $field:ident, $value:ty, $variant:ident) => {
        $(#[$doc])*
        #[derive(Debug)]
        pub struct $name;

        impl StateKind for $name {
            type Value = $value;
            type Args = ();
            type Backend = StateRecorder;

            fn default_value() -> $value {
                GpuStateSnapshot::default().$field
            }

            fn set(backend: &mut StateRecorder, value: &$value, _: &()) {
                backend.submit(StateCommand::$variant(*value));
            }

            fn get(backend: &StateRecorder, _: &()) -> $value {
                backend.snapshot().$field
            }
        }
    };
}

recorded_state!(
    /// Stencil clipping against tile masks.
    StencilTest, stencil_test, bool, StencilTest
);
recorded_state!(DepthTest, depth_test, bool, DepthTest);
recorded_state!(DepthMask, depth_mask, bool, DepthMask);
recorded_state!(DepthFunc, depth_func, wgpu::CompareFunction, DepthFunc);
recorded_state!(
    /// Replayed as the viewport's depth bounds.
    DepthRange, depth_range, DepthRangeValue, DepthRange
);
recorded_state!(
    /// Premultiplied-alpha blending on/off.
    Blend, blend, bool, Blend
);
recorded_state!(ColorMask, color_mask, wgpu::ColorWrites, ColorMask);
recorded_state!(StencilReference, stencil_reference, u32, StencilReference);
recorded_state!(Program, program, Option<ProgramKind>, Program);
recorded_state!(ScissorRect, scissor, ScissorValue, Scissor);

/// Texture bound to one slot.
#[derive(Debug)]
pub struct BindTexture;

impl StateKind for BindTexture {
    type Value = Option<TextureId>;
    type Args = TextureUnit;
    type Backend = StateRecorder;

    fn default_value() -> Option<TextureId> {
        None
    }

    fn set(backend: &mut StateRecorder, value: &Option<TextureId>, args: &TextureUnit) {
        backend.submit(StateCommand::BindTexture { unit: args.unit, texture: *value });
    }

    fn get(backend: &StateRecorder, args: &TextureUnit) -> Option<TextureId> {
        backend.snapshot().textures[args.unit as usize]
    }
}

/// One cached slot per state kind, plus the backend they submit to.
///
/// Fields are public so callers can borrow a slot and the backend at once:
/// `ctx.depth_test.assign(&mut ctx.backend, true)`.
#[derive(Debug)]
pub struct StateContext {
    pub backend: StateRecorder,

    pub stencil_test: State<StencilTest>,
    pub depth_test: State<DepthTest>,
    pub depth_mask: State<DepthMask>,
    pub depth_func: State<DepthFunc>,
    pub depth_range: State<DepthRange>,
    pub blend: State<Blend>,
    pub color_mask: State<ColorMask>,
    pub stencil_reference: State<StencilReference>,
    pub program: State<Program>,
    pub scissor: State<ScissorRect>,
    pub textures: [State<BindTexture>; MAX_TEXTURE_UNITS],
}

impl Default for StateContext {
    fn default() -> Self {
        Self {
            backend: StateRecorder::new(),
            stencil_test: State::default(),
            depth_test: State::default(),
            depth_mask: State::default(),
            depth_func: State::default(),
            depth_range: State::default(),
            blend: State::default(),
            color_mask: State::default(),
            stencil_reference: State::default(),
            program: State::default(),
            scissor: State::default(),
            textures: std::array::from_fn(|unit| State::new(TextureUnit { unit: unit as u8 })),
        }
    }
}

impl StateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks every slot dirty so the next assignment of each submits.
    pub fn set_dirty_all(&mut self) {
        self.stencil_test.set_dirty();
        self.depth_test.set_dirty();
        self.depth_mask.set_dirty();
        self.depth_func.set_dirty();
        self.depth_range.set_dirty();
        self.blend.set_dirty();
        self.color_mask.set_dirty();
        self.stencil_reference.set_dirty();
        self.program.set_dirty();
        self.scissor.set_dirty();
        for texture in &mut self.textures {
            texture.set_dirty();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Preserve;

    #[test]
    fn redundant_assignments_are_elided() {
        let mut ctx = StateContext::new();
        ctx.depth_test.assign(&mut ctx.backend, true);
        ctx.depth_test.assign(&mut ctx.backend, true);
        ctx.depth_mask.assign(&mut ctx.backend, false);
        ctx.depth_mask.assign(&mut ctx.backend, false);

        assert_eq!(
            ctx.backend.pending(),
            &[StateCommand::DepthTest(true), StateCommand::DepthMask(false)]
        );
        assert_eq!(ctx.backend.submitted(), 2);
    }

    #[test]
    fn set_dirty_all_resubmits_everything() {
        let mut ctx = StateContext::new();
        ctx.blend.assign(&mut ctx.backend, true);
        ctx.textures[1].assign(&mut ctx.backend, Some(TextureId(3)));
        let _ = ctx.backend.drain();

        ctx.set_dirty_all();
        ctx.blend.assign(&mut ctx.backend, true);
        ctx.textures[1].assign(&mut ctx.backend, Some(TextureId(3)));
        assert_eq!(
            ctx.backend.pending(),
            &[
                StateCommand::Blend(true),
                StateCommand::BindTexture { unit: 1, texture: Some(TextureId(3)) },
            ]
        );
    }

    #[test]
    fn texture_units_are_independent() {
        let mut ctx = StateContext::new();
        ctx.textures[0].assign(&mut ctx.backend, Some(TextureId(1)));
        assert!(ctx.textures[2].assign(&mut ctx.backend, Some(TextureId(1))));
        assert_eq!(ctx.backend.snapshot().textures[0], Some(TextureId(1)));
        assert_eq!(ctx.backend.snapshot().textures[2], Some(TextureId(1)));
        assert_eq!(ctx.backend.snapshot().textures[1], None);
    }

    #[test]
    fn preserve_reads_and_restores_recorded_value() {
        let mut ctx = StateContext::new();
        ctx.blend.assign(&mut ctx.backend, true);
        {
            let mut guard = Preserve::<Blend>::new(&mut ctx.backend, ());
            Blend::set(&mut guard, &false, &());
            assert!(!guard.snapshot().blend);
        }
        assert!(ctx.backend.snapshot().blend);
        assert_eq!(
            ctx.backend.pending(),
            &[StateCommand::Blend(true), StateCommand::Blend(false), StateCommand::Blend(true)]
        );
        // The slot still matches the real value, so no resubmission.
        assert!(!ctx.blend.assign(&mut ctx.backend, true));
    }
}
