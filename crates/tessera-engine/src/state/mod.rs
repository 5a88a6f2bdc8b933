//! Redundant GPU state-change elision.
//!
//! Every piece of pipeline state the painter touches is wrapped in a [`State`]
//! slot remembering the last submitted value. Assigning an equal value to a clean
//! slot is a no-op; anything else is forwarded to the backend's submit primitive.
//!
//! The backend used by the renderer is [`StateRecorder`]: it appends
//! [`StateCommand`]s to a stream that the wgpu encoder later replays (dynamic
//! state) or folds into pipeline selection (fixed-function state).

mod cache;
mod kinds;
mod recorder;

pub use cache::{Preserve, State, StateKind};
pub use kinds::{
    BindTexture, Blend, ColorMask, DepthFunc, DepthMask, DepthRange, DepthRangeValue, DepthTest,
    Program, ProgramKind, ScissorRect, ScissorValue, StateContext, StencilReference, StencilTest,
    TextureUnit, MAX_TEXTURE_UNITS,
};
pub use recorder::{GpuStateSnapshot, StateCommand, StateRecorder};
