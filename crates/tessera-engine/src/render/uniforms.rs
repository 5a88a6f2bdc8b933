//! Per-draw uniform blocks. Layouts match the WGSL structs in `shaders/`.

use bytemuck::{Pod, Zeroable};

use crate::state::ProgramKind;

use super::matrix::Mat4;

/// Circle uniforms (80 bytes):
///
///  offset  0  matrix              mat4x4<f32>
///  offset 64  extrude_scale       vec2<f32>   tile units or clip units per pixel
///  offset 72  device_pixel_ratio  f32
///  offset 76  scale_with_map      u32         1 when circles scale with the map
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CircleUniforms {
    pub matrix: Mat4,
    pub extrude_scale: [f32; 2],
    pub device_pixel_ratio: f32,
    pub scale_with_map: u32,
}

/// Raster uniforms (96 bytes):
///
///  offset  0  matrix             mat4x4<f32>
///  offset 64  opacity            f32
///  offset 68  brightness_low     f32
///  offset 72  brightness_high    f32
///  offset 76  saturation_factor  f32
///  offset 80  contrast_factor    f32
///  offset 84  _pad               [f32; 3]
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct RasterUniforms {
    pub matrix: Mat4,
    pub opacity: f32,
    pub brightness_low: f32,
    pub brightness_high: f32,
    pub saturation_factor: f32,
    pub contrast_factor: f32,
    pub _pad: [f32; 3],
}

impl RasterUniforms {
    /// Maps `-1..=1` saturation onto the shader's mix factor.
    pub fn saturation_factor(saturation: f32) -> f32 {
        if saturation > 0.0 {
            1.0 - 1.0 / (1.001 - saturation)
        } else {
            -saturation
        }
    }

    /// Maps `-1..=1` contrast onto the shader's scale factor.
    pub fn contrast_factor(contrast: f32) -> f32 {
        if contrast > 0.0 {
            1.0 / (1.0 - contrast)
        } else {
            1.0 + contrast
        }
    }
}

/// Clipping mask uniforms (64 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ClippingMaskUniforms {
    pub matrix: Mat4,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Uniforms {
    Circle(CircleUniforms),
    Raster(RasterUniforms),
    ClippingMask(ClippingMaskUniforms),
}

impl Uniforms {
    pub fn program(&self) -> ProgramKind {
        match self {
            Uniforms::Circle(_) => ProgramKind::Circle,
            Uniforms::Raster(_) => ProgramKind::Raster,
            Uniforms::ClippingMask(_) => ProgramKind::ClippingMask,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Uniforms::Circle(u) => bytemuck::bytes_of(u),
            Uniforms::Raster(u) => bytemuck::bytes_of(u),
            Uniforms::ClippingMask(u) => bytemuck::bytes_of(u),
        }
    }
}

/// Uniform block size of `program`'s bind group.
pub fn uniform_size(program: ProgramKind) -> u64 {
    let size = match program {
        ProgramKind::Circle => std::mem::size_of::<CircleUniforms>(),
        ProgramKind::Raster => std::mem::size_of::<RasterUniforms>(),
        ProgramKind::ClippingMask => std::mem::size_of::<ClippingMaskUniforms>(),
    };
    size as u64
}
