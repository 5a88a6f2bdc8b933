use crate::geometry::{EXTENT, OverscaledTileId};
use crate::state::DepthRangeValue;
use crate::style::{MapMode, TranslateAnchor};

use super::matrix::{self, Mat4};
use super::Viewport;

/// Logical tile size in pixels at the tile's own zoom.
pub const TILE_SIZE: f32 = 512.0;

/// Depth slots reserved per style layer.
pub const NUM_SUBLAYERS: u32 = 3;

/// Depth step between adjacent sublayers.
pub const DEPTH_EPSILON: f32 = 1.0 / 65536.0;

/// Which half of the frame is being recorded.
///
/// Opaque draws go front-to-back first, translucent draws back-to-front after.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RenderPass {
    Opaque,
    Translucent,
}

/// Per-layer draw parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PaintParameters {
    pub pass: RenderPass,
    pub mode: MapMode,
    /// Physical pixels per logical pixel.
    pub pixel_ratio: f32,
    pub viewport: Viewport,
    /// Zoom the frame is drawn at.
    pub zoom: f32,
    /// Map rotation in radians, clockwise.
    pub bearing: f32,
    /// Position of the layer being drawn in the style, bottom first.
    pub layer_index: u32,
}

impl Default for PaintParameters {
    fn default() -> Self {
        Self {
            pass: RenderPass::Translucent,
            mode: MapMode::Continuous,
            pixel_ratio: 1.0,
            viewport: Viewport::default(),
            zoom: 0.0,
            bearing: 0.0,
            layer_index: 0,
        }
    }
}

impl PaintParameters {
    #[inline]
    pub fn with_pass(self, pass: RenderPass) -> Self {
        Self { pass, ..self }
    }

    #[inline]
    pub fn with_layer(self, layer_index: u32) -> Self {
        Self { layer_index, ..self }
    }

    /// Degenerate depth range for one sublayer of the current layer. Higher
    /// layers get smaller depth so they pass `LessEqual` against lower ones.
    pub fn depth_range_for_sublayer(&self, sublayer: u32) -> DepthRangeValue {
        debug_assert!(sublayer < NUM_SUBLAYERS);
        let slot = (1 + self.layer_index) * NUM_SUBLAYERS + sublayer;
        let depth = (1.0 - slot as f32 * DEPTH_EPSILON).max(0.0);
        DepthRangeValue { min: depth, max: depth }
    }

    /// Scale from logical pixels to clip-space units.
    #[inline]
    pub fn pixels_to_clip_units(&self) -> [f32; 2] {
        [2.0 / self.viewport.width, -2.0 / self.viewport.height]
    }
}

/// One tile as placed in the current frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderTile {
    pub id: OverscaledTileId,
    /// Tile units to clip space.
    pub matrix: Mat4,
    /// Stencil value written by this tile's clipping mask.
    pub clip_reference: u32,
}

impl RenderTile {
    pub fn new(id: OverscaledTileId, matrix: Mat4, clip_reference: u32) -> Self {
        Self { id, matrix, clip_reference }
    }

    /// Tile units covered by `pixels` logical pixels at `zoom`.
    pub fn pixels_to_tile_units(&self, pixels: f32, zoom: f32) -> f32 {
        let scale = 2f32.powf(zoom - f32::from(self.id.overscaled_z));
        pixels * (EXTENT as f32 / (TILE_SIZE * scale))
    }

    /// Tile matrix shifted by a pixel `translate`. Viewport-anchored offsets are
    /// rotated against the bearing so they stay fixed on screen.
    pub fn translated_matrix(
        &self,
        translate: [f32; 2],
        anchor: TranslateAnchor,
        params: &PaintParameters,
    ) -> Mat4 {
        if translate == [0.0, 0.0] {
            return self.matrix;
        }

        let [tx, ty] = match anchor {
            TranslateAnchor::Map => translate,
            TranslateAnchor::Viewport => {
                let (sin, cos) = (-params.bearing).sin_cos();
                [
                    translate[0] * cos - translate[1] * sin,
                    translate[0] * sin + translate[1] * cos,
                ]
            }
        };
        let units = self.pixels_to_tile_units(1.0, params.zoom);
        matrix::translate(&self.matrix, tx * units, ty * units, 0.0)
    }
}
