use crate::binder::AttributeBinding;
use crate::bucket::{CircleBucket, RasterBucket};
use crate::state::{Blend, Preserve, ProgramKind, StateContext, StateKind};
use crate::style::{CircleLayer, CirclePitchScale, Layer, MapMode, RasterLayer};
use crate::worker::BuiltTile;

use super::frame::{DrawCall, DrawGeometry, Frame, FrameCommand, PipelineKey};
use super::params::{PaintParameters, RenderPass, RenderTile};
use super::uniforms::{CircleUniforms, ClippingMaskUniforms, RasterUniforms, Uniforms};

/// Records draws for one frame.
///
/// All fixed-function and dynamic state goes through the [`StateContext`] cache;
/// only real changes reach the frame's command list.
#[derive(Debug, Default)]
pub struct Painter {
    state: StateContext,
    commands: Vec<FrameCommand>,
}

impl Painter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> &StateContext {
        &self.state
    }

    /// Starts a frame. A new render pass begins with default state, so every
    /// cache slot is dirtied and the first assignment of each kind submits.
    pub fn begin_frame(&mut self) {
        self.commands.clear();
        let _ = self.state.backend.drain();
        self.state.backend.reset_snapshot();
        self.state.set_dirty_all();
    }

    /// Ends the frame and hands over its commands.
    pub fn finish_frame(&mut self) -> Frame {
        self.flush_state();
        Frame { commands: std::mem::take(&mut self.commands) }
    }

    /// Draws every layer over every tile: clipping masks, then the opaque pass
    /// top-down, then the translucent pass bottom-up.
    pub fn render_frame(
        &mut self,
        params: &PaintParameters,
        layers: &[Layer],
        tiles: &[(RenderTile, &BuiltTile)],
    ) -> Frame {
        self.begin_frame();

        if params.mode == MapMode::Still {
            for (tile, _) in tiles {
                self.render_clipping_mask(tile);
            }
        }

        let indexed = || layers.iter().enumerate();
        let opaque = indexed().rev().map(|(i, l)| (RenderPass::Opaque, i, l));
        let translucent = indexed().map(|(i, l)| (RenderPass::Translucent, i, l));

        for (pass, index, layer) in opaque.chain(translucent) {
            let params = params.with_pass(pass).with_layer(index as u32);
            for (tile, built) in tiles {
                let Some(bucket) = built.bucket_for(layer.id()) else { continue };
                if bucket.has_data() {
                    bucket.render(self, &params, layer, tile);
                }
            }
        }

        let frame = self.finish_frame();
        log::debug!(
            "recorded frame: {} draws, {} state changes over {} tiles",
            frame.draw_count(),
            frame.state_commands().count(),
            tiles.len()
        );
        frame
    }

    /// Writes `tile.clip_reference` into the stencil buffer over the tile's area.
    pub fn render_clipping_mask(&mut self, tile: &RenderTile) {
        let s = &mut self.state;
        s.stencil_test.assign(&mut s.backend, true);
        s.stencil_reference.assign(&mut s.backend, tile.clip_reference);
        s.depth_test.assign(&mut s.backend, false);
        s.depth_mask.assign(&mut s.backend, false);
        s.blend.assign(&mut s.backend, false);
        s.color_mask.assign(&mut s.backend, wgpu::ColorWrites::empty());
        s.program.assign(&mut s.backend, Some(ProgramKind::ClippingMask));
        s.scissor.assign(&mut s.backend, None);

        let uniforms = Uniforms::ClippingMask(ClippingMaskUniforms { matrix: tile.matrix });
        self.push_draw(ProgramKind::ClippingMask, 0, DrawGeometry::TileQuad, Vec::new(), uniforms);
    }

    /// Records one draw per segment of `bucket`. Circles are translucent; the
    /// opaque pass records nothing.
    pub fn render_circle(
        &mut self,
        params: &PaintParameters,
        bucket: &CircleBucket,
        layer: &CircleLayer,
        tile: &RenderTile,
    ) {
        if params.pass == RenderPass::Opaque {
            return;
        }
        let Some(binders) = bucket.binders(&layer.id) else {
            log::warn!("circle bucket has no paint binders for layer '{}'", layer.id);
            return;
        };

        // Masks exist only in still frames; a still-built bucket in a continuous
        // frame draws unclipped rather than against an empty stencil buffer.
        let clipped = params.mode == MapMode::Still && bucket.needs_clipping();
        let s = &mut self.state;
        s.stencil_test.assign(&mut s.backend, clipped);
        if clipped {
            s.stencil_reference.assign(&mut s.backend, tile.clip_reference);
        }
        s.depth_test.assign(&mut s.backend, true);
        s.depth_mask.assign(&mut s.backend, false);
        s.depth_func.assign(&mut s.backend, wgpu::CompareFunction::LessEqual);
        s.depth_range.assign(&mut s.backend, params.depth_range_for_sublayer(0));
        s.blend.assign(&mut s.backend, true);
        s.color_mask.assign(&mut s.backend, wgpu::ColorWrites::ALL);
        s.program.assign(&mut s.backend, Some(ProgramKind::Circle));
        s.scissor.assign(&mut s.backend, None);

        let paint = &layer.paint;
        let scale_with_map = paint.pitch_scale == CirclePitchScale::Map;
        let extrude_scale = if scale_with_map {
            let units = tile.pixels_to_tile_units(1.0, params.zoom);
            [units, units]
        } else {
            params.pixels_to_clip_units()
        };
        let uniforms = Uniforms::Circle(CircleUniforms {
            matrix: tile.translated_matrix(paint.translate, paint.translate_anchor, params),
            extrude_scale,
            device_pixel_ratio: params.pixel_ratio,
            scale_with_map: u32::from(scale_with_map),
        });

        let attributes = binders.bindings().to_vec();
        let data_driven = binders.data_driven_mask();
        let (vertex_buffer, index_buffer) = bucket.gpu_buffers();

        for segment in bucket.segments() {
            let start = segment.index_offset as u32;
            let geometry = DrawGeometry::Indexed {
                vertex_buffer,
                index_buffer,
                base_vertex: segment.vertex_offset as i32,
                indices: start..start + segment.index_length as u32,
            };
            self.push_draw(ProgramKind::Circle, data_driven, geometry, attributes.clone(), uniforms);
        }
    }

    /// Records the tile quad textured with the bucket's image.
    ///
    /// Fully opaque rasters are drawn with blending switched off for that one
    /// draw; the previous blend state is restored afterwards.
    pub fn render_raster(
        &mut self,
        params: &PaintParameters,
        bucket: &RasterBucket,
        layer: &RasterLayer,
        tile: &RenderTile,
    ) {
        if params.pass == RenderPass::Opaque {
            return;
        }
        let Some(texture) = bucket.texture() else { return };

        let s = &mut self.state;
        s.stencil_test.assign(&mut s.backend, false);
        s.depth_test.assign(&mut s.backend, true);
        s.depth_mask.assign(&mut s.backend, false);
        s.depth_func.assign(&mut s.backend, wgpu::CompareFunction::LessEqual);
        s.depth_range.assign(&mut s.backend, params.depth_range_for_sublayer(0));
        s.color_mask.assign(&mut s.backend, wgpu::ColorWrites::ALL);
        s.program.assign(&mut s.backend, Some(ProgramKind::Raster));
        s.scissor.assign(&mut s.backend, None);
        s.textures[0].assign(&mut s.backend, Some(texture));

        let paint = &layer.paint;
        let uniforms = Uniforms::Raster(RasterUniforms {
            matrix: tile.matrix,
            opacity: paint.opacity,
            brightness_low: paint.brightness_min,
            brightness_high: paint.brightness_max,
            saturation_factor: RasterUniforms::saturation_factor(paint.saturation),
            contrast_factor: RasterUniforms::contrast_factor(paint.contrast),
            _pad: [0.0; 3],
        });

        if paint.opacity < 1.0 {
            s.blend.assign(&mut s.backend, true);
            self.push_draw(ProgramKind::Raster, 0, DrawGeometry::TileQuad, Vec::new(), uniforms);
            return;
        }

        let mut blend = Preserve::<Blend>::new(&mut self.state.backend, ());
        Blend::set(&mut *blend, &false, &());
        let pipeline = PipelineKey::new(ProgramKind::Raster, blend.snapshot(), 0);
        self.commands.extend(blend.drain().map(FrameCommand::State));
        self.commands.push(FrameCommand::Draw(DrawCall {
            pipeline,
            geometry: DrawGeometry::TileQuad,
            attributes: Vec::new(),
            uniforms,
        }));
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn flush_state(&mut self) {
        self.commands.extend(self.state.backend.drain().map(FrameCommand::State));
    }

    fn push_draw(
        &mut self,
        program: ProgramKind,
        data_driven: u8,
        geometry: DrawGeometry,
        attributes: Vec<AttributeBinding>,
        uniforms: Uniforms,
    ) {
        self.flush_state();
        let pipeline = PipelineKey::new(program, self.state.backend.snapshot(), data_driven);
        self.commands.push(FrameCommand::Draw(DrawCall { pipeline, geometry, attributes, uniforms }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::BucketParameters;
    use crate::buffer::testing::RecordingUploads;
    use crate::buffer::{PremultipliedImage, TextureId};
    use crate::geometry::{OverscaledTileId, Point, TileFeature};
    use crate::render::matrix;
    use crate::state::StateCommand;

    fn tile() -> RenderTile {
        RenderTile::new(OverscaledTileId::new(0, 0, 0), matrix::IDENTITY, 1)
    }

    fn uploaded_circles(points: usize) -> (CircleLayer, CircleBucket) {
        let layer = CircleLayer::new("dots", "poi");
        let mut bucket = CircleBucket::new(&BucketParameters::default(), &[&layer]);
        let feature =
            TileFeature::points((0..points).map(|i| Point::new((i % 4000) as i16, (i / 4000) as i16)));
        bucket.add_feature(&feature, &feature.geometry);
        bucket.upload(&mut RecordingUploads::default());
        (layer, bucket)
    }

    fn uploaded_raster() -> RasterBucket {
        let mut bucket = RasterBucket::with_image(PremultipliedImage::new(1, 1, vec![0; 4]));
        bucket.upload(&mut RecordingUploads::default());
        bucket
    }

    #[test]
    fn opaque_pass_records_no_circles() {
        let (layer, bucket) = uploaded_circles(3);
        let mut painter = Painter::new();
        painter.begin_frame();
        let params = PaintParameters::default().with_pass(RenderPass::Opaque);
        bucket.render(&mut painter, &params, &layer, &tile());
        assert!(painter.finish_frame().is_empty());
    }

    #[test]
    fn one_draw_per_segment() {
        let (layer, bucket) = uploaded_circles(20_000);
        assert_eq!(bucket.segments().len(), 2);

        let mut painter = Painter::new();
        painter.begin_frame();
        bucket.render(&mut painter, &PaintParameters::default(), &layer, &tile());
        let frame = painter.finish_frame();

        let draws: Vec<_> = frame.draws().collect();
        assert_eq!(draws.len(), 2);
        for (draw, segment) in draws.iter().zip(bucket.segments()) {
            let DrawGeometry::Indexed { base_vertex, indices, .. } = &draw.geometry else {
                panic!("circle draws are indexed");
            };
            assert_eq!(*base_vertex as usize, segment.vertex_offset);
            assert_eq!(indices.start as usize, segment.index_offset);
            assert_eq!(indices.len(), segment.index_length);
            assert_eq!(draw.attributes.len(), crate::binder::CIRCLE_ATTRIBUTE_COUNT);
            assert!(draw.pipeline.blend && draw.pipeline.depth_test && !draw.pipeline.depth_mask);
            assert!(!draw.pipeline.stencil_test);
        }
    }

    #[test]
    fn repeated_layers_do_not_resubmit_state() {
        let (layer, bucket) = uploaded_circles(1);
        let mut painter = Painter::new();
        painter.begin_frame();
        let params = PaintParameters::default();
        bucket.render(&mut painter, &params, &layer, &tile());
        let after_first = painter.state().backend.submitted();
        bucket.render(&mut painter, &params, &layer, &tile());
        assert_eq!(painter.state().backend.submitted(), after_first);
        assert_eq!(painter.finish_frame().draw_count(), 2);
    }

    #[test]
    fn still_mode_enables_stencil_clipping() {
        let layer = CircleLayer::new("dots", "poi");
        let params = BucketParameters { mode: MapMode::Still, ..BucketParameters::default() };
        let mut bucket = CircleBucket::new(&params, &[&layer]);
        let feature = TileFeature::points([Point::new(1, 1)]);
        bucket.add_feature(&feature, &feature.geometry);
        bucket.upload(&mut RecordingUploads::default());

        let mut painter = Painter::new();
        painter.begin_frame();
        let still = PaintParameters { mode: MapMode::Still, ..PaintParameters::default() };
        bucket.render(&mut painter, &still, &layer, &tile());
        let frame = painter.finish_frame();

        assert!(frame.draws().all(|d| d.pipeline.stencil_test));
        assert!(frame.state_commands().any(|c| *c == StateCommand::StencilReference(1)));
    }

    #[test]
    fn still_bucket_in_continuous_frame_is_unclipped() {
        let layer = CircleLayer::new("dots", "poi");
        let params = BucketParameters { mode: MapMode::Still, ..BucketParameters::default() };
        let mut bucket = CircleBucket::new(&params, &[&layer]);
        let feature = TileFeature::points([Point::new(1, 1)]);
        bucket.add_feature(&feature, &feature.geometry);
        bucket.upload(&mut RecordingUploads::default());
        assert!(bucket.needs_clipping());

        let mut painter = Painter::new();
        painter.begin_frame();
        bucket.render(&mut painter, &PaintParameters::default(), &layer, &tile());
        let frame = painter.finish_frame();

        assert_eq!(frame.draw_count(), 1);
        assert!(frame.draws().all(|d| !d.pipeline.stencil_test));
        assert!(!frame.state_commands().any(|c| matches!(c, StateCommand::StencilReference(_))));
    }

    #[test]
    fn opaque_raster_restores_blend() {
        let raster = uploaded_raster();
        let (circle_layer, circles) = uploaded_circles(1);
        let mut painter = Painter::new();
        painter.begin_frame();
        let params = PaintParameters::default();

        circles.render(&mut painter, &params, &circle_layer, &tile());
        raster.render(&mut painter, &params, &RasterLayer::new("imagery"), &tile());

        let frame = painter.finish_frame();
        let raster_draw = frame.draws().last().unwrap();
        assert_eq!(raster_draw.pipeline.program, ProgramKind::Raster);
        assert!(!raster_draw.pipeline.blend);
        assert!(painter.state().backend.snapshot().blend);
        assert_eq!(painter.state().blend.current(), &true);
        assert_eq!(frame.state_commands().last(), Some(&StateCommand::Blend(true)));
        assert!(frame.state_commands().any(|c| {
            *c == StateCommand::BindTexture { unit: 0, texture: Some(TextureId(0)) }
        }));
    }

    #[test]
    fn translucent_raster_blends() {
        let raster = uploaded_raster();
        let mut layer = RasterLayer::new("imagery");
        layer.paint.opacity = 0.5;

        let mut painter = Painter::new();
        painter.begin_frame();
        raster.render(&mut painter, &PaintParameters::default(), &layer, &tile());
        let frame = painter.finish_frame();
        assert!(frame.draws().all(|d| d.pipeline.blend));
    }

    #[test]
    fn begin_frame_resubmits_state() {
        let (layer, bucket) = uploaded_circles(1);
        let mut painter = Painter::new();
        let params = PaintParameters::default();

        painter.begin_frame();
        bucket.render(&mut painter, &params, &layer, &tile());
        let first = painter.finish_frame();

        painter.begin_frame();
        bucket.render(&mut painter, &params, &layer, &tile());
        let second = painter.finish_frame();

        assert_eq!(first.state_commands().count(), second.state_commands().count());
        assert_eq!(first, second);
    }

    #[test]
    fn clipping_mask_writes_reference() {
        let mut painter = Painter::new();
        painter.begin_frame();
        painter.render_clipping_mask(&tile());
        let frame = painter.finish_frame();
        let draw = frame.draws().next().unwrap();
        assert_eq!(draw.pipeline.program, ProgramKind::ClippingMask);
        assert_eq!(draw.pipeline.color_mask, wgpu::ColorWrites::empty());
        assert_eq!(draw.geometry, DrawGeometry::TileQuad);
    }
}
