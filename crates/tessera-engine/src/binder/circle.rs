use crate::buffer::UploadContext;
use crate::geometry::GeometryTileFeature;
use crate::style::{CirclePaintProperties, Color};

use super::{AttributeBinding, AttributeValue, PaintPropertyBinder};

/// Paint attribute slots of the circle program (shader locations `1..=7`).
pub const CIRCLE_ATTRIBUTE_COUNT: usize = 7;

/// Vertex format of each circle attribute slot, in slot order.
pub const CIRCLE_ATTRIBUTE_FORMATS: [wgpu::VertexFormat; CIRCLE_ATTRIBUTE_COUNT] = [
    <f32 as AttributeValue>::FORMAT,
    <Color as AttributeValue>::FORMAT,
    <f32 as AttributeValue>::FORMAT,
    <f32 as AttributeValue>::FORMAT,
    <f32 as AttributeValue>::FORMAT,
    <Color as AttributeValue>::FORMAT,
    <f32 as AttributeValue>::FORMAT,
];

/// Binders for every circle paint property of one layer.
#[derive(Debug)]
pub struct CirclePaintPropertyBinders {
    pub radius: PaintPropertyBinder<f32>,
    pub color: PaintPropertyBinder<Color>,
    pub blur: PaintPropertyBinder<f32>,
    pub opacity: PaintPropertyBinder<f32>,
    pub stroke_width: PaintPropertyBinder<f32>,
    pub stroke_color: PaintPropertyBinder<Color>,
    pub stroke_opacity: PaintPropertyBinder<f32>,
}

impl CirclePaintPropertyBinders {
    /// `zoom` is the tile's overscaled zoom.
    pub fn new(paint: &CirclePaintProperties, zoom: f32) -> Self {
        Self {
            radius: PaintPropertyBinder::new(&paint.radius, zoom),
            color: PaintPropertyBinder::new(&paint.color, zoom),
            blur: PaintPropertyBinder::new(&paint.blur, zoom),
            opacity: PaintPropertyBinder::new(&paint.opacity, zoom),
            stroke_width: PaintPropertyBinder::new(&paint.stroke_width, zoom),
            stroke_color: PaintPropertyBinder::new(&paint.stroke_color, zoom),
            stroke_opacity: PaintPropertyBinder::new(&paint.stroke_opacity, zoom),
        }
    }

    pub fn populate_vertex_vectors(&mut self, feature: &dyn GeometryTileFeature, length: usize) {
        self.radius.populate_vertex_vectors(feature, length);
        self.color.populate_vertex_vectors(feature, length);
        self.blur.populate_vertex_vectors(feature, length);
        self.opacity.populate_vertex_vectors(feature, length);
        self.stroke_width.populate_vertex_vectors(feature, length);
        self.stroke_color.populate_vertex_vectors(feature, length);
        self.stroke_opacity.populate_vertex_vectors(feature, length);
    }

    pub fn upload(&mut self, ctx: &mut dyn UploadContext, layer_id: &str) {
        self.radius.upload(ctx, &format!("{layer_id} circle-radius"));
        self.color.upload(ctx, &format!("{layer_id} circle-color"));
        self.blur.upload(ctx, &format!("{layer_id} circle-blur"));
        self.opacity.upload(ctx, &format!("{layer_id} circle-opacity"));
        self.stroke_width.upload(ctx, &format!("{layer_id} circle-stroke-width"));
        self.stroke_color.upload(ctx, &format!("{layer_id} circle-stroke-color"));
        self.stroke_opacity.upload(ctx, &format!("{layer_id} circle-stroke-opacity"));
    }

    /// Bit `i` set when attribute slot `i` is per-vertex.
    pub fn data_driven_mask(&self) -> u8 {
        [
            self.radius.is_data_driven(),
            self.color.is_data_driven(),
            self.blur.is_data_driven(),
            self.opacity.is_data_driven(),
            self.stroke_width.is_data_driven(),
            self.stroke_color.is_data_driven(),
            self.stroke_opacity.is_data_driven(),
        ]
        .iter()
        .enumerate()
        .fold(0, |mask, (slot, &dd)| if dd { mask | (1u8 << slot) } else { mask })
    }

    /// Per-vertex attribute counts of the data-driven binders.
    pub fn attribute_lens(&self) -> Vec<usize> {
        [
            self.radius.attribute_len(),
            self.color.attribute_len(),
            self.blur.attribute_len(),
            self.opacity.attribute_len(),
            self.stroke_width.attribute_len(),
            self.stroke_color.attribute_len(),
            self.stroke_opacity.attribute_len(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Bindings in slot order.
    pub fn bindings(&self) -> [AttributeBinding; CIRCLE_ATTRIBUTE_COUNT] {
        [
            self.radius.binding(),
            self.color.binding(),
            self.blur.binding(),
            self.opacity.binding(),
            self.stroke_width.binding(),
            self.stroke_color.binding(),
            self.stroke_opacity.binding(),
        ]
    }
}
