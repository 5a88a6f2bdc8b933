use super::{Color, PossiblyEvaluated, TranslateAnchor};

/// Whether circle size scales with the map plane when pitched.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum CirclePitchScale {
    #[default]
    Map,
    Viewport,
}

/// Evaluated circle paint properties.
///
/// Data-driven properties stay as functions and are resolved per feature by the
/// bucket's paint property binders.
#[derive(Debug, Clone, PartialEq)]
pub struct CirclePaintProperties {
    /// Radius in pixels.
    pub radius: PossiblyEvaluated<f32>,
    pub color: PossiblyEvaluated<Color>,
    /// Blur as a fraction of the radius.
    pub blur: PossiblyEvaluated<f32>,
    pub opacity: PossiblyEvaluated<f32>,
    /// Offset in pixels.
    pub translate: [f32; 2],
    pub translate_anchor: TranslateAnchor,
    pub pitch_scale: CirclePitchScale,
    pub stroke_width: PossiblyEvaluated<f32>,
    pub stroke_color: PossiblyEvaluated<Color>,
    pub stroke_opacity: PossiblyEvaluated<f32>,
}

impl Default for CirclePaintProperties {
    fn default() -> Self {
        Self {
            radius: PossiblyEvaluated::Constant(5.0),
            color: PossiblyEvaluated::Constant(Color::BLACK),
            blur: PossiblyEvaluated::Constant(0.0),
            opacity: PossiblyEvaluated::Constant(1.0),
            translate: [0.0, 0.0],
            translate_anchor: TranslateAnchor::Map,
            pitch_scale: CirclePitchScale::Map,
            stroke_width: PossiblyEvaluated::Constant(0.0),
            stroke_color: PossiblyEvaluated::Constant(Color::BLACK),
            stroke_opacity: PossiblyEvaluated::Constant(1.0),
        }
    }
}

/// Style layer drawing point features as circles.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleLayer {
    pub id: String,
    /// Vector-tile layer the features come from.
    pub source_layer: String,
    pub paint: CirclePaintProperties,
}

impl CircleLayer {
    pub fn new(id: impl Into<String>, source_layer: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source_layer: source_layer.into(),
            paint: CirclePaintProperties::default(),
        }
    }

    #[inline]
    pub fn with_paint(mut self, paint: CirclePaintProperties) -> Self {
        self.paint = paint;
        self
    }
}
