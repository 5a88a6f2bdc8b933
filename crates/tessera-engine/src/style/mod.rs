//! Minimal style contract consumed by buckets and the painter.
//!
//! Style documents are parsed and zoom-evaluated elsewhere; this module only
//! holds the already-evaluated result:
//! - `PossiblyEvaluated<T>`: a constant or a compiled per-feature function
//! - per-layer paint property sets
//! - the closed `Layer` sum type renderers dispatch on

mod circle;
mod color;
mod function;
mod layer;
mod raster;

pub use circle::{CircleLayer, CirclePaintProperties, CirclePitchScale};
pub use color::Color;
pub use function::{CompositeFunction, Interpolate, PossiblyEvaluated, PropertyValue, SourceFunction, Stops};
pub use layer::{Layer, LayerKind};
pub use raster::{RasterLayer, RasterPaintProperties};

/// Rendering mode; selects the bucket point-filtering policy.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum MapMode {
    /// Interactive rendering; neighboring tiles are drawn too.
    #[default]
    Continuous,
    /// One static frame without neighbor-tile buffering.
    Still,
}

/// Frame of reference for paint `translate` offsets.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum TranslateAnchor {
    #[default]
    Map,
    Viewport,
}
