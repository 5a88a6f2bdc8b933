use super::{CircleLayer, RasterLayer};

/// Closed set of style layer types the renderer understands.
///
/// Renderers match exhaustively instead of downcasting.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Circle(CircleLayer),
    Raster(RasterLayer),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LayerKind {
    Circle,
    Raster,
}

impl Layer {
    #[inline]
    pub fn id(&self) -> &str {
        match self {
            Layer::Circle(l) => &l.id,
            Layer::Raster(l) => &l.id,
        }
    }

    #[inline]
    pub fn kind(&self) -> LayerKind {
        match self {
            Layer::Circle(_) => LayerKind::Circle,
            Layer::Raster(_) => LayerKind::Raster,
        }
    }

    #[inline]
    pub fn as_circle(&self) -> Option<&CircleLayer> {
        match self {
            Layer::Circle(l) => Some(l),
            _ => None,
        }
    }

    #[inline]
    pub fn as_raster(&self) -> Option<&RasterLayer> {
        match self {
            Layer::Raster(l) => Some(l),
            _ => None,
        }
    }
}

impl From<CircleLayer> for Layer {
    fn from(layer: CircleLayer) -> Self {
        Layer::Circle(layer)
    }
}

impl From<RasterLayer> for Layer {
    fn from(layer: RasterLayer) -> Self {
        Layer::Raster(layer)
    }
}
