use std::collections::HashMap;

use super::{GeometryCollection, GeometryCoordinate};

/// Vector-tile geometry kind.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum FeatureType {
    #[default]
    Unknown,
    Point,
    LineString,
    Polygon,
}

/// Feature property value as decoded from a tile.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Double(f64),
    String(String),
}

impl Value {
    /// Numeric view used by data-driven paint properties.
    ///
    /// Booleans and strings are not coerced.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Int(v) => Some(v as f64),
            Value::Uint(v) => Some(v as f64),
            Value::Double(v) => Some(v),
            Value::Bool(_) | Value::String(_) => None,
        }
    }
}

/// Read-only view of one decoded tile feature.
///
/// Implemented by the tile decoder; buckets only ever read through this trait.
pub trait GeometryTileFeature {
    fn feature_type(&self) -> FeatureType;

    /// Looks up a property by key.
    fn value(&self, key: &str) -> Option<Value>;

    fn id(&self) -> Option<u64> {
        None
    }

    /// Tile-local geometry, one entry per ring/line/point run.
    fn geometries(&self) -> GeometryCollection;
}

/// Owned feature used by in-memory tiles and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileFeature {
    pub id: Option<u64>,
    pub kind: FeatureType,
    pub properties: HashMap<String, Value>,
    pub geometry: GeometryCollection,
}

impl TileFeature {
    /// A point feature with one point per entry of `points`.
    pub fn points(points: impl IntoIterator<Item = GeometryCoordinate>) -> Self {
        Self {
            kind: FeatureType::Point,
            geometry: points.into_iter().map(|p| vec![p]).collect(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    #[inline]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }
}

impl GeometryTileFeature for TileFeature {
    fn feature_type(&self) -> FeatureType {
        self.kind
    }

    fn value(&self, key: &str) -> Option<Value> {
        self.properties.get(key).cloned()
    }

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn geometries(&self) -> GeometryCollection {
        self.geometry.clone()
    }
}
