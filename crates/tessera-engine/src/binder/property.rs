use core::fmt;

use bytemuck::Pod;

use crate::buffer::{BufferId, UploadContext, VertexBuffer, VertexVector};
use crate::geometry::GeometryTileFeature;
use crate::style::{Color, PossiblyEvaluated, PropertyValue};

/// Property value with a GPU attribute representation.
pub trait AttributeValue: PropertyValue {
    type Attribute: Pod + fmt::Debug;
    const FORMAT: wgpu::VertexFormat;

    fn to_attribute(&self) -> Self::Attribute;
}

impl AttributeValue for f32 {
    type Attribute = f32;
    const FORMAT: wgpu::VertexFormat = wgpu::VertexFormat::Float32;

    #[inline]
    fn to_attribute(&self) -> f32 {
        *self
    }
}

impl AttributeValue for Color {
    type Attribute = [f32; 4];
    const FORMAT: wgpu::VertexFormat = wgpu::VertexFormat::Float32x4;

    #[inline]
    fn to_attribute(&self) -> [f32; 4] {
        self.to_array()
    }
}

/// How one attribute slot is fed at draw time.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeBinding {
    /// Same value for every vertex; bound as a one-element, instance-stepped buffer.
    Constant { format: wgpu::VertexFormat, bytes: Vec<u8> },
    /// One value per vertex, uploaded alongside the bucket's vertex buffer.
    PerVertex { format: wgpu::VertexFormat, buffer: BufferId },
}

/// Per-vertex attribute storage; consumed by upload.
#[derive(Debug)]
pub enum AttributeStorage<A> {
    Building(VertexVector<A>),
    Uploaded(VertexBuffer<A>),
}

/// Binder for one paint property of one layer.
#[derive(Debug)]
pub enum PaintPropertyBinder<T: AttributeValue> {
    Constant(T),
    DataDriven {
        expression: PossiblyEvaluated<T>,
        /// Tile zoom composite functions are evaluated at.
        zoom: f32,
        attributes: AttributeStorage<T::Attribute>,
    },
}

impl<T: AttributeValue> PaintPropertyBinder<T> {
    pub fn new(property: &PossiblyEvaluated<T>, zoom: f32) -> Self {
        match property {
            PossiblyEvaluated::Constant(v) => PaintPropertyBinder::Constant(v.clone()),
            expression => PaintPropertyBinder::DataDriven {
                expression: expression.clone(),
                zoom,
                attributes: AttributeStorage::Building(VertexVector::new()),
            },
        }
    }

    #[inline]
    pub fn is_data_driven(&self) -> bool {
        matches!(self, PaintPropertyBinder::DataDriven { .. })
    }

    #[inline]
    pub fn constant_value(&self) -> Option<&T> {
        match self {
            PaintPropertyBinder::Constant(v) => Some(v),
            PaintPropertyBinder::DataDriven { .. } => None,
        }
    }

    /// Appends this feature's value until `length` attributes exist.
    ///
    /// No-op for constant binders.
    ///
    /// # Panics
    /// Panics if called after [`upload`](Self::upload).
    pub fn populate_vertex_vectors(&mut self, feature: &dyn GeometryTileFeature, length: usize) {
        let PaintPropertyBinder::DataDriven { expression, zoom, attributes } = self else {
            return;
        };
        let AttributeStorage::Building(vertices) = attributes else {
            panic!("paint attributes populated after upload");
        };
        let value = expression.evaluate(*zoom, feature).to_attribute();
        vertices.fill_to(length, value);
    }

    /// Number of per-vertex attributes, `None` for constant binders.
    pub fn attribute_len(&self) -> Option<usize> {
        match self {
            PaintPropertyBinder::Constant(_) => None,
            PaintPropertyBinder::DataDriven { attributes, .. } => Some(match attributes {
                AttributeStorage::Building(v) => v.len(),
                AttributeStorage::Uploaded(b) => b.len(),
            }),
        }
    }

    /// CPU-side attributes of a data-driven binder that has not been uploaded.
    pub fn attributes(&self) -> Option<&[T::Attribute]> {
        match self {
            PaintPropertyBinder::DataDriven { attributes: AttributeStorage::Building(v), .. } => {
                Some(v.as_slice())
            }
            _ => None,
        }
    }

    /// Moves per-vertex attributes to the GPU. No-op for constant binders.
    ///
    /// # Panics
    /// Panics if called twice.
    pub fn upload(&mut self, ctx: &mut dyn UploadContext, label: &str) {
        let PaintPropertyBinder::DataDriven { attributes, .. } = self else {
            return;
        };
        let buffer = match attributes {
            AttributeStorage::Building(vertices) => std::mem::take(vertices).upload(ctx, label),
            AttributeStorage::Uploaded(_) => panic!("paint attributes uploaded twice"),
        };
        *attributes = AttributeStorage::Uploaded(buffer);
    }

    /// Draw-time binding for this property.
    ///
    /// # Panics
    /// Panics for a data-driven binder that has not been uploaded.
    pub fn binding(&self) -> AttributeBinding {
        match self {
            PaintPropertyBinder::Constant(v) => AttributeBinding::Constant {
                format: T::FORMAT,
                bytes: bytemuck::bytes_of(&v.to_attribute()).to_vec(),
            },
            PaintPropertyBinder::DataDriven { attributes: AttributeStorage::Uploaded(b), .. } => {
                AttributeBinding::PerVertex { format: T::FORMAT, buffer: b.id() }
            }
            PaintPropertyBinder::DataDriven { .. } => {
                panic!("data-driven paint attributes bound before upload")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{TileFeature, Value};
    use crate::style::{SourceFunction, Stops};

    fn size_function() -> PossiblyEvaluated<f32> {
        PossiblyEvaluated::Source(SourceFunction::new("size", Stops::Identity, 1.0))
    }

    #[test]
    fn constant_binder_ignores_features() {
        let mut b = PaintPropertyBinder::new(&PossiblyEvaluated::Constant(3.0f32), 0.0);
        b.populate_vertex_vectors(&TileFeature::default(), 8);
        assert!(!b.is_data_driven());
        assert_eq!(b.constant_value(), Some(&3.0));
        assert_eq!(b.attribute_len(), None);
        assert_eq!(
            b.binding(),
            AttributeBinding::Constant {
                format: wgpu::VertexFormat::Float32,
                bytes: 3.0f32.to_ne_bytes().to_vec(),
            }
        );
    }

    #[test]
    fn data_driven_binder_fills_to_length() {
        let mut b = PaintPropertyBinder::new(&size_function(), 0.0);
        let small = TileFeature::default().with_property("size", Value::Int(2));
        let large = TileFeature::default().with_property("size", Value::Int(9));

        b.populate_vertex_vectors(&small, 4);
        b.populate_vertex_vectors(&large, 12);
        assert_eq!(b.attributes(), Some(&[2.0, 2.0, 2.0, 2.0, 9.0, 9.0, 9.0, 9.0, 9.0, 9.0, 9.0, 9.0][..]));
    }

    #[test]
    fn feature_without_vertices_adds_nothing() {
        let mut b = PaintPropertyBinder::new(&size_function(), 0.0);
        b.populate_vertex_vectors(&TileFeature::default(), 0);
        assert_eq!(b.attribute_len(), Some(0));
    }

    #[test]
    #[should_panic(expected = "bound before upload")]
    fn binding_requires_upload() {
        PaintPropertyBinder::new(&size_function(), 0.0).binding();
    }
}
