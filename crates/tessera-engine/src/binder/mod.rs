//! Paint property binders.
//!
//! A binder turns one evaluated paint property into vertex attribute data:
//! - constant properties yield a single value bound for the whole draw
//! - data-driven properties are evaluated per feature and appended once per
//!   vertex, in lockstep with the bucket's geometry
//!
//! The lockstep contract: after a bucket finishes a feature it calls
//! `populate_vertex_vectors(feature, vertex_count)` on every binder, which fills
//! attribute storage up to exactly `vertex_count` entries.

mod circle;
mod property;

pub use circle::{CirclePaintPropertyBinders, CIRCLE_ATTRIBUTE_COUNT, CIRCLE_ATTRIBUTE_FORMATS};
pub use property::{AttributeBinding, AttributeStorage, AttributeValue, PaintPropertyBinder};
