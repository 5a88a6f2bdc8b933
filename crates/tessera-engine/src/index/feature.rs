use crate::geometry::{BBox, GeometryCollection};

use super::GridIndex;

/// Grid resolution used by `FeatureIndex::new`; cells are `EXTENT / 16` wide.
pub const DEFAULT_GRID_SIZE: i32 = 16;

/// Extra border cells catching geometry buffered in from neighboring tiles.
pub const DEFAULT_GRID_PADDING: i32 = 1;

/// Hit-test payload: one renderable sub-geometry of a source feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedSubfeature {
    /// Position of the feature within its source layer.
    pub feature_index: usize,
    pub source_layer: String,
    pub bucket_name: String,
    /// Global insertion counter; preserves draw order across buckets.
    pub sort_index: usize,
}

/// Per-tile index mapping regions back to the features rendered there.
#[derive(Debug, Clone)]
pub struct FeatureIndex {
    grid: GridIndex<IndexedSubfeature>,
    next_sort_index: usize,
}

impl FeatureIndex {
    pub fn new(extent: i32) -> Self {
        Self::with_grid(extent, DEFAULT_GRID_SIZE, DEFAULT_GRID_PADDING)
    }

    pub fn with_grid(extent: i32, grid_size: i32, padding: i32) -> Self {
        Self {
            grid: GridIndex::new(extent, grid_size, padding),
            next_sort_index: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// Registers every non-empty sub-geometry of a feature with its own bbox.
    ///
    /// All entries of one feature share a sort index.
    pub fn insert(
        &mut self,
        geometry: &GeometryCollection,
        feature_index: usize,
        source_layer: &str,
        bucket_name: &str,
    ) {
        let sort_index = self.next_sort_index;
        self.next_sort_index += 1;

        for ring in geometry {
            let Some(bbox) = BBox::from_points(ring) else { continue };
            self.grid.insert(
                IndexedSubfeature {
                    feature_index,
                    source_layer: source_layer.to_owned(),
                    bucket_name: bucket_name.to_owned(),
                    sort_index,
                },
                bbox,
            );
        }
    }

    /// Returns sub-features whose bbox lies within `additional_radius` of `query`.
    ///
    /// `additional_radius` accounts for rendered size (e.g. circle radius in tile
    /// units). Multi-ring features appear once. Results are in insertion order.
    pub fn query(&self, query: BBox, additional_radius: i32) -> Vec<IndexedSubfeature> {
        let mut out: Vec<IndexedSubfeature> = Vec::new();
        for hit in self.grid.query(query.expanded(additional_radius.max(0))) {
            if out.last().is_some_and(|last| last.sort_index == hit.sort_index) {
                continue;
            }
            out.push(hit);
        }
        out
    }

    /// Like [`query`](Self::query), restricted to the given bucket names.
    pub fn query_buckets(
        &self,
        query: BBox,
        additional_radius: i32,
        bucket_names: &[&str],
    ) -> Vec<IndexedSubfeature> {
        let mut hits = self.query(query, additional_radius);
        hits.retain(|hit| bucket_names.contains(&hit.bucket_name.as_str()));
        hits
    }
}
