use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;

use crate::bucket::{Bucket, BucketParameters, CircleBucket, RasterBucket};
use crate::buffer::{PremultipliedImage, UploadContext};
use crate::geometry::{BBox, EXTENT, OverscaledTileId, TileFeature};
use crate::index::{FeatureIndex, IndexedSubfeature, DEFAULT_GRID_PADDING, DEFAULT_GRID_SIZE};
use crate::style::{CircleLayer, Layer, MapMode, RasterLayer};

/// Per-tile build settings.
#[derive(Debug, Clone, PartialEq)]
pub struct TileConfig {
    /// Tile coordinate extent of the feature index.
    pub extent: i32,
    /// Feature index cells per side.
    pub grid_size: i32,
    /// Feature index border cells.
    pub grid_padding: i32,
    pub mode: MapMode,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            extent: EXTENT,
            grid_size: DEFAULT_GRID_SIZE,
            grid_padding: DEFAULT_GRID_PADDING,
            mode: MapMode::Continuous,
        }
    }
}

/// Decoded source data for one tile.
#[derive(Debug, Clone, Default)]
pub struct TileData {
    pub id: OverscaledTileId,
    /// Features keyed by source layer name.
    pub layers: BTreeMap<String, Vec<TileFeature>>,
    pub raster: Option<PremultipliedImage>,
}

impl TileData {
    pub fn new(id: OverscaledTileId) -> Self {
        Self { id, ..Self::default() }
    }

    pub fn with_layer(mut self, name: impl Into<String>, features: Vec<TileFeature>) -> Self {
        self.layers.insert(name.into(), features);
        self
    }

    pub fn with_raster(mut self, image: PremultipliedImage) -> Self {
        self.raster = Some(image);
        self
    }
}

/// Buckets and hit-test index built from one [`TileData`].
///
/// Layers reading the same source layer share one bucket, named after the
/// first of them.
#[derive(Debug)]
pub struct BuiltTile {
    pub id: OverscaledTileId,
    buckets: BTreeMap<String, Bucket>,
    /// Layer id to bucket name.
    layer_buckets: HashMap<String, String>,
    feature_index: FeatureIndex,
}

impl BuiltTile {
    pub fn bucket_for(&self, layer_id: &str) -> Option<&Bucket> {
        self.buckets.get(self.layer_buckets.get(layer_id)?)
    }

    pub fn buckets(&self) -> impl Iterator<Item = (&str, &Bucket)> {
        self.buckets.iter().map(|(name, bucket)| (name.as_str(), bucket))
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub fn feature_index(&self) -> &FeatureIndex {
        &self.feature_index
    }

    /// Uploads every bucket. Must run on the GPU thread, once per tile.
    pub fn upload(&mut self, ctx: &mut dyn UploadContext) {
        for bucket in self.buckets.values_mut() {
            bucket.upload(ctx);
        }
        log::debug!("uploaded tile {:?}: {} buckets", self.id, self.buckets.len());
    }

    /// Features rendered by `layer_ids` within `radius` tile units of `query`,
    /// in insertion order. Unknown layer ids match nothing.
    pub fn query_rendered_features(
        &self,
        query: BBox,
        radius: i32,
        layer_ids: &[&str],
    ) -> Vec<IndexedSubfeature> {
        let mut names: Vec<&str> = layer_ids
            .iter()
            .filter_map(|id| self.layer_buckets.get(*id).map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        self.feature_index.query_buckets(query, radius, &names)
    }
}

/// Builds buckets and the feature index for one tile. Pure CPU work.
pub fn build_tile(data: TileData, config: &TileConfig, layers: &[Layer]) -> BuiltTile {
    let params = BucketParameters { tile_id: data.id, mode: config.mode };
    let mut feature_index = FeatureIndex::with_grid(config.extent, config.grid_size, config.grid_padding);
    let mut buckets = BTreeMap::new();
    let mut layer_buckets = HashMap::new();

    let mut circle_groups: Vec<(&str, Vec<&CircleLayer>)> = Vec::new();
    let mut raster_layers: Vec<&RasterLayer> = Vec::new();
    for layer in layers {
        match layer {
            Layer::Circle(circle) => {
                match circle_groups.iter_mut().find(|(source, _)| *source == circle.source_layer) {
                    Some((_, group)) => group.push(circle),
                    None => circle_groups.push((circle.source_layer.as_str(), vec![circle])),
                }
            }
            Layer::Raster(raster) => raster_layers.push(raster),
        }
    }

    for (source_layer, group) in &circle_groups {
        let Some(features) = data.layers.get(*source_layer) else { continue };
        let bucket_name = group[0].id.clone();

        let mut bucket = CircleBucket::new(&params, group);
        for (index, feature) in features.iter().enumerate() {
            bucket.add_feature(feature, &feature.geometry);
            feature_index.insert(&feature.geometry, index, source_layer, &bucket_name);
        }
        if !bucket.has_data() {
            continue;
        }

        for layer in group {
            layer_buckets.insert(layer.id.clone(), bucket_name.clone());
        }
        buckets.insert(bucket_name, Bucket::from(bucket));
    }

    if let (Some(image), Some(first)) = (data.raster, raster_layers.first()) {
        let bucket = RasterBucket::with_image(image);
        if bucket.has_data() {
            for layer in &raster_layers {
                layer_buckets.insert(layer.id.clone(), first.id.clone());
            }
            buckets.insert(first.id.clone(), Bucket::from(bucket));
        }
    }

    log::debug!(
        "built tile {:?}: {} buckets, {} indexed geometries",
        data.id,
        buckets.len(),
        feature_index.len()
    );

    BuiltTile { id: data.id, buckets, layer_buckets, feature_index }
}

/// Builds tiles in parallel on rayon's global pool, preserving input order.
pub fn build_tiles(tiles: Vec<TileData>, config: &TileConfig, layers: &[Layer]) -> Vec<BuiltTile> {
    tiles.into_par_iter().map(|tile| build_tile(tile, config, layers)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::BucketState;
    use crate::buffer::testing::RecordingUploads;
    use crate::geometry::Point;

    fn dots(points: &[(i16, i16)]) -> Vec<TileFeature> {
        points.iter().map(|&(x, y)| TileFeature::points([Point::new(x, y)])).collect()
    }

    fn style() -> Vec<Layer> {
        vec![
            RasterLayer::new("imagery").into(),
            CircleLayer::new("poi-halo", "poi").into(),
            CircleLayer::new("poi-dot", "poi").into(),
            CircleLayer::new("transit", "stations").into(),
        ]
    }

    fn tile() -> TileData {
        TileData::new(OverscaledTileId::new(14, 8000, 5000))
            .with_layer("poi", dots(&[(100, 100), (200, 200), (-10, 50)]))
            .with_layer("stations", dots(&[(-5, -5)]))
            .with_raster(PremultipliedImage::new(2, 2, vec![255; 16]))
    }

    #[test]
    fn layers_sharing_a_source_share_a_bucket() {
        let built = build_tile(tile(), &TileConfig::default(), &style());

        let halo = built.bucket_for("poi-halo").unwrap();
        let dot = built.bucket_for("poi-dot").unwrap();
        assert!(std::ptr::eq(halo, dot));
        let Bucket::Circle(circles) = halo else { panic!("expected a circle bucket") };
        assert_eq!(circles.vertex_count(), 8);
        assert!(circles.binders("poi-halo").is_some() && circles.binders("poi-dot").is_some());

        // Every station lies outside the tile, so no bucket is kept.
        assert!(built.bucket_for("transit").is_none());
        assert!(matches!(built.bucket_for("imagery"), Some(Bucket::Raster(_))));
        assert_eq!(built.bucket_count(), 2);
    }

    #[test]
    fn still_mode_keeps_buffered_points() {
        let config = TileConfig { mode: MapMode::Still, ..TileConfig::default() };
        let built = build_tile(tile(), &config, &style());
        assert!(built.bucket_for("transit").unwrap().needs_clipping());
    }

    #[test]
    fn feature_index_answers_layer_queries() {
        let built = build_tile(tile(), &TileConfig::default(), &style());

        let hits = built.query_rendered_features(BBox::new(95, 95, 105, 105), 0, &["poi-dot"]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].feature_index, 0);
        assert_eq!(hits[0].bucket_name, "poi-halo");

        let everything = BBox::new(0, 0, EXTENT, EXTENT);
        let both = built.query_rendered_features(everything, 0, &["poi-halo", "poi-dot"]);
        assert_eq!(both.iter().map(|h| h.feature_index).collect::<Vec<_>>(), vec![0, 1]);
        assert!(built.query_rendered_features(everything, 0, &["missing"]).is_empty());
    }

    #[test]
    fn upload_moves_every_bucket() {
        let mut built = build_tile(tile(), &TileConfig::default(), &style());
        let mut uploads = RecordingUploads::default();
        built.upload(&mut uploads);
        assert!(built.buckets().all(|(_, b)| b.state() == BucketState::Uploaded));
        assert_eq!(uploads.textures.len(), 1);
    }

    #[test]
    fn parallel_build_keeps_order() {
        let tiles: Vec<TileData> = (0..16u32)
            .map(|x| TileData::new(OverscaledTileId::new(4, x, 0)).with_layer("poi", dots(&[(1, 1)])))
            .collect();
        let built = build_tiles(tiles, &TileConfig::default(), &style());
        let xs: Vec<u32> = built.iter().map(|t| t.id.x).collect();
        assert_eq!(xs, (0..16).collect::<Vec<_>>());
    }
}
