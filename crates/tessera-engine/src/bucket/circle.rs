use std::collections::BTreeMap;

use bytemuck::{Pod, Zeroable};

use crate::binder::CirclePaintPropertyBinders;
use crate::buffer::{
    BufferId, IndexBuffer, IndexVector, Segment, SegmentVector, UploadContext, VertexBuffer,
    VertexVector,
};
use crate::geometry::{EXTENT, GeometryCollection, GeometryCoordinate, GeometryTileFeature, Point};
use crate::render::{PaintParameters, Painter, RenderTile};
use crate::style::{CircleLayer, MapMode};

use super::{BucketParameters, BucketState};

/// Vertices emitted per circle.
const QUAD_VERTICES: usize = 4;
/// Indices emitted per circle (two triangles).
const QUAD_INDICES: usize = 6;

/// Quad corner extrusions, counter-clockwise from bottom-left.
///
/// ```text
/// 4 ─── 3
/// │     │
/// 1 ─── 2
/// ```
const EXTRUDES: [[i16; 2]; QUAD_VERTICES] = [[-1, -1], [1, -1], [1, 1], [-1, 1]];

/// Circle vertex layout (8 bytes):
///
///  offset 0  pos      [i16; 2]  tile units (circle center)
///  offset 4  extrude  [i16; 2]  unit quad corner, scaled to the radius in the shader
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Pod, Zeroable)]
pub struct CircleVertex {
    pub pos: [i16; 2],
    pub extrude: [i16; 2],
}

impl CircleVertex {
    #[inline]
    pub fn new(center: GeometryCoordinate, extrude: [i16; 2]) -> Self {
        Self { pos: [center.x, center.y], extrude }
    }

    /// Center plus extrusion, i.e. the quad corner at unit radius.
    #[inline]
    pub fn corner(self) -> Point<i32> {
        Point::new(
            i32::from(self.pos[0]) + i32::from(self.extrude[0]),
            i32::from(self.pos[1]) + i32::from(self.extrude[1]),
        )
    }
}

#[derive(Debug)]
enum CircleGeometry {
    Building {
        vertices: VertexVector<CircleVertex>,
        triangles: IndexVector,
    },
    Uploaded {
        vertex_buffer: VertexBuffer<CircleVertex>,
        index_buffer: IndexBuffer,
    },
}

/// Billboard quads for point features, shared by every circle layer reading the
/// same source layer.
///
/// Radius, blur and stroke are resolved in the shader; tessellation only emits
/// unit quads.
#[derive(Debug)]
pub struct CircleBucket {
    mode: MapMode,
    segments: SegmentVector,
    geometry: CircleGeometry,
    /// One binder set per layer id.
    binders: BTreeMap<String, CirclePaintPropertyBinders>,
    features: usize,
}

impl CircleBucket {
    pub fn new(params: &BucketParameters, layers: &[&CircleLayer]) -> Self {
        let zoom = f32::from(params.tile_id.overscaled_z);
        let binders = layers
            .iter()
            .map(|layer| (layer.id.clone(), CirclePaintPropertyBinders::new(&layer.paint, zoom)))
            .collect();

        Self {
            mode: params.mode,
            segments: SegmentVector::new(),
            geometry: CircleGeometry::Building {
                vertices: VertexVector::new(),
                triangles: IndexVector::new(),
            },
            binders,
            features: 0,
        }
    }

    /// Appends one quad per kept point of `geometry`, then feeds every layer's
    /// binders so attributes match the new vertex count.
    ///
    /// Outside still mode, points beyond `[0, EXTENT)` are dropped; the neighbor
    /// tile that owns them draws them.
    ///
    /// # Panics
    /// Panics if the bucket was already uploaded.
    pub fn add_feature(&mut self, feature: &dyn GeometryTileFeature, geometry: &GeometryCollection) {
        let CircleGeometry::Building { vertices, triangles } = &mut self.geometry else {
            panic!("feature added to an uploaded circle bucket");
        };

        for point in geometry.iter().flatten() {
            let (x, y) = (i32::from(point.x), i32::from(point.y));
            if self.mode != MapMode::Still && (x < 0 || x >= EXTENT || y < 0 || y >= EXTENT) {
                continue;
            }

            let segment = self.segments.prepare(vertices.len(), triangles.len(), QUAD_VERTICES);
            // `prepare` leaves room for a full quad, so every index fits u16.
            let index = segment.vertex_length as u16;

            for extrude in EXTRUDES {
                vertices.push(CircleVertex::new(*point, extrude));
            }
            triangles.push_triangle(index, index + 1, index + 2);
            triangles.push_triangle(index, index + 3, index + 2);

            segment.vertex_length += QUAD_VERTICES;
            segment.index_length += QUAD_INDICES;
        }

        let length = vertices.len();
        for binders in self.binders.values_mut() {
            binders.populate_vertex_vectors(feature, length);
        }
        self.features += 1;
    }

    /// `true` once any point has been emitted.
    #[inline]
    pub fn has_data(&self) -> bool {
        !self.segments.is_empty()
    }

    pub fn state(&self) -> BucketState {
        match self.geometry {
            CircleGeometry::Uploaded { .. } => BucketState::Uploaded,
            CircleGeometry::Building { .. } if self.features > 0 => BucketState::Populated,
            CircleGeometry::Building { .. } => BucketState::Empty,
        }
    }

    #[inline]
    pub fn is_uploaded(&self) -> bool {
        matches!(self.geometry, CircleGeometry::Uploaded { .. })
    }

    /// Still-mode buckets include points from outside the tile and must be clipped.
    #[inline]
    pub fn needs_clipping(&self) -> bool {
        self.mode == MapMode::Still
    }

    #[inline]
    pub fn mode(&self) -> MapMode {
        self.mode
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        self.segments.as_slice()
    }

    pub fn vertex_count(&self) -> usize {
        match &self.geometry {
            CircleGeometry::Building { vertices, .. } => vertices.len(),
            CircleGeometry::Uploaded { vertex_buffer, .. } => vertex_buffer.len(),
        }
    }

    /// CPU vertices; `None` after upload.
    pub fn vertices(&self) -> Option<&[CircleVertex]> {
        match &self.geometry {
            CircleGeometry::Building { vertices, .. } => Some(vertices.as_slice()),
            CircleGeometry::Uploaded { .. } => None,
        }
    }

    /// CPU triangles; `None` after upload.
    pub fn triangles(&self) -> Option<&[[u16; 3]]> {
        match &self.geometry {
            CircleGeometry::Building { triangles, .. } => Some(triangles.triangles()),
            CircleGeometry::Uploaded { .. } => None,
        }
    }

    #[inline]
    pub fn binders(&self, layer_id: &str) -> Option<&CirclePaintPropertyBinders> {
        self.binders.get(layer_id)
    }

    /// `(vertex buffer, index buffer)`.
    ///
    /// # Panics
    /// Panics if the bucket has not been uploaded.
    pub fn gpu_buffers(&self) -> (BufferId, BufferId) {
        match &self.geometry {
            CircleGeometry::Uploaded { vertex_buffer, index_buffer } => {
                (vertex_buffer.id(), index_buffer.id())
            }
            CircleGeometry::Building { .. } => panic!("circle bucket used before upload"),
        }
    }

    /// Moves geometry and per-layer attributes to the GPU.
    ///
    /// # Panics
    /// Panics on a second call.
    pub fn upload(&mut self, ctx: &mut dyn UploadContext) {
        let building = std::mem::replace(
            &mut self.geometry,
            CircleGeometry::Building {
                vertices: VertexVector::new(),
                triangles: IndexVector::new(),
            },
        );
        let CircleGeometry::Building { vertices, triangles } = building else {
            panic!("circle bucket uploaded twice");
        };

        self.geometry = CircleGeometry::Uploaded {
            vertex_buffer: vertices.upload(ctx, "circle vertices"),
            index_buffer: triangles.upload(ctx, "circle indices"),
        };

        for (layer_id, binders) in &mut self.binders {
            binders.upload(ctx, layer_id);
        }

        log::debug!(
            "uploaded circle bucket: {} vertices in {} segments, {} layers",
            self.vertex_count(),
            self.segments.len(),
            self.binders.len()
        );
    }

    /// # Panics
    /// Panics if the bucket has not been uploaded.
    pub fn render(
        &self,
        painter: &mut Painter,
        params: &PaintParameters,
        layer: &CircleLayer,
        tile: &RenderTile,
    ) {
        assert!(self.is_uploaded(), "circle bucket rendered before upload");
        painter.render_circle(params, self, layer, tile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::testing::RecordingUploads;
    use crate::buffer::{BufferUsage, MAX_SEGMENT_VERTICES};
    use crate::geometry::{TileFeature, Value};
    use crate::style::{CirclePaintProperties, PossiblyEvaluated, SourceFunction, Stops};

    fn params(mode: MapMode) -> BucketParameters {
        BucketParameters { mode, ..BucketParameters::default() }
    }

    fn bucket(mode: MapMode) -> CircleBucket {
        let layer = CircleLayer::new("poi-circles", "poi");
        CircleBucket::new(&params(mode), &[&layer])
    }

    fn add_points(bucket: &mut CircleBucket, points: &[(i16, i16)]) {
        let feature = TileFeature::points(points.iter().map(|&(x, y)| Point::new(x, y)));
        bucket.add_feature(&feature, &feature.geometry);
    }

    fn corners(bucket: &CircleBucket) -> Vec<(i32, i32)> {
        bucket.vertices().unwrap().iter().map(|v| (v.corner().x, v.corner().y)).collect()
    }

    // ── tessellation ──────────────────────────────────────────────────────

    #[test]
    fn single_point_produces_one_quad() {
        let mut b = bucket(MapMode::Continuous);
        assert!(!b.has_data());
        assert_eq!(b.state(), BucketState::Empty);

        add_points(&mut b, &[(10, 20)]);

        assert!(b.has_data());
        assert_eq!(b.state(), BucketState::Populated);
        assert_eq!(corners(&b), vec![(9, 19), (11, 19), (11, 21), (9, 21)]);
        assert_eq!(b.triangles().unwrap(), &[[0, 1, 2], [0, 3, 2]]);
        assert_eq!(
            b.segments(),
            &[Segment { vertex_offset: 0, index_offset: 0, vertex_length: 4, index_length: 6 }]
        );
    }

    #[test]
    fn triangle_indices_are_segment_relative() {
        let mut b = bucket(MapMode::Continuous);
        add_points(&mut b, &[(1, 1), (2, 2)]);
        assert_eq!(b.triangles().unwrap(), &[[0, 1, 2], [0, 3, 2], [4, 5, 6], [4, 7, 6]]);
    }

    #[test]
    fn continuous_mode_drops_points_outside_extent() {
        let e = EXTENT as i16;
        let mut b = bucket(MapMode::Continuous);
        add_points(&mut b, &[(e, 10), (e - 1, 10), (-1, 10), (10, e), (10, -1), (0, 0)]);
        assert_eq!(b.vertex_count(), 8);
        assert_eq!(b.vertices().unwrap()[0].pos, [e - 1, 10]);
        assert_eq!(b.vertices().unwrap()[4].pos, [0, 0]);
    }

    #[test]
    fn still_mode_keeps_points_outside_extent() {
        let e = EXTENT as i16;
        let mut b = bucket(MapMode::Still);
        add_points(&mut b, &[(e, 10), (e - 1, 10), (-1, -1)]);
        assert_eq!(b.vertex_count(), 12);
        assert!(b.needs_clipping());
    }

    #[test]
    fn fully_filtered_feature_leaves_bucket_without_data() {
        let mut b = bucket(MapMode::Continuous);
        add_points(&mut b, &[(-5, -5)]);
        assert!(!b.has_data());
        assert_eq!(b.state(), BucketState::Populated);
    }

    #[test]
    fn segments_stay_within_u16_range() {
        let k = MAX_SEGMENT_VERTICES / QUAD_VERTICES + 1;
        assert!(k * QUAD_VERTICES > MAX_SEGMENT_VERTICES);

        let points: Vec<(i16, i16)> =
            (0..k).map(|i| ((i % 4096) as i16, (i / 4096) as i16)).collect();
        let mut b = bucket(MapMode::Continuous);
        add_points(&mut b, &points);

        let segments = b.segments();
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|s| s.vertex_length <= MAX_SEGMENT_VERTICES));
        assert_eq!(segments.iter().map(|s| s.vertex_length).sum::<usize>(), k * QUAD_VERTICES);
        assert_eq!(segments.iter().map(|s| s.index_length).sum::<usize>(), k * QUAD_INDICES);

        // The second segment starts where the first ends and restarts its indices.
        assert_eq!(segments[1].vertex_offset, segments[0].vertex_length);
        assert_eq!(segments[1].index_offset, segments[0].index_length);
        let first_of_second = segments[1].index_offset / 3;
        assert_eq!(b.triangles().unwrap()[first_of_second], [0, 1, 2]);
    }

    // ── binders ───────────────────────────────────────────────────────────

    #[test]
    fn data_driven_attributes_track_vertex_count() {
        let paint = CirclePaintProperties {
            radius: PossiblyEvaluated::Source(SourceFunction::new("size", Stops::Identity, 2.0)),
            ..CirclePaintProperties::default()
        };
        let sized = CircleLayer::new("sized", "poi").with_paint(paint);
        let plain = CircleLayer::new("plain", "poi");
        let mut b = CircleBucket::new(&params(MapMode::Continuous), &[&sized, &plain]);

        let features = [
            TileFeature::points([Point::new(1, 1), Point::new(2, 2)]).with_property("size", Value::Int(4)),
            TileFeature::points([Point::new(-1, 1)]).with_property("size", Value::Int(6)),
            TileFeature::points([Point::new(3, 3)]).with_property("size", Value::Int(8)),
        ];
        for feature in &features {
            b.add_feature(feature, &feature.geometry);
            assert_eq!(b.binders("sized").unwrap().attribute_lens(), vec![b.vertex_count()]);
        }

        let radius = b.binders("sized").unwrap().radius.attributes().unwrap();
        assert_eq!(radius.len(), 12);
        assert!(radius[..8].iter().all(|&r| r == 4.0));
        assert!(radius[8..].iter().all(|&r| r == 8.0));

        let plain = b.binders("plain").unwrap();
        assert_eq!(plain.data_driven_mask(), 0);
        assert!(plain.attribute_lens().is_empty());
        assert_eq!(b.binders("sized").unwrap().data_driven_mask(), 0b1);
    }

    #[test]
    fn nan_property_falls_back_to_default() {
        let paint = CirclePaintProperties {
            radius: PossiblyEvaluated::Source(SourceFunction::new(
                "size",
                Stops::Exponential { base: 1.0, stops: vec![(0.0, 1.0), (10.0, 5.0)] },
                2.0,
            )),
            ..CirclePaintProperties::default()
        };
        let layer = CircleLayer::new("sized", "poi").with_paint(paint);
        let mut b = CircleBucket::new(&params(MapMode::Continuous), &[&layer]);

        let feature =
            TileFeature::points([Point::new(5, 5)]).with_property("size", Value::Double(f64::NAN));
        b.add_feature(&feature, &feature.geometry);

        let radius = b.binders("sized").unwrap().radius.attributes().unwrap();
        assert_eq!(radius, &[2.0; 4]);
    }

    // ── upload ────────────────────────────────────────────────────────────

    #[test]
    fn upload_moves_buffers_to_gpu() {
        let paint = CirclePaintProperties {
            opacity: PossiblyEvaluated::Source(SourceFunction::new("o", Stops::Identity, 1.0)),
            ..CirclePaintProperties::default()
        };
        let layer = CircleLayer::new("c", "poi").with_paint(paint);
        let mut b = CircleBucket::new(&params(MapMode::Continuous), &[&layer]);
        add_points(&mut b, &[(10, 20)]);

        let mut uploads = RecordingUploads::default();
        b.upload(&mut uploads);

        assert_eq!(b.state(), BucketState::Uploaded);
        assert!(b.vertices().is_none());
        assert!(b.has_data());
        assert_eq!(b.vertex_count(), 4);

        let (vbo, ibo) = b.gpu_buffers();
        let (usage, _, bytes) = &uploads.buffers[vbo.0 as usize];
        assert_eq!(*usage, BufferUsage::Vertex);
        assert_eq!(bytes.len(), 4 * std::mem::size_of::<CircleVertex>());
        let (usage, _, bytes) = &uploads.buffers[ibo.0 as usize];
        assert_eq!(*usage, BufferUsage::Index);
        assert_eq!(bytes.len(), 6 * 2);

        // vertices + indices + one data-driven attribute buffer
        assert_eq!(uploads.buffers.len(), 3);
        assert_eq!(uploads.buffers[2].2.len(), 4 * 4);
    }

    #[test]
    #[should_panic(expected = "uploaded twice")]
    fn double_upload_panics() {
        let mut b = bucket(MapMode::Continuous);
        let mut uploads = RecordingUploads::default();
        b.upload(&mut uploads);
        b.upload(&mut uploads);
    }

    #[test]
    #[should_panic(expected = "uploaded circle bucket")]
    fn add_after_upload_panics() {
        let mut b = bucket(MapMode::Continuous);
        b.upload(&mut RecordingUploads::default());
        add_points(&mut b, &[(1, 1)]);
    }
}
