//! Synthetic tiles and style for the studio run.

use tessera_engine::buffer::PremultipliedImage;
use tessera_engine::geometry::{EXTENT, OverscaledTileId, Point, TileFeature, Value};
use tessera_engine::style::{
    CircleLayer, CirclePaintProperties, CirclePitchScale, Color, Layer, PossiblyEvaluated,
    RasterLayer, SourceFunction, Stops,
};
use tessera_engine::worker::TileData;

/// Deterministic generator so runs are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

const KINDS: [&str; 3] = ["cafe", "park", "station"];

pub fn style() -> Vec<Layer> {
    let halo = CircleLayer::new("poi-halo", "poi").with_paint(CirclePaintProperties {
        radius: PossiblyEvaluated::Constant(9.0),
        color: PossiblyEvaluated::Constant(Color::from_straight(1.0, 1.0, 1.0, 0.6)),
        blur: PossiblyEvaluated::Constant(0.4),
        ..CirclePaintProperties::default()
    });

    let dot = CircleLayer::new("poi-dot", "poi").with_paint(CirclePaintProperties {
        radius: PossiblyEvaluated::Source(SourceFunction::new(
            "rank",
            Stops::Interval(vec![(0.0, 6.0), (5.0, 4.0), (10.0, 2.5)]),
            3.0,
        )),
        color: PossiblyEvaluated::Source(SourceFunction::new(
            "kind",
            Stops::Categorical(vec![
                (Value::String("cafe".into()), Color::from_srgb_u8(0xd9, 0x5f, 0x02, 0xff)),
                (Value::String("park".into()), Color::from_srgb_u8(0x1b, 0x9e, 0x77, 0xff)),
                (Value::String("station".into()), Color::from_srgb_u8(0x75, 0x70, 0xb3, 0xff)),
            ]),
            Color::BLACK,
        )),
        stroke_width: PossiblyEvaluated::Constant(1.0),
        stroke_color: PossiblyEvaluated::Constant(Color::WHITE),
        pitch_scale: CirclePitchScale::Viewport,
        ..CirclePaintProperties::default()
    });

    let mut imagery = RasterLayer::new("imagery");
    imagery.paint.saturation = -0.5;

    vec![imagery.into(), halo.into(), dot.into()]
}

/// A `cols x rows` block of tiles at `zoom`, each with `points` POIs and a
/// gradient raster.
pub fn tiles(zoom: u8, cols: u32, rows: u32, points: usize) -> Vec<TileData> {
    let mut rng = Lcg(0x7e55e7a);
    let mut out = Vec::with_capacity((cols * rows) as usize);

    for row in 0..rows {
        for col in 0..cols {
            let id = OverscaledTileId::new(zoom, col, row);
            let features = (0..points)
                .map(|_| {
                    // A few points land in the neighbor's buffer, as real tiles do.
                    let x = rng.below(EXTENT as u64 + 128) as i16 - 64;
                    let y = rng.below(EXTENT as u64 + 128) as i16 - 64;
                    let kind = KINDS[rng.below(KINDS.len() as u64) as usize];
                    TileFeature::points([Point::new(x, y)])
                        .with_id(rng.next())
                        .with_property("kind", Value::String(kind.into()))
                        .with_property("rank", Value::Uint(rng.below(12)))
                })
                .collect();

            out.push(
                TileData::new(id)
                    .with_layer("poi", features)
                    .with_raster(gradient(64, col, row)),
            );
        }
    }
    out
}

fn gradient(size: u32, col: u32, row: u32) -> PremultipliedImage {
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let r = (x * 255 / size) as u8;
            let g = (y * 255 / size) as u8;
            let b = (((col + row) % 2) * 160) as u8;
            data.extend_from_slice(&[r, g, b, 255]);
        }
    }
    PremultipliedImage::new(size, size, data)
}
