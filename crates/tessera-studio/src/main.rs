mod synth;

use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use tessera_engine::device::{Gpu, GpuInit, OFFSCREEN_FORMAT, OffscreenTarget};
use tessera_engine::geometry::{BBox, EXTENT};
use tessera_engine::logging::{LoggingConfig, init_logging};
use tessera_engine::render::{
    FrameEncoder, GpuResourceStore, PaintParameters, Painter, RenderTarget, RenderTile, TILE_SIZE,
    Viewport, matrix,
};
use tessera_engine::style::{Layer, MapMode};
use tessera_engine::worker::{BuiltTile, TileConfig, build_tiles_into, tile_handoff};

/// Headless run over a synthetic grid of tiles.
#[derive(Parser, Debug, Clone)]
#[command(name = "tessera-studio", version)]
struct StudioConfig {
    /// Tile columns.
    #[arg(default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..))]
    cols: u32,

    /// Tile rows.
    #[arg(default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..))]
    rows: u32,

    /// Synthetic points per tile.
    #[arg(default_value_t = 400)]
    points: usize,

    #[arg(long, default_value_t = 14)]
    zoom: u8,

    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f32,

    /// Build and render in still mode: keep buffered points and clip them per tile.
    #[arg(long, default_value_t = false)]
    still: bool,
}

impl StudioConfig {
    fn mode(&self) -> MapMode {
        if self.still { MapMode::Still } else { MapMode::Continuous }
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.cols as f32 * TILE_SIZE, self.rows as f32 * TILE_SIZE)
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = StudioConfig::parse();
    log::info!("studio run: {config:?}");

    let layers = synth::style();
    let tile_config = TileConfig { mode: config.mode(), ..TileConfig::default() };

    // ── build ─────────────────────────────────────────────────────────────

    let (sender, receiver) = tile_handoff(4);
    let builder = {
        let data = synth::tiles(config.zoom, config.cols, config.rows, config.points);
        let layers = layers.clone();
        thread::Builder::new()
            .name("tile-builder".into())
            .spawn(move || build_tiles_into(data, &tile_config, &layers, &sender))
            .context("spawning tile builder")?
    };

    let mut tiles = Vec::new();
    while let Some(tile) = receiver.recv() {
        log::debug!("received tile {:?} ({} buckets)", tile.id, tile.bucket_count());
        tiles.push(tile);
    }
    builder
        .join()
        .map_err(|_| anyhow::anyhow!("tile builder panicked"))??;
    tiles.sort_by_key(|tile| (tile.id.y, tile.id.x));
    log::info!("built {} tiles", tiles.len());

    // ── query ─────────────────────────────────────────────────────────────

    let query_box = BBox::new(1024, 1024, 3072, 3072);
    for tile in &tiles {
        let hits = tile.query_rendered_features(query_box, 8, &["poi-dot"]);
        log::info!(
            "tile {}/{}/{}: {} of {} indexed features in the query box",
            tile.id.z,
            tile.id.x,
            tile.id.y,
            hits.len(),
            tile.feature_index().len()
        );
    }

    // ── render ────────────────────────────────────────────────────────────

    let gpu = match Gpu::new_headless_blocking(GpuInit::default()) {
        Ok(gpu) => gpu,
        Err(err) => {
            log::warn!("no GPU available, skipping render: {err:#}");
            return Ok(());
        }
    };
    let info = gpu.adapter_info();
    log::info!("rendering on {} ({:?})", info.name, info.backend);

    render(&gpu, &config, &layers, tiles)
}

fn render(gpu: &Gpu, config: &StudioConfig, layers: &[Layer], mut tiles: Vec<BuiltTile>) -> Result<()> {
    let mut resources = GpuResourceStore::new();
    {
        let mut uploader = resources.uploader(gpu.device(), gpu.queue());
        for tile in &mut tiles {
            tile.upload(&mut uploader);
        }
    }
    log::info!(
        "uploaded {} buffers and {} textures",
        resources.buffer_count(),
        resources.texture_count()
    );

    let viewport = config.viewport();
    let params = PaintParameters {
        mode: config.mode(),
        pixel_ratio: config.pixel_ratio,
        viewport,
        zoom: config.zoom as f32,
        ..PaintParameters::default()
    };

    let projection = matrix::ortho(0.0, viewport.width, viewport.height, 0.0, 0.0, 1.0);
    let units = TILE_SIZE / EXTENT as f32;
    let render_tiles: Vec<(RenderTile, &BuiltTile)> = tiles
        .iter()
        .enumerate()
        .map(|(i, built)| {
            let (x, y) = (built.id.x as f32 * TILE_SIZE, built.id.y as f32 * TILE_SIZE);
            let offset = matrix::translate(&projection, x, y, 0.0);
            let m = matrix::scale(&offset, units, units, 1.0);
            (RenderTile::new(built.id, m, i as u32 + 1), built)
        })
        .collect();

    let mut painter = Painter::new();
    let frame = painter.render_frame(&params, layers, &render_tiles);
    log::info!("frame: {} draws, {} state commands", frame.draw_count(), frame.state_commands().count());

    let (width, height) = viewport.physical_size(config.pixel_ratio);
    let target = OffscreenTarget::new(gpu.device(), width, height);
    let mut frame_encoder = FrameEncoder::new(gpu.device(), OFFSCREEN_FORMAT);

    let mut encoder = gpu.create_encoder("studio frame");
    let stats = {
        let mut render_target =
            RenderTarget::new(&mut encoder, target.color_view(), target.depth_stencil_view(), target.size());
        frame_encoder.encode(
            gpu.device(),
            gpu.queue(),
            &resources,
            &mut render_target,
            &frame,
            wgpu::Color::TRANSPARENT,
        )?
    };
    gpu.submit(encoder);
    log::info!(
        "encoded {} draws, {} state commands, {} new pipelines",
        stats.draws,
        stats.state_commands,
        stats.pipelines_created
    );

    let image = target.read_pixels(gpu).context("reading back the frame")?;
    let covered = image.data.chunks_exact(4).filter(|px| px[3] != 0).count();
    log::info!("read back {}x{} pixels, {} covered", image.width, image.height, covered);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_arguments() {
        let config = StudioConfig::try_parse_from(["tessera-studio"]).unwrap();
        assert_eq!((config.cols, config.rows, config.points), (2, 2, 400));
        assert_eq!(config.mode(), MapMode::Continuous);
    }

    #[test]
    fn positionals_and_still_flag() {
        let config = StudioConfig::try_parse_from(["tessera-studio", "3", "1", "50", "--still"]).unwrap();
        assert_eq!((config.cols, config.rows, config.points), (3, 1, 50));
        assert_eq!(config.mode(), MapMode::Still);
        assert_eq!(config.viewport().width, 3.0 * TILE_SIZE);
    }

    #[test]
    fn rejects_empty_grid() {
        assert!(StudioConfig::try_parse_from(["tessera-studio", "0", "2"]).is_err());
        assert!(StudioConfig::try_parse_from(["tessera-studio", "two"]).is_err());
    }
}
