use anyhow::{Result, anyhow};
use crossbeam_channel::{Receiver, Sender};
use rayon::prelude::*;

use crate::style::Layer;

use super::tile::{BuiltTile, TileConfig, TileData, build_tile};

/// Channel from the build pool to the GPU thread.
///
/// `capacity` bounds how many finished tiles may wait for upload; builders
/// block once it is reached.
pub fn tile_handoff(capacity: usize) -> (TileSender, TileReceiver) {
    let (tx, rx) = crossbeam_channel::bounded(capacity);
    (TileSender { tx }, TileReceiver { rx })
}

/// Builder side. Cheap to clone; the channel closes when every clone is dropped.
#[derive(Debug, Clone)]
pub struct TileSender {
    tx: Sender<BuiltTile>,
}

impl TileSender {
    /// Fails once the receiver is gone.
    pub fn send(&self, tile: BuiltTile) -> Result<()> {
        self.tx
            .send(tile)
            .map_err(|err| anyhow!("tile receiver dropped; discarding tile {:?}", err.0.id))
    }
}

/// GPU thread side.
#[derive(Debug)]
pub struct TileReceiver {
    rx: Receiver<BuiltTile>,
}

impl TileReceiver {
    /// Blocks for the next tile; `None` once all senders are dropped and the
    /// queue is empty.
    pub fn recv(&self) -> Option<BuiltTile> {
        self.rx.recv().ok()
    }

    /// Tiles already waiting, without blocking.
    pub fn drain_ready(&self) -> Vec<BuiltTile> {
        self.rx.try_iter().collect()
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

/// Builds `tiles` on rayon's pool and sends each one as soon as it is done.
///
/// Blocks until every tile is built and sent; run it off the GPU thread.
pub fn build_tiles_into(
    tiles: Vec<TileData>,
    config: &TileConfig,
    layers: &[Layer],
    sender: &TileSender,
) -> Result<()> {
    tiles
        .into_par_iter()
        .try_for_each(|tile| sender.send(build_tile(tile, config, layers)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{OverscaledTileId, Point, TileFeature};
    use crate::style::CircleLayer;

    fn tiles(n: u32) -> Vec<TileData> {
        (0..n)
            .map(|x| {
                TileData::new(OverscaledTileId::new(5, x, 3))
                    .with_layer("poi", vec![TileFeature::points([Point::new(7, 7)])])
            })
            .collect()
    }

    #[test]
    fn every_built_tile_reaches_the_receiver() {
        let layers: Vec<Layer> = vec![CircleLayer::new("dots", "poi").into()];
        let (sender, receiver) = tile_handoff(4);

        let builder = std::thread::spawn(move || {
            let result = build_tiles_into(tiles(12), &TileConfig::default(), &layers, &sender);
            drop(sender);
            result
        });

        let mut xs = Vec::new();
        while let Some(tile) = receiver.recv() {
            assert!(tile.bucket_for("dots").is_some());
            xs.push(tile.id.x);
        }
        builder.join().unwrap().unwrap();

        xs.sort_unstable();
        assert_eq!(xs, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn send_fails_without_receiver() {
        let (sender, receiver) = tile_handoff(1);
        drop(receiver);
        let layers: Vec<Layer> = Vec::new();
        assert!(build_tiles_into(tiles(1), &TileConfig::default(), &layers, &sender).is_err());
    }

    #[test]
    fn drain_ready_does_not_block() {
        let (sender, receiver) = tile_handoff(2);
        assert!(receiver.drain_ready().is_empty());
        build_tiles_into(tiles(2), &TileConfig::default(), &[], &sender).unwrap();
        assert_eq!(receiver.pending(), 2);
        assert_eq!(receiver.drain_ready().len(), 2);
    }
}
