use crate::buffer::{PremultipliedImage, TextureId, UploadContext};
use crate::render::{PaintParameters, Painter, RenderTile};
use crate::style::RasterLayer;

use super::BucketState;

/// A tile's decoded raster image, drawn over a static tile quad.
#[derive(Debug, Default)]
pub struct RasterBucket {
    image: Option<PremultipliedImage>,
    texture: Option<TextureId>,
    uploaded: bool,
}

impl RasterBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket holding `image`; empty images leave the bucket without data.
    pub fn with_image(image: PremultipliedImage) -> Self {
        let mut bucket = Self::new();
        bucket.set_image(image);
        bucket
    }

    /// # Panics
    /// Panics if the bucket was already uploaded.
    pub fn set_image(&mut self, image: PremultipliedImage) {
        assert!(!self.uploaded, "image set on an uploaded raster bucket");
        self.image = (!image.is_empty()).then_some(image);
    }

    #[inline]
    pub fn has_data(&self) -> bool {
        self.image.is_some() || self.texture.is_some()
    }

    pub fn state(&self) -> BucketState {
        match (&self.image, self.uploaded) {
            (_, true) => BucketState::Uploaded,
            (Some(_), false) => BucketState::Populated,
            (None, false) => BucketState::Empty,
        }
    }

    /// Rasters are drawn with a tile-sized quad and never bleed past the tile.
    #[inline]
    pub fn needs_clipping(&self) -> bool {
        false
    }

    #[inline]
    pub fn image(&self) -> Option<&PremultipliedImage> {
        self.image.as_ref()
    }

    #[inline]
    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    /// Moves the image into a texture. A bucket without an image uploads nothing.
    ///
    /// # Panics
    /// Panics on a second call.
    pub fn upload(&mut self, ctx: &mut dyn UploadContext) {
        assert!(!self.uploaded, "raster bucket uploaded twice");
        self.uploaded = true;
        if let Some(image) = self.image.take() {
            log::debug!("uploading {}x{} raster tile", image.width, image.height);
            self.texture = Some(ctx.create_texture("raster tile", &image));
        }
    }

    /// An uploaded bucket without an image draws nothing.
    ///
    /// # Panics
    /// Panics if the bucket was not uploaded.
    pub fn render(
        &self,
        painter: &mut Painter,
        params: &PaintParameters,
        layer: &RasterLayer,
        tile: &RenderTile,
    ) {
        assert!(self.uploaded, "raster bucket rendered before upload");
        if self.texture.is_none() {
            return;
        }
        painter.render_raster(params, self, layer, tile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::testing::RecordingUploads;
    use crate::geometry::OverscaledTileId;

    fn image(w: u32, h: u32) -> PremultipliedImage {
        PremultipliedImage::new(w, h, vec![255; (w * h * 4) as usize])
    }

    #[test]
    fn lifecycle() {
        let mut bucket = RasterBucket::new();
        assert_eq!(bucket.state(), BucketState::Empty);
        assert!(!bucket.has_data());

        bucket.set_image(image(2, 2));
        assert_eq!(bucket.state(), BucketState::Populated);

        let mut uploads = RecordingUploads::default();
        bucket.upload(&mut uploads);
        assert_eq!(bucket.state(), BucketState::Uploaded);
        assert!(bucket.has_data());
        assert!(bucket.image().is_none());
        assert_eq!(bucket.texture(), Some(TextureId(0)));
        assert_eq!(uploads.textures, vec![("raster tile".to_owned(), 2, 2)]);
    }

    #[test]
    fn empty_image_is_ignored() {
        let bucket = RasterBucket::with_image(PremultipliedImage::default());
        assert!(!bucket.has_data());
        assert!(!bucket.needs_clipping());
    }

    #[test]
    #[should_panic(expected = "uploaded twice")]
    fn double_upload_panics() {
        let mut bucket = RasterBucket::with_image(image(1, 1));
        let mut uploads = RecordingUploads::default();
        bucket.upload(&mut uploads);
        bucket.upload(&mut uploads);
    }

    #[test]
    #[should_panic(expected = "uploaded twice")]
    fn double_upload_without_image_panics() {
        let mut bucket = RasterBucket::new();
        let mut uploads = RecordingUploads::default();
        bucket.upload(&mut uploads);
        assert_eq!(bucket.state(), BucketState::Uploaded);
        assert!(uploads.textures.is_empty());
        bucket.upload(&mut uploads);
    }

    #[test]
    #[should_panic(expected = "rendered before upload")]
    fn render_before_upload_panics() {
        let bucket = RasterBucket::with_image(image(1, 1));
        let mut painter = Painter::new();
        painter.begin_frame();
        bucket.render(&mut painter, &PaintParameters::default(), &RasterLayer::new("imagery"), &test_tile());
    }

    #[test]
    #[should_panic(expected = "uploaded raster bucket")]
    fn set_image_after_upload_panics() {
        let mut bucket = RasterBucket::new();
        bucket.upload(&mut RecordingUploads::default());
        bucket.set_image(image(1, 1));
    }

    fn test_tile() -> RenderTile {
        RenderTile::new(OverscaledTileId::new(0, 0, 0), crate::render::matrix::IDENTITY, 1)
    }
}
