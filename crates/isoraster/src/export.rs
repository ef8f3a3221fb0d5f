//! # PNG Export
//!
//! Alpha is dropped; a finished canvas is opaque everywhere.

use crate::error::HostResult;
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgb, RgbImage};
use isoraster_cache::CanvasSnapshot;
use std::path::Path;

/// Converts a canvas to an image, each pixel blown up to `scale` x `scale`.
#[must_use]
pub fn to_image(snapshot: &CanvasSnapshot, scale: u32) -> RgbImage {
    let width = snapshot.width as usize;
    let image = RgbImage::from_fn(snapshot.width, snapshot.height, |x, y| {
        let pixel = snapshot.colors.get(y as usize * width + x as usize).copied().unwrap_or_default();
        Rgb([pixel.r, pixel.g, pixel.b])
    });

    let scale = scale.max(1);
    if scale == 1 {
        return image;
    }
    imageops::resize(&image, snapshot.width * scale, snapshot.height * scale, FilterType::Nearest)
}

/// Writes a canvas to `path` as PNG.
pub fn write_png(path: impl AsRef<Path>, snapshot: &CanvasSnapshot, scale: u32) -> HostResult<()> {
    let path = path.as_ref();
    to_image(snapshot, scale).save_with_format(path, ImageFormat::Png)?;
    tracing::debug!("Wrote {}x{} canvas to {}", snapshot.width, snapshot.height, path.display());
    Ok(())
}
