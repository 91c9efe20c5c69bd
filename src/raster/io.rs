//! Convenience helpers for loading rasters via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::raster::Raster;
use crate::util::{AeroMatchError, AeroMatchResult};
use std::path::Path;

/// Creates a raster from an RGB image buffer.
pub fn raster_from_rgb_image(img: &image::RgbImage) -> AeroMatchResult<Raster> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    Raster::new(img.as_raw().clone(), width, height)
}

/// Creates a raster from a dynamic image, converting to RGB8.
pub fn raster_from_dynamic_image(img: &image::DynamicImage) -> AeroMatchResult<Raster> {
    raster_from_rgb_image(&img.to_rgb8())
}

/// Loads an image from disk and converts it to an RGB raster.
pub fn load_raster<P: AsRef<Path>>(path: P) -> AeroMatchResult<Raster> {
    let img = image::open(path).map_err(|err| AeroMatchError::ImageIo {
        reason: err.to_string(),
    })?;
    raster_from_dynamic_image(&img)
}
