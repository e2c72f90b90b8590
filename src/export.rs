//! One-shot PNG export of a world region.
//!
//! Samples the biome provider directly (no tile cache involved) at the
//! requested lod and writes the result with the `image` crate. Rows are
//! generated in parallel since export regions are typically much larger
//! than a viewer tile.

use std::path::Path;

use image::RgbImage;
use rayon::prelude::*;

use crate::biomes::BiomeProvider;
use crate::coords::stride;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("region {width}x{height} has no pixels at lod {lod}")]
    EmptyRegion { width: u32, height: u32, lod: u8 },
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

/// Render the world rectangle starting at `(x, y)` with the given world-unit
/// extents to `path`. Returns the output pixel dimensions.
pub fn export_region(
    provider: &dyn BiomeProvider,
    x: i64,
    y: i64,
    width: u32,
    height: u32,
    lod: u8,
    path: &Path,
) -> Result<(u32, u32), ExportError> {
    let out_w = width >> lod;
    let out_h = height >> lod;
    if out_w == 0 || out_h == 0 {
        return Err(ExportError::EmptyRegion { width, height, lod });
    }

    let step = stride(lod) as i64;
    let rows: Vec<Vec<u8>> = (0..out_h)
        .into_par_iter()
        .map(|j| {
            let mut row = Vec::with_capacity(out_w as usize * 3);
            for i in 0..out_w {
                let biome = provider.sample(x + i as i64 * step, y + j as i64 * step);
                let (r, g, b) = biome.color();
                row.extend_from_slice(&[r, g, b]);
            }
            row
        })
        .collect();

    let mut buffer = Vec::with_capacity((out_w * out_h * 3) as usize);
    for row in rows {
        buffer.extend_from_slice(&row);
    }

    let img = RgbImage::from_raw(out_w, out_h, buffer)
        .expect("buffer length matches output dimensions");
    img.save(path)?;

    Ok((out_w, out_h))
}
