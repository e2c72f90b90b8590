//! Tile raster generation.
//!
//! Renders one square tile by sampling the biome provider once per pixel.
//! A tile at lod `L` has edge `tile_size >> L` and samples the world with a
//! stride of `2^L`, so pixel `(i, j)` of tile `(tx, ty)` is the biome at
//! world `(tx*tile_size + i*2^L, ty*tile_size + j*2^L)`.
//!
//! This runs on worker threads only; the cancellation token is checked
//! between rows so an abandoned job stops early instead of burning the pool.

use image::{Rgba, RgbaImage};
use tokio_util::sync::CancellationToken;

use crate::biomes::BiomeProvider;
use crate::coords::{raster_edge, stride, TileKey};

/// Default tile edge length in world units (and pixels at lod 0).
pub const DEFAULT_TILE_SIZE: u32 = 128;

/// Errors from tile generation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TileError {
    /// The job's token was cancelled; not a failure and never logged as one.
    #[error("generation of tile {0:?} was cancelled")]
    Cancelled(TileKey),

    /// `tile_size >> lod` came out as zero pixels.
    #[error("tile size {tile_size} leaves no pixels at lod {lod}")]
    DegenerateSize { tile_size: u32, lod: u8 },
}

/// Render the raster for `key`. Pure with respect to the provider: no shared
/// state is touched, the finished image is handed back to the caller.
pub fn render_tile(
    provider: &dyn BiomeProvider,
    key: TileKey,
    tile_size: u32,
    cancel: &CancellationToken,
) -> Result<RgbaImage, TileError> {
    let edge = raster_edge(tile_size, key.lod);
    if edge == 0 {
        return Err(TileError::DegenerateSize {
            tile_size,
            lod: key.lod,
        });
    }

    let step = stride(key.lod) as i64;
    let (world_x, world_y) = key.coord.world_origin(tile_size);

    let mut img = RgbaImage::new(edge, edge);
    for j in 0..edge {
        if cancel.is_cancelled() {
            return Err(TileError::Cancelled(key));
        }
        for i in 0..edge {
            let biome = provider.sample(world_x + i as i64 * step, world_y + j as i64 * step);
            let (r, g, b) = biome.color();
            img.put_pixel(i, j, Rgba([r, g, b, 255]));
        }
    }

    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biomes::NoiseBiomeProvider;
    use crate::coords::TileCoord;

    #[test]
    fn test_pixel_matches_strided_sample() {
        // tile (3, 4) at lod 1 with tile_size 128: edge 64, stride 2,
        // pixel (10, 20) samples world (3*128 + 20, 4*128 + 40)
        let provider = NoiseBiomeProvider::new(7);
        let key = TileKey::new(TileCoord::new(3, 4), 1);

        let img = render_tile(&provider, key, 128, &CancellationToken::new()).unwrap();
        assert_eq!(img.width(), 64);
        assert_eq!(img.height(), 64);

        let expected = provider.sample(3 * 128 + 20, 4 * 128 + 40).color();
        let px = img.get_pixel(10, 20);
        assert_eq!((px[0], px[1], px[2]), expected);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn test_lod_zero_samples_every_unit() {
        let provider = NoiseBiomeProvider::new(11);
        let key = TileKey::new(TileCoord::new(-1, -1), 0);

        let img = render_tile(&provider, key, 32, &CancellationToken::new()).unwrap();
        assert_eq!(img.width(), 32);

        let expected = provider.sample(-32 + 5, -32 + 9).color();
        let px = img.get_pixel(5, 9);
        assert_eq!((px[0], px[1], px[2]), expected);
    }

    #[test]
    fn test_cancelled_token_aborts() {
        let provider = NoiseBiomeProvider::new(3);
        let key = TileKey::new(TileCoord::new(0, 0), 0);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = render_tile(&provider, key, 64, &cancel);
        assert!(matches!(result, Err(TileError::Cancelled(_))));
    }

    #[test]
    fn test_degenerate_edge_is_an_error() {
        let provider = NoiseBiomeProvider::new(3);
        let key = TileKey::new(TileCoord::new(0, 0), 3);

        let result = render_tile(&provider, key, 4, &CancellationToken::new());
        assert!(matches!(result, Err(TileError::DegenerateSize { .. })));
    }
}
