//! Viewport-to-tile indexing.
//!
//! Converts the world-space viewport rectangle into the set of tile
//! coordinates that should be on screen, and derives the desired lod from
//! the zoom factor.

use crate::coords::{TileCoord, MAX_LOD};

/// Extra ring of tiles generated around the visible rectangle so panning
/// reveals finished tiles instead of pop-in.
const PREFETCH_MARGIN: i32 = 1;

/// World-space viewport rectangle. `x`/`y` is the top-left corner in world
/// units; `width`/`height` are the world-unit extents (screen size / zoom).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Tile coordinates covering the viewport plus the prefetch margin,
    /// in row-major order (stable within one update pass). Degenerate
    /// dimensions yield an empty set.
    pub fn visible_tiles(&self, tile_size: u32) -> Vec<TileCoord> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Vec::new();
        }

        let tile = tile_size as f64;
        let x_min = (self.x / tile).floor() as i32 - PREFETCH_MARGIN;
        let y_min = (self.y / tile).floor() as i32 - PREFETCH_MARGIN;
        let x_max = ((self.x + self.width) / tile).ceil() as i32 + PREFETCH_MARGIN;
        let y_max = ((self.y + self.height) / tile).ceil() as i32 + PREFETCH_MARGIN;

        let mut tiles =
            Vec::with_capacity(((x_max - x_min + 1) * (y_max - y_min + 1)).max(0) as usize);
        for y in y_min..=y_max {
            for x in x_min..=x_max {
                tiles.push(TileCoord::new(x, y));
            }
        }
        tiles
    }
}

/// Desired lod for a zoom factor: zooming out coarsens one lod per halving,
/// clamped to `0..=MAX_LOD`. Zoomed in (zoom >= 1) always wants full detail.
pub fn lod_for_zoom(zoom: f64) -> u8 {
    let lod = (-zoom.log2()).floor();
    lod.clamp(0.0, MAX_LOD as f64) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_viewport_is_empty() {
        assert!(Viewport::new(0.0, 0.0, 0.0, 100.0).visible_tiles(128).is_empty());
        assert!(Viewport::new(0.0, 0.0, 100.0, -5.0).visible_tiles(128).is_empty());
    }

    #[test]
    fn test_visible_range_includes_margin() {
        // 256x256 view over 128px tiles covers grid 0..=2, margin widens
        // that to -1..=3 on both axes
        let tiles = Viewport::new(0.0, 0.0, 256.0, 256.0).visible_tiles(128);
        assert_eq!(tiles.len(), 25);
        assert!(tiles.contains(&TileCoord::new(-1, -1)));
        assert!(tiles.contains(&TileCoord::new(3, 3)));
        assert!(!tiles.contains(&TileCoord::new(4, 0)));
    }

    #[test]
    fn test_visible_range_negative_origin() {
        let tiles = Viewport::new(-200.0, -200.0, 100.0, 100.0).visible_tiles(128);
        assert!(tiles.contains(&TileCoord::new(-2, -2)));
        assert!(tiles.contains(&TileCoord::new(-1, -1)));
    }

    #[test]
    fn test_order_is_stable() {
        let view = Viewport::new(10.0, 10.0, 300.0, 200.0);
        assert_eq!(view.visible_tiles(128), view.visible_tiles(128));
    }

    #[test]
    fn test_lod_for_zoom() {
        assert_eq!(lod_for_zoom(4.0), 0);
        assert_eq!(lod_for_zoom(1.0), 0);
        assert_eq!(lod_for_zoom(0.5), 1);
        assert_eq!(lod_for_zoom(0.25), 2);
        assert_eq!(lod_for_zoom(0.1), 3);
        // Clamped at the coarsest lod no matter how far out
        assert_eq!(lod_for_zoom(0.01), MAX_LOD);
    }
}
