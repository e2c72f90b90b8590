//! Multi-resolution tile cache.
//!
//! Maps a [`TileKey`] to its generated raster. Entries are inserted on
//! successful generation and never evicted; rasters are `Arc`-shared with the
//! display layer so a swap never copies pixels. All access happens on the
//! controller thread, so a plain map suffices.

use std::collections::HashMap;
use std::sync::Arc;

use image::RgbaImage;

use crate::coords::{TileCoord, TileKey, MAX_LOD};

#[derive(Default)]
pub struct TileCache {
    tiles: HashMap<TileKey, Arc<RgbaImage>>,
}

impl TileCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &TileKey) -> Option<Arc<RgbaImage>> {
        self.tiles.get(key).cloned()
    }

    pub fn contains(&self, key: &TileKey) -> bool {
        self.tiles.contains_key(key)
    }

    /// Insert a generated raster. Overwriting an existing entry is allowed
    /// and idempotent in effect.
    pub fn insert(&mut self, key: TileKey, image: Arc<RgbaImage>) {
        self.tiles.insert(key, image);
    }

    /// Finest cached raster for a coordinate, scanning lods from 0 upward.
    /// Finer always wins, even when the caller wanted something coarser.
    pub fn best_available(&self, coord: TileCoord) -> Option<(Arc<RgbaImage>, u8)> {
        for lod in 0..=MAX_LOD {
            if let Some(image) = self.tiles.get(&TileKey::new(coord, lod)) {
                return Some((image.clone(), lod));
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(edge: u32, value: u8) -> Arc<RgbaImage> {
        Arc::new(RgbaImage::from_pixel(
            edge,
            edge,
            image::Rgba([value, value, value, 255]),
        ))
    }

    #[test]
    fn test_best_available_prefers_finest() {
        let mut cache = TileCache::new();
        let coord = TileCoord::new(2, -3);
        cache.insert(TileKey::new(coord, 3), solid(16, 3));
        cache.insert(TileKey::new(coord, 1), solid(64, 1));

        let (image, lod) = cache.best_available(coord).unwrap();
        assert_eq!(lod, 1);
        assert_eq!(image.get_pixel(0, 0)[0], 1);
    }

    #[test]
    fn test_best_available_misses_other_coords() {
        let mut cache = TileCache::new();
        cache.insert(TileKey::new(TileCoord::new(0, 0), 0), solid(8, 0));
        assert!(cache.best_available(TileCoord::new(0, 1)).is_none());
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut cache = TileCache::new();
        let key = TileKey::new(TileCoord::new(1, 1), 2);
        cache.insert(key, solid(8, 10));
        cache.insert(key, solid(8, 20));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key).unwrap().get_pixel(0, 0)[0], 20);
    }
}
