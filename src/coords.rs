//! Tile-grid coordinates and levels of detail.
//!
//! The map is an infinite grid of square tiles. A [`TileCoord`] names one
//! grid cell; a [`TileKey`] names one generated raster (cell + lod). A screen
//! slot is identified by the bare coordinate with the lod erased, so the
//! displayed-tile and visible-set maps key on `TileCoord` directly.

/// Coarsest level of detail. Lod 0 samples every world unit, lod `n` samples
/// every `2^n` units.
pub const MAX_LOD: u8 = 3;

/// Integer tile-grid position. Unbounded in both axes; tile `(x, y)` covers
/// world units `[x*tile_size, (x+1)*tile_size)` on each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// World-space origin (top-left corner) of this tile.
    pub fn world_origin(&self, tile_size: u32) -> (i64, i64) {
        (
            self.x as i64 * tile_size as i64,
            self.y as i64 * tile_size as i64,
        )
    }
}

/// Identity of one generated tile raster: grid cell plus level of detail.
///
/// At most one cache entry and at most one in-flight generation job exist
/// per key at any instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileKey {
    pub coord: TileCoord,
    pub lod: u8,
}

impl TileKey {
    pub fn new(coord: TileCoord, lod: u8) -> Self {
        debug_assert!(lod <= MAX_LOD);
        Self { coord, lod }
    }
}

/// World-unit sampling stride at a given lod.
pub fn stride(lod: u8) -> u32 {
    1 << lod
}

/// Rendered edge length (in pixels) of a tile raster at a given lod.
pub fn raster_edge(tile_size: u32, lod: u8) -> u32 {
    tile_size >> lod
}
