//! Per-slot display state.
//!
//! Tracks which cached raster currently occupies each screen slot (a tile
//! coordinate with the lod erased) and swaps in finer rasters as they become
//! available. The compositor's only rendering-facing contract is the list of
//! "show this raster at this world rectangle" instructions; drawing and
//! scaling belong to the consumer.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use image::RgbaImage;

use crate::coords::TileCoord;

/// What currently occupies one screen slot.
pub struct DisplayedTile {
    pub image: Arc<RgbaImage>,
    pub lod: u8,
}

/// One "show" instruction for the rendering sink: draw `image` scaled into
/// the world rectangle `[world_x, world_y, size, size]`.
pub struct ShowTile {
    pub world_x: i64,
    pub world_y: i64,
    pub size: u32,
    pub lod: u8,
    pub image: Arc<RgbaImage>,
}

#[derive(Default)]
pub struct DisplayCompositor {
    displayed: HashMap<TileCoord, DisplayedTile>,
}

impl DisplayCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn displayed_lod(&self, coord: TileCoord) -> Option<u8> {
        self.displayed.get(&coord).map(|tile| tile.lod)
    }

    pub fn displayed_count(&self) -> usize {
        self.displayed.len()
    }

    /// Install `image` in the slot if it is empty or occupied by something
    /// strictly coarser. Returns whether a swap happened. Equal or finer
    /// occupants stay put, so a late coarse result never downgrades a slot.
    pub fn offer(&mut self, coord: TileCoord, image: Arc<RgbaImage>, lod: u8) -> bool {
        match self.displayed.get(&coord) {
            Some(current) if current.lod <= lod => false,
            _ => {
                self.displayed.insert(coord, DisplayedTile { image, lod });
                true
            }
        }
    }

    /// Drop the occupant of every slot that left the visible set. The cache
    /// keeps its entries; only the display record goes away.
    pub fn retire_hidden(&mut self, visible: &HashSet<TileCoord>) {
        self.displayed.retain(|coord, _| visible.contains(coord));
    }

    /// Current show instructions, one per occupied slot.
    pub fn show_instructions(&self, tile_size: u32) -> Vec<ShowTile> {
        self.displayed
            .iter()
            .map(|(coord, tile)| {
                let (world_x, world_y) = coord.world_origin(tile_size);
                ShowTile {
                    world_x,
                    world_y,
                    size: tile_size,
                    lod: tile.lod,
                    image: Arc::clone(&tile.image),
                }
            })
            .collect()
    }
}
